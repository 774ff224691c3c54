//! Per-service generation and multi-service runs
//!
//! A service is the unit of failure: [`generate_service`] either produces the
//! whole package or returns an error before writing anything. Multi-service
//! runs in [`generate_services`] process manifests in parallel and collect one
//! [`ServiceOutcome`] per manifest, so a broken service never stops the rest.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use rayon::prelude::*;
use tracing::{error, info, warn};

use crate::descriptor::DuplicatePolicy;
use crate::manifest::{load_manifest, ServiceManifest};
use crate::writer::{pending_changes, write_service_package, Formatter, Renderer};

/// Settings for one generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    pub output: PathBuf,
    pub generate_setup: bool,
    /// Report the files that would change instead of writing them
    pub dry_run: bool,
    pub duplicate_policy: DuplicatePolicy,
}

impl GenerateOptions {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            generate_setup: false,
            dry_run: false,
            duplicate_policy: DuplicatePolicy::default(),
        }
    }
}

/// What happened to one manifest
#[derive(Debug)]
pub struct ServiceOutcome {
    pub manifest: PathBuf,
    /// Service name, known once the manifest parsed
    pub service: Option<String>,
    /// Written paths, or the paths that would be written in a dry run
    pub result: anyhow::Result<Vec<PathBuf>>,
}

impl ServiceOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// Service name, or the manifest path when parsing failed
    pub fn label(&self) -> String {
        self.service
            .clone()
            .unwrap_or_else(|| self.manifest.display().to_string())
    }
}

fn build_and_write(
    manifest_path: &Path,
    service: &str,
    manifest: ServiceManifest,
    options: &GenerateOptions,
    renderer: &dyn Renderer,
    formatter: &dyn Formatter,
) -> anyhow::Result<Vec<PathBuf>> {
    let mut package = manifest.into_package(options.duplicate_policy)?;
    package.flatten_types()?;
    info!(
        service = %service,
        manifest = %manifest_path.display(),
        type_defs = package.type_defs().len(),
        "flattened type definitions"
    );
    if options.dry_run {
        pending_changes(
            &package,
            &options.output,
            options.generate_setup,
            renderer,
            formatter,
        )
    } else {
        write_service_package(
            &package,
            &options.output,
            options.generate_setup,
            renderer,
            formatter,
        )
    }
}

/// Generate the package described by one manifest
///
/// Loads the manifest, builds and flattens the package, then writes it (or
/// computes the pending changes for a dry run). Returns the service name, once
/// the manifest parsed, together with the outcome.
///
/// The result is an error if the manifest is invalid, flattening hits a name
/// conflict or an unresolved reference, or rendering or writing fails. Only an
/// I/O error in the write step can leave a partially written package.
pub fn generate_service(
    manifest_path: &Path,
    options: &GenerateOptions,
    renderer: &dyn Renderer,
    formatter: &dyn Formatter,
) -> (Option<String>, anyhow::Result<Vec<PathBuf>>) {
    let manifest = match load_manifest(manifest_path) {
        Ok(manifest) => manifest,
        Err(err) => return (None, Err(err)),
    };
    let service = manifest.service.name.clone();
    let result = build_and_write(manifest_path, &service, manifest, options, renderer, formatter)
        .with_context(|| format!("Failed to generate service '{service}'"));
    (Some(service), result)
}

/// Generate every manifest, in parallel
///
/// `threads` sizes a dedicated pool; `None` uses the global rayon pool.
/// Outcomes are returned in manifest order.
///
/// # Errors
///
/// Only fails if the thread pool cannot be built. Per-service failures are
/// reported in the outcomes and logged.
pub fn generate_services(
    manifests: &[PathBuf],
    options: &GenerateOptions,
    renderer: &dyn Renderer,
    formatter: &dyn Formatter,
    threads: Option<usize>,
) -> anyhow::Result<Vec<ServiceOutcome>> {
    let start = Instant::now();
    let run = || -> Vec<ServiceOutcome> {
        manifests
            .par_iter()
            .map(|manifest| {
                let (service, result) = generate_service(manifest, options, renderer, formatter);
                let outcome = ServiceOutcome {
                    manifest: manifest.clone(),
                    service,
                    result,
                };
                match &outcome.result {
                    Ok(paths) if paths.is_empty() => {
                        info!(service = %outcome.label(), "up to date")
                    }
                    Ok(paths) => info!(
                        service = %outcome.label(),
                        files = paths.len(),
                        dry_run = options.dry_run,
                        "generated"
                    ),
                    Err(err) => error!(
                        service = %outcome.label(),
                        error = %format!("{err:#}"),
                        "service generation failed"
                    ),
                }
                outcome
            })
            .collect()
    };

    let outcomes = match threads {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .context("Failed to build generation thread pool")?
            .install(run),
        None => run(),
    };

    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    if failed > 0 {
        warn!(
            failed,
            total = outcomes.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "generation finished with failures"
        );
    } else {
        info!(
            total = outcomes.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "generation finished"
        );
    }
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::writer::{PassthroughFormatter, TemplateRenderer};
    use std::fs;
    use tempfile::TempDir;

    fn manifest_json(service: &str, shapes: serde_json::Value) -> String {
        serde_json::json!({
            "service": {
                "name": service,
                "class_name": service.to_uppercase(),
                "module_name": format!("stubs_{service}"),
            },
            "pypi_name": format!("stubs-{service}"),
            "version": "0.1.0",
            "shapes": shapes,
            "client": {
                "name": format!("{}Client", service.to_uppercase()),
                "alias_name": "Client",
                "methods": [
                    {"name": "describe", "return_type": {"ref": "DescribeOutputTypeDef"}}
                ]
            }
        })
        .to_string()
    }

    fn valid_shapes() -> serde_json::Value {
        serde_json::json!([
            {"name": "DescribeOutputTypeDef", "fields": [{"name": "Id", "type": {"builtin": "str"}}]}
        ])
    }

    #[test]
    fn test_generate_service_writes_package() {
        let dir = TempDir::new().unwrap();
        let manifest = dir.path().join("sqs.json");
        fs::write(&manifest, manifest_json("sqs", valid_shapes())).unwrap();

        let options = GenerateOptions::new(dir.path().join("out"));
        let (service, result) =
            generate_service(&manifest, &options, &TemplateRenderer, &PassthroughFormatter);
        assert_eq!(service.as_deref(), Some("sqs"));
        let written = result.unwrap();
        // 5 package files, client stub + module, type_defs stub + module, dataclass module
        assert_eq!(written.len(), 10);
        assert!(dir.path().join("out/stubs_sqs/type_defs.pyi").exists());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let manifest = dir.path().join("sqs.json");
        fs::write(&manifest, manifest_json("sqs", valid_shapes())).unwrap();

        let mut options = GenerateOptions::new(dir.path().join("out"));
        options.dry_run = true;
        let (_, result) =
            generate_service(&manifest, &options, &TemplateRenderer, &PassthroughFormatter);
        assert_eq!(result.unwrap().len(), 10);
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_failures_are_isolated_per_service() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("sqs.json");
        let bad = dir.path().join("sns.json");
        let broken = dir.path().join("broken.json");
        fs::write(&good, manifest_json("sqs", valid_shapes())).unwrap();
        fs::write(&bad, manifest_json("sns", serde_json::json!([]))).unwrap();
        fs::write(&broken, "{").unwrap();

        let options = GenerateOptions::new(dir.path().join("out"));
        let outcomes = generate_services(
            &[good, bad, broken.clone()],
            &options,
            &TemplateRenderer,
            &PassthroughFormatter,
            Some(2),
        )
        .unwrap();

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].is_ok());
        let err = outcomes[1].result.as_ref().unwrap_err();
        assert!(format!("{err:#}").contains("DescribeOutputTypeDef"));
        assert_eq!(outcomes[1].label(), "sns");
        assert!(!dir.path().join("out/stubs_sns").exists());
        assert!(outcomes[2].service.is_none());
        assert_eq!(outcomes[2].label(), broken.display().to_string());
        assert!(dir.path().join("out/stubs_sqs/client.pyi").exists());
    }
}
