use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::resolve_generator_config;
use crate::descriptor::Presentation;
use crate::generate::{generate_services, GenerateOptions};
use crate::manifest::load_manifest;
use crate::structures::ServiceModuleName;
use crate::writer::TemplateRenderer;

/// Command-line interface for servicegen
///
/// Generates typed Python stub packages from service manifests.
#[derive(Parser)]
#[command(name = "servicegen")]
#[command(about = "Service stub package generator", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Generate stub packages from one or more service manifests
    Generate {
        /// Path to a service manifest (YAML or JSON), repeat for several services
        #[arg(short, long = "manifest", required = true, num_args = 1..)]
        manifests: Vec<PathBuf>,

        /// Output directory, each service gets its own package below it
        #[arg(short, long)]
        output: PathBuf,

        /// Also generate setup.py and README.md
        #[arg(long, default_value_t = false)]
        setup: bool,

        /// Perform a dry run: show what would change without writing files
        #[arg(long, default_value_t = false)]
        dry_run: bool,

        /// Path to the generator configuration file (servicegen.toml)
        /// If not provided, will auto-detect alongside the first manifest
        #[arg(long)]
        config: Option<PathBuf>,

        /// Worker threads, overrides the configuration file
        #[arg(long)]
        threads: Option<usize>,
    },
    /// Show the flattened type definitions and import sets of a manifest
    Inspect {
        /// Path to the service manifest (YAML or JSON)
        #[arg(short, long)]
        manifest: PathBuf,

        /// Path to the generator configuration file (servicegen.toml)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Parse the command line and execute it
///
/// # Errors
///
/// Returns an error if the configuration cannot be resolved or an inspected
/// manifest is invalid. Per-service generation failures are reported on
/// stdout and turned into a failing exit code instead.
pub fn run_cli() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let success = run_command(&cli.command, &mut io::stdout().lock())?;
    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Execute a parsed command, writing its report to `out`
///
/// Returns `false` when at least one service failed to generate.
///
/// # Errors
///
/// Returns an error if the configuration cannot be resolved, an inspected
/// manifest is invalid, or `out` cannot be written.
pub fn run_command(command: &Commands, out: &mut dyn Write) -> anyhow::Result<bool> {
    match command {
        Commands::Generate {
            manifests,
            output,
            setup,
            dry_run,
            config,
            threads,
        } => {
            let config = resolve_generator_config(config.as_deref(), manifests)?;
            let options = GenerateOptions {
                output: output.clone(),
                generate_setup: *setup || config.generate_setup,
                dry_run: *dry_run,
                duplicate_policy: config.duplicate_policy,
            };
            let formatter = config.formatter.build();
            info!(
                manifests = manifests.len(),
                output = %output.display(),
                dry_run = *dry_run,
                "starting generation"
            );
            let outcomes = generate_services(
                manifests,
                &options,
                &TemplateRenderer,
                formatter.as_ref(),
                threads.or(config.threads),
            )?;

            let verb = if *dry_run { "would write" } else { "wrote" };
            let mut success = true;
            for outcome in &outcomes {
                match &outcome.result {
                    Ok(paths) => {
                        writeln!(out, "{}: {} {} file(s)", outcome.label(), verb, paths.len())?;
                        for path in paths {
                            writeln!(out, "  {}", path.display())?;
                        }
                    }
                    Err(err) => {
                        success = false;
                        writeln!(out, "{}: failed: {err:#}", outcome.label())?;
                    }
                }
            }
            Ok(success)
        }
        Commands::Inspect { manifest, config } => {
            let config = resolve_generator_config(config.as_deref(), std::slice::from_ref(manifest))?;
            let manifest = load_manifest(manifest)?;
            let mut package = manifest.into_package(config.duplicate_policy)?;
            package.flatten_types()?;

            writeln!(
                out,
                "{} ({}) -> {}",
                package.service_name.name, package.service_name.class_name, package.name
            )?;
            writeln!(out, "type definitions: {}", package.type_defs().len())?;
            for descriptor in package.type_defs() {
                match package.presentation().mode(&descriptor.name) {
                    Presentation::Direct => writeln!(out, "  {}", descriptor.name)?,
                    Presentation::ForwardRef => {
                        writeln!(out, "  {} (forward reference)", descriptor.name)?
                    }
                }
            }
            for module in ServiceModuleName::ALL {
                let records = package.get_required_import_records(module);
                if records.is_empty() {
                    continue;
                }
                writeln!(out, "{}:", module.stub_file_name())?;
                for record in records {
                    for line in record.render().lines() {
                        writeln!(out, "  {line}")?;
                    }
                }
            }
            Ok(true)
        }
    }
}
