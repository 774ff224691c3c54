use std::path::Path;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::descriptor::{DuplicatePolicy, TypeDescriptor, TypeRegistry};
use crate::error::GenerateError;
use crate::package::ServicePackage;
use crate::structures::{Client, Function, Paginator, ServiceName, ServiceResource, Waiter};

/// Serialization of a manifest file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Yaml,
    Json,
}

impl ManifestFormat {
    /// YAML for `.yaml`/`.yml`, JSON otherwise
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => ManifestFormat::Yaml,
            _ => ManifestFormat::Json,
        }
    }
}

/// One service, as read from a manifest file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceManifest {
    pub service: ServiceName,
    /// Top-level module directory, defaults to the service module name
    #[serde(default)]
    pub package_name: Option<String>,
    pub pypi_name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub shapes: Vec<TypeDescriptor>,
    pub client: Client,
    #[serde(default)]
    pub service_resource: Option<ServiceResource>,
    #[serde(default)]
    pub paginators: Vec<Paginator>,
    #[serde(default)]
    pub waiters: Vec<Waiter>,
    #[serde(default)]
    pub helper_functions: Vec<Function>,
}

impl ServiceManifest {
    pub fn package_name(&self) -> &str {
        self.package_name
            .as_deref()
            .unwrap_or(&self.service.module_name)
    }

    /// Check the fields every generated file depends on
    ///
    /// # Errors
    ///
    /// Returns an error naming the first empty required field.
    pub fn validate(&self) -> anyhow::Result<()> {
        let required = [
            ("service.name", self.service.name.as_str()),
            ("service.class_name", self.service.class_name.as_str()),
            ("service.module_name", self.service.module_name.as_str()),
            ("pypi_name", self.pypi_name.as_str()),
            ("client.name", self.client.name.as_str()),
            ("client.alias_name", self.client.alias_name.as_str()),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                bail!("manifest field '{field}' must not be empty");
            }
        }
        if let Some(shape) = self.shapes.iter().find(|s| s.name.trim().is_empty()) {
            bail!("manifest contains a shape without a name ({} fields)", shape.fields().len());
        }
        Ok(())
    }

    /// Build the type registry and assemble the package
    ///
    /// # Errors
    ///
    /// [`GenerateError::NameConflict`] when two shapes share a name but differ
    /// and `policy` is strict.
    pub fn into_package(self, policy: DuplicatePolicy) -> Result<ServicePackage, GenerateError> {
        let package_name = self.package_name().to_string();
        let registry = TypeRegistry::from_descriptors(self.service.name.clone(), policy, self.shapes)?;
        debug!(
            service = %self.service.name,
            shapes = registry.len(),
            "built type registry"
        );

        let mut package = ServicePackage::new(
            package_name,
            self.pypi_name,
            self.service,
            self.client,
            registry,
        )
        .with_version(self.version)
        .with_paginators(self.paginators)
        .with_waiters(self.waiters)
        .with_helper_functions(self.helper_functions);
        if let Some(resource) = self.service_resource {
            package = package.with_service_resource(resource);
        }
        Ok(package)
    }
}

/// Parse manifest text
///
/// # Errors
///
/// Returns an error if the text is not a valid manifest in `format` or fails
/// [`ServiceManifest::validate`].
pub fn parse_manifest(content: &str, format: ManifestFormat) -> anyhow::Result<ServiceManifest> {
    let manifest: ServiceManifest = match format {
        ManifestFormat::Yaml => serde_yaml::from_str(content)?,
        ManifestFormat::Json => serde_json::from_str(content)?,
    };
    manifest.validate()?;
    Ok(manifest)
}

/// Load a manifest file, picking the format from its extension
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
pub fn load_manifest(path: &Path) -> anyhow::Result<ServiceManifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
    parse_manifest(&content, ManifestFormat::from_path(path))
        .with_context(|| format!("Failed to parse manifest: {}", path.display()))
}
