//! Generator configuration
//!
//! Read from a `servicegen.toml` next to the manifests, or from the file given
//! with `--config`. Every key is optional:
//!
//! ```toml
//! duplicate_policy = "strict"   # or "first_wins"
//! generate_setup = true
//! threads = 4
//!
//! [formatter]
//! format_command = ["black", "--quiet", "--pyi", "-"]
//! sort_imports_command = ["isort", "--profile", "black", "--project", "{module_name}", "-"]
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::descriptor::DuplicatePolicy;
use crate::writer::{CommandFormatter, Formatter, PassthroughFormatter};

/// File name looked up next to a manifest
pub const CONFIG_FILE_NAME: &str = "servicegen.toml";

/// External formatter command lines, see [`CommandFormatter`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterConfig {
    pub format_command: Vec<String>,
    pub sort_imports_command: Vec<String>,
}

impl FormatterConfig {
    pub fn is_empty(&self) -> bool {
        self.format_command.is_empty() && self.sort_imports_command.is_empty()
    }

    /// [`PassthroughFormatter`] when no command is configured
    pub fn build(&self) -> Box<dyn Formatter> {
        if self.is_empty() {
            Box::new(PassthroughFormatter)
        } else {
            Box::new(CommandFormatter::new(
                self.format_command.clone(),
                self.sort_imports_command.clone(),
            ))
        }
    }
}

/// Settings shared by every service of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Handling of differing descriptors with the same name
    pub duplicate_policy: DuplicatePolicy,
    /// Also write `setup.py` and `README.md`
    pub generate_setup: bool,
    /// Worker threads for multi-service runs, `None` uses one per core
    pub threads: Option<usize>,
    pub formatter: FormatterConfig,
}

/// Load generator configuration from a TOML file
///
/// # Arguments
///
/// * `config_path` - Path to the `servicegen.toml` file
///
/// # Returns
///
/// Returns `Ok(Some(config))` if the file exists and parses,
/// `Ok(None)` if it does not exist,
/// `Err` if it exists but cannot be read or parsed.
pub fn load_generator_config(config_path: &Path) -> anyhow::Result<Option<GeneratorConfig>> {
    if !config_path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(config_path).with_context(|| {
        format!(
            "Failed to read generator config: {}",
            config_path.display()
        )
    })?;

    let config: GeneratorConfig = toml::from_str(&contents).with_context(|| {
        format!(
            "Failed to parse generator config: {}",
            config_path.display()
        )
    })?;

    Ok(Some(config))
}

/// Find `servicegen.toml` in the directory of `manifest_path`
pub fn auto_detect_config_path(manifest_path: &Path) -> Option<PathBuf> {
    let manifest_dir = manifest_path.parent()?;
    let config_path = manifest_dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Resolve the configuration for a run
///
/// An explicit path must exist. Without one, the directory of the first
/// manifest is searched and defaults are used if nothing is found.
///
/// # Errors
///
/// Returns an error if the explicit file is missing or any file found is invalid.
pub fn resolve_generator_config(
    explicit: Option<&Path>,
    manifests: &[PathBuf],
) -> anyhow::Result<GeneratorConfig> {
    if let Some(path) = explicit {
        return load_generator_config(path)?
            .with_context(|| format!("Generator config not found: {}", path.display()));
    }
    match manifests.first().and_then(|m| auto_detect_config_path(m)) {
        Some(path) => Ok(load_generator_config(&path)?.unwrap_or_default()),
        None => Ok(GeneratorConfig::default()),
    }
}
