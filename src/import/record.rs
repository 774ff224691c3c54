use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use super::import_string::ImportString;
use crate::structures::ServiceModuleName;

/// Minimum interpreter version as `(major, minor)`
pub type PythonVersion = (u8, u8);

/// One import a generated artifact needs
///
/// `name == None` imports the module itself, otherwise `name` is imported from
/// `source`. A record with `min_version` and `fallback` is rendered as a
/// version-conditional block that falls back to the other import on older
/// interpreters.
///
/// Identity is `(source, name)`. Alias, version gate and fallback are not part
/// of it, so two records that only differ in fallback policy collapse into one
/// when collected into a set.
#[derive(Debug, Clone)]
pub struct ImportRecord {
    pub source: ImportString,
    pub name: Option<String>,
    pub alias: Option<String>,
    pub min_version: Option<PythonVersion>,
    pub fallback: Option<Box<ImportRecord>>,
    internal: bool,
}

impl ImportRecord {
    pub fn new(source: ImportString, name: Option<String>) -> Self {
        Self {
            source,
            name,
            alias: None,
            min_version: None,
            fallback: None,
            internal: false,
        }
    }

    /// `import <module>`
    pub fn module(module: &str) -> Self {
        Self::new(ImportString::from_dotted(module), None)
    }

    /// `from <module> import <name>`
    pub fn named(module: &str, name: impl Into<String>) -> Self {
        Self::new(ImportString::from_dotted(module), Some(name.into()))
    }

    /// Import of a sibling module inside the generated package
    pub fn internal(module: ServiceModuleName, name: impl Into<String>) -> Self {
        Self {
            internal: true,
            ..Self::new(ImportString::from_dotted(module.value()), Some(name.into()))
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Gate this import on `min_version`, using `fallback` below it
    pub fn with_fallback(mut self, min_version: PythonVersion, fallback: ImportRecord) -> Self {
        self.min_version = Some(min_version);
        self.fallback = Some(Box::new(fallback));
        self
    }

    pub fn is_internal(&self) -> bool {
        self.internal
    }

    pub fn is_builtins(&self) -> bool {
        self.source.is_builtins()
    }

    /// Whether this imports from the package's own type-definitions module
    pub fn is_type_defs(&self) -> bool {
        self.internal && self.source.parent() == ServiceModuleName::TypeDefs.value()
    }

    /// Whether rendering needs a `sys.version_info` branch
    pub fn needs_version_check(&self) -> bool {
        self.fallback.is_some()
    }

    /// Spell this record as seen from `module_name`, see [`external_form`]
    pub fn get_external(&self, module_name: &str) -> ImportRecord {
        external_form(self, module_name)
    }

    /// Single import statement, ignoring the version gate
    pub fn render_statement(&self) -> String {
        let source = if self.internal {
            format!(".{}", self.source)
        } else {
            self.source.to_string()
        };
        let statement = match &self.name {
            Some(name) => format!("from {source} import {name}"),
            None => format!("import {source}"),
        };
        match &self.alias {
            Some(alias) => format!("{statement} as {alias}"),
            None => statement,
        }
    }

    /// Import statement, or a version-conditional block for gated records
    pub fn render(&self) -> String {
        match (&self.min_version, &self.fallback) {
            (Some((major, minor)), Some(fallback)) => format!(
                "if sys.version_info >= ({major}, {minor}):\n    {}\nelse:\n    {}",
                self.render_statement(),
                fallback.render_statement()
            ),
            _ => self.render_statement(),
        }
    }
}

/// Rewrite `record` for an artifact living under `importing_module`
///
/// Internal records (siblings such as `type_defs`) become absolute imports
/// below `importing_module`; everything else is returned unchanged.
pub fn external_form(record: &ImportRecord, importing_module: &str) -> ImportRecord {
    if !record.internal {
        return record.clone();
    }
    ImportRecord {
        source: ImportString::from_dotted(importing_module).join(&record.source),
        internal: false,
        ..record.clone()
    }
}

impl PartialEq for ImportRecord {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.name == other.name
    }
}

impl Eq for ImportRecord {}

impl Hash for ImportRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
        self.name.hash(state);
    }
}

impl PartialOrd for ImportRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ImportRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.source
            .cmp(&other.source)
            .then_with(|| self.name.cmp(&other.name))
    }
}
