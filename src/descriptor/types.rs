use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::import::{ImportRecord, PythonVersion, BUILTINS};
use crate::structures::ServiceModuleName;

/// A named type imported from a third-party or standard module
///
/// `min_version` and `fallback_module` describe a symbol that only exists
/// in `module` from a given interpreter version on, and lives in
/// `fallback_module` before that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExternalType {
    pub module: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_version: Option<PythonVersion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_module: Option<String>,
}

impl ExternalType {
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
            min_version: None,
            fallback_module: None,
        }
    }

    pub fn with_fallback(mut self, min_version: PythonVersion, module: impl Into<String>) -> Self {
        self.min_version = Some(min_version);
        self.fallback_module = Some(module.into());
        self
    }

    pub fn import_record(&self) -> ImportRecord {
        let record = ImportRecord::named(&self.module, self.name.clone());
        match (self.min_version, &self.fallback_module) {
            (Some(version), Some(fallback)) => {
                record.with_fallback(version, ImportRecord::named(fallback, self.name.clone()))
            }
            _ => record,
        }
    }
}

/// How a descriptor reference is spelled in generated annotations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Presentation {
    /// Referenced by its bare name
    #[default]
    Direct,
    /// Referenced as a quoted forward reference, the definition may come later
    ForwardRef,
}

/// Presentation mode per descriptor name, produced by the flattener
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresentationTable {
    modes: BTreeMap<String, Presentation>,
}

impl PresentationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, mode: Presentation) {
        self.modes.insert(name.into(), mode);
    }

    /// Mode for `name`, `Direct` when it was never recorded
    pub fn mode(&self, name: &str) -> Presentation {
        self.modes.get(name).copied().unwrap_or_default()
    }

    pub fn is_forward_ref(&self, name: &str) -> bool {
        self.mode(name) == Presentation::ForwardRef
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Presentation)> {
        self.modes.iter().map(|(name, mode)| (name.as_str(), *mode))
    }
}

/// Field type expression
///
/// Serialized externally tagged, e.g. `{"ref": "BucketTypeDef"}` or
/// `{"container": {"outer": {...}, "args": [...]}}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeExpr {
    /// Builtin type such as `str` or `int`
    Builtin(String),
    /// Type imported from another module
    External(ExternalType),
    /// Reference to a composite type descriptor by name
    Ref(String),
    /// Reference from a descriptor to itself
    ///
    /// Rendered as a plain string-keyed mapping so the definition never
    /// depends on itself.
    SelfRef,
    /// Generic container such as `List[...]` or `Dict[..., ...]`
    Container {
        outer: ExternalType,
        #[serde(default)]
        args: Vec<TypeExpr>,
    },
    /// Literal string values
    Literal(Vec<String>),
}

impl TypeExpr {
    pub fn builtin(name: impl Into<String>) -> Self {
        TypeExpr::Builtin(name.into())
    }

    pub fn reference(name: impl Into<String>) -> Self {
        TypeExpr::Ref(name.into())
    }

    pub fn external(module: impl Into<String>, name: impl Into<String>) -> Self {
        TypeExpr::External(ExternalType::new(module, name))
    }

    /// `typing.<name>[args]`
    pub fn typing(name: &str, args: Vec<TypeExpr>) -> Self {
        TypeExpr::Container {
            outer: ExternalType::new("typing", name),
            args,
        }
    }

    pub fn list_of(item: TypeExpr) -> Self {
        Self::typing("List", vec![item])
    }

    pub fn dict_of(key: TypeExpr, value: TypeExpr) -> Self {
        Self::typing("Dict", vec![key, value])
    }

    pub fn literal<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TypeExpr::Literal(values.into_iter().map(Into::into).collect())
    }

    /// Leaf types this expression is made of
    ///
    /// Containers contribute their outer type plus the atoms of every
    /// argument; a self reference contributes the mapping types it renders as.
    pub fn atoms(&self) -> BTreeSet<TypeExpr> {
        let mut atoms = BTreeSet::new();
        self.collect_atoms(&mut atoms);
        atoms
    }

    fn collect_atoms(&self, atoms: &mut BTreeSet<TypeExpr>) {
        match self {
            TypeExpr::Container { outer, args } => {
                atoms.insert(TypeExpr::External(outer.clone()));
                for arg in args {
                    arg.collect_atoms(atoms);
                }
            }
            TypeExpr::SelfRef => {
                atoms.insert(TypeExpr::external("typing", "Dict"));
                atoms.insert(TypeExpr::external("typing", "Any"));
            }
            other => {
                atoms.insert(other.clone());
            }
        }
    }

    /// Import needed to spell this type, for leaf types only
    pub fn import_record(&self) -> Option<ImportRecord> {
        match self {
            TypeExpr::Builtin(name) => Some(ImportRecord::named(BUILTINS, name.clone())),
            TypeExpr::External(external) => Some(external.import_record()),
            TypeExpr::Ref(name) => Some(ImportRecord::internal(ServiceModuleName::TypeDefs, name.clone())),
            TypeExpr::Literal(_) => Some(
                ImportRecord::named("typing", "Literal")
                    .with_fallback((3, 8), ImportRecord::named("typing_extensions", "Literal")),
            ),
            TypeExpr::SelfRef | TypeExpr::Container { .. } => None,
        }
    }

    /// Names of every descriptor referenced at any depth
    pub fn referenced_names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names(&self, names: &mut BTreeSet<String>) {
        match self {
            TypeExpr::Ref(name) => {
                names.insert(name.clone());
            }
            TypeExpr::Container { args, .. } => {
                for arg in args {
                    arg.collect_names(names);
                }
            }
            _ => {}
        }
    }

    /// Rewrite `Ref(name)` into `SelfRef` at any depth, returns whether anything changed
    pub(crate) fn replace_self_reference(&mut self, name: &str) -> bool {
        match self {
            TypeExpr::Ref(target) if target == name => {
                *self = TypeExpr::SelfRef;
                true
            }
            TypeExpr::Container { args, .. } => {
                let mut changed = false;
                for arg in args.iter_mut() {
                    changed |= arg.replace_self_reference(name);
                }
                changed
            }
            _ => false,
        }
    }

    /// Annotation text
    pub fn render(&self, presentation: &PresentationTable) -> String {
        self.render_with(presentation, &|name: &str| name.to_string())
    }

    /// Annotation text with descriptor names mapped through `reference_name`
    pub fn render_with(
        &self,
        presentation: &PresentationTable,
        reference_name: &dyn Fn(&str) -> String,
    ) -> String {
        match self {
            TypeExpr::Builtin(name) => name.clone(),
            TypeExpr::External(external) => external.name.clone(),
            TypeExpr::Ref(name) => {
                let spelled = reference_name(name);
                if presentation.is_forward_ref(name) {
                    format!("\"{spelled}\"")
                } else {
                    spelled
                }
            }
            TypeExpr::SelfRef => "Dict[str, Any]".to_string(),
            TypeExpr::Container { outer, args } => {
                if args.is_empty() {
                    return outer.name.clone();
                }
                let args = args
                    .iter()
                    .map(|arg| arg.render_with(presentation, reference_name))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}[{args}]", outer.name)
            }
            TypeExpr::Literal(values) => {
                let values = values
                    .iter()
                    .map(|v| format!("{v:?}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("Literal[{values}]")
            }
        }
    }
}
