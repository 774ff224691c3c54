use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::descriptor::{ExternalType, PresentationTable, TypeExpr};
use crate::import::ImportRecord;

/// Method or function argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_annotation: Option<TypeExpr>,
    #[serde(default)]
    pub required: bool,
}

impl Argument {
    pub fn new(name: impl Into<String>, type_annotation: TypeExpr, required: bool) -> Self {
        Self {
            name: name.into(),
            type_annotation: Some(type_annotation),
            required,
        }
    }

    pub fn render(&self, presentation: &PresentationTable) -> String {
        let mut rendered = self.name.clone();
        if let Some(annotation) = &self.type_annotation {
            rendered.push_str(": ");
            rendered.push_str(&annotation.render(presentation));
        }
        if !self.required {
            rendered.push_str(" = ...");
        }
        rendered
    }
}

/// Method of a generated class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<Argument>,
    pub return_type: TypeExpr,
    #[serde(default)]
    pub docstring: String,
}

impl Method {
    pub fn new(name: impl Into<String>, return_type: TypeExpr) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
            return_type,
            docstring: String::new(),
        }
    }

    pub fn with_argument(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn with_docstring(mut self, docstring: impl Into<String>) -> Self {
        self.docstring = docstring.into();
        self
    }

    /// Leaf types of every argument and the return type
    pub fn get_types(&self) -> BTreeSet<TypeExpr> {
        let mut types = self.return_type.atoms();
        for argument in &self.arguments {
            if let Some(annotation) = &argument.type_annotation {
                types.extend(annotation.atoms());
            }
        }
        types
    }

    /// Signature as a method: `self`, then keyword-only arguments
    pub fn render_signature(&self, presentation: &PresentationTable) -> String {
        let mut params = vec!["self".to_string()];
        if !self.arguments.is_empty() {
            params.push("*".to_string());
        }
        params.extend(self.arguments.iter().map(|a| a.render(presentation)));
        format!(
            "def {}({}) -> {}:",
            self.name,
            params.join(", "),
            self.return_type.render(presentation)
        )
    }
}

/// A generated class made of methods and base classes
///
/// The provided methods derive the type set and the required imports from
/// the methods and bases, which is all the root components need.
pub trait ClassRecord {
    fn name(&self) -> &str;

    fn methods(&self) -> &[Method];

    fn bases(&self) -> &[ExternalType];

    /// Every leaf type used by the class
    fn get_types(&self) -> BTreeSet<TypeExpr> {
        let mut types: BTreeSet<TypeExpr> = self
            .bases()
            .iter()
            .cloned()
            .map(TypeExpr::External)
            .collect();
        for method in self.methods() {
            types.extend(method.get_types());
        }
        types
    }

    /// Imports needed to compile the class, builtins excluded
    fn get_required_import_records(&self) -> BTreeSet<ImportRecord> {
        self.get_types()
            .iter()
            .filter_map(TypeExpr::import_record)
            .filter(|record| !record.is_builtins())
            .collect()
    }
}
