use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::class_record::Argument;
use crate::descriptor::{PresentationTable, TypeExpr};

/// Module-level helper function emitted next to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<Argument>,
    pub return_type: TypeExpr,
    #[serde(default)]
    pub docstring: String,
}

impl Function {
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

    pub fn get_types(&self) -> BTreeSet<TypeExpr> {
        let mut types = self.return_type.atoms();
        for argument in &self.arguments {
            if let Some(annotation) = &argument.type_annotation {
                types.extend(annotation.atoms());
            }
        }
        types
    }

    pub fn render_signature(&self, presentation: &PresentationTable) -> String {
        let params = self
            .arguments
            .iter()
            .map(|a| a.render(presentation))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "def {}({params}) -> {}:",
            self.name,
            self.return_type.render(presentation)
        )
    }
}
