use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::class_record::{ClassRecord, Method};
use crate::descriptor::{ExternalType, TypeExpr};

fn default_client_bases() -> Vec<ExternalType> {
    vec![ExternalType::new("botocore.client", "BaseClient")]
}

fn default_exceptions_name() -> String {
    "Exceptions".to_string()
}

fn default_exceptions_bases() -> Vec<ExternalType> {
    vec![ExternalType::new("botocore.errorfactory", "BaseClientExceptions")]
}

fn default_error_type() -> ExternalType {
    ExternalType::new("botocore.exceptions", "ClientError")
}

/// Exceptions namespace attached to a client
///
/// Every name in `exceptions` becomes a `Type[<error_type>]` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionsClass {
    #[serde(default = "default_exceptions_name")]
    pub name: String,
    #[serde(default = "default_exceptions_bases")]
    pub bases: Vec<ExternalType>,
    #[serde(default = "default_error_type")]
    pub error_type: ExternalType,
    #[serde(default)]
    pub exceptions: Vec<String>,
}

impl Default for ExceptionsClass {
    fn default() -> Self {
        Self {
            name: default_exceptions_name(),
            bases: default_exceptions_bases(),
            error_type: default_error_type(),
            exceptions: Vec::new(),
        }
    }
}

impl ExceptionsClass {
    pub fn with_exception(mut self, name: impl Into<String>) -> Self {
        self.exceptions.push(name.into());
        self
    }

    /// Annotation of every exception attribute
    pub fn attribute_type(&self) -> TypeExpr {
        TypeExpr::typing("Type", vec![TypeExpr::External(self.error_type.clone())])
    }
}

impl ClassRecord for ExceptionsClass {
    fn name(&self) -> &str {
        &self.name
    }

    fn methods(&self) -> &[Method] {
        &[]
    }

    fn bases(&self) -> &[ExternalType] {
        &self.bases
    }

    fn get_types(&self) -> BTreeSet<TypeExpr> {
        let mut types: BTreeSet<TypeExpr> =
            self.bases.iter().cloned().map(TypeExpr::External).collect();
        if !self.exceptions.is_empty() {
            types.extend(self.attribute_type().atoms());
        }
        types
    }
}

/// Low-level service client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// Emitted class name, e.g. `S3Client`
    pub name: String,
    /// Short alias exported next to the name, e.g. `Client`
    pub alias_name: String,
    #[serde(default)]
    pub methods: Vec<Method>,
    #[serde(default)]
    pub exceptions_class: ExceptionsClass,
    #[serde(default = "default_client_bases")]
    pub bases: Vec<ExternalType>,
    #[serde(default)]
    pub docstring: String,
}

impl Client {
    pub fn new(name: impl Into<String>, alias_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias_name: alias_name.into(),
            methods: Vec::new(),
            exceptions_class: ExceptionsClass::default(),
            bases: default_client_bases(),
            docstring: String::new(),
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_exceptions_class(mut self, exceptions_class: ExceptionsClass) -> Self {
        self.exceptions_class = exceptions_class;
        self
    }
}

impl ClassRecord for Client {
    fn name(&self) -> &str {
        &self.name
    }

    fn methods(&self) -> &[Method] {
        &self.methods
    }

    fn bases(&self) -> &[ExternalType] {
        &self.bases
    }
}
