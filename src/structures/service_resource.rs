use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::class_record::{ClassRecord, Method};
use crate::descriptor::{ExternalType, TypeExpr};

fn default_resource_bases() -> Vec<ExternalType> {
    vec![ExternalType::new("boto3.resources.base", "ServiceResource")]
}

/// Sub-resource reachable from the service resource, e.g. `Bucket`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    #[serde(default)]
    pub methods: Vec<Method>,
    #[serde(default = "default_resource_bases")]
    pub bases: Vec<ExternalType>,
}

impl Resource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
            bases: default_resource_bases(),
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }
}

impl ClassRecord for Resource {
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

/// High-level resource interface of a service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceResource {
    /// Emitted class name, e.g. `S3ServiceResource`
    pub name: String,
    /// Short alias exported next to the name, e.g. `ServiceResource`
    pub alias_name: String,
    #[serde(default)]
    pub methods: Vec<Method>,
    #[serde(default)]
    pub sub_resources: Vec<Resource>,
    #[serde(default = "default_resource_bases")]
    pub bases: Vec<ExternalType>,
    #[serde(default)]
    pub docstring: String,
}

impl ServiceResource {
    pub fn new(name: impl Into<String>, alias_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias_name: alias_name.into(),
            methods: Vec::new(),
            sub_resources: Vec::new(),
            bases: default_resource_bases(),
            docstring: String::new(),
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_sub_resource(mut self, resource: Resource) -> Self {
        self.sub_resources.push(resource);
        self
    }
}

impl ClassRecord for ServiceResource {
    fn name(&self) -> &str {
        &self.name
    }

    fn methods(&self) -> &[Method] {
        &self.methods
    }

    fn bases(&self) -> &[ExternalType] {
        &self.bases
    }

    fn get_types(&self) -> BTreeSet<TypeExpr> {
        let mut types: BTreeSet<TypeExpr> =
            self.bases.iter().cloned().map(TypeExpr::External).collect();
        for method in &self.methods {
            types.extend(method.get_types());
        }
        for resource in &self.sub_resources {
            types.extend(resource.get_types());
        }
        types
    }
}
