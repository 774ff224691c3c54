use serde::{Deserialize, Serialize};

use super::class_record::{ClassRecord, Method};
use crate::descriptor::ExternalType;

fn default_paginator_bases() -> Vec<ExternalType> {
    vec![ExternalType::new("botocore.paginate", "Paginator")]
}

/// Paginator for one list operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginator {
    /// Emitted class name, e.g. `ListObjectsV2Paginator`
    pub name: String,
    /// Operation the paginator wraps, e.g. `list_objects_v2`
    pub operation_name: String,
    #[serde(default)]
    pub methods: Vec<Method>,
    #[serde(default = "default_paginator_bases")]
    pub bases: Vec<ExternalType>,
}

impl Paginator {
    pub fn new(name: impl Into<String>, operation_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operation_name: operation_name.into(),
            methods: Vec::new(),
            bases: default_paginator_bases(),
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }
}

impl ClassRecord for Paginator {
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
