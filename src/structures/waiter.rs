use serde::{Deserialize, Serialize};

use super::class_record::{ClassRecord, Method};
use crate::descriptor::ExternalType;

fn default_waiter_bases() -> Vec<ExternalType> {
    vec![ExternalType::new("botocore.waiter", "Waiter")]
}

/// Waiter polling until a resource reaches a state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Waiter {
    /// Emitted class name, e.g. `BucketExistsWaiter`
    pub name: String,
    /// Name the SDK registers the waiter under, e.g. `bucket_exists`
    pub waiter_name: String,
    #[serde(default)]
    pub methods: Vec<Method>,
    #[serde(default = "default_waiter_bases")]
    pub bases: Vec<ExternalType>,
}

impl Waiter {
    pub fn new(name: impl Into<String>, waiter_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            waiter_name: waiter_name.into(),
            methods: Vec::new(),
            bases: default_waiter_bases(),
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }
}

impl ClassRecord for Waiter {
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
