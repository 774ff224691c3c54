use serde::{Deserialize, Serialize};

/// Identity of the remote service a package is generated for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceName {
    /// Service name as the SDK spells it, e.g. `s3` or `ec2-instance-connect`
    pub name: String,
    /// Prefix for generated class names, e.g. `S3`
    pub class_name: String,
    /// Top-level module of the generated package, e.g. `stubs_s3`
    pub module_name: String,
}

impl ServiceName {
    pub fn new(
        name: impl Into<String>,
        class_name: impl Into<String>,
        module_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            class_name: class_name.into(),
            module_name: module_name.into(),
        }
    }

    /// Name usable as an identifier
    pub fn import_name(&self) -> String {
        self.name.replace('-', "_")
    }
}
