use std::fmt;

/// Modules generated for every service package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ServiceModuleName {
    Client,
    ServiceResource,
    Paginator,
    Waiter,
    TypeDefs,
    DataclassDefs,
}

impl ServiceModuleName {
    pub const ALL: [ServiceModuleName; 6] = [
        ServiceModuleName::Client,
        ServiceModuleName::ServiceResource,
        ServiceModuleName::Paginator,
        ServiceModuleName::Waiter,
        ServiceModuleName::TypeDefs,
        ServiceModuleName::DataclassDefs,
    ];

    /// Module name inside the package
    pub fn value(self) -> &'static str {
        match self {
            ServiceModuleName::Client => "client",
            ServiceModuleName::ServiceResource => "service_resource",
            ServiceModuleName::Paginator => "paginator",
            ServiceModuleName::Waiter => "waiter",
            ServiceModuleName::TypeDefs => "type_defs",
            ServiceModuleName::DataclassDefs => "dataclass_defs",
        }
    }

    pub fn stub_file_name(self) -> String {
        format!("{}.pyi", self.value())
    }

    pub fn file_name(self) -> String {
        format!("{}.py", self.value())
    }

    pub fn template_name(self) -> String {
        format!("{}.pyi.jinja2", self.value())
    }
}

impl fmt::Display for ServiceModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}
