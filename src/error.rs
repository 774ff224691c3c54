use std::fmt;

/// Error raised while assembling one service package
///
/// Both variants are fatal for the service they name and leave other services
/// untouched. They carry the service name and the descriptor name so the
/// caller can attribute a failure in a multi-service run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    /// Two structurally different type descriptors claim the same name
    NameConflict {
        /// Service whose package was being assembled
        service: String,
        /// The contested descriptor name
        name: String,
    },
    /// A type expression references a descriptor that is not known
    UnresolvedReference {
        /// Service whose package was being assembled
        service: String,
        /// The missing descriptor name
        name: String,
        /// Descriptor or component that holds the dangling reference
        referenced_by: String,
    },
}

impl GenerateError {
    /// Service the failure belongs to
    pub fn service(&self) -> &str {
        match self {
            GenerateError::NameConflict { service, .. }
            | GenerateError::UnresolvedReference { service, .. } => service,
        }
    }

    /// Descriptor name the failure is about
    pub fn descriptor(&self) -> &str {
        match self {
            GenerateError::NameConflict { name, .. }
            | GenerateError::UnresolvedReference { name, .. } => name,
        }
    }
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateError::NameConflict { service, name } => {
                write!(
                    f,
                    "service '{service}': two different type descriptors are named '{name}'"
                )
            }
            GenerateError::UnresolvedReference {
                service,
                name,
                referenced_by,
            } => {
                write!(
                    f,
                    "service '{service}': '{referenced_by}' references unknown type descriptor '{name}'"
                )
            }
        }
    }
}

impl std::error::Error for GenerateError {}
