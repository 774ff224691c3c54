//! # Descriptor Module
//!
//! Composite type descriptors and the type expressions their fields use.
//!
//! A [`TypeDescriptor`] is a named record with ordered fields. Each field is
//! typed by a [`TypeExpr`]: a builtin, an imported type, a reference to another
//! descriptor by name, a container over further expressions, or the
//! [`TypeExpr::SelfRef`] marker a descriptor's reference to itself is rewritten
//! into when the descriptor is built.
//!
//! The [`TypeRegistry`] is the per-service universe that references resolve
//! against; it is where name conflicts between different descriptors surface.

mod registry;
mod type_descriptor;
mod types;


pub use registry::{DuplicatePolicy, TypeRegistry};
pub use type_descriptor::{dataclass_name, Field, TypeDescriptor};
pub use types::{ExternalType, Presentation, PresentationTable, TypeExpr};
