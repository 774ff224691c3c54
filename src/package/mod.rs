//! # Package Module
//!
//! Flattening of the descriptor graph and the per-service package aggregate.
//!
//! [`TypeWalker`] answers "what does this descriptor pull in". [`Flattener`]
//! computes the deduplicated closure for a whole set of root components and
//! the presentation side-table the renderer needs. [`ServicePackage`] ties the
//! root components of one service together and derives the import set of
//! every generated module on demand.
//!
//! Flatten before asking a package for import sets or rendering it:
//!
//! ```rust
//! use servicegen::descriptor::{DuplicatePolicy, Field, TypeDescriptor, TypeExpr, TypeRegistry};
//! use servicegen::package::ServicePackage;
//! use servicegen::structures::{Client, Method, ServiceName};
//!
//! let registry = TypeRegistry::from_descriptors(
//!     "s3",
//!     DuplicatePolicy::Strict,
//!     [TypeDescriptor::new(
//!         "OwnerTypeDef",
//!         [Field::new("ID", TypeExpr::builtin("str"), false)],
//!     )],
//! )
//! .unwrap();
//! let client = Client::new("S3Client", "Client")
//!     .with_method(Method::new("get_owner", TypeExpr::reference("OwnerTypeDef")));
//! let mut package = ServicePackage::new(
//!     "stubs_s3",
//!     "stubs-s3",
//!     ServiceName::new("s3", "S3", "stubs_s3"),
//!     client,
//!     registry,
//! );
//! package.flatten_types().unwrap();
//! assert_eq!(package.type_defs().len(), 1);
//! ```

mod flatten;
mod service_package;
mod walker;


pub use flatten::{FlattenedTypes, Flattener};
pub use service_package::ServicePackage;
pub use walker::TypeWalker;
