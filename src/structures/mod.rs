//! # Structures Module
//!
//! Root components of a service package: the client with its exceptions
//! namespace, the optional service resource, paginators, waiters and helper
//! functions, plus the service identity and the names of the generated
//! modules.
//!
//! Every class-like component implements [`ClassRecord`], which derives the
//! component's type set and required imports from its methods and bases.

mod class_record;
mod client;
mod function;
mod module_name;
mod paginator;
mod service_name;
mod service_resource;
mod waiter;


pub use class_record::{Argument, ClassRecord, Method};
pub use client::{Client, ExceptionsClass};
pub use function::Function;
pub use module_name::ServiceModuleName;
pub use paginator::Paginator;
pub use service_name::ServiceName;
pub use service_resource::{Resource, ServiceResource};
pub use waiter::Waiter;
