//! # Import Module
//!
//! Import records and the per-artifact import accumulator.
//!
//! Every generated artifact gets its own [`ImportSet`]. Records coming from the
//! descriptors are rewritten to their external spelling relative to the
//! service module with [`external_form`], builtins are dropped, and any record
//! gated on an interpreter version brings in the `sys` import so the artifact
//! can branch on `sys.version_info` itself.
//!
//! ```rust
//! use servicegen::import::{ImportRecord, ImportSet};
//!
//! let typed_dict = ImportRecord::named("typing", "TypedDict")
//!     .with_fallback((3, 8), ImportRecord::named("typing_extensions", "TypedDict"));
//!
//! let mut imports = ImportSet::new();
//! imports.add_required(&typed_dict, "stubs_s3");
//! let rendered: Vec<String> = imports.iter().map(ImportRecord::render).collect();
//! assert_eq!(rendered[0], "import sys");
//! ```

mod import_string;
mod record;
mod set;

#[cfg(test)]
mod tests;

pub use import_string::{ImportString, BUILTINS};
pub use record::{external_form, ImportRecord, PythonVersion};
pub use set::{ImportSet, VERSION_CHECK_MODULE};
