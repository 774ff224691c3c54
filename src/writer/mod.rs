//! # Writer Module
//!
//! Turns a flattened [`ServicePackage`](crate::package::ServicePackage) into
//! files on disk.
//!
//! Three steps, each behind its own seam:
//!
//! 1. [`Renderer`] produces the text of one [`ServiceTemplate`]; the default
//!    [`TemplateRenderer`] uses the askama templates under `templates/service`.
//! 2. [`Formatter`] normalizes the text and sorts imports; [`CommandFormatter`]
//!    delegates to external tools such as `black` and `isort`.
//! 3. [`write_service_package`] renders the whole plan first and then writes
//!    only the files that are missing or changed.

mod format;
mod templates;
mod view;
mod write;

#[cfg(test)]
mod tests;

pub use format::{is_python_path, normalize_text, CommandFormatter, Formatter, PassthroughFormatter};
pub use templates::{Renderer, ServiceTemplate, TemplateRenderer};
pub use view::{Alias, ClassView, ModuleView, PackageInfo};
pub use write::{
    pending_changes, plan_service_package, render_service_package, setup_path,
    stale_files, write_service_package, PlannedFile, RenderedFile,
};
