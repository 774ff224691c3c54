use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info};

use super::format::{is_python_path, Formatter};
use super::templates::{Renderer, ServiceTemplate};
use crate::package::ServicePackage;
use crate::structures::ServiceModuleName;

/// One file of a package and the template it is rendered from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub path: PathBuf,
    pub template: ServiceTemplate,
}

impl PlannedFile {
    fn new(path: PathBuf, template: ServiceTemplate) -> Self {
        Self { path, template }
    }
}

/// Rendered and formatted content, ready to be compared with the disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub path: PathBuf,
    pub content: String,
}

impl RenderedFile {
    /// Whether the file is missing or holds different content
    pub fn is_changed(&self) -> bool {
        match fs::read_to_string(&self.path) {
            Ok(existing) => existing != self.content,
            Err(_) => true,
        }
    }
}

/// Directory holding `setup.py`, or `output` itself without setup generation
pub fn setup_path(package: &ServicePackage, output: &Path, generate_setup: bool) -> PathBuf {
    if generate_setup {
        output.join(format!("{}_package", package.service_name.module_name))
    } else {
        output.to_path_buf()
    }
}

/// Every file the package consists of, in generation order
///
/// Resource, paginator, waiter and type-definition modules are only planned
/// when the package has that component. Must run after
/// [`ServicePackage::flatten_types`] for the type-definition modules to appear.
pub fn plan_service_package(
    package: &ServicePackage,
    output: &Path,
    generate_setup: bool,
) -> Vec<PlannedFile> {
    let setup_path = setup_path(package, output, generate_setup);
    let package_path = setup_path.join(&package.name);

    let mut plan = Vec::new();
    if generate_setup {
        plan.push(PlannedFile::new(setup_path.join("setup.py"), ServiceTemplate::Setup));
        plan.push(PlannedFile::new(setup_path.join("README.md"), ServiceTemplate::Readme));
    }
    plan.extend([
        PlannedFile::new(package_path.join("version.py"), ServiceTemplate::Version),
        PlannedFile::new(package_path.join("__init__.pyi"), ServiceTemplate::Init),
        PlannedFile::new(package_path.join("__init__.py"), ServiceTemplate::Init),
        PlannedFile::new(package_path.join("__main__.py"), ServiceTemplate::Main),
        PlannedFile::new(package_path.join("py.typed"), ServiceTemplate::PyTyped),
    ]);

    let module_files = |module: ServiceModuleName| {
        let template = ServiceTemplate::Module(module);
        [
            PlannedFile::new(package_path.join(module.stub_file_name()), template),
            PlannedFile::new(package_path.join(module.file_name()), template),
        ]
    };
    plan.extend(module_files(ServiceModuleName::Client));
    if package.service_resource.is_some() {
        plan.extend(module_files(ServiceModuleName::ServiceResource));
    }
    if !package.paginators.is_empty() {
        plan.extend(module_files(ServiceModuleName::Paginator));
    }
    if !package.waiters.is_empty() {
        plan.extend(module_files(ServiceModuleName::Waiter));
    }
    if !package.type_defs().is_empty() {
        plan.extend(module_files(ServiceModuleName::TypeDefs));
        plan.push(PlannedFile::new(
            package_path.join(ServiceModuleName::DataclassDefs.file_name()),
            ServiceTemplate::Module(ServiceModuleName::DataclassDefs),
        ));
    }
    plan
}

/// Render and format every planned file without touching the disk
///
/// # Errors
///
/// Returns the first render or format failure.
pub fn render_service_package(
    package: &ServicePackage,
    plan: &[PlannedFile],
    renderer: &dyn Renderer,
    formatter: &dyn Formatter,
) -> anyhow::Result<Vec<RenderedFile>> {
    let module_name = &package.service_name.module_name;
    plan.iter()
        .map(|planned| {
            let rendered = renderer.render(planned.template, package)?;
            let mut content = formatter
                .format(&rendered, &planned.path)
                .with_context(|| format!("Failed to format {}", planned.path.display()))?;
            if is_python_path(&planned.path) {
                content = formatter
                    .sort_imports(&content, module_name, "pyi")
                    .with_context(|| format!("Failed to sort imports in {}", planned.path.display()))?;
            }
            Ok(RenderedFile {
                path: planned.path.clone(),
                content,
            })
        })
        .collect()
}

/// Generated module files left over from an earlier run
///
/// A module file is stale when the package no longer has the component it
/// was generated for, e.g. `waiter.pyi` after the last waiter was removed.
/// Only file names the generator owns are considered; anything else in the
/// package directory is left alone.
pub fn stale_files(package: &ServicePackage, output: &Path, generate_setup: bool) -> Vec<PathBuf> {
    let plan = plan_service_package(package, output, generate_setup);
    let package_path = setup_path(package, output, generate_setup).join(&package.name);
    ServiceModuleName::ALL
        .into_iter()
        .flat_map(|module| {
            let mut names = vec![module.file_name()];
            if module != ServiceModuleName::DataclassDefs {
                names.push(module.stub_file_name());
            }
            names
        })
        .map(|name| package_path.join(name))
        .filter(|path| path.is_file() && !plan.iter().any(|planned| &planned.path == path))
        .collect()
}

/// Paths a write would create or change
///
/// # Errors
///
/// Returns an error if rendering or formatting fails.
pub fn pending_changes(
    package: &ServicePackage,
    output: &Path,
    generate_setup: bool,
    renderer: &dyn Renderer,
    formatter: &dyn Formatter,
) -> anyhow::Result<Vec<PathBuf>> {
    let plan = plan_service_package(package, output, generate_setup);
    let rendered = render_service_package(package, &plan, renderer, formatter)?;
    Ok(rendered
        .into_iter()
        .filter(RenderedFile::is_changed)
        .map(|file| file.path)
        .collect())
}

/// Write the package below `output`
///
/// Every file is rendered and formatted before anything is written, so a
/// failure leaves the previous output untouched. Files whose content did not
/// change are not rewritten. Once all files are written, [`stale_files`] are
/// removed. Returns the written paths in plan order.
///
/// # Errors
///
/// Returns an error if rendering, formatting or writing fails.
pub fn write_service_package(
    package: &ServicePackage,
    output: &Path,
    generate_setup: bool,
    renderer: &dyn Renderer,
    formatter: &dyn Formatter,
) -> anyhow::Result<Vec<PathBuf>> {
    let plan = plan_service_package(package, output, generate_setup);
    let rendered = render_service_package(package, &plan, renderer, formatter)?;

    let mut written = Vec::new();
    for file in rendered {
        if !file.is_changed() {
            debug!(path = %file.path.display(), "unchanged, skipping");
            continue;
        }
        if let Some(parent) = file.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(&file.path, &file.content)
            .with_context(|| format!("Failed to write {}", file.path.display()))?;
        info!(
            service = %package.service_name.name,
            path = %file.path.display(),
            "wrote file"
        );
        written.push(file.path);
    }

    for path in stale_files(package, output, generate_setup) {
        fs::remove_file(&path)
            .with_context(|| format!("Failed to remove stale {}", path.display()))?;
        info!(
            service = %package.service_name.name,
            path = %path.display(),
            "removed stale file"
        );
    }
    Ok(written)
}
