use std::fmt;

use anyhow::Context;
use askama::Template;

use super::view::{self, Alias, ModuleView, PackageInfo};
use crate::package::ServicePackage;
use crate::structures::ServiceModuleName;

/// Template sources, relative to the askama template directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ServiceTemplate {
    Setup,
    Readme,
    Version,
    Init,
    Main,
    PyTyped,
    Module(ServiceModuleName),
}

impl ServiceTemplate {
    pub fn path(self) -> String {
        match self {
            ServiceTemplate::Setup => "service/setup.py.jinja2".to_string(),
            ServiceTemplate::Readme => "service/README.md.jinja2".to_string(),
            ServiceTemplate::Version => "service/service/version.py.jinja2".to_string(),
            ServiceTemplate::Init => "service/service/__init__.pyi.jinja2".to_string(),
            ServiceTemplate::Main => "service/service/__main__.py.jinja2".to_string(),
            ServiceTemplate::PyTyped => "service/service/py.typed.jinja2".to_string(),
            ServiceTemplate::Module(module) => format!("service/service/{}", module.template_name()),
        }
    }
}

impl fmt::Display for ServiceTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Template data for `setup.py`
#[derive(Template)]
#[template(path = "service/setup.py.jinja2", escape = "none")]
pub struct SetupTemplate<'a> {
    pub info: &'a PackageInfo,
}

/// Template data for the distribution README
#[derive(Template)]
#[template(path = "service/README.md.jinja2", escape = "none")]
pub struct ReadmeTemplate<'a> {
    pub info: &'a PackageInfo,
    pub all_names: &'a [String],
}

#[derive(Template)]
#[template(path = "service/service/version.py.jinja2", escape = "none")]
pub struct VersionTemplate<'a> {
    pub info: &'a PackageInfo,
}

/// Template data for the package entry point, stub and runtime module alike
#[derive(Template)]
#[template(path = "service/service/__init__.pyi.jinja2", escape = "none")]
pub struct InitTemplate<'a> {
    pub info: &'a PackageInfo,
    pub module: &'a ModuleView,
    pub aliases: &'a [Alias],
}

#[derive(Template)]
#[template(path = "service/service/__main__.py.jinja2", escape = "none")]
pub struct MainTemplate<'a> {
    pub info: &'a PackageInfo,
}

/// PEP 561 marker
#[derive(Template)]
#[template(path = "service/service/py.typed.jinja2", escape = "none")]
pub struct PyTypedTemplate;

#[derive(Template)]
#[template(path = "service/service/client.pyi.jinja2", escape = "none")]
pub struct ClientTemplate<'a> {
    pub info: &'a PackageInfo,
    pub module: &'a ModuleView,
    pub client_name: &'a str,
}

#[derive(Template)]
#[template(path = "service/service/service_resource.pyi.jinja2", escape = "none")]
pub struct ServiceResourceTemplate<'a> {
    pub info: &'a PackageInfo,
    pub module: &'a ModuleView,
}

#[derive(Template)]
#[template(path = "service/service/paginator.pyi.jinja2", escape = "none")]
pub struct PaginatorTemplate<'a> {
    pub info: &'a PackageInfo,
    pub module: &'a ModuleView,
}

#[derive(Template)]
#[template(path = "service/service/waiter.pyi.jinja2", escape = "none")]
pub struct WaiterTemplate<'a> {
    pub info: &'a PackageInfo,
    pub module: &'a ModuleView,
}

#[derive(Template)]
#[template(path = "service/service/type_defs.pyi.jinja2", escape = "none")]
pub struct TypeDefsTemplate<'a> {
    pub info: &'a PackageInfo,
    pub module: &'a ModuleView,
}

#[derive(Template)]
#[template(path = "service/service/dataclass_defs.pyi.jinja2", escape = "none")]
pub struct DataclassDefsTemplate<'a> {
    pub info: &'a PackageInfo,
    pub module: &'a ModuleView,
}

/// Turns a package into the text of one generated file
///
/// Implementations must be pure: the same template and package always give
/// the same text.
pub trait Renderer: Send + Sync {
    /// Render `template` for `package`
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    fn render(&self, template: ServiceTemplate, package: &ServicePackage) -> anyhow::Result<String>;
}

/// [`Renderer`] backed by the compiled askama templates
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateRenderer;

impl Renderer for TemplateRenderer {
    fn render(&self, template: ServiceTemplate, package: &ServicePackage) -> anyhow::Result<String> {
        let info = PackageInfo::from_package(package);
        let rendered = match template {
            ServiceTemplate::Setup => SetupTemplate { info: &info }.render(),
            ServiceTemplate::Readme => ReadmeTemplate {
                info: &info,
                all_names: &package.get_init_all_names(),
            }
            .render(),
            ServiceTemplate::Version => VersionTemplate { info: &info }.render(),
            ServiceTemplate::Init => {
                let (module, aliases) = view::init_module(package);
                InitTemplate {
                    info: &info,
                    module: &module,
                    aliases: &aliases,
                }
                .render()
            }
            ServiceTemplate::Main => MainTemplate { info: &info }.render(),
            ServiceTemplate::PyTyped => PyTypedTemplate.render(),
            ServiceTemplate::Module(ServiceModuleName::Client) => ClientTemplate {
                info: &info,
                module: &view::client_module(package),
                client_name: &package.client.name,
            }
            .render(),
            ServiceTemplate::Module(ServiceModuleName::ServiceResource) => ServiceResourceTemplate {
                info: &info,
                module: &view::service_resource_module(package),
            }
            .render(),
            ServiceTemplate::Module(ServiceModuleName::Paginator) => PaginatorTemplate {
                info: &info,
                module: &view::paginator_module(package),
            }
            .render(),
            ServiceTemplate::Module(ServiceModuleName::Waiter) => WaiterTemplate {
                info: &info,
                module: &view::waiter_module(package),
            }
            .render(),
            ServiceTemplate::Module(ServiceModuleName::TypeDefs) => TypeDefsTemplate {
                info: &info,
                module: &view::type_defs_module(package),
            }
            .render(),
            ServiceTemplate::Module(ServiceModuleName::DataclassDefs) => DataclassDefsTemplate {
                info: &info,
                module: &view::dataclass_defs_module(package),
            }
            .render(),
        };
        rendered.with_context(|| {
            format!(
                "Failed to render {template} for service '{}'",
                package.service_name.name
            )
        })
    }
}
