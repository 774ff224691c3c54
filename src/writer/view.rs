use std::fmt;

use crate::descriptor::{dataclass_name, Field, Presentation, PresentationTable, TypeDescriptor};
use crate::import::ImportRecord;
use crate::package::ServicePackage;
use crate::structures::{ClassRecord, ExceptionsClass, Function, Method};

const INDENT: &str = "    ";

/// Package-wide values every template can use
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInfo {
    pub service_name: String,
    pub class_name: String,
    pub module_name: String,
    pub package_name: String,
    pub pypi_name: String,
    pub version: String,
}

impl PackageInfo {
    pub fn from_package(package: &ServicePackage) -> Self {
        Self {
            service_name: package.service_name.name.clone(),
            class_name: package.service_name.class_name.clone(),
            module_name: package.service_name.module_name.clone(),
            package_name: package.name.clone(),
            pypi_name: package.pypi_name.clone(),
            version: package.version.clone(),
        }
    }
}

/// `alias = name` line in the package entry point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    pub alias: String,
    pub name: String,
}

/// Pre-rendered content of one generated module
///
/// `blocks` are top-level definitions, emitted in order and separated by two
/// blank lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleView {
    pub imports: Vec<String>,
    pub all_names: Vec<String>,
    pub blocks: Vec<String>,
}

/// Class definition with its attributes and methods
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassView {
    pub name: String,
    pub bases: Vec<String>,
    pub docstring: String,
    pub attributes: Vec<String>,
    pub methods: Vec<String>,
}

impl ClassView {
    pub fn from_record(record: &dyn ClassRecord, presentation: &PresentationTable) -> Self {
        Self {
            name: record.name().to_string(),
            bases: record.bases().iter().map(|b| b.name.clone()).collect(),
            docstring: String::new(),
            attributes: Vec::new(),
            methods: record
                .methods()
                .iter()
                .map(|m| render_method(m, presentation))
                .collect(),
        }
    }

    pub fn with_docstring(mut self, docstring: &str) -> Self {
        self.docstring = docstring.to_string();
        self
    }

    pub fn with_attribute(mut self, attribute: String) -> Self {
        self.attributes.push(attribute);
        self
    }
}

impl fmt::Display for ClassView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bases.is_empty() {
            write!(f, "class {}:", self.name)?;
        } else {
            write!(f, "class {}({}):", self.name, self.bases.join(", "))?;
        }
        let mut empty = true;
        if !self.docstring.is_empty() {
            write!(f, "\n{}", docstring_block(&self.docstring, 1))?;
            empty = false;
        }
        for attribute in &self.attributes {
            write!(f, "\n{INDENT}{attribute}")?;
            empty = false;
        }
        for method in &self.methods {
            if !empty {
                f.write_str("\n")?;
            }
            write!(f, "\n{}", indent(method, 1))?;
            empty = false;
        }
        if empty {
            write!(f, "\n{INDENT}pass")?;
        }
        Ok(())
    }
}

fn indent(text: &str, level: usize) -> String {
    let prefix = INDENT.repeat(level);
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn docstring_block(docstring: &str, level: usize) -> String {
    indent(&format!("\"\"\"\n{}\n\"\"\"", docstring.trim()), level)
}

fn with_body(signature: String, docstring: &str) -> String {
    if docstring.is_empty() {
        format!("{signature} ...")
    } else {
        format!("{signature}\n{}", docstring_block(docstring, 1))
    }
}

fn render_method(method: &Method, presentation: &PresentationTable) -> String {
    with_body(method.render_signature(presentation), &method.docstring)
}

fn render_function(function: &Function, presentation: &PresentationTable) -> String {
    with_body(function.render_signature(presentation), &function.docstring)
}

fn import_lines(records: &[ImportRecord]) -> Vec<String> {
    records.iter().map(ImportRecord::render).collect()
}

fn exceptions_view(exceptions: &ExceptionsClass) -> ClassView {
    let attribute_type = exceptions.attribute_type().render(&PresentationTable::new());
    exceptions
        .exceptions
        .iter()
        .fold(
            ClassView::from_record(exceptions, &PresentationTable::new()),
            |view, name| view.with_attribute(format!("{name}: {attribute_type}")),
        )
}

/// Entry point: component imports, aliases and `__all__`
pub fn init_module(package: &ServicePackage) -> (ModuleView, Vec<Alias>) {
    let mut aliases = vec![Alias {
        alias: package.client.alias_name.clone(),
        name: package.client.name.clone(),
    }];
    if let Some(resource) = &package.service_resource {
        aliases.push(Alias {
            alias: resource.alias_name.clone(),
            name: resource.name.clone(),
        });
    }
    aliases.retain(|a| a.alias != a.name);
    let module = ModuleView {
        imports: import_lines(&package.get_init_import_records()),
        all_names: package.get_init_all_names(),
        blocks: Vec::new(),
    };
    (module, aliases)
}

pub fn client_module(package: &ServicePackage) -> ModuleView {
    let presentation = package.presentation();
    let client = &package.client;
    let exceptions = &client.exceptions_class;

    let mut blocks = vec![
        exceptions_view(exceptions).to_string(),
        ClassView::from_record(client, presentation)
            .with_docstring(&client.docstring)
            .with_attribute(format!("exceptions: {}", exceptions.name))
            .to_string(),
    ];
    blocks.extend(
        package
            .helper_functions
            .iter()
            .map(|f| render_function(f, presentation)),
    );

    let mut all_names = vec![client.name.clone()];
    all_names.extend(package.helper_functions.iter().map(|f| f.name.clone()));
    ModuleView {
        imports: import_lines(&package.get_client_required_import_records()),
        all_names,
        blocks,
    }
}

pub fn service_resource_module(package: &ServicePackage) -> ModuleView {
    let Some(resource) = &package.service_resource else {
        return ModuleView::default();
    };
    let presentation = package.presentation();

    let mut all_names = vec![resource.name.clone()];
    let mut blocks = vec![ClassView::from_record(resource, presentation)
        .with_docstring(&resource.docstring)
        .to_string()];
    for sub_resource in &resource.sub_resources {
        all_names.push(sub_resource.name.clone());
        blocks.push(ClassView::from_record(sub_resource, presentation).to_string());
    }
    ModuleView {
        imports: import_lines(&package.get_service_resource_required_import_records()),
        all_names,
        blocks,
    }
}

pub fn paginator_module(package: &ServicePackage) -> ModuleView {
    let presentation = package.presentation();
    ModuleView {
        imports: import_lines(&package.get_paginator_required_import_records()),
        all_names: package.paginators.iter().map(|p| p.name.clone()).collect(),
        blocks: package
            .paginators
            .iter()
            .map(|p| {
                ClassView::from_record(p, presentation)
                    .with_docstring(&format!("Paginator for `{}`", p.operation_name))
                    .to_string()
            })
            .collect(),
    }
}

pub fn waiter_module(package: &ServicePackage) -> ModuleView {
    let presentation = package.presentation();
    ModuleView {
        imports: import_lines(&package.get_waiter_required_import_records()),
        all_names: package.waiters.iter().map(|w| w.name.clone()).collect(),
        blocks: package
            .waiters
            .iter()
            .map(|w| {
                ClassView::from_record(w, presentation)
                    .with_docstring(&format!("Waiter for `{}`", w.waiter_name))
                    .to_string()
            })
            .collect(),
    }
}

/// Presentation for the definition of `descriptor` inside a definitions module
///
/// Definitions are emitted in name order, so a reference to a name sorting at
/// or after `descriptor` is not defined yet and must be quoted, whatever the
/// flattener recorded for it.
fn definition_presentation(
    package_presentation: &PresentationTable,
    descriptor: &TypeDescriptor,
) -> PresentationTable {
    let mut presentation = PresentationTable::new();
    for child in descriptor.children_names() {
        let mode = if child >= descriptor.name || package_presentation.is_forward_ref(&child) {
            Presentation::ForwardRef
        } else {
            Presentation::Direct
        };
        presentation.set(child, mode);
    }
    presentation
}

pub fn type_defs_module(package: &ServicePackage) -> ModuleView {
    let presentation = package.presentation();
    ModuleView {
        imports: import_lines(&package.get_type_defs_required_import_records()),
        all_names: package.type_defs().iter().map(|d| d.name.clone()).collect(),
        blocks: package
            .type_defs()
            .iter()
            .map(|d| d.render_definition(&definition_presentation(presentation, d)))
            .collect(),
    }
}

pub fn dataclass_defs_module(package: &ServicePackage) -> ModuleView {
    let presentation = package.presentation();
    ModuleView {
        imports: import_lines(&package.get_dataclass_defs_required_import_records()),
        all_names: package
            .type_defs()
            .iter()
            .map(TypeDescriptor::dataclass_name)
            .collect(),
        blocks: package
            .type_defs()
            .iter()
            .map(|d| render_dataclass(d, &definition_presentation(presentation, d)))
            .collect(),
    }
}

fn dataclass_attribute(field: &Field, presentation: &PresentationTable) -> String {
    let annotation = field
        .type_expr
        .render_with(presentation, &|name: &str| dataclass_name(name));
    let attribute = if field.is_reserved() {
        format!("{}_", field.name)
    } else {
        field.name.clone()
    };
    let metadata = format!("metadata=config(field_name=\"{}\")", field.name);
    if field.required {
        format!("{attribute}: {annotation} = field({metadata})")
    } else {
        format!("{attribute}: Optional[{annotation}] = field(default=None, {metadata})")
    }
}

/// Data class mirroring a descriptor, required fields first
fn render_dataclass(descriptor: &TypeDescriptor, presentation: &PresentationTable) -> String {
    let mut lines = vec![
        "@dataclass".to_string(),
        format!("class {}(DataClassJsonMixin):", descriptor.dataclass_name()),
    ];
    if !descriptor.docstring.is_empty() {
        lines.push(docstring_block(&descriptor.docstring, 1));
    }
    let fields: Vec<&Field> = descriptor
        .required_fields()
        .chain(descriptor.optional_fields())
        .collect();
    if fields.is_empty() {
        lines.push(format!("{INDENT}pass"));
    }
    for field in fields {
        lines.push(format!("{INDENT}{}", dataclass_attribute(field, presentation)));
    }
    lines.join("\n")
}
