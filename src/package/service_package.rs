use std::collections::{BTreeSet, HashSet};

use super::flatten::{FlattenedTypes, Flattener};
use crate::descriptor::{PresentationTable, TypeDescriptor, TypeExpr, TypeRegistry};
use crate::error::GenerateError;
use crate::import::{ImportRecord, ImportSet, ImportString};
use crate::structures::{
    ClassRecord, Client, Function, Paginator, ServiceModuleName, ServiceName, ServiceResource,
    Waiter,
};

/// Everything needed to generate the stub package for one service
///
/// Construction only composes the parts. Flattening runs in
/// [`ServicePackage::flatten_types`] and must happen before import sets are
/// computed or anything is rendered, since it decides which descriptors the
/// type-definitions modules contain and how references to them are spelled.
#[derive(Debug, Clone)]
pub struct ServicePackage {
    /// Top-level module directory of the package
    pub name: String,
    /// Distribution name for `setup.py`
    pub pypi_name: String,
    pub version: String,
    pub service_name: ServiceName,
    pub client: Client,
    pub service_resource: Option<ServiceResource>,
    pub waiters: Vec<Waiter>,
    pub paginators: Vec<Paginator>,
    pub helper_functions: Vec<Function>,
    registry: TypeRegistry,
    type_defs: Vec<TypeDescriptor>,
    presentation: PresentationTable,
}

impl ServicePackage {
    pub fn new(
        name: impl Into<String>,
        pypi_name: impl Into<String>,
        service_name: ServiceName,
        client: Client,
        registry: TypeRegistry,
    ) -> Self {
        Self {
            name: name.into(),
            pypi_name: pypi_name.into(),
            version: String::new(),
            service_name,
            client,
            service_resource: None,
            waiters: Vec::new(),
            paginators: Vec::new(),
            helper_functions: Vec::new(),
            registry,
            type_defs: Vec::new(),
            presentation: PresentationTable::new(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_service_resource(mut self, service_resource: ServiceResource) -> Self {
        self.service_resource = Some(service_resource);
        self
    }

    pub fn with_waiters(mut self, waiters: impl IntoIterator<Item = Waiter>) -> Self {
        self.waiters.extend(waiters);
        self
    }

    pub fn with_paginators(mut self, paginators: impl IntoIterator<Item = Paginator>) -> Self {
        self.paginators.extend(paginators);
        self
    }

    pub fn with_helper_functions(mut self, functions: impl IntoIterator<Item = Function>) -> Self {
        self.helper_functions.extend(functions);
        self
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Flattened descriptors, empty until [`ServicePackage::flatten_types`] ran
    pub fn type_defs(&self) -> &[TypeDescriptor] {
        &self.type_defs
    }

    pub fn presentation(&self) -> &PresentationTable {
        &self.presentation
    }

    /// Annotation text for `type_expr` under the current presentation table
    pub fn render_type(&self, type_expr: &TypeExpr) -> String {
        type_expr.render(&self.presentation)
    }

    /// Root components in a fixed order: client, resource, waiters, paginators
    pub fn roots(&self) -> Vec<&dyn ClassRecord> {
        let mut roots: Vec<&dyn ClassRecord> = vec![&self.client];
        if let Some(resource) = &self.service_resource {
            roots.push(resource);
        }
        roots.extend(self.waiters.iter().map(|w| w as &dyn ClassRecord));
        roots.extend(self.paginators.iter().map(|p| p as &dyn ClassRecord));
        roots
    }

    /// Flatten the descriptors reachable from the root components
    pub fn extract_type_defs(&self) -> Result<FlattenedTypes, GenerateError> {
        Flattener::new(&self.registry).flatten(&self.roots())
    }

    /// Store a flattening result as the package's type definitions
    pub fn set_type_defs(&mut self, flattened: FlattenedTypes) {
        let (descriptors, presentation) = flattened.into_parts();
        self.type_defs = descriptors;
        self.presentation = presentation;
    }

    /// [`ServicePackage::extract_type_defs`] followed by [`ServicePackage::set_type_defs`]
    pub fn flatten_types(&mut self) -> Result<(), GenerateError> {
        let flattened = self.extract_type_defs()?;
        self.set_type_defs(flattened);
        Ok(())
    }

    /// Union of the type sets of every root component
    pub fn get_types(&self) -> BTreeSet<TypeExpr> {
        self.roots()
            .into_iter()
            .flat_map(|root| root.get_types())
            .collect()
    }

    /// Names exported by the package entry point, sorted
    pub fn get_init_all_names(&self) -> Vec<String> {
        let mut names: HashSet<String> = HashSet::new();
        names.insert(self.client.name.clone());
        names.insert(self.client.alias_name.clone());
        if let Some(resource) = &self.service_resource {
            names.insert(resource.name.clone());
            names.insert(resource.alias_name.clone());
        }
        names.extend(self.waiters.iter().map(|w| w.name.clone()));
        names.extend(self.paginators.iter().map(|p| p.name.clone()));

        let mut result: Vec<String> = names.into_iter().collect();
        result.sort();
        result
    }

    fn component_import(&self, module: ServiceModuleName, name: &str) -> ImportRecord {
        ImportRecord::new(
            ImportString::new([self.service_name.module_name.as_str(), module.value()]),
            Some(name.to_string()),
        )
    }

    /// Imports of every exported component from its own module, sorted
    pub fn get_init_import_records(&self) -> Vec<ImportRecord> {
        let mut records = ImportSet::new();
        records.insert(self.component_import(ServiceModuleName::Client, &self.client.name));
        if let Some(resource) = &self.service_resource {
            records.insert(self.component_import(ServiceModuleName::ServiceResource, &resource.name));
        }
        for waiter in &self.waiters {
            records.insert(self.component_import(ServiceModuleName::Waiter, &waiter.name));
        }
        for paginator in &self.paginators {
            records.insert(self.component_import(ServiceModuleName::Paginator, &paginator.name));
        }
        records.into_sorted_vec()
    }

    fn required_imports<'r>(&self, records: impl IntoIterator<Item = &'r ImportRecord>, set: &mut ImportSet) {
        for record in records {
            set.add_required(record, &self.service_name.module_name);
        }
    }

    /// Imports for the client module: the client, its exceptions class and helper functions
    pub fn get_client_required_import_records(&self) -> Vec<ImportRecord> {
        let mut set = ImportSet::new();
        self.required_imports(&self.client.get_required_import_records(), &mut set);
        self.required_imports(
            &self.client.exceptions_class.get_required_import_records(),
            &mut set,
        );
        for function in &self.helper_functions {
            let records: Vec<ImportRecord> = function
                .get_types()
                .iter()
                .filter_map(TypeExpr::import_record)
                .collect();
            self.required_imports(&records, &mut set);
        }
        set.into_sorted_vec()
    }

    pub fn get_service_resource_required_import_records(&self) -> Vec<ImportRecord> {
        let Some(resource) = &self.service_resource else {
            return Vec::new();
        };
        let mut set = ImportSet::new();
        self.required_imports(&resource.get_required_import_records(), &mut set);
        set.into_sorted_vec()
    }

    pub fn get_paginator_required_import_records(&self) -> Vec<ImportRecord> {
        let mut set = ImportSet::new();
        for paginator in &self.paginators {
            self.required_imports(&paginator.get_required_import_records(), &mut set);
        }
        set.into_sorted_vec()
    }

    pub fn get_waiter_required_import_records(&self) -> Vec<ImportRecord> {
        let mut set = ImportSet::new();
        for waiter in &self.waiters {
            self.required_imports(&waiter.get_required_import_records(), &mut set);
        }
        set.into_sorted_vec()
    }

    fn add_type_defs_children(&self, set: &mut ImportSet) {
        for descriptor in &self.type_defs {
            for type_expr in descriptor.children_types() {
                if let Some(record) = type_expr.import_record() {
                    set.add_child_type(&record, &self.service_name.module_name);
                }
            }
        }
    }

    /// Imports for the mapping-type definitions module
    pub fn get_type_defs_required_import_records(&self) -> Vec<ImportRecord> {
        if self.type_defs.is_empty() {
            return Vec::new();
        }
        let mut set = ImportSet::new();
        set.add_version_check();
        set.insert(
            ImportRecord::named("typing", "TypedDict")
                .with_fallback((3, 8), ImportRecord::named("typing_extensions", "TypedDict")),
        );
        self.add_type_defs_children(&mut set);
        set.into_sorted_vec()
    }

    /// Imports for the data-class definitions module
    pub fn get_dataclass_defs_required_import_records(&self) -> Vec<ImportRecord> {
        if self.type_defs.is_empty() {
            return Vec::new();
        }
        let mut set = ImportSet::new();
        set.add_version_check();
        set.insert(ImportRecord::named("typing", "Optional"));
        set.insert(ImportRecord::named("dataclasses", "dataclass"));
        set.insert(ImportRecord::named("dataclasses", "field"));
        set.insert(ImportRecord::named("dataclasses_json", "DataClassJsonMixin"));
        set.insert(ImportRecord::named("dataclasses_json", "config"));
        self.add_type_defs_children(&mut set);
        set.into_sorted_vec()
    }

    /// Import set of one generated module
    pub fn get_required_import_records(&self, module: ServiceModuleName) -> Vec<ImportRecord> {
        match module {
            ServiceModuleName::Client => self.get_client_required_import_records(),
            ServiceModuleName::ServiceResource => self.get_service_resource_required_import_records(),
            ServiceModuleName::Paginator => self.get_paginator_required_import_records(),
            ServiceModuleName::Waiter => self.get_waiter_required_import_records(),
            ServiceModuleName::TypeDefs => self.get_type_defs_required_import_records(),
            ServiceModuleName::DataclassDefs => self.get_dataclass_defs_required_import_records(),
        }
    }
}
