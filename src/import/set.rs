use std::collections::BTreeSet;

use super::record::ImportRecord;

/// Module providing the interpreter version check
pub const VERSION_CHECK_MODULE: &str = "sys";

/// Deduplicated, sorted import accumulator for one artifact
///
/// Backed by a `BTreeSet`, so iteration is always ordered by module then
/// symbol. Inserting a record equal to an existing one replaces it.
#[derive(Debug, Clone, Default)]
pub struct ImportSet {
    records: BTreeSet<ImportRecord>,
}

impl ImportSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: ImportRecord) {
        self.records.replace(record);
    }

    /// Unconditional `import sys`
    pub fn add_version_check(&mut self) {
        self.insert(ImportRecord::module(VERSION_CHECK_MODULE));
    }

    /// Add a record a component declared as required
    ///
    /// The record is rewritten relative to `module_name`. A gated record also
    /// pulls in the version check import; its fallback is rendered inline and
    /// never added on its own.
    pub fn add_required(&mut self, record: &ImportRecord, module_name: &str) {
        if record.is_builtins() {
            return;
        }
        if record.needs_version_check() {
            self.add_version_check();
        }
        self.insert(record.get_external(module_name));
    }

    /// Add a record needed by a field type inside the type-definitions modules
    ///
    /// Same as [`ImportSet::add_required`] but also skips records pointing at
    /// the type-definitions module itself.
    pub fn add_child_type(&mut self, record: &ImportRecord, module_name: &str) {
        if record.is_type_defs() {
            return;
        }
        self.add_required(record, module_name);
    }

    pub fn contains(&self, record: &ImportRecord) -> bool {
        self.records.contains(record)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImportRecord> {
        self.records.iter()
    }

    pub fn into_sorted_vec(self) -> Vec<ImportRecord> {
        self.records.into_iter().collect()
    }
}

impl Extend<ImportRecord> for ImportSet {
    fn extend<T: IntoIterator<Item = ImportRecord>>(&mut self, iter: T) {
        for record in iter {
            self.insert(record);
        }
    }
}

impl FromIterator<ImportRecord> for ImportSet {
    fn from_iter<T: IntoIterator<Item = ImportRecord>>(iter: T) -> Self {
        let mut set = ImportSet::new();
        set.extend(iter);
        set
    }
}
