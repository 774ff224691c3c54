use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::type_descriptor::TypeDescriptor;
use crate::error::GenerateError;

/// What to do when two descriptors share a name but differ in structure
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Fail with [`GenerateError::NameConflict`]
    #[default]
    Strict,
    /// Keep the first descriptor registered under the name
    FirstWins,
}

/// The known universe of type descriptors for one service, keyed by name
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    service: String,
    policy: DuplicatePolicy,
    descriptors: BTreeMap<String, TypeDescriptor>,
}

impl TypeRegistry {
    pub fn new(service: impl Into<String>, policy: DuplicatePolicy) -> Self {
        Self {
            service: service.into(),
            policy,
            descriptors: BTreeMap::new(),
        }
    }

    /// Build a registry from `descriptors`, see [`TypeRegistry::insert`]
    pub fn from_descriptors(
        service: impl Into<String>,
        policy: DuplicatePolicy,
        descriptors: impl IntoIterator<Item = TypeDescriptor>,
    ) -> Result<Self, GenerateError> {
        let mut registry = Self::new(service, policy);
        for descriptor in descriptors {
            registry.insert(descriptor)?;
        }
        Ok(registry)
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Register a descriptor
    ///
    /// Self references are resolved first. A structurally identical duplicate
    /// is dropped; a different one is a [`GenerateError::NameConflict`] under
    /// [`DuplicatePolicy::Strict`] and dropped with a warning otherwise.
    pub fn insert(&mut self, mut descriptor: TypeDescriptor) -> Result<(), GenerateError> {
        descriptor.resolve_self_references();
        if let Some(existing) = self.descriptors.get(&descriptor.name) {
            self.check_duplicate(existing, &descriptor)?;
            return Ok(());
        }
        self.descriptors.insert(descriptor.name.clone(), descriptor);
        Ok(())
    }

    /// Apply the duplicate policy to a second descriptor named like `existing`
    pub(crate) fn check_duplicate(
        &self,
        existing: &TypeDescriptor,
        duplicate: &TypeDescriptor,
    ) -> Result<(), GenerateError> {
        if existing.is_same(duplicate) {
            debug!(service = %self.service, name = %duplicate.name, "dropping identical duplicate descriptor");
            return Ok(());
        }
        match self.policy {
            DuplicatePolicy::Strict => Err(self.name_conflict(&duplicate.name)),
            DuplicatePolicy::FirstWins => {
                warn!(
                    service = %self.service,
                    name = %duplicate.name,
                    "descriptors with the same name differ, keeping the first one"
                );
                Ok(())
            }
        }
    }

    /// Look up `name`, referenced from `referenced_by`
    pub fn get(&self, name: &str, referenced_by: &str) -> Result<&TypeDescriptor, GenerateError> {
        self.descriptors
            .get(name)
            .ok_or_else(|| GenerateError::UnresolvedReference {
                service: self.service.clone(),
                name: name.to_string(),
                referenced_by: referenced_by.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.descriptors.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Descriptors in name order
    pub fn iter(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.descriptors.values()
    }

    pub(crate) fn name_conflict(&self, name: &str) -> GenerateError {
        GenerateError::NameConflict {
            service: self.service.clone(),
            name: name.to_string(),
        }
    }
}
