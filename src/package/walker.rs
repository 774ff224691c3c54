use std::collections::{BTreeMap, HashSet};

use crate::descriptor::{TypeDescriptor, TypeRegistry};
use crate::error::GenerateError;

/// Depth-first walk over descriptor references
///
/// Every descriptor is visited at most once. The visited set is seeded with
/// the root's name, so a chain leading back to the root or to any ancestor
/// ends there instead of recursing forever.
pub struct TypeWalker<'a> {
    registry: &'a TypeRegistry,
}

impl<'a> TypeWalker<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self { registry }
    }

    /// Every descriptor reachable from `root`, root excluded, in name order
    ///
    /// # Errors
    ///
    /// - [`GenerateError::NameConflict`] if the registry holds a different
    ///   descriptor under the root's name and the policy is strict
    /// - [`GenerateError::UnresolvedReference`] if a field references an
    ///   unknown descriptor
    pub fn reachable(&self, root: &TypeDescriptor) -> Result<Vec<&'a TypeDescriptor>, GenerateError> {
        let mut root = root.clone();
        root.resolve_self_references();
        if let Ok(known) = self.registry.get(&root.name, &root.name) {
            self.registry.check_duplicate(known, &root)?;
        }

        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(root.name.clone());
        let mut found: BTreeMap<&'a str, &'a TypeDescriptor> = BTreeMap::new();

        let mut stack: Vec<(String, String)> = root
            .children_names()
            .into_iter()
            .rev()
            .map(|child| (child, root.name.clone()))
            .collect();

        while let Some((name, parent)) = stack.pop() {
            if !visited.insert(name.clone()) {
                continue;
            }
            let descriptor = self.registry.get(&name, &parent)?;
            found.insert(descriptor.name.as_str(), descriptor);
            for child in descriptor.children_names().into_iter().rev() {
                if !visited.contains(&child) {
                    stack.push((child, name.clone()));
                }
            }
        }

        Ok(found.into_values().collect())
    }
}
