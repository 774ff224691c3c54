use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use crate::descriptor::{Presentation, PresentationTable, TypeDescriptor, TypeExpr, TypeRegistry};
use crate::error::GenerateError;
use crate::structures::ClassRecord;

/// Result of flattening: every reachable descriptor once, sorted by name
///
/// `presentation` marks descriptors that were only reached as children of
/// another descriptor as [`Presentation::ForwardRef`]; the ones the root
/// components expose directly stay [`Presentation::Direct`].
#[derive(Debug, Clone, Default)]
pub struct FlattenedTypes {
    descriptors: Vec<TypeDescriptor>,
    presentation: PresentationTable,
}

impl FlattenedTypes {
    pub fn descriptors(&self) -> &[TypeDescriptor] {
        &self.descriptors
    }

    pub fn presentation(&self) -> &PresentationTable {
        &self.presentation
    }

    pub fn names(&self) -> Vec<&str> {
        self.descriptors.iter().map(|d| d.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&TypeDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn into_parts(self) -> (Vec<TypeDescriptor>, PresentationTable) {
        (self.descriptors, self.presentation)
    }
}

/// Computes the deduplicated transitive closure of descriptors used by a set of root components
pub struct Flattener<'a> {
    registry: &'a TypeRegistry,
}

impl<'a> Flattener<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self { registry }
    }

    /// Flatten every descriptor the `roots` expose
    ///
    /// The directly exposed descriptors are the `Ref` atoms of each root's
    /// type set, resolved against the registry.
    ///
    /// # Errors
    ///
    /// [`GenerateError::UnresolvedReference`] when a root or a field refers to
    /// a descriptor the registry does not know.
    pub fn flatten(&self, roots: &[&dyn ClassRecord]) -> Result<FlattenedTypes, GenerateError> {
        let mut exposed: BTreeMap<String, String> = BTreeMap::new();
        for root in roots {
            for type_expr in root.get_types() {
                if let TypeExpr::Ref(name) = type_expr {
                    exposed
                        .entry(name)
                        .or_insert_with(|| root.name().to_string());
                }
            }
        }

        let mut descriptors = Vec::with_capacity(exposed.len());
        for (name, component) in &exposed {
            descriptors.push(self.registry.get(name, component)?.clone());
        }
        self.flatten_descriptors(descriptors)
    }

    /// Flatten starting from already resolved root descriptors
    ///
    /// Roots are sorted by name and deduplicated with the first occurrence
    /// kept. Feeding the descriptors of a previous result back in yields the
    /// same names.
    ///
    /// # Errors
    ///
    /// - [`GenerateError::NameConflict`] for two different roots, or a root and
    ///   a registered descriptor, sharing a name under the strict policy
    /// - [`GenerateError::UnresolvedReference`] for unknown children
    pub fn flatten_descriptors(
        &self,
        roots: impl IntoIterator<Item = TypeDescriptor>,
    ) -> Result<FlattenedTypes, GenerateError> {
        let mut roots: Vec<TypeDescriptor> = roots.into_iter().collect();
        roots.sort();

        let mut discovered: HashSet<String> = HashSet::new();
        let mut presentation = PresentationTable::new();
        let mut result: Vec<TypeDescriptor> = Vec::with_capacity(roots.len());

        for mut root in roots {
            // Registered copies are already resolved; compare like with like.
            root.resolve_self_references();
            if let Some(first) = result.last().filter(|d| d.name == root.name) {
                self.registry.check_duplicate(first, &root)?;
                continue;
            }
            if let Ok(known) = self.registry.get(&root.name, &root.name) {
                self.registry.check_duplicate(known, &root)?;
            }
            discovered.insert(root.name.clone());
            presentation.set(root.name.clone(), Presentation::Direct);
            result.push(root);
        }

        // LIFO over indices into `result`; only the final sort fixes the order.
        let mut queue: Vec<usize> = (0..result.len()).collect();
        while let Some(index) = queue.pop() {
            let replaced = result[index].resolve_self_references();
            if !replaced.is_empty() {
                debug!(name = %result[index].name, fields = ?replaced, "resolved self references");
            }
            let parent = result[index].name.clone();
            for child in result[index].children_names() {
                if !discovered.insert(child.clone()) {
                    continue;
                }
                let descriptor = self.registry.get(&child, &parent)?.clone();
                presentation.set(child, Presentation::ForwardRef);
                queue.push(result.len());
                result.push(descriptor);
            }
        }

        result.sort();
        debug!(
            service = %self.registry.service(),
            count = result.len(),
            "flattened type descriptors"
        );
        Ok(FlattenedTypes {
            descriptors: result,
            presentation,
        })
    }
}
