//! Cast compatibility resolution over the class hierarchy index.
//!
//! Assignability follows the single-superclass-plus-interfaces subtyping rule:
//! a type is assignable to a target if it is the target, or if its superclass
//! or any directly implemented interface is, applied recursively. The recursion
//! crosses interface inheritance as well, so multi-level interface chains
//! resolve correctly.
//!
//! Types outside the indexed set are assignable only to themselves. This is a
//! deliberate under-approximation: the index cannot see platform or library
//! hierarchies it did not load, and callers must treat "don't know" and "no"
//! identically for cast queries.

use crate::metadata::{class::DexClassRc, descriptor::DexDescriptor, typesystem::TypeHierarchy};

/// Upper bound on superclass/interface recursion depth.
///
/// Real hierarchies are a few dozen levels deep at most; hitting this bound
/// means the index holds a cycle and no query result could be trusted.
const MAX_HIERARCHY_DEPTH: usize = 500;

impl TypeHierarchy {
    /// Check whether a value of type `source` may be used where `target` is expected.
    ///
    /// Identity is checked first, so every descriptor is assignable to itself
    /// whether indexed or not. An unindexed `source` is otherwise assignable to
    /// nothing - absence from the index is an expected outcome, not an error.
    ///
    /// ## Arguments
    /// * `source` - Descriptor of the value's type
    /// * `target` - Descriptor of the required type
    ///
    /// # Panics
    /// Panics if the inheritance chain exceeds `MAX_HIERARCHY_DEPTH` levels,
    /// which can only happen when the registered hierarchy contains a cycle.
    #[must_use]
    pub fn is_assignable(&self, source: DexDescriptor, target: DexDescriptor) -> bool {
        self.is_assignable_at(source, target, 0)
    }

    /// Walk the superclass chain and confirm it closes at the root object type.
    ///
    /// Follows superclass edges through the index until the first ancestor that
    /// is not registered, and reports whether that ancestor is
    /// `Ljava/lang/Object;`. A class whose chain ends anywhere else references
    /// a superclass universe the index cannot account for.
    ///
    /// ## Arguments
    /// * `class` - The class whose chain to check
    ///
    /// # Panics
    /// Panics if the chain exceeds `MAX_HIERARCHY_DEPTH` levels.
    #[must_use]
    pub fn has_object_root(&self, class: &DexClassRc) -> bool {
        let mut current = class.clone();
        for _ in 0..MAX_HIERARCHY_DEPTH {
            let Some(superclass) = current.superclass else {
                // Ran out of superclasses below the root: only the root object
                // type itself legitimately has none, and it is not its own root
                return false;
            };
            match self.lookup(superclass) {
                Some(next) => current = next,
                None => return superclass == self.pool().object_type(),
            }
        }
        panic!(
            "superclass chain of {} exceeds {MAX_HIERARCHY_DEPTH} levels, hierarchy is cyclic",
            self.pool().name(class.descriptor)
        );
    }

    fn is_assignable_at(
        &self,
        source: DexDescriptor,
        target: DexDescriptor,
        depth: usize,
    ) -> bool {
        assert!(
            depth < MAX_HIERARCHY_DEPTH,
            "inheritance chain of {} exceeds {MAX_HIERARCHY_DEPTH} levels, hierarchy is cyclic",
            self.pool().name(source)
        );

        if source == target {
            return true;
        }
        let Some(class) = self.lookup(source) else {
            return false;
        };

        if let Some(superclass) = class.superclass {
            if self.is_assignable_at(superclass, target, depth + 1) {
                return true;
            }
        }
        class
            .interfaces
            .iter()
            .any(|(_, &interface)| self.is_assignable_at(interface, target, depth + 1))
    }
}
