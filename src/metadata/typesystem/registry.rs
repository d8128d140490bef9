//! Central class hierarchy index for DEX analysis.
//!
//! The [`TypeHierarchy`] maps each registered class's descriptor to its record
//! and each superclass descriptor to the ordered list of its direct subclasses.
//! Registration is purely additive and order-independent: superclasses may
//! arrive before, after, or interleaved with their subclasses, and the index is
//! correct either way. Only the order *within* a sibling list reflects
//! registration order.
//!
//! # Storage Architecture
//!
//! - **Primary storage**: descriptor-to-class skip list, lock-free for readers
//! - **Adjacency index**: superclass-to-children concurrent map; a type with no
//!   registered subclasses has no entry, never an empty list
//! - **Registration guard**: a single mutex making the two-map update atomic
//!
//! # Concurrency Design
//!
//! [`TypeHierarchy::register`] is the only mutating operation and may be called
//! concurrently from many workers registering disjoint classes. Reads never
//! take the registration guard; callers that need a consistent view must join
//! the registration phase before starting a query phase.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use dexscope::metadata::{class::DexClass, descriptor::DescriptorPool};
//! use dexscope::metadata::typesystem::TypeHierarchy;
//!
//! let pool = Arc::new(DescriptorPool::new());
//! let hierarchy = TypeHierarchy::new(pool.clone());
//!
//! let base = pool.intern("Lcom/example/Base;")?;
//! let derived = pool.intern("Lcom/example/Derived;")?;
//!
//! hierarchy.register(&Arc::new(DexClass::new(base, Some(pool.object_type()), 0x1)))?;
//! hierarchy.register(&Arc::new(DexClass::new(derived, Some(base), 0x1)))?;
//!
//! assert_eq!(hierarchy.children_of(base), vec![derived]);
//! assert!(hierarchy.lookup(derived).is_some());
//! # Ok::<(), dexscope::Error>(())
//! ```

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use crossbeam_skiplist::SkipMap;
use dashmap::DashMap;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::{
    metadata::{
        class::DexClassRc,
        descriptor::{DescriptorPool, DexDescriptor},
    },
    Error::LockError,
    Result,
};

/// The class hierarchy index over a set of registered classes.
///
/// Owns two mappings: descriptor to class record, and superclass descriptor to
/// the ordered descriptors of its direct subclasses. Constructed at the start
/// of an analysis pass over a shared [`DescriptorPool`] and discarded with it;
/// there is no global instance.
///
/// # Invariants
///
/// - A class is indexed at most once per descriptor; re-registration is a no-op
/// - Every adjacency key either denotes an indexed class or the implicit root
///   object type; a class without a superclass never produces a key/child pair
/// - The hierarchy is a forest: each class has at most one superclass and no
///   class is its own transitive superclass. Traversals treat a violation as
///   fatal rather than looping.
pub struct TypeHierarchy {
    /// Pool that owns every descriptor this index refers to
    pool: Arc<DescriptorPool>,
    /// Primary storage mapping each registered descriptor to its class record
    type_to_class: SkipMap<DexDescriptor, DexClassRc>,
    /// Superclass descriptor to direct subclass descriptors, in registration order
    class_hierarchy: DashMap<DexDescriptor, Vec<DexDescriptor>>,
    /// Serializes registration so the two-map update is atomic
    registration: Mutex<()>,
}

impl TypeHierarchy {
    /// Create an empty index over the given descriptor pool
    #[must_use]
    pub fn new(pool: Arc<DescriptorPool>) -> Self {
        TypeHierarchy {
            pool,
            type_to_class: SkipMap::new(),
            class_hierarchy: DashMap::new(),
            registration: Mutex::new(()),
        }
    }

    /// The descriptor pool this index was built over
    #[must_use]
    pub fn pool(&self) -> &Arc<DescriptorPool> {
        &self.pool
    }

    /// Register a loaded class into the index.
    ///
    /// Inserts the descriptor-to-class mapping and, when the class has a
    /// superclass, appends its descriptor to that superclass's sibling list.
    /// First registration wins: registering a descriptor that is already
    /// indexed leaves both maps untouched, so repeated full passes rebuild
    /// the index without duplicating sibling lists.
    ///
    /// Safe to call concurrently from multiple workers; the compound update is
    /// serialized by the registration guard, which is released on every exit
    /// path.
    ///
    /// ## Arguments
    /// * `class` - The class record to index
    ///
    /// # Errors
    /// Returns [`LockError`](crate::Error::LockError) if the registration guard
    /// was poisoned by a panicking writer.
    pub fn register(&self, class: &DexClassRc) -> Result<()> {
        let _guard = self.registration.lock().map_err(|_| LockError)?;

        if self.type_to_class.contains_key(&class.descriptor) {
            return Ok(());
        }
        self.type_to_class.insert(class.descriptor, class.clone());

        if let Some(superclass) = class.superclass {
            self.class_hierarchy
                .entry(superclass)
                .or_default()
                .push(class.descriptor);
        }
        Ok(())
    }

    /// Register a batch of classes from parallel workers.
    ///
    /// Registration order within the batch is unspecified, so sibling order in
    /// [`TypeHierarchy::children_of`] is unspecified too. Use sequential
    /// [`TypeHierarchy::register`] calls when sibling order matters.
    ///
    /// ## Arguments
    /// * `classes` - The class records to index
    ///
    /// # Errors
    /// Returns the first registration error encountered.
    pub fn register_all(&self, classes: &[DexClassRc]) -> Result<()> {
        classes.par_iter().try_for_each(|class| self.register(class))
    }

    /// Look up the class record registered for a descriptor.
    ///
    /// Absence is a normal outcome: library and platform classes are part of
    /// the runtime universe but not of the indexed set.
    #[must_use]
    pub fn lookup(&self, descriptor: DexDescriptor) -> Option<DexClassRc> {
        self.type_to_class
            .get(&descriptor)
            .map(|entry| entry.value().clone())
    }

    /// Direct subclass descriptors of a type, in registration order.
    ///
    /// Empty if no subclass was registered.
    #[must_use]
    pub fn children_of(&self, descriptor: DexDescriptor) -> Vec<DexDescriptor> {
        self.class_hierarchy
            .get(&descriptor)
            .map(|children| children.value().clone())
            .unwrap_or_default()
    }

    /// All transitive subclass descriptors of a type, in pre-order.
    ///
    /// Each direct child is appended and then fully expanded before its next
    /// sibling. The registered hierarchy is a forest, so no descriptor can
    /// appear twice.
    ///
    /// # Panics
    /// Panics if a descriptor is reached twice, which means a class is its own
    /// transitive superclass. Such an index is internally inconsistent and no
    /// traversal result could be trusted.
    #[must_use]
    pub fn descendants_of(&self, descriptor: DexDescriptor) -> Vec<DexDescriptor> {
        let mut descendants = Vec::new();
        let mut visited = HashSet::new();
        visited.insert(descriptor);
        self.collect_descendants(descriptor, &mut visited, &mut descendants);
        descendants
    }

    /// Number of registered classes
    #[must_use]
    pub fn len(&self) -> usize {
        self.type_to_class.len()
    }

    /// Returns `true` if no class was registered yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.type_to_class.is_empty()
    }

    fn collect_descendants(
        &self,
        descriptor: DexDescriptor,
        visited: &mut HashSet<DexDescriptor>,
        descendants: &mut Vec<DexDescriptor>,
    ) {
        for child in self.children_of(descriptor) {
            assert!(
                visited.insert(child),
                "class hierarchy cycle at {}",
                self.pool.name(child)
            );
            descendants.push(child);
            self.collect_descendants(child, visited, descendants);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::class::DexClass;

    fn class(pool: &DescriptorPool, name: &str, superclass: Option<DexDescriptor>) -> DexClassRc {
        let descriptor = pool.intern(name).unwrap();
        Arc::new(DexClass::new(descriptor, superclass, 0x0001))
    }

    #[test]
    fn test_register_and_lookup() {
        let pool = Arc::new(DescriptorPool::new());
        let hierarchy = TypeHierarchy::new(pool.clone());

        let widget = class(&pool, "Lcom/example/Widget;", Some(pool.object_type()));
        hierarchy.register(&widget).unwrap();

        let found = hierarchy.lookup(widget.descriptor).unwrap();
        assert!(Arc::ptr_eq(&found, &widget));
        assert_eq!(hierarchy.len(), 1);

        // Unindexed descriptors miss without error
        let missing = pool.intern("Lcom/example/Missing;").unwrap();
        assert!(hierarchy.lookup(missing).is_none());
    }

    #[test]
    fn test_children_in_registration_order() {
        let pool = Arc::new(DescriptorPool::new());
        let hierarchy = TypeHierarchy::new(pool.clone());

        let base = class(&pool, "Lcom/example/Base;", Some(pool.object_type()));
        let first = class(&pool, "Lcom/example/First;", Some(base.descriptor));
        let second = class(&pool, "Lcom/example/Second;", Some(base.descriptor));

        hierarchy.register(&base).unwrap();
        hierarchy.register(&first).unwrap();
        hierarchy.register(&second).unwrap();

        assert_eq!(
            hierarchy.children_of(base.descriptor),
            vec![first.descriptor, second.descriptor]
        );
        assert_eq!(hierarchy.children_of(first.descriptor), vec![]);
    }

    #[test]
    fn test_registration_is_idempotent() {
        let pool = Arc::new(DescriptorPool::new());
        let hierarchy = TypeHierarchy::new(pool.clone());

        let base = class(&pool, "Lcom/example/Base;", Some(pool.object_type()));
        let derived = class(&pool, "Lcom/example/Derived;", Some(base.descriptor));

        for _ in 0..3 {
            hierarchy.register(&base).unwrap();
            hierarchy.register(&derived).unwrap();
        }

        assert_eq!(hierarchy.len(), 2);
        assert_eq!(
            hierarchy.children_of(base.descriptor),
            vec![derived.descriptor]
        );
    }

    #[test]
    fn test_root_without_superclass_produces_no_edge() {
        let pool = Arc::new(DescriptorPool::new());
        let hierarchy = TypeHierarchy::new(pool.clone());

        let root = class(&pool, "Ljava/lang/Object;", None);
        hierarchy.register(&root).unwrap();

        assert_eq!(hierarchy.len(), 1);
        assert_eq!(hierarchy.children_of(root.descriptor), vec![]);
    }

    #[test]
    fn test_descendants_preorder() {
        let pool = Arc::new(DescriptorPool::new());
        let hierarchy = TypeHierarchy::new(pool.clone());

        // root -> {b, c}, b -> {d}; pre-order from root is b, d, c
        let root = class(&pool, "Lcom/example/Root;", Some(pool.object_type()));
        let b = class(&pool, "Lcom/example/B;", Some(root.descriptor));
        let c = class(&pool, "Lcom/example/C;", Some(root.descriptor));
        let d = class(&pool, "Lcom/example/D;", Some(b.descriptor));

        for cls in [&root, &b, &c, &d] {
            hierarchy.register(cls).unwrap();
        }

        assert_eq!(
            hierarchy.descendants_of(root.descriptor),
            vec![b.descriptor, d.descriptor, c.descriptor]
        );
        assert_eq!(hierarchy.descendants_of(d.descriptor), vec![]);
    }

    #[test]
    fn test_registration_order_independent() {
        let pool = Arc::new(DescriptorPool::new());
        let hierarchy = TypeHierarchy::new(pool.clone());

        // Subclass registered before its superclass
        let base = class(&pool, "Lcom/example/Base;", Some(pool.object_type()));
        let derived = class(&pool, "Lcom/example/Derived;", Some(base.descriptor));

        hierarchy.register(&derived).unwrap();
        hierarchy.register(&base).unwrap();

        assert_eq!(
            hierarchy.children_of(base.descriptor),
            vec![derived.descriptor]
        );
        assert!(hierarchy.lookup(base.descriptor).is_some());
        assert!(hierarchy.lookup(derived.descriptor).is_some());
    }

    #[test]
    fn test_concurrent_registration_no_lost_updates() {
        let pool = Arc::new(DescriptorPool::new());
        let hierarchy = Arc::new(TypeHierarchy::new(pool.clone()));

        const WORKERS: usize = 8;
        const PER_WORKER: usize = 64;

        let mut all_classes = Vec::new();
        for worker in 0..WORKERS {
            let mut batch = Vec::new();
            for i in 0..PER_WORKER {
                batch.push(class(
                    &pool,
                    &format!("Lcom/example/W{worker}C{i};"),
                    Some(pool.object_type()),
                ));
            }
            all_classes.push(batch);
        }

        let mut workers = Vec::new();
        for batch in all_classes.clone() {
            let hierarchy = hierarchy.clone();
            workers.push(std::thread::spawn(move || {
                for cls in batch {
                    hierarchy.register(&cls).unwrap();
                }
            }));
        }
        for worker in workers {
            worker.join().unwrap();
        }

        // Barrier passed: every class must be found, none lost
        assert_eq!(hierarchy.len(), WORKERS * PER_WORKER);
        for batch in &all_classes {
            for cls in batch {
                let found = hierarchy.lookup(cls.descriptor).unwrap();
                assert!(Arc::ptr_eq(&found, cls));
            }
        }
        assert_eq!(
            hierarchy.children_of(pool.object_type()).len(),
            WORKERS * PER_WORKER
        );
    }

    #[test]
    fn test_register_all_parallel() {
        let pool = Arc::new(DescriptorPool::new());
        let hierarchy = TypeHierarchy::new(pool.clone());

        let classes: Vec<DexClassRc> = (0..256)
            .map(|i| {
                class(
                    &pool,
                    &format!("Lcom/example/Bulk{i};"),
                    Some(pool.object_type()),
                )
            })
            .collect();

        hierarchy.register_all(&classes).unwrap();

        assert_eq!(hierarchy.len(), classes.len());
        for cls in &classes {
            assert!(hierarchy.lookup(cls.descriptor).is_some());
        }
    }

    #[test]
    #[should_panic(expected = "class hierarchy cycle")]
    fn test_descendants_detects_cycle() {
        let pool = Arc::new(DescriptorPool::new());
        let hierarchy = TypeHierarchy::new(pool.clone());

        // Two classes naming each other as superclass - unrepresentable input,
        // the traversal must fail loudly instead of looping
        let a = pool.intern("Lcom/example/A;").unwrap();
        let b = pool.intern("Lcom/example/B;").unwrap();
        hierarchy
            .register(&Arc::new(DexClass::new(a, Some(b), 0x1)))
            .unwrap();
        hierarchy
            .register(&Arc::new(DexClass::new(b, Some(a), 0x1)))
            .unwrap();

        let _ = hierarchy.descendants_of(a);
    }
}
