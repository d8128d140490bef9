//! Class hierarchy index and cast resolution for DEX metadata.
//!
//! This module answers the structural questions an analysis pass asks about a
//! set of loaded classes: which class implements a descriptor, which classes
//! derive from it, and whether a value of one type may stand in for another.
//!
//! # Key Components
//!
//! - [`TypeHierarchy`]: The descriptor-to-class index and superclass-to-children
//!   adjacency, populated incrementally and queried lock-free
//! - Cast resolution: `is_assignable` over the single-superclass-plus-interfaces
//!   subtyping rule, and the `has_object_root` chain sanity check
//!
//! # Index Model
//!
//! The indexed universe is routinely a strict subset of the runtime type
//! universe - platform and library classes are typically not loaded. Queries
//! treat an unindexed descriptor as an expected absence, never an error: it has
//! no class record, no children, and is assignable only to itself.
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
//! let widget = pool.intern("Lcom/example/Widget;")?;
//! hierarchy.register(&Arc::new(DexClass::new(widget, Some(pool.object_type()), 0x1)))?;
//!
//! assert!(hierarchy.is_assignable(widget, pool.object_type()));
//! assert_eq!(hierarchy.children_of(pool.object_type()), vec![widget]);
//! # Ok::<(), dexscope::Error>(())
//! ```

mod registry;
mod resolver;

pub use registry::TypeHierarchy;
