//! # dexscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types
//! from the dexscope library. Import this module to get quick access to the
//! essential types for DEX type metadata analysis.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all dexscope operations
pub use crate::Error;

/// The result type used throughout dexscope
pub use crate::Result;

// ================================================================================================
// Descriptors
// ================================================================================================

/// Interning arena for type descriptors
pub use crate::metadata::descriptor::DescriptorPool;

/// Canonical handle to an interned descriptor
pub use crate::metadata::descriptor::DexDescriptor;

/// Structural classification of a descriptor
pub use crate::metadata::descriptor::TypeCategory;

// ================================================================================================
// Class Model
// ================================================================================================

/// Class, method, field, and code records
pub use crate::metadata::class::{
    passes_args_through, DexClass, DexClassRc, DexCode, DexField, DexFieldRc, DexMethod,
    DexMethodRc, InvokeInstruction,
};

/// Access flags and the visibility merge rule
pub use crate::metadata::flags::{merge_visibility, ClassAccessFlags, VISIBILITY_MASK};

// ================================================================================================
// Hierarchy and Analysis
// ================================================================================================

/// The class hierarchy index with cast resolution
pub use crate::metadata::typesystem::TypeHierarchy;

/// Heuristic native allocation cost estimation
pub use crate::analysis::footprint::FootprintEstimator;

/// Scope building and partition rebuild
pub use crate::analysis::scope::{build_scope, rebuild_partitions, DexPartition, Scope};
