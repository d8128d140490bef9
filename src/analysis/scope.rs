//! Scope building over partitioned class collections.
//!
//! A multi-dex layout keeps classes in per-dex partitions. Analysis passes work
//! on a flat scope built from all partitions, and optimization passes that
//! remove classes hand the surviving scope back so the partitions can be
//! filtered down to it, without disturbing the relative order inside any
//! partition.

use std::collections::HashSet;

use crate::metadata::{class::DexClassRc, descriptor::DexDescriptor};

/// A flat collection of classes an analysis pass works on
pub type Scope = Vec<DexClassRc>;
/// The classes of one dex partition, in layout order
pub type DexPartition = Vec<DexClassRc>;

/// Flatten partitioned classes into a single scope.
///
/// Partition order and the order within each partition are preserved.
#[must_use]
pub fn build_scope(partitions: &[DexPartition]) -> Scope {
    let mut scope = Vec::new();
    for partition in partitions {
        for class in partition {
            scope.push(class.clone());
        }
    }
    scope
}

/// Filter partitions down to the surviving scope.
///
/// Each partition retains exactly its classes that appear in `surviving`, in
/// their original relative order. The operation can only remove classes; in
/// debug builds it verifies that every surviving class is still present
/// somewhere in the rebuilt partitioning.
///
/// # Panics
/// Panics in debug builds when a surviving class does not appear in any
/// partition - the surviving scope must be a subset of the partitioned classes.
pub fn rebuild_partitions(surviving: &Scope, partitions: &mut [DexPartition]) {
    let keep: HashSet<DexDescriptor> = surviving.iter().map(|class| class.descriptor).collect();
    for partition in partitions.iter_mut() {
        partition.retain(|class| keep.contains(&class.descriptor));
    }

    if cfg!(debug_assertions) {
        let rebuilt: HashSet<DexDescriptor> = partitions
            .iter()
            .flat_map(|partition| partition.iter().map(|class| class.descriptor))
            .collect();
        for class in surviving {
            assert!(
                rebuilt.contains(&class.descriptor),
                "rebuilding partitions cannot add classes"
            );
        }
    }
}
