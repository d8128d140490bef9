//! Benchmarks for the descriptor pool and class hierarchy.
//!
//! Tests query performance for the hot paths of analysis passes:
//! - Descriptor interning (cold and already-interned)
//! - Cast resolution over a deep superclass chain
//! - Descendant enumeration over a wide hierarchy
//! - Footprint estimation

extern crate dexscope;

use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use dexscope::analysis::footprint::FootprintEstimator;
use dexscope::metadata::class::{DexClass, DexMethod};
use dexscope::{DescriptorPool, TypeHierarchy};

/// Benchmark interning a descriptor that is already in the pool.
fn bench_intern_hit(c: &mut Criterion) {
    let pool = DescriptorPool::new();
    pool.intern("Lcom/example/Widget;").unwrap();

    c.bench_function("descriptor_intern_hit", |b| {
        b.iter(|| {
            let descriptor = pool.intern(black_box("Lcom/example/Widget;")).unwrap();
            black_box(descriptor)
        });
    });
}

/// Benchmark structural classification of an array descriptor.
fn bench_array_queries(c: &mut Criterion) {
    let pool = DescriptorPool::new();
    let matrix = pool.intern("[[[I").unwrap();

    c.bench_function("descriptor_array_queries", |b| {
        b.iter(|| {
            let level = pool.array_level(black_box(matrix));
            let element = pool.array_element(black_box(matrix));
            black_box((level, element))
        });
    });
}

/// Build a single-inheritance chain of the given depth and return its leaf.
fn build_chain(pool: &Arc<DescriptorPool>, hierarchy: &TypeHierarchy, depth: usize) -> DexClass {
    let mut superclass = pool.object_type();
    for level in 0..depth {
        let descriptor = pool.intern(&format!("Lcom/example/Level{level};")).unwrap();
        hierarchy
            .register(&Arc::new(DexClass::new(descriptor, Some(superclass), 0x1)))
            .unwrap();
        superclass = descriptor;
    }
    DexClass::new(
        pool.intern("Lcom/example/Leaf;").unwrap(),
        Some(superclass),
        0x1,
    )
}

/// Benchmark cast resolution walking a 32-level superclass chain to the root.
fn bench_is_assignable_deep_chain(c: &mut Criterion) {
    let pool = Arc::new(DescriptorPool::new());
    let hierarchy = TypeHierarchy::new(pool.clone());
    let leaf = build_chain(&pool, &hierarchy, 32);
    hierarchy.register(&Arc::new(leaf)).unwrap();
    let leaf = pool.get("Lcom/example/Leaf;").unwrap();
    let top = pool.get("Lcom/example/Level0;").unwrap();

    c.bench_function("hierarchy_is_assignable_deep", |b| {
        b.iter(|| {
            let compatible = hierarchy.is_assignable(black_box(leaf), black_box(top));
            black_box(compatible)
        });
    });
}

/// Benchmark pre-order descendant enumeration over 1024 direct subclasses.
fn bench_descendants_wide(c: &mut Criterion) {
    let pool = Arc::new(DescriptorPool::new());
    let hierarchy = TypeHierarchy::new(pool.clone());
    let base = pool.intern("Lcom/example/Base;").unwrap();
    hierarchy
        .register(&Arc::new(DexClass::new(base, Some(pool.object_type()), 0x1)))
        .unwrap();
    for i in 0..1024 {
        let descriptor = pool.intern(&format!("Lcom/example/Sub{i};")).unwrap();
        hierarchy
            .register(&Arc::new(DexClass::new(descriptor, Some(base), 0x1)))
            .unwrap();
    }

    c.bench_function("hierarchy_descendants_wide", |b| {
        b.iter(|| {
            let descendants = hierarchy.descendants_of(black_box(base));
            black_box(descendants)
        });
    });
}

/// Benchmark footprint estimation for a class with a realistic member count.
fn bench_estimate_footprint(c: &mut Criterion) {
    let pool = DescriptorPool::new();
    let estimator = FootprintEstimator::new().unwrap();

    let descriptor = pool.intern("Lcom/example/MainActivity;").unwrap();
    let class = DexClass::new(descriptor, Some(pool.object_type()), 0x1);
    for i in 0..24 {
        class
            .virtual_methods
            .push(Arc::new(DexMethod::new(&format!("m{i}"), 0x1)));
    }

    c.bench_function("footprint_estimate", |b| {
        b.iter(|| {
            let units = estimator.estimate(black_box(&class), black_box(&pool));
            black_box(units)
        });
    });
}

criterion_group!(
    benches,
    bench_intern_hit,
    bench_array_queries,
    bench_is_assignable_deep_chain,
    bench_descendants_wide,
    bench_estimate_footprint
);
criterion_main!(benches);
