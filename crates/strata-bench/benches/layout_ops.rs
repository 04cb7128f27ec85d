//! Criterion micro-benchmarks for the layout engine and schema lookups.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use strata_arena::{FieldTuple, Record};
use strata_bench::Particle;
use strata_core::{FieldType, SegmentLayout};
use strata_test_utils::fixtures::Wide;

/// Benchmark: lay out a 4-field record, as every reallocation does.
fn bench_layout_particle(c: &mut Criterion) {
    let types = <<Particle as Record>::Fields as FieldTuple>::TYPES;
    c.bench_function("layout_particle", |b| {
        b.iter(|| SegmentLayout::compute(black_box(types), black_box(4096)).unwrap());
    });
}

/// Benchmark: lay out the widest supported record.
fn bench_layout_wide(c: &mut Criterion) {
    let types = <<Wide as Record>::Fields as FieldTuple>::TYPES;
    c.bench_function("layout_wide", |b| {
        b.iter(|| SegmentLayout::compute(black_box(types), black_box(4096)).unwrap());
    });
}

/// Benchmark: build a schema and resolve a field position by name.
fn bench_schema_lookup(c: &mut Criterion) {
    let schema = Wide::schema();
    c.bench_function("schema_position_of", |b| {
        b.iter(|| schema.position_of(black_box("i")));
    });
    c.bench_function("schema_build_wide", |b| b.iter(Wide::schema));
}

/// Benchmark: field metadata construction at runtime.
fn bench_field_type(c: &mut Criterion) {
    c.bench_function("field_type_of", |b| {
        b.iter(|| black_box(FieldType::of::<[f32; 3]>()));
    });
}

criterion_group!(
    benches,
    bench_layout_particle,
    bench_layout_wide,
    bench_schema_lookup,
    bench_field_type
);
criterion_main!(benches);
