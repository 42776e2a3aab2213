//! Criterion benchmarks for atomspace insertion and text I/O
//!
//! Validates performance claims:
//! - Deduplicated insertion: O(1) per atom (hash lookup)
//! - Serialize/load: linear in atoms plus link members (shared members are
//!   written once)

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use trueno_atomspace::{load, serialize, AtomSpace, AtomType};

/// Generate an atomspace of ~`num_atoms` EvaluationLink facts over 1000 concepts
fn generate_space(num_atoms: usize) -> AtomSpace {
    let mut space = AtomSpace::with_capacity(num_atoms);
    let mut rng_state = 12345_u64; // Simple LCG for reproducibility

    let predicate = space
        .add_node(AtomType::PredicateNode, "predicate0")
        .unwrap();
    let concepts: Vec<_> = (0..1000)
        .map(|i| {
            space
                .add_node(AtomType::ConceptNode, format!("concept{i}"))
                .unwrap()
        })
        .collect();
    let link_types = [
        AtomType::ListLink,
        AtomType::InheritanceLink,
        AtomType::MemberLink,
    ];

    while space.size() < num_atoms {
        rng_state = rng_state.wrapping_mul(1103515245).wrapping_add(12345);
        let c1 = concepts[(rng_state % 1000) as usize];
        rng_state = rng_state.wrapping_mul(1103515245).wrapping_add(12345);
        let c2 = concepts[(rng_state % 1000) as usize];
        if c1 == c2 {
            continue;
        }

        rng_state = rng_state.wrapping_mul(1103515245).wrapping_add(12345);
        let link_type = link_types[((rng_state >> 16) % 3) as usize];
        let arg = space.add_link(link_type, vec![c1, c2]).unwrap();
        space
            .add_link(AtomType::EvaluationLink, vec![predicate, arg])
            .unwrap();
    }

    space
}

/// Benchmark: building an atomspace with deduplicated inserts
fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    for size in [2_000, 10_000, 50_000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("generate", size), size, |b, &size| {
            b.iter(|| black_box(generate_space(size)));
        });
    }

    group.finish();
}

/// Benchmark: text serialization
fn bench_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize");

    for size in [2_000, 10_000, 50_000].iter() {
        let space = generate_space(*size);

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("compact", size), &space, |b, space| {
            b.iter(|| black_box(serialize(black_box(space)).unwrap()));
        });
    }

    group.finish();
}

/// Benchmark: parsing and loading into a fresh atomspace
fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");

    for size in [2_000, 10_000, 50_000].iter() {
        let text = serialize(&generate_space(*size)).unwrap();

        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("fresh_space", size), &text, |b, text| {
            b.iter(|| {
                let mut space = AtomSpace::new();
                load(black_box(text), &mut space).unwrap();
                black_box(space);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_insert, bench_serialize, bench_load);
criterion_main!(benches);
