//! Benchmarks for the assembly counter and the search strategies.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use interlock::search::{brute_force, darwin, DarwinConfig};
use interlock::shapes::{chain3, ring4, star4};

/// Benchmark counting assemblies of the canonical ring instance.
fn bench_count_assemblies(c: &mut Criterion) {
    let template = ring4();
    let instance = template.one_solution();

    c.bench_function("count_assemblies_ring4", |b| {
        b.iter(|| black_box(&instance).count_assemblies(None))
    });
}

/// Benchmark the symmetry constant of the largest built-in shape.
fn bench_symmetry(c: &mut Criterion) {
    let template = star4();

    c.bench_function("symmetry_star4", |b| b.iter(|| black_box(&template).symmetry()));
}

/// Benchmark a complete brute-force search of the chain at kind 2.
fn bench_brute_force(c: &mut Criterion) {
    let template = chain3();

    c.bench_function("brute_chain3_kind2", |b| {
        b.iter(|| brute_force(black_box(&template), 2, None, |_, _| {}))
    });
}

/// Benchmark 200 scored candidates of evolutionary search on the ring.
fn bench_darwin(c: &mut Criterion) {
    let template = ring4();
    let config = DarwinConfig {
        population: 10,
        children: 3,
        mutation_rate: 0.2,
    };

    let mut group = c.benchmark_group("darwin");
    group.sample_size(10);
    group.bench_function("ring4_200_candidates", |b| {
        b.iter(|| {
            let mut rng = SmallRng::seed_from_u64(1);
            darwin(black_box(&template), 2, &config, &mut rng, Some(200), |_, _| {})
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_count_assemblies,
    bench_symmetry,
    bench_brute_force,
    bench_darwin
);
criterion_main!(benches);
