//! Benchmarks for graph freezing, propagation and FDR correction.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rapid_generank::pagerank::step::propagate;
use rapid_generank::{
    fdr_correction, FdrMethod, GraphBuilder, PersonalizationVector, PersonalizedPageRank,
};
use std::hint::black_box;

/// Small deterministic LCG so graphs are identical across runs.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next() % n as u64) as usize
    }

    fn unit(&mut self) -> f64 {
        (self.next() % 1_000_000) as f64 / 1_000_000.0
    }
}

/// Ring plus `extra` random weighted out-edges per node.
fn interaction_network(n: usize, extra: usize, seed: u64) -> GraphBuilder {
    let mut rng = Lcg(seed);
    let mut builder = GraphBuilder::with_capacity(n);
    for i in 0..n {
        builder.get_or_create_node(&format!("G{i}"));
    }
    for i in 0..n {
        let next = ((i + 1) % n) as u32;
        builder.set_edge(i as u32, next, 1.0).unwrap();
        for _ in 0..extra {
            let target = rng.below(n) as u32;
            builder.set_edge(i as u32, target, 0.1 + rng.unit()).unwrap();
        }
    }
    builder
}

fn seeds(n: usize, count: usize) -> PersonalizationVector {
    PersonalizationVector::from_seeds((0..count).map(|i| format!("G{}", i * n / count)), 1.0)
        .unwrap()
}

fn bench_freeze(c: &mut Criterion) {
    let mut group = c.benchmark_group("freeze");
    for &n in &[1_000usize, 10_000] {
        let builder = interaction_network(n, 8, 7);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| black_box(builder.freeze()))
        });
    }
    group.finish();
}

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("propagate_step");
    for &n in &[1_000usize, 10_000] {
        let graph = interaction_network(n, 8, 11).freeze();
        let prev = vec![1.0 / n as f64; n];
        let restart = seeds(n, 20).project(&graph).mass;
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                black_box(propagate(
                    black_box(&graph),
                    black_box(&prev),
                    &restart,
                    0.85,
                ))
            })
        });
    }
    group.finish();
}

fn bench_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("personalized_pagerank");
    group.sample_size(20);
    for &n in &[1_000usize, 10_000] {
        let graph = interaction_network(n, 8, 13).freeze();
        let restart = seeds(n, 20).project(&graph).mass;

        for parallel in [false, true] {
            let engine = PersonalizedPageRank::new().with_parallel(parallel);
            let label = if parallel { "parallel" } else { "sequential" };
            group.bench_with_input(BenchmarkId::new(label, n), &n, |b, _| {
                b.iter(|| black_box(engine.run(black_box(&graph), &restart)))
            });
        }
    }
    group.finish();
}

fn bench_fdr(c: &mut Criterion) {
    let mut group = c.benchmark_group("fdr_correction");
    for &n in &[1_000usize, 100_000] {
        let mut rng = Lcg(17);
        let pvals: Vec<f64> = (0..n).map(|_| rng.unit()).collect();
        for method in [FdrMethod::Indep, FdrMethod::NegCorr] {
            group.bench_with_input(
                BenchmarkId::new(format!("{method:?}"), n),
                &n,
                |b, _| b.iter(|| black_box(fdr_correction(black_box(&pvals), 0.05, method))),
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_freeze, bench_step, bench_run, bench_fdr);
criterion_main!(benches);
