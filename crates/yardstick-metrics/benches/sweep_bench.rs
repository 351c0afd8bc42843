//! Criterion benchmarks for yardstick-metrics: incremental sweep versus
//! independent per-threshold lookups.

use criterion::{Criterion, criterion_group, criterion_main};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use yardstick_metrics::{ClassifierDataset, Thresholds, matrix_at};

fn make_dataset(n: usize, seed: u64) -> ClassifierDataset {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let observations: Vec<(f64, bool)> = (0..n)
        .map(|_| {
            let positive = rng.r#gen::<bool>();
            let base = if positive { 0.25 } else { 0.0 };
            (base + rng.r#gen::<f64>() * 0.75, positive)
        })
        .collect();
    ClassifierDataset::new(observations).unwrap()
}

fn bench_build_dataset(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let observations: Vec<(f64, bool)> = (0..10_000)
        .map(|_| (rng.r#gen::<f64>(), rng.r#gen::<bool>()))
        .collect();

    c.bench_function("dataset_new_10k", |b| {
        b.iter(|| ClassifierDataset::new(observations.iter().copied()).unwrap());
    });
}

fn bench_sweep_all_scores(c: &mut Criterion) {
    let ds = make_dataset(10_000, 42);

    c.bench_function("sweep_scores_10k", |b| {
        b.iter(|| ds.sweep(&Thresholds::Scores).unwrap().count());
    });
}

fn bench_sweep_vs_lookups(c: &mut Criterion) {
    let ds = make_dataset(10_000, 42);
    let thresholds: Vec<f64> = (0..1_000).map(|i| f64::from(i) / 1_000.0).collect();

    c.bench_function("sweep_1000_thresholds_10k", |b| {
        b.iter(|| ds.sweep(&Thresholds::Count(1_000)).unwrap().count());
    });

    c.bench_function("matrix_at_1000_thresholds_10k", |b| {
        b.iter(|| {
            thresholds
                .iter()
                .map(|&t| matrix_at(&ds, t).tp)
                .sum::<usize>()
        });
    });
}

criterion_group!(
    benches,
    bench_build_dataset,
    bench_sweep_all_scores,
    bench_sweep_vs_lookups
);
criterion_main!(benches);
