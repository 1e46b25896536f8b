use criterion::{criterion_group, criterion_main, Criterion};

use speedup::{compute_speedups, Measurement, Model};

fn speedups(c: &mut Criterion) {
    let measurements = measurements();
    c.bench_function("compute_speedups", |b| b.iter(|| compute_speedups(&measurements)));
}

fn build(c: &mut Criterion) {
    let points = compute_speedups(&measurements()).unwrap();
    c.bench_function("build", |b| b.iter(|| Model::build(&points)));
}

fn measurements() -> Vec<Measurement> {
    MEASUREMENTS.iter().map(|&(n, t)| Measurement::workers_and_elapsed_secs(n, t)).collect()
}

const MEASUREMENTS: [(u32, f64); 16] = [
    (1, 120.40),
    (2, 63.21),
    (3, 44.17),
    (4, 34.53),
    (5, 28.94),
    (6, 25.08),
    (7, 22.36),
    (8, 20.41),
    (9, 19.02),
    (10, 17.84),
    (11, 16.93),
    (12, 16.21),
    (13, 15.62),
    (14, 15.13),
    (15, 14.72),
    (16, 14.38),
];

criterion_group!(benches, speedups, build);
criterion_main!(benches);
