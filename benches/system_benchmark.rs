use criterion::{criterion_group, criterion_main, Criterion};
use predictive_maintenance::model::{AnomalyModel, IsolationForest};
use predictive_maintenance::sensor::generator::SensorGenerator;

fn benchmark_sensor_generation(c: &mut Criterion) {
    let mut gen = SensorGenerator::new(42);
    c.bench_function("sensor_generate", |b| b.iter(|| gen.generate()));
}

fn benchmark_forest_fit(c: &mut Criterion) {
    let mut gen = SensorGenerator::new(42);
    let window: Vec<Vec<f64>> = (0..200).map(|_| gen.generate().features().to_vec()).collect();
    let mut forest = IsolationForest::default();
    c.bench_function("forest_fit_200", |b| b.iter(|| forest.fit(&window)));
}

criterion_group!(benches, benchmark_sensor_generation, benchmark_forest_fit);
criterion_main!(benches);
