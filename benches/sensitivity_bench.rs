use active_city::core::{Dataset, DistrictRecord};
use active_city::{
    compute_index, compute_leave_one_out_sensitivity, compute_weight_sensitivity, IndexOptions,
    IndicatorConfig, ScenarioSet, WeightConfig,
};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

// Deterministic pseudo-random district table
fn create_dataset(districts: usize) -> Dataset {
    let indicators = IndicatorConfig::default();
    let columns: Vec<String> = indicators
        .iter()
        .flat_map(|(_, columns)| columns.to_vec())
        .collect();

    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state % 10_000) as f64 / 100.0
    };

    let records = (1..=districts as i64)
        .map(|id| {
            columns.iter().fold(
                DistrictRecord::new(id, format!("District {id}")),
                |record, column| record.with_value(column.as_str(), next()),
            )
        })
        .collect();
    Dataset::new(columns, records).unwrap()
}

fn bench_compute_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_index");
    for size in [25, 250, 2500] {
        let dataset = create_dataset(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &dataset, |b, dataset| {
            b.iter(|| {
                compute_index(
                    black_box(dataset),
                    &IndicatorConfig::default(),
                    &WeightConfig::equal(),
                    &IndexOptions::default(),
                )
                .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_weight_scenarios(c: &mut Criterion) {
    let dataset = create_dataset(250);
    let indexed = compute_index(
        &dataset,
        &IndicatorConfig::default(),
        &WeightConfig::equal(),
        &IndexOptions::default(),
    )
    .unwrap();
    let scenarios = ScenarioSet::default();

    c.bench_function("weight_scenarios_250", |b| {
        b.iter(|| compute_weight_sensitivity(black_box(&indexed), &scenarios).unwrap())
    });
}

fn bench_leave_one_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("leave_one_out");
    group.sample_size(20);
    for size in [25, 250] {
        let dataset = create_dataset(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &dataset, |b, dataset| {
            b.iter(|| {
                compute_leave_one_out_sensitivity(
                    black_box(dataset),
                    &IndicatorConfig::default(),
                    &WeightConfig::equal(),
                    &IndexOptions::default(),
                )
                .unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_compute_index,
    bench_weight_scenarios,
    bench_leave_one_out
);
criterion_main!(benches);
