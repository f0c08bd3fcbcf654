//! Fold throughput benchmarks.
//!
//! Run with: `cargo bench --package candlefold-bench`

use candlefold_bench::synthetic_ticks;
use candlefold_lib::{BarAggregator, BarSeries, BucketWidth, ChartRegistry, InstrumentId};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

const TICKS: usize = 100_000;

fn fold_benchmark(c: &mut Criterion) {
    let ticks = synthetic_ticks("btcusdt", TICKS, 250);

    let mut group = c.benchmark_group("fold");
    group.throughput(Throughput::Elements(TICKS as u64));

    for width in [BucketWidth::MINUTE, BucketWidth::HOUR, BucketWidth::DAY] {
        let aggregator = BarAggregator::utc(width);
        group.bench_with_input(BenchmarkId::from_parameter(width), &ticks, |b, ticks| {
            b.iter(|| aggregator.fold(black_box(ticks), &BarSeries::new()));
        });
    }

    group.finish();
}

fn registry_benchmark(c: &mut Criterion) {
    let instruments = ["btcusdt", "ethusdt", "solusdt", "xrpusdt"];
    let per_instrument = TICKS / instruments.len();
    let mut ticks: Vec<_> = instruments
        .iter()
        .flat_map(|id| synthetic_ticks(id, per_instrument, 250))
        .collect();
    ticks.sort_by_key(|tick| tick.timestamp_ms);

    let mut group = c.benchmark_group("registry");
    group.throughput(Throughput::Elements(ticks.len() as u64));

    group.bench_function("on_tick", |b| {
        b.iter_batched(
            || {
                let mut registry = ChartRegistry::new();
                for id in instruments {
                    let aggregator = BarAggregator::utc(BucketWidth::MINUTE);
                    let request = registry.select(InstrumentId::new(id), aggregator);
                    let _ = registry.complete_seed(&request, Vec::new());
                }
                (registry, ticks.clone())
            },
            |(mut registry, ticks)| {
                for tick in ticks {
                    black_box(registry.on_tick(tick));
                }
                registry
            },
            criterion::BatchSize::LargeInput,
        );
    });

    group.finish();
}

criterion_group!(benches, fold_benchmark, registry_benchmark);
criterion_main!(benches);
