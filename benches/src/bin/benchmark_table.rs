//! Benchmark runner that outputs a markdown table for the README.
//!
//! Run with: `cargo run --package candlefold-bench --bin benchmark_table --release`

use candlefold_bench::{BenchmarkConfig, format_duration, format_rate, run_fold};
use candlefold_lib::BucketWidth;

/// Number of iterations per benchmark; the fastest run is reported.
const ITERATIONS: usize = 5;

fn main() {
    println!("candlefold fold throughput");
    println!("==========================\n");

    let configs = [
        ("1 day @ 1s", 86_400, BucketWidth::MINUTE),
        ("1 day @ 1s", 86_400, BucketWidth::HOUR),
        ("1 week @ 100ms", 6_048_000, BucketWidth::HOUR),
        ("1 week @ 100ms", 6_048_000, BucketWidth::DAY),
    ];

    println!("| Ticks | Width | Bars | Late | Time | Throughput |");
    println!("|-------|-------|------|------|------|------------|");

    for (name, ticks, width) in configs {
        let step_ms = if ticks > 100_000 { 100 } else { 1_000 };
        let config = BenchmarkConfig {
            ticks,
            step_ms,
            width,
        };

        let best = (0..ITERATIONS)
            .map(|_| run_fold(&config))
            .min_by_key(|result| result.duration);
        let Some(best) = best else { continue };

        println!(
            "| {} | {} | {} | {} | {} | {} |",
            name,
            width,
            best.bars,
            best.stats.late,
            format_duration(best.duration),
            format_rate(best.ticks_per_second()),
        );
    }
}
