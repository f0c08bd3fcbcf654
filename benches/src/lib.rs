//! Shared utilities for candlefold benchmarks.

use candlefold_lib::{BarAggregator, BarSeries, BucketWidth, FoldStats, PriceTick};
use std::time::{Duration, Instant};

/// Configuration for a fold benchmark run.
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Number of ticks to fold.
    pub ticks: usize,
    /// Milliseconds between consecutive ticks.
    pub step_ms: i64,
    /// Bucket width to fold into.
    pub width: BucketWidth,
}

/// Result of a fold benchmark run.
#[derive(Debug, Clone, Copy)]
pub struct BenchmarkResult {
    /// Wall time of the fold.
    pub duration: Duration,
    /// Bars in the resulting series.
    pub bars: usize,
    /// Outcome counts.
    pub stats: FoldStats,
}

impl BenchmarkResult {
    /// Ticks folded per second.
    #[must_use]
    pub fn ticks_per_second(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            self.stats.total() as f64 / secs
        } else {
            0.0
        }
    }
}

/// Generates a deterministic random-walk tick stream for one instrument.
///
/// Every 97th tick is a replay from ten steps earlier, so the fold also
/// exercises the late-tick path.
#[must_use]
pub fn synthetic_ticks(instrument: &str, count: usize, step_ms: i64) -> Vec<PriceTick> {
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    let mut price = 100.0_f64;
    let mut ticks = Vec::with_capacity(count);

    for i in 0..count {
        // xorshift64
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let step = (state % 2001) as f64 / 1000.0 - 1.0;
        price = (price + step * 0.05).max(0.01);

        let index = if i % 97 == 96 { i - 10 } else { i };
        ticks.push(PriceTick::new(instrument, price, index as i64 * step_ms));
    }

    ticks
}

/// Folds the configured ticks from an empty series and times it.
#[must_use]
pub fn run_fold(config: &BenchmarkConfig) -> BenchmarkResult {
    let ticks = synthetic_ticks("btcusdt", config.ticks, config.step_ms);
    let aggregator = BarAggregator::utc(config.width);

    let start = Instant::now();
    let (series, stats) = aggregator.fold_with_stats(&ticks, &BarSeries::new());
    let duration = start.elapsed();

    BenchmarkResult {
        duration,
        bars: series.len(),
        stats,
    }
}

/// Formats a rate as a human-readable string.
#[must_use]
pub fn format_rate(per_second: f64) -> String {
    if per_second >= 1_000_000.0 {
        format!("{:.2}M/s", per_second / 1_000_000.0)
    } else if per_second >= 1_000.0 {
        format!("{:.2}K/s", per_second / 1_000.0)
    } else {
        format!("{per_second:.0}/s")
    }
}

/// Formats a duration as a human-readable string.
#[must_use]
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs >= 1.0 {
        format!("{secs:.2}s")
    } else {
        format!("{:.1}ms", secs * 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_ticks_are_deterministic() {
        let a = synthetic_ticks("x", 200, 1_000);
        let b = synthetic_ticks("x", 200, 1_000);
        assert_eq!(a, b);
        assert!(a.iter().all(|t| t.price > 0.0));
        assert_eq!(a[96].timestamp_ms, 86_000);
    }

    #[test]
    fn test_run_fold_counts_late_replays() {
        let result = run_fold(&BenchmarkConfig {
            ticks: 10_000,
            step_ms: 1_000,
            width: BucketWidth::MINUTE,
        });
        assert_eq!(result.stats.total(), 10_000);
        assert_eq!(result.stats.rejected, 0);
        assert!(result.stats.late > 0);
        assert!(result.bars > 100);
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(2_500_000.0), "2.50M/s");
        assert_eq!(format_rate(1_500.0), "1.50K/s");
        assert_eq!(format_rate(12.0), "12/s");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(1_500)), "1.50s");
        assert_eq!(format_duration(Duration::from_micros(2_500)), "2.5ms");
    }
}
