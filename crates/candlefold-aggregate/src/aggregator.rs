//! Incremental tick-to-bar folding.

use std::borrow::Borrow;

use candlefold_types::{BucketWidth, LocalOffset, PriceTick, TickRejection};

use crate::{Bar, BarSeries};

/// Folds price ticks into a bar series for one bucket width.
///
/// The aggregator carries configuration only. The series is owned by the
/// caller and every fold returns a new series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarAggregator {
    width: BucketWidth,
    offset: LocalOffset,
}

/// What a single fold did with its tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldOutcome {
    /// The tick opened a new bar.
    Appended,
    /// The tick was folded into the last bar.
    Updated,
    /// The tick failed validation and was dropped.
    Rejected(TickRejection),
    /// The tick belongs to a bucket earlier than the last bar and was dropped.
    Late {
        /// Bucket the tick fell into.
        bucket_start: i64,
        /// Bucket of the current last bar.
        last_bucket_start: i64,
    },
}

impl FoldOutcome {
    /// Returns true if the series changed.
    #[must_use]
    pub const fn changed(&self) -> bool {
        matches!(self, Self::Appended | Self::Updated)
    }
}

/// Counts of fold outcomes over a batch of ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FoldStats {
    /// Ticks that opened a new bar.
    pub appended: u64,
    /// Ticks folded into an existing bar.
    pub updated: u64,
    /// Ticks dropped for an invalid price or timestamp.
    pub rejected: u64,
    /// Ticks dropped for arriving after their bucket closed.
    pub late: u64,
}

impl FoldStats {
    /// Records one outcome.
    pub const fn record(&mut self, outcome: FoldOutcome) {
        match outcome {
            FoldOutcome::Appended => self.appended += 1,
            FoldOutcome::Updated => self.updated += 1,
            FoldOutcome::Rejected(_) => self.rejected += 1,
            FoldOutcome::Late { .. } => self.late += 1,
        }
    }

    /// Returns the number of ticks seen.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.appended + self.updated + self.rejected + self.late
    }

    /// Returns the number of ticks dropped.
    #[must_use]
    pub const fn dropped(&self) -> u64 {
        self.rejected + self.late
    }
}

impl BarAggregator {
    /// Creates a new aggregator.
    #[must_use]
    pub const fn new(width: BucketWidth, offset: LocalOffset) -> Self {
        Self { width, offset }
    }

    /// Creates an aggregator whose buckets align to UTC boundaries.
    #[must_use]
    pub const fn utc(width: BucketWidth) -> Self {
        Self::new(width, LocalOffset::utc())
    }

    /// Returns the bucket width being aggregated to.
    #[must_use]
    pub const fn width(&self) -> BucketWidth {
        self.width
    }

    /// Returns the observer offset removed before flooring.
    #[must_use]
    pub const fn offset(&self) -> LocalOffset {
        self.offset
    }

    /// Calculates the bucket start for a millisecond timestamp.
    #[must_use]
    pub const fn bucket_start_for(&self, timestamp_ms: i64) -> i64 {
        let width = self.width.seconds_i64();
        self.offset.bar_seconds(timestamp_ms).div_euclid(width) * width
    }

    /// Folds one tick into `series`.
    ///
    /// Returns the resulting series alongside what happened to the tick.
    /// Dropped ticks return a clone of the input series.
    #[must_use]
    pub fn fold_tick(&self, series: &BarSeries, tick: &PriceTick) -> (BarSeries, FoldOutcome) {
        if let Err(rejection) = tick.validate() {
            return (series.clone(), FoldOutcome::Rejected(rejection));
        }

        let bucket_start = self.bucket_start_for(tick.timestamp_ms);

        match series.last() {
            None => (
                series.appended(Bar::opened_at(bucket_start, tick.price)),
                FoldOutcome::Appended,
            ),
            Some(last) if bucket_start > last.bucket_start => (
                series.appended(Bar::opened_at(bucket_start, tick.price)),
                FoldOutcome::Appended,
            ),
            Some(last) if bucket_start == last.bucket_start => (
                series.with_last(last.absorb(tick.price)),
                FoldOutcome::Updated,
            ),
            Some(last) => (
                series.clone(),
                FoldOutcome::Late {
                    bucket_start,
                    last_bucket_start: last.bucket_start,
                },
            ),
        }
    }

    /// Folds ticks into `series` in order, returning the updated series.
    #[must_use]
    pub fn fold<I>(&self, ticks: I, series: &BarSeries) -> BarSeries
    where
        I: IntoIterator,
        I::Item: Borrow<PriceTick>,
    {
        self.fold_with_stats(ticks, series).0
    }

    /// Folds ticks into `series` in order, also counting outcomes.
    #[must_use]
    pub fn fold_with_stats<I>(&self, ticks: I, series: &BarSeries) -> (BarSeries, FoldStats)
    where
        I: IntoIterator,
        I::Item: Borrow<PriceTick>,
    {
        let mut stats = FoldStats::default();
        let mut current = series.clone();
        for tick in ticks {
            let (next, outcome) = self.fold_tick(&current, tick.borrow());
            stats.record(outcome);
            current = next;
        }
        (current, stats)
    }
}
