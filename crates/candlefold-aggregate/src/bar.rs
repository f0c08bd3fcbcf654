//! OHLC bar (candlestick) data structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OHLC bar (candlestick) data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Bucket start in whole seconds since the epoch, aligned to the bucket width.
    #[serde(rename = "time", alias = "bucket_start")]
    pub bucket_start: i64,
    /// Price of the tick that opened the bar.
    pub open: f64,
    /// Highest price folded into the bar.
    pub high: f64,
    /// Lowest price folded into the bar.
    pub low: f64,
    /// Price of the most recent tick folded into the bar.
    pub close: f64,
}

impl Bar {
    /// Creates a new OHLC bar.
    #[must_use]
    pub const fn new(bucket_start: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            bucket_start,
            open,
            high,
            low,
            close,
        }
    }

    /// Creates the bar opened by a single price.
    #[must_use]
    pub const fn opened_at(bucket_start: i64, price: f64) -> Self {
        Self::new(bucket_start, price, price, price, price)
    }

    /// Returns this bar with one more price folded in.
    #[must_use]
    pub fn absorb(self, price: f64) -> Self {
        Self {
            bucket_start: self.bucket_start,
            open: self.open,
            high: self.high.max(price),
            low: self.low.min(price),
            close: price,
        }
    }

    /// Returns true if all prices are finite and `low <= open, close <= high`.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let finite = [self.open, self.high, self.low, self.close]
            .iter()
            .all(|p| p.is_finite());
        finite
            && self.low <= self.open
            && self.open <= self.high
            && self.low <= self.close
            && self.close <= self.high
    }

    /// Returns the bucket start as a UTC timestamp, if in range.
    #[must_use]
    pub fn bucket_start_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.bucket_start, 0)
    }

    /// Returns the price range (high - low).
    #[must_use]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Returns the body size (|close - open|).
    #[must_use]
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// Returns true if this is a bullish (green) bar.
    #[must_use]
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Returns true if this is a bearish (red) bar.
    #[must_use]
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }
}
