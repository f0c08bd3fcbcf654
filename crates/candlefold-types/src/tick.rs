//! Price tick representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::InstrumentId;

/// A single observed trade price for an instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTick {
    /// Instrument the price was observed for.
    pub instrument: InstrumentId,
    /// Latest trade price.
    pub price: f64,
    /// Observation time in milliseconds since the Unix epoch.
    #[serde(rename = "timestamp")]
    pub timestamp_ms: i64,
}

/// Reason a tick was refused at the aggregation boundary.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickRejection {
    /// Price is NaN or infinite.
    #[error("price is not finite")]
    NonFinitePrice,

    /// Price is below zero.
    #[error("price is negative")]
    NegativePrice,

    /// Timestamp falls outside the representable calendar range.
    #[error("timestamp is out of range")]
    MalformedTimestamp,
}

impl PriceTick {
    /// Creates a new tick.
    #[must_use]
    pub fn new(instrument: impl Into<InstrumentId>, price: f64, timestamp_ms: i64) -> Self {
        Self {
            instrument: instrument.into(),
            price,
            timestamp_ms,
        }
    }

    /// Returns the observation time, or `None` if the timestamp is out of range.
    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp_ms)
    }

    /// Checks that the tick can be folded into a bar.
    ///
    /// # Errors
    ///
    /// Returns the first [`TickRejection`] that applies.
    pub fn validate(&self) -> Result<(), TickRejection> {
        if !self.price.is_finite() {
            return Err(TickRejection::NonFinitePrice);
        }
        if self.price < 0.0 {
            return Err(TickRejection::NegativePrice);
        }
        if self.timestamp().is_none() {
            return Err(TickRejection::MalformedTimestamp);
        }
        Ok(())
    }
}
