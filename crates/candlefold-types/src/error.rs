//! Error types for candlefold.

use thiserror::Error;

use crate::{BucketWidth, InstrumentId};

/// Result type alias for candlefold operations.
pub type Result<T> = std::result::Result<T, CandlefoldError>;

/// Errors that can occur while seeding, fetching, or writing bars.
#[derive(Error, Debug)]
pub enum CandlefoldError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Invalid data format.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Seed bars were rejected.
    #[error(transparent)]
    Seed(#[from] SeedError),

    /// Historical fetch failed for an instrument.
    #[error("Seeding {instrument} failed: {message}")]
    SeedFetch {
        /// The instrument whose seed could not be fetched.
        instrument: InstrumentId,
        /// Description of the underlying failure.
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Output format error.
    #[error("Format error: {0}")]
    Format(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error for seed bar sequences that cannot back a live chart.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeedError {
    /// Bucket starts are not strictly increasing.
    #[error("Seed bar {index} starts at {current}, not after previous bar at {previous}")]
    Unordered {
        /// Index of the offending bar.
        index: usize,
        /// Bucket start of the preceding bar.
        previous: i64,
        /// Bucket start of the offending bar.
        current: i64,
    },

    /// Bar prices violate `low <= open, close <= high` or are not finite.
    #[error("Seed bar {index} has inconsistent prices")]
    Inconsistent {
        /// Index of the offending bar.
        index: usize,
    },

    /// Seed belongs to a selection that has since been replaced.
    #[error("Seed for {instrument} at {requested} was superseded by a selection at {selected}")]
    StaleSelection {
        /// The instrument the seed was fetched for.
        instrument: InstrumentId,
        /// Width the seed was fetched with.
        requested: BucketWidth,
        /// Width of the selection that replaced it.
        selected: BucketWidth,
    },

    /// Seed arrived for an instrument that is not selected or already live.
    #[error("No chart is awaiting a seed for {0}")]
    Untracked(InstrumentId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_error_converts() {
        let err: CandlefoldError = SeedError::Inconsistent { index: 3 }.into();
        assert!(matches!(err, CandlefoldError::Seed(_)));
        assert_eq!(err.to_string(), "Seed bar 3 has inconsistent prices");
    }

    #[test]
    fn test_stale_message() {
        let err = SeedError::StaleSelection {
            instrument: InstrumentId::new("btcusdt"),
            requested: BucketWidth::HOUR,
            selected: BucketWidth::DAY,
        };
        assert_eq!(
            err.to_string(),
            "Seed for btcusdt at 1h was superseded by a selection at 1d"
        );
    }
}
