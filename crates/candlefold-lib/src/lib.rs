//! Incremental OHLC bar aggregation over live price ticks.
//!
//! This is a facade crate that re-exports functionality from the candlefold
//! workspace crates for convenient access.
//!
//! # Live charts
//!
//! ```no_run
//! use candlefold_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let client = SeedClient::with_defaults()?;
//!     let ticks = tick_lines(tokio::io::BufReader::new(tokio::io::stdin()));
//!
//!     let registry = LiveFeed::new(client)
//!         .select("btcusdt".into(), BarAggregator::utc(BucketWidth::HOUR))
//!         .run(ticks, |event| {
//!             if let FeedEvent::Updated { instrument, series, .. } = event {
//!                 println!("{instrument}: {:?}", series.last());
//!             }
//!         })
//!         .await;
//!
//!     println!("{} charts", registry.len());
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/candlefold/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use candlefold_types::*;

// Re-export aggregation
pub use candlefold_aggregate::{
    Bar, BarAggregator, BarSeries, ChartRegistry, FoldOutcome, FoldStats, SeedRequest,
    TickDisposition,
};

// Re-export seeding and live feed
#[cfg(feature = "fetch")]
pub use candlefold_fetch::{
    ClientConfig, FeedError, FeedEvent, FetchError, FileSeedSource, LiveFeed, SeedClient,
    SeedSource, tick_lines, url,
};

// Re-export formatters
#[cfg(feature = "format")]
pub use candlefold_format::{
    CsvFormatter, FormatError, Formatter, JsonFormatter, JsonStyle, OutputFormat,
    read_bars_json, read_ticks_csv, read_ticks_ndjson,
};

#[cfg(all(feature = "format", feature = "parquet"))]
pub use candlefold_format::ParquetFormatter;

/// Prelude module for convenient imports.
///
/// ```
/// use candlefold_lib::prelude::*;
/// ```
pub mod prelude {
    pub use candlefold_types::{
        BucketWidth, CandlefoldError, ChartMode, InstrumentId, LocalOffset, PriceTick, Result,
    };

    pub use candlefold_aggregate::{
        Bar, BarAggregator, BarSeries, ChartRegistry, FoldOutcome, FoldStats,
    };

    #[cfg(feature = "fetch")]
    pub use candlefold_fetch::{
        FeedEvent, FileSeedSource, LiveFeed, SeedClient, SeedSource, tick_lines,
    };

    #[cfg(feature = "format")]
    pub use candlefold_format::{CsvFormatter, Formatter, JsonFormatter, OutputFormat};

    #[cfg(all(feature = "format", feature = "parquet"))]
    pub use candlefold_format::ParquetFormatter;
}
