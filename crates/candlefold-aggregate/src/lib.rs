//! Incremental OHLC bar aggregation for candlefold.
//!
//! This crate provides tick-to-bar folding over caller-held sequences:
//!
//! - [`Bar`] - OHLC bar data structure
//! - [`BarSeries`] - Immutable, cheaply cloned ordered bar sequence
//! - [`BarAggregator`] - Folds ticks into a series for one bucket width
//! - [`ChartRegistry`] - Per-instrument series with seed buffering

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/candlefold/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod aggregator;
mod bar;
mod registry;
mod series;

pub use aggregator::{BarAggregator, FoldOutcome, FoldStats};
pub use bar::Bar;
pub use registry::{ChartRegistry, SeedRequest, TickDisposition};
pub use series::BarSeries;
