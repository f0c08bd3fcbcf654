//! Historical seeding and live tick feeds for candlefold.
//!
//! This crate provides the I/O around bar aggregation:
//!
//! - [`url::bars_url`] - Constructs bar history URLs
//! - [`SeedClient`] - HTTP client for historical bars
//! - [`SeedSource`] - Seam for anything that can supply seed bars
//! - [`tick_lines`] - NDJSON tick decoding from any async reader
//! - [`LiveFeed`] - Single-task driver for seeding and folding

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/candlefold/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod feed;
mod live;
mod source;
pub mod url;

pub use client::{ClientConfig, FetchError, SeedClient};
pub use feed::{FeedError, tick_lines};
pub use live::{FeedEvent, LiveFeed};
pub use source::{FileSeedSource, SeedSource};
