//! Core types for the candlefold OHLC bar aggregator.
//!
//! This crate provides the fundamental data structures used throughout candlefold:
//!
//! - [`PriceTick`] - A single observed trade price for an instrument
//! - [`InstrumentId`] - Normalized traded symbol identifier
//! - [`BucketWidth`] - Fixed bar duration, with [`ChartMode`] presets
//! - [`LocalOffset`] - Observer offset removed before bucket flooring

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/candlefold/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod instrument;
mod offset;
mod tick;
mod width;

pub use error::{CandlefoldError, Result, SeedError};
pub use instrument::InstrumentId;
pub use offset::LocalOffset;
pub use tick::{PriceTick, TickRejection};
pub use width::{BucketWidth, BucketWidthParseError, ChartMode};
