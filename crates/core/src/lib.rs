//! Shared types and configuration for the overlay crates.
//!
//! This crate provides what both overlay paths consume:
//! - Market data types (bars, bar series, instrument metadata)
//! - Configuration structures
//! - Bar-range resolution over gappy series
//! - Common error types

pub mod config;
pub mod error;
pub mod range;
pub mod types;

pub use config::{BandSpec, LineStyle, ProfileConfig, RowLayout, VwapConfig};
pub use error::{Error, Result};
pub use range::{resolve, BarRange, RangeEndpoints};
pub use types::{Bar, BarIndex, BarSeries, Instrument};
