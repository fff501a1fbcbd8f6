//! Anchored VWAP computation for chart overlays.
//!
//! This crate handles:
//! - Incremental volume-weighted mean/variance from an anchor bar
//! - Deviation band projection
//! - Per-instance overlay state with reset-and-replay on anchor change

pub mod accumulator;
pub mod bands;
pub mod overlay;

pub use accumulator::{VwapAccumulator, VwapPoint};
pub use bands::BandProjector;
pub use overlay::{BandLine, VwapOverlay};
