//! Volume profile computation for chart overlays.
//!
//! This crate handles:
//! - Price-binned volume histogram over a bar range
//! - Point of control and value area resolution
//! - Per-instance memoized profile state and render rows

pub mod histogram;
pub mod overlay;
pub mod value_area;

pub use histogram::{Histogram, PriceBin, ProfileBuilder};
pub use overlay::{ProfileOverlay, ProfileRow, ProfileSnapshot};
pub use value_area::{resolve_value_area, ValueArea};
