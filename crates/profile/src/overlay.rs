//! Per-instance volume profile overlay state.
//!
//! Owns the cached histogram/value-area snapshot for one drawing on one
//! chart. Recomputation happens only when the resolved range or the
//! row-sizing inputs change; the host's render cycle may call in every
//! frame.

use ordered_float::OrderedFloat;
use overlay_core::{
    resolve, BarRange, BarSeries, Instrument, ProfileConfig, RangeEndpoints, Result, RowLayout,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::histogram::{Histogram, ProfileBuilder};
use crate::value_area::{resolve_value_area, ValueArea};

/// Memoization key: recompute only when one of these changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CacheKey {
    range: BarRange,
    row_layout: RowLayout,
    value_area_percent: OrderedFloat<f64>,
    max_bins: usize,
    tick_size: OrderedFloat<f64>,
}

/// Immutable result of one profile computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    /// Resolved bar range the profile covers.
    pub range: BarRange,
    /// Price-binned histogram.
    pub histogram: Histogram,
    /// Point of control and value area boundaries.
    pub value_area: ValueArea,
}

/// One horizontal row handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileRow {
    /// Representative price (bin midpoint).
    pub price: f64,
    /// Total volume in the row.
    pub total: f64,
    /// Buyer-attributed volume.
    pub buy_volume: f64,
    /// Seller-attributed volume.
    pub sell_volume: f64,
    /// Row volume relative to the POC row, in [0, 1].
    pub width_ratio: f64,
    /// Whether the row lies inside the value area.
    pub in_value_area: bool,
    /// Whether the row is the point of control.
    pub is_poc: bool,
}

impl ProfileSnapshot {
    /// Render rows, ascending in price.
    ///
    /// The width ratio short-circuits to 0 when the POC row holds no
    /// volume, so a degenerate profile never emits NaN widths.
    pub fn rows(&self) -> Vec<ProfileRow> {
        let poc_total = self.histogram.bins[self.value_area.poc].total();
        self.histogram
            .bins
            .iter()
            .map(|bin| ProfileRow {
                price: bin.price,
                total: bin.total(),
                buy_volume: bin.buy_volume,
                sell_volume: bin.sell_volume,
                width_ratio: if poc_total > 0.0 {
                    bin.total() / poc_total
                } else {
                    0.0
                },
                in_value_area: self.value_area.contains(bin.index),
                is_poc: bin.index == self.value_area.poc,
            })
            .collect()
    }
}

/// Volume profile overlay with memoized recomputation.
#[derive(Debug)]
pub struct ProfileOverlay {
    builder: ProfileBuilder,
    cache: Option<(CacheKey, Option<ProfileSnapshot>)>,
}

impl ProfileOverlay {
    /// Create an overlay, validating the configuration.
    pub fn new(config: ProfileConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            builder: ProfileBuilder::new(config),
            cache: None,
        })
    }

    /// The overlay's configuration.
    pub fn config(&self) -> &ProfileConfig {
        self.builder.config()
    }

    /// Drop the cached snapshot; the next call recomputes.
    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    /// Resolve `endpoints` and return the profile snapshot, recomputing
    /// only when the resolved range or configuration changed.
    ///
    /// Returns `None` when the range is degenerate (fewer than two valid
    /// bars) or the histogram is empty (zero price span); the caller
    /// skips drawing in both cases.
    pub fn snapshot<S: BarSeries + ?Sized>(
        &mut self,
        series: &S,
        instrument: &Instrument,
        endpoints: RangeEndpoints,
    ) -> Option<&ProfileSnapshot> {
        let range = resolve(series, endpoints)?;
        let config = self.builder.config();
        let key = CacheKey {
            range,
            row_layout: config.row_layout,
            value_area_percent: OrderedFloat(config.value_area_percent),
            max_bins: config.max_bins,
            tick_size: OrderedFloat(instrument.tick_size),
        };

        let stale = self.cache.as_ref().map(|(k, _)| *k) != Some(key);
        if stale {
            debug!(from = range.from, to = range.to, "rebuilding profile");
            let histogram = self.builder.build(series, instrument, range);
            let snapshot = resolve_value_area(&histogram, config.value_area_percent).map(
                |value_area| ProfileSnapshot {
                    range,
                    histogram,
                    value_area,
                },
            );
            self.cache = Some((key, snapshot));
        }

        self.cache.as_ref().and_then(|(_, s)| s.as_ref())
    }
}
