//! Per-instance anchored VWAP overlay state.
//!
//! Owns the accumulator and per-bar history for one drawing. Every render
//! re-resolves the anchored range: an anchor change resets and replays
//! forward, otherwise only newly arrived bars are accumulated.

use overlay_core::{resolve, BandSpec, BarIndex, BarSeries, RangeEndpoints, Result, VwapConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::accumulator::{VwapAccumulator, VwapPoint};
use crate::bands::BandProjector;

/// Polyline for one configured line: `(bar index, value)` per processed
/// (non-gap) bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandLine {
    /// The band this polyline belongs to.
    pub band: BandSpec,
    /// Points in ascending bar-index order.
    pub points: Vec<(BarIndex, f64)>,
}

/// Anchored VWAP overlay with incremental recomputation.
#[derive(Debug)]
pub struct VwapOverlay {
    projector: BandProjector,
    accumulator: VwapAccumulator,
    anchor: Option<BarIndex>,
    history: Vec<(BarIndex, VwapPoint)>,
}

impl VwapOverlay {
    /// Create an overlay, validating the configuration.
    pub fn new(config: VwapConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            projector: BandProjector::new(&config),
            accumulator: VwapAccumulator::new(),
            anchor: None,
            history: Vec::new(),
        })
    }

    /// Resolved anchor bar index, if any.
    pub fn anchor(&self) -> Option<BarIndex> {
        self.anchor
    }

    /// Per-bar VWAP/deviation history since the anchor.
    pub fn history(&self) -> &[(BarIndex, VwapPoint)] {
        &self.history
    }

    /// Bring the overlay up to date for `anchor` and return one polyline
    /// per configured line.
    ///
    /// The anchor snaps forward over gap bars and the range extends to
    /// the last available bar. A changed anchor resets and replays from
    /// scratch; an unchanged one processes only indices beyond the last
    /// processed bar. Returns `None` when fewer than two valid bars lie
    /// at/after the anchor; the caller skips drawing.
    pub fn update<S: BarSeries + ?Sized>(
        &mut self,
        series: &S,
        anchor: BarIndex,
    ) -> Option<Vec<BandLine>> {
        let range = resolve(series, RangeEndpoints::ExtendToLast { from: anchor })?;

        if self.anchor != Some(range.from) {
            debug!(anchor = range.from, "anchor changed, replaying");
            self.accumulator.reset();
            self.history.clear();
            self.anchor = Some(range.from);
        }

        let start = self
            .accumulator
            .last_index()
            .map_or(range.from, |last| last + 1);
        for index in start..=range.to {
            if let Some(bar) = series.bar(index) {
                let point = self.accumulator.update(index, bar);
                self.history.push((index, point));
            }
        }

        Some(self.lines())
    }

    /// Project the stored history into one polyline per band.
    fn lines(&self) -> Vec<BandLine> {
        self.projector
            .bands()
            .iter()
            .map(|band| BandLine {
                band: *band,
                points: self
                    .history
                    .iter()
                    .map(|&(index, point)| (index, BandProjector::value(band, point)))
                    .collect(),
            })
            .collect()
    }
}
