//! Deviation band projection.
//!
//! Turns accumulator state into per-line values: multiplier 0 is the
//! center VWAP line, positive and negative multipliers the upper and
//! lower bands. Purely derived from a [`VwapPoint`], no state of its own.

use ordered_float::OrderedFloat;
use overlay_core::{BandSpec, VwapConfig};

use crate::accumulator::VwapPoint;

/// Projects configured deviation bands off accumulator state.
#[derive(Debug, Clone)]
pub struct BandProjector {
    bands: Vec<BandSpec>,
}

impl BandProjector {
    /// Create a projector from a validated config; bands are kept ordered
    /// from the lowest multiplier to the highest.
    pub fn new(config: &VwapConfig) -> Self {
        let mut bands = config.bands.clone();
        bands.sort_by_key(|b| OrderedFloat(b.multiplier));
        Self { bands }
    }

    /// Configured bands, ascending by multiplier.
    pub fn bands(&self) -> &[BandSpec] {
        &self.bands
    }

    /// Value of one band at `point`.
    #[inline]
    pub fn value(band: &BandSpec, point: VwapPoint) -> f64 {
        point.vwap + point.deviation * band.multiplier
    }

    /// Per-band values at `point`, in band order.
    pub fn project(&self, point: VwapPoint) -> impl Iterator<Item = (BandSpec, f64)> + '_ {
        self.bands
            .iter()
            .map(move |band| (*band, Self::value(band, point)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overlay_core::LineStyle;

    #[test]
    fn test_center_line_tracks_vwap() {
        let projector = BandProjector::new(&VwapConfig::default());
        let point = VwapPoint {
            vwap: 101.5,
            deviation: 2.0,
        };

        let values: Vec<(BandSpec, f64)> = projector.project(point).collect();
        assert_eq!(values.len(), 1);
        assert!((values[0].1 - 101.5).abs() < 1e-10);
    }

    #[test]
    fn test_symmetric_bands_offset_by_deviation() {
        let config = VwapConfig::with_symmetric_bands(&[0.75, 1.75], LineStyle::Dash);
        let projector = BandProjector::new(&config);
        let point = VwapPoint {
            vwap: 100.0,
            deviation: 2.0,
        };

        let values: Vec<f64> = projector.project(point).map(|(_, v)| v).collect();
        assert_eq!(values, vec![96.5, 98.5, 100.0, 101.5, 103.5]);
    }

    #[test]
    fn test_zero_deviation_collapses_bands() {
        let config = VwapConfig::with_symmetric_bands(&[2.75], LineStyle::Dot);
        let projector = BandProjector::new(&config);
        let point = VwapPoint {
            vwap: 50.0,
            deviation: 0.0,
        };

        for (_, value) in projector.project(point) {
            assert!((value - 50.0).abs() < 1e-10);
        }
    }
}
