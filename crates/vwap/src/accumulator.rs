//! Incremental anchored VWAP accumulator.
//!
//! Maintains a running volume-weighted mean and variance from an anchor
//! bar forward. Bars are fed in increasing index order; a new bar updates
//! the sums in O(1), so the live edge never triggers a replay. The only
//! way back is [`VwapAccumulator::reset`].

use overlay_core::{Bar, BarIndex};
use serde::{Deserialize, Serialize};

/// VWAP and deviation as of one processed bar.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VwapPoint {
    /// Volume-weighted average price.
    pub vwap: f64,
    /// Standard deviation of typical price around the running VWAP.
    pub deviation: f64,
}

/// Incremental volume-weighted mean/variance accumulator.
///
/// Unanchored until the first bar after a reset; accumulating afterwards.
#[derive(Debug, Clone, Default)]
pub struct VwapAccumulator {
    volume_sum: f64,
    weighted_sum: f64,
    variance_sum: f64,
    sample_count: u32,
    last_index: Option<BarIndex>,
    current: VwapPoint,
}

impl VwapAccumulator {
    /// Create an unanchored accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero all sums and return to the unanchored state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether at least one bar has been processed since the last reset.
    pub fn is_anchored(&self) -> bool {
        self.last_index.is_some()
    }

    /// Index of the last processed bar.
    pub fn last_index(&self) -> Option<BarIndex> {
        self.last_index
    }

    /// Current point, or `None` while unanchored.
    pub fn current(&self) -> Option<VwapPoint> {
        self.last_index.map(|_| self.current)
    }

    /// Cumulative volume since the anchor.
    pub fn volume_sum(&self) -> f64 {
        self.volume_sum
    }

    /// Process the bar at `index` and return the point as of that bar.
    ///
    /// Indices must not decrease; re-submitting the last index (a live-bar
    /// re-render) is an idempotent no-op returning the current point, and
    /// anything older is ignored the same way since rewinding is only
    /// legal through [`reset`](Self::reset).
    pub fn update(&mut self, index: BarIndex, bar: &Bar) -> VwapPoint {
        let typical = bar.typical_price();

        match self.last_index {
            None => {
                // Anchor bar: seeds the mean, contributes no variance.
                self.volume_sum = bar.volume;
                self.weighted_sum = bar.volume * typical;
                self.variance_sum = 0.0;
                self.sample_count = 0;
                self.current = VwapPoint {
                    vwap: typical,
                    deviation: 0.0,
                };
            }
            Some(last) if index <= last => return self.current,
            Some(_) => {
                self.volume_sum += bar.volume;
                self.weighted_sum += bar.volume * typical;

                let vwap = if self.volume_sum > 0.0 {
                    self.weighted_sum / self.volume_sum
                } else {
                    typical
                };
                let diff = typical - vwap;
                self.variance_sum += diff * diff;
                self.sample_count += 1;

                self.current = VwapPoint {
                    vwap,
                    deviation: (self.variance_sum / self.sample_count as f64).max(0.0).sqrt(),
                };
            }
        }

        self.last_index = Some(index);
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    /// Bar whose typical price equals `price`.
    fn flat_bar(price: f64, volume: f64) -> Bar {
        Bar {
            time: Utc.timestamp_opt(0, 0).unwrap(),
            open: price,
            high: price,
            low: price,
            close: price,
            volume,
        }
    }

    #[test]
    fn test_first_bar_special_case() {
        let mut acc = VwapAccumulator::new();
        assert!(!acc.is_anchored());
        assert!(acc.current().is_none());

        let point = acc.update(5, &flat_bar(10.0, 100.0));
        assert!(acc.is_anchored());
        assert!((point.vwap - 10.0).abs() < 1e-10);
        assert_eq!(point.deviation, 0.0);
    }

    #[test]
    fn test_three_bar_scenario() {
        // Typical prices [10, 12, 11], volume 100 each.
        let mut acc = VwapAccumulator::new();

        let p0 = acc.update(0, &flat_bar(10.0, 100.0));
        assert!((p0.vwap - 10.0).abs() < 1e-10);
        assert_eq!(p0.deviation, 0.0);

        // vwap = 2200/200 = 11; diff = 1; deviation = sqrt(1/1) = 1
        let p1 = acc.update(1, &flat_bar(12.0, 100.0));
        assert!((p1.vwap - 11.0).abs() < 1e-10);
        assert!((p1.deviation - 1.0).abs() < 1e-10);

        // vwap = 3300/300 = 11; diff = 0; deviation = sqrt(1/2)
        let p2 = acc.update(2, &flat_bar(11.0, 100.0));
        assert!((p2.vwap - 11.0).abs() < 1e-10);
        assert!((p2.deviation - 0.5_f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn test_incremental_matches_one_shot() {
        let prices = [10.0, 12.5, 11.25, 14.0, 13.5, 12.75];
        let volumes = [100.0, 250.0, 50.0, 300.0, 125.0, 80.0];

        let mut acc = VwapAccumulator::new();
        let mut last = VwapPoint::default();
        for (i, (&p, &v)) in prices.iter().zip(&volumes).enumerate() {
            last = acc.update(i, &flat_bar(p, v));
        }

        let weighted: f64 = prices.iter().zip(&volumes).map(|(p, v)| p * v).sum();
        let total: f64 = volumes.iter().sum();
        approx::assert_relative_eq!(last.vwap, weighted / total, max_relative = 1e-12);
    }

    #[test]
    fn test_equal_index_is_idempotent() {
        let mut acc = VwapAccumulator::new();
        acc.update(0, &flat_bar(10.0, 100.0));
        let once = acc.update(1, &flat_bar(12.0, 100.0));

        // Re-rendering the same live bar must not change the sums.
        let again = acc.update(1, &flat_bar(12.0, 100.0));
        assert_eq!(once, again);
        assert!((acc.volume_sum() - 200.0).abs() < 1e-10);
    }

    #[test]
    fn test_older_index_is_ignored() {
        let mut acc = VwapAccumulator::new();
        acc.update(3, &flat_bar(10.0, 100.0));
        let current = acc.update(4, &flat_bar(12.0, 100.0));

        let stale = acc.update(2, &flat_bar(99.0, 1000.0));
        assert_eq!(stale, current);
        assert_eq!(acc.last_index(), Some(4));
    }

    #[test]
    fn test_reset_returns_to_unanchored() {
        let mut acc = VwapAccumulator::new();
        acc.update(0, &flat_bar(10.0, 100.0));
        acc.update(1, &flat_bar(12.0, 100.0));

        acc.reset();
        assert!(!acc.is_anchored());
        assert!(acc.current().is_none());

        // Replaying from a new anchor starts a fresh special case.
        let point = acc.update(1, &flat_bar(12.0, 100.0));
        assert!((point.vwap - 12.0).abs() < 1e-10);
        assert_eq!(point.deviation, 0.0);
    }

    #[test]
    fn test_deviation_nonnegative_and_nan_free() {
        let mut acc = VwapAccumulator::new();
        for (i, price) in [10.0, 10.0, 10.0, 15.0, 5.0].iter().enumerate() {
            let point = acc.update(i, &flat_bar(*price, 10.0));
            assert!(point.deviation >= 0.0);
            assert!(!point.deviation.is_nan());
            assert!(!point.vwap.is_nan());
        }
    }

    #[test]
    fn test_zero_volume_never_yields_nan() {
        let mut acc = VwapAccumulator::new();
        let p0 = acc.update(0, &flat_bar(10.0, 0.0));
        assert!((p0.vwap - 10.0).abs() < 1e-10);

        let p1 = acc.update(1, &flat_bar(12.0, 0.0));
        assert!(!p1.vwap.is_nan());
        assert!(!p1.deviation.is_nan());
    }
}
