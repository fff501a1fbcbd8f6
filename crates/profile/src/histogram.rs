//! Price-binned volume histogram.
//!
//! Builds a tick-size-aware histogram over a resolved bar range: each
//! bar's volume is distributed evenly across every bin its high/low span
//! touches. This even distribution is an approximation of volume at price
//! (no tick-by-tick attribution) and its rounding must stay bit-stable,
//! since downstream consumers compare against reference output.

use overlay_core::{BarRange, BarSeries, Instrument, ProfileConfig, RowLayout};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A single price bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBin {
    /// Bin index, ascending in price.
    pub index: usize,
    /// Representative price (bin midpoint).
    pub price: f64,
    /// Volume attributed to buyers.
    pub buy_volume: f64,
    /// Volume attributed to sellers.
    pub sell_volume: f64,
}

impl PriceBin {
    /// Total volume in the bin.
    #[inline]
    pub fn total(&self) -> f64 {
        self.buy_volume + self.sell_volume
    }
}

/// Ordered sequence of price bins spanning `[low, high]` at `row_size`
/// granularity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// Lower price bound, floored to a row boundary.
    pub low: f64,
    /// Upper price bound, ceiled to a row boundary.
    pub high: f64,
    /// Price height of one row.
    pub row_size: f64,
    /// Bins, ascending in price.
    pub bins: Vec<PriceBin>,
}

impl Histogram {
    /// An empty histogram; rendering is skipped for it.
    pub fn empty() -> Self {
        Self {
            low: 0.0,
            high: 0.0,
            row_size: 0.0,
            bins: Vec::new(),
        }
    }

    /// Whether the histogram holds no bins.
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Number of bins.
    pub fn bin_count(&self) -> usize {
        self.bins.len()
    }

    /// Sum of all bin totals.
    pub fn total_volume(&self) -> f64 {
        self.bins.iter().map(PriceBin::total).sum()
    }
}

/// Builds histograms under a row-sizing policy.
#[derive(Debug, Clone)]
pub struct ProfileBuilder {
    config: ProfileConfig,
}

impl ProfileBuilder {
    /// Create a builder; the config is expected to be validated.
    pub fn new(config: ProfileConfig) -> Self {
        Self { config }
    }

    /// The builder's configuration.
    pub fn config(&self) -> &ProfileConfig {
        &self.config
    }

    /// Build a histogram over `range`.
    ///
    /// Returns an empty histogram when the price span degenerates to zero
    /// rows; callers skip rendering in that case.
    pub fn build<S: BarSeries + ?Sized>(
        &self,
        series: &S,
        instrument: &Instrument,
        range: BarRange,
    ) -> Histogram {
        let tick = instrument.tick_size;

        let mut min_low = f64::MAX;
        let mut max_high = f64::MIN;
        for index in range.indices() {
            if let Some(bar) = series.bar(index) {
                min_low = min_low.min(bar.low);
                max_high = max_high.max(bar.high);
            }
        }
        if min_low > max_high {
            return Histogram::empty();
        }
        let span = max_high - min_low;

        let mut row_size = match self.config.row_layout {
            RowLayout::Count(n) => instrument.round_to_tick((span / n as f64).max(tick)),
            RowLayout::TicksPerRow(n) => n as f64 * tick,
        };
        if !(row_size > 0.0) {
            return Histogram::empty();
        }

        let (mut low, mut high, mut count) = Self::bounds(min_low, max_high, row_size);
        if count > self.config.max_bins {
            // Recompute coarser so one render pass stays bounded.
            row_size = span / self.config.max_bins as f64;
            if !(row_size > 0.0) {
                return Histogram::empty();
            }
            debug!(
                natural_bins = count,
                max_bins = self.config.max_bins,
                row_size,
                "bin cap engaged, recomputing row size"
            );
            (low, high, count) = Self::bounds(min_low, max_high, row_size);
            if count > self.config.max_bins {
                // floor/ceil widening can spill a row past the cap; the
                // sliver folds into the last bin through index clamping.
                count = self.config.max_bins;
                high = low + count as f64 * row_size;
            }
        }
        if count == 0 {
            return Histogram::empty();
        }

        let mut bins: Vec<PriceBin> = (0..count)
            .map(|index| PriceBin {
                index,
                price: low + (index as f64 + 0.5) * row_size,
                buy_volume: 0.0,
                sell_volume: 0.0,
            })
            .collect();

        for index in range.indices() {
            let Some(bar) = series.bar(index) else {
                continue;
            };

            let start = Self::clamp_bin((bar.low - low) / row_size, count);
            let end =
                Self::clamp_bin((bar.high - low - tick / 2.0) / row_size, count).max(start);
            let spanned = (end - start + 1) as f64;

            let (buy, sell) = bar.buy_sell_split();
            for bin in &mut bins[start..=end] {
                bin.buy_volume += buy / spanned;
                bin.sell_volume += sell / spanned;
            }
        }

        Histogram {
            low,
            high,
            row_size,
            bins,
        }
    }

    fn bounds(min_low: f64, max_high: f64, row_size: f64) -> (f64, f64, usize) {
        let low = (min_low / row_size).floor() * row_size;
        let high = (max_high / row_size).ceil() * row_size;
        let count = ((high - low) / row_size).round() as usize;
        (low, high, count)
    }

    /// Clamp a fractional bin position into `[0, count - 1]`.
    ///
    /// Floating-point rounding near bar extremes can land just outside the
    /// histogram; the target bin is clamped rather than rejected.
    #[inline]
    fn clamp_bin(position: f64, count: usize) -> usize {
        (position.floor().max(0.0) as usize).min(count - 1)
    }
}
