//! Core data types shared by the overlay crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Index into a bar series.
pub type BarIndex = usize;

/// A single price/volume bar.
///
/// Gap bars are *absent* entries in the series, never zero-volume bars;
/// see [`BarSeries`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Bar open time (UTC).
    pub time: DateTime<Utc>,
    /// Open price.
    pub open: f64,
    /// High price.
    pub high: f64,
    /// Low price.
    pub low: f64,
    /// Close price.
    pub close: f64,
    /// Total traded volume.
    pub volume: f64,
}

impl Bar {
    /// Typical price: (high + low + close) / 3.
    #[inline]
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// Split the bar's volume into (buy, sell) by close/open comparison.
    ///
    /// Close above open attributes everything to buyers, close below open
    /// to sellers, and an unchanged close splits 50/50.
    #[inline]
    pub fn buy_sell_split(&self) -> (f64, f64) {
        if self.close > self.open {
            (self.volume, 0.0)
        } else if self.close < self.open {
            (0.0, self.volume)
        } else {
            (self.volume / 2.0, self.volume / 2.0)
        }
    }
}

/// Read-only, random-access bar sequence supplied by the host chart.
///
/// An index inside `0..len()` may still hold no bar: those are gap bars
/// and are skipped by every consumer, never treated as zero volume.
pub trait BarSeries {
    /// Number of slots in the series, gaps included.
    fn len(&self) -> usize;

    /// Bar at `index`, or `None` for a gap or out-of-range index.
    fn bar(&self, index: BarIndex) -> Option<&Bar>;

    /// Whether the series has no slots at all.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index of the last slot, gap or not.
    fn last_index(&self) -> Option<BarIndex> {
        self.len().checked_sub(1)
    }
}

impl BarSeries for [Option<Bar>] {
    fn len(&self) -> usize {
        <[Option<Bar>]>::len(self)
    }

    fn bar(&self, index: BarIndex) -> Option<&Bar> {
        self.get(index).and_then(|slot| slot.as_ref())
    }
}

impl BarSeries for Vec<Option<Bar>> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn bar(&self, index: BarIndex) -> Option<&Bar> {
        self.as_slice().bar(index)
    }
}

impl<S: BarSeries + ?Sized> BarSeries for &S {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn bar(&self, index: BarIndex) -> Option<&Bar> {
        (**self).bar(index)
    }
}

/// Instrument metadata consumed by the binning logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    /// Trading symbol (e.g., "ESU6").
    pub symbol: String,
    /// Minimum valid price increment.
    pub tick_size: f64,
}

impl Instrument {
    /// Create an instrument, validating the tick size.
    pub fn new(symbol: impl Into<String>, tick_size: f64) -> Result<Self> {
        if !(tick_size > 0.0) || !tick_size.is_finite() {
            return Err(Error::instrument(format!(
                "tick_size must be positive and finite, got {tick_size}"
            )));
        }
        Ok(Self {
            symbol: symbol.into(),
            tick_size,
        })
    }

    /// Snap a price to the nearest tick multiple.
    #[inline]
    pub fn round_to_tick(&self, price: f64) -> f64 {
        (price / self.tick_size).round() * self.tick_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_bar(open: f64, high: f64, low: f64, close: f64, volume: f64) -> Bar {
        Bar {
            time: Utc.timestamp_opt(0, 0).unwrap(),
            open,
            high,
            low,
            close,
            volume,
        }
    }

    #[test]
    fn test_typical_price() {
        let bar = make_bar(10.0, 15.0, 12.0, 14.0, 100.0);
        let expected = (15.0 + 12.0 + 14.0) / 3.0;
        assert!((bar.typical_price() - expected).abs() < 1e-10);
    }

    #[test]
    fn test_buy_sell_split() {
        let up = make_bar(10.0, 11.0, 9.0, 10.5, 100.0);
        assert_eq!(up.buy_sell_split(), (100.0, 0.0));

        let down = make_bar(10.0, 11.0, 9.0, 9.5, 100.0);
        assert_eq!(down.buy_sell_split(), (0.0, 100.0));

        let flat = make_bar(10.0, 11.0, 9.0, 10.0, 100.0);
        assert_eq!(flat.buy_sell_split(), (50.0, 50.0));
    }

    #[test]
    fn test_series_skips_gaps() {
        let series = vec![
            Some(make_bar(10.0, 11.0, 9.0, 10.5, 1.0)),
            None,
            Some(make_bar(10.5, 12.0, 10.0, 11.0, 2.0)),
        ];

        assert_eq!(BarSeries::len(&series), 3);
        assert!(series.bar(0).is_some());
        assert!(series.bar(1).is_none());
        assert!(series.bar(2).is_some());
        assert!(series.bar(3).is_none());
        assert_eq!(series.last_index(), Some(2));
    }

    #[test]
    fn test_round_to_tick() {
        let instrument = Instrument::new("ESU6", 0.25).unwrap();
        assert!((instrument.round_to_tick(100.13) - 100.25).abs() < 1e-10);
        assert!((instrument.round_to_tick(100.12) - 100.0).abs() < 1e-10);
        assert!((instrument.round_to_tick(100.25) - 100.25).abs() < 1e-10);
    }

    #[test]
    fn test_invalid_tick_size() {
        assert!(Instrument::new("X", 0.0).is_err());
        assert!(Instrument::new("X", -0.5).is_err());
        assert!(Instrument::new("X", f64::NAN).is_err());
    }
}
