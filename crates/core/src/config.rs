//! Configuration structures for the overlay crates.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Row-sizing policy for the volume profile histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowLayout {
    /// Fixed number of rows; row size is range / count snapped to tick.
    Count(u32),
    /// Fixed number of ticks per row.
    TicksPerRow(u32),
}

impl Default for RowLayout {
    fn default() -> Self {
        RowLayout::Count(24)
    }
}

impl RowLayout {
    fn validate(&self) -> Result<()> {
        let n = match self {
            RowLayout::Count(n) | RowLayout::TicksPerRow(n) => *n,
        };
        if n == 0 {
            return Err(Error::config("row layout size must be at least 1"));
        }
        Ok(())
    }
}

/// Volume profile configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Row-sizing policy.
    pub row_layout: RowLayout,
    /// Percentage of total volume covered by the value area (0, 100].
    pub value_area_percent: f64,
    /// Hard cap on histogram bin count; the row size is recomputed
    /// coarser when the natural count exceeds it.
    pub max_bins: usize,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            row_layout: RowLayout::default(),
            value_area_percent: 70.0,
            max_bins: 2048,
        }
    }
}

impl ProfileConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        self.row_layout.validate()?;
        if !(self.value_area_percent > 0.0 && self.value_area_percent <= 100.0) {
            return Err(Error::config(format!(
                "value_area_percent must be in (0, 100], got {}",
                self.value_area_percent
            )));
        }
        if self.max_bins == 0 {
            return Err(Error::config("max_bins must be at least 1"));
        }
        Ok(())
    }
}

/// Line style carried through to the renderer, opaque to the math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LineStyle {
    #[default]
    Solid,
    Dash,
    Dot,
}

/// A single VWAP line: multiplier 0 is the center line, positive and
/// negative multipliers are upper and lower deviation bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandSpec {
    /// Deviation multiplier.
    pub multiplier: f64,
    /// Rendering style.
    pub style: LineStyle,
}

impl BandSpec {
    /// Create a band with the given multiplier and style.
    pub fn new(multiplier: f64, style: LineStyle) -> Self {
        Self { multiplier, style }
    }

    /// The center VWAP line.
    pub fn center(style: LineStyle) -> Self {
        Self::new(0.0, style)
    }
}

/// Anchored VWAP configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VwapConfig {
    /// Configured lines, center plus any bands.
    pub bands: Vec<BandSpec>,
}

impl Default for VwapConfig {
    fn default() -> Self {
        Self {
            bands: vec![BandSpec::center(LineStyle::Solid)],
        }
    }
}

impl VwapConfig {
    /// Center line plus a symmetric ± band pair per multiplier, ordered
    /// from the lowest band to the highest.
    pub fn with_symmetric_bands(multipliers: &[f64], style: LineStyle) -> Self {
        let mut bands = vec![BandSpec::center(LineStyle::Solid)];
        for &m in multipliers {
            bands.push(BandSpec::new(m, style));
            bands.push(BandSpec::new(-m, style));
        }
        bands.sort_by_key(|b| OrderedFloat(b.multiplier));
        Self { bands }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.bands.is_empty() {
            return Err(Error::config("at least one VWAP line must be configured"));
        }
        for band in &self.bands {
            if !band.multiplier.is_finite() {
                return Err(Error::config(format!(
                    "band multiplier must be finite, got {}",
                    band.multiplier
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_config() {
        let config = ProfileConfig::default();
        assert_eq!(config.row_layout, RowLayout::Count(24));
        assert_eq!(config.value_area_percent, 70.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_profile_config_rejects_bad_percent() {
        let mut config = ProfileConfig::default();
        config.value_area_percent = 0.0;
        assert!(config.validate().is_err());
        config.value_area_percent = 100.5;
        assert!(config.validate().is_err());
        config.value_area_percent = 100.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_profile_config_rejects_zero_layout() {
        let mut config = ProfileConfig::default();
        config.row_layout = RowLayout::Count(0);
        assert!(config.validate().is_err());
        config.row_layout = RowLayout::TicksPerRow(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_symmetric_bands_ordered() {
        let config = VwapConfig::with_symmetric_bands(&[0.75, 1.75, 2.75], LineStyle::Dash);
        assert_eq!(config.bands.len(), 7);
        assert!(config.validate().is_ok());

        let multipliers: Vec<f64> = config.bands.iter().map(|b| b.multiplier).collect();
        assert_eq!(multipliers, vec![-2.75, -1.75, -0.75, 0.0, 0.75, 1.75, 2.75]);
    }

    #[test]
    fn test_vwap_config_rejects_non_finite() {
        let config = VwapConfig {
            bands: vec![BandSpec::new(f64::NAN, LineStyle::Solid)],
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serde_round_trip() {
        let config = ProfileConfig {
            row_layout: RowLayout::TicksPerRow(4),
            value_area_percent: 68.0,
            max_bins: 512,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: ProfileConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
