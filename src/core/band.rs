use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Outer bound of the value axis; the band list is anchored at `±MAX_RANGE`.
pub const MAX_RANGE: f64 = 9_999_999.0;

/// Upper bound on the number of bands a list may hold.
pub const MAX_BANDS: usize = 5;

/// Coloured, labelled value interval (a chart "zone").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub from: f64,
    pub to: f64,
    pub color: String,
    #[serde(default)]
    pub text: String,
}

impl Band {
    #[must_use]
    pub fn new(from: f64, to: f64, color: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            from,
            to,
            color: color.into(),
            text: text.into(),
        }
    }

    /// Half-open containment test `[from, to)`.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.from && value < self.to
    }
}

/// Structural limits a band list is validated against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandLimits {
    #[serde(default = "default_max_range")]
    pub max_range: f64,
    #[serde(default = "default_max_bands")]
    pub max_bands: usize,
}

impl Default for BandLimits {
    fn default() -> Self {
        Self {
            max_range: default_max_range(),
            max_bands: default_max_bands(),
        }
    }
}

impl BandLimits {
    pub fn validate(self) -> ChartResult<Self> {
        if !self.max_range.is_finite() || self.max_range <= 0.0 {
            return Err(ChartError::InvalidData(
                "band max range must be finite and > 0".to_owned(),
            ));
        }
        if self.max_bands == 0 {
            return Err(ChartError::InvalidData(
                "band limit must allow at least one band".to_owned(),
            ));
        }
        Ok(self)
    }
}

fn default_max_range() -> f64 {
    MAX_RANGE
}

fn default_max_bands() -> usize {
    MAX_BANDS
}
