use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{AxisTick, AxisTransform, Band, BandList};
use crate::error::ChartResult;

use super::{Profile, RangeType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisKind {
    Linear,
    /// Breakpoints rendered on uniform ticks through [`AxisTransform`].
    CustomTicks,
}

/// Value-axis bounds handed to the host renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AxisRange {
    /// Preferred bounds the axis may extend past to fit data.
    Soft { min: f64, max: f64 },
    Hard { min: f64, max: f64 },
}

impl AxisRange {
    #[must_use]
    pub fn bounds(self) -> (f64, f64) {
        match self {
            Self::Soft { min, max } | Self::Hard { min, max } => (min, max),
        }
    }
}

/// "Auto zoom" toggle that swaps profile bounds for a range fitted to data.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AutoZoom {
    range: Option<(f64, f64)>,
}

impl AutoZoom {
    #[must_use]
    pub fn is_active(self) -> bool {
        self.range.is_some()
    }

    #[must_use]
    pub fn range(self) -> Option<(f64, f64)> {
        self.range
    }

    /// Activates from the data extremes, or resets when already active.
    ///
    /// Returns whether auto zoom is active afterwards. Non-finite extremes
    /// leave it inactive.
    pub fn toggle(&mut self, data_min: f64, data_max: f64, padding_ratio: f64) -> bool {
        self.range = match self.range {
            Some(_) => None,
            None => fitted_range(data_min, data_max, padding_ratio),
        };
        debug!(active = self.range.is_some(), "auto zoom toggled");
        self.range.is_some()
    }

    pub fn reset(&mut self) {
        self.range = None;
    }
}

fn fitted_range(data_min: f64, data_max: f64, padding_ratio: f64) -> Option<(f64, f64)> {
    if !data_min.is_finite() || !data_max.is_finite() || !padding_ratio.is_finite() {
        return None;
    }
    let max = if data_max == 0.0 { 0.1 } else { data_max };
    let min = if data_min == 0.0 { -0.1 } else { data_min };
    let padding = max.abs() * padding_ratio;
    Some((min - padding, max + padding))
}

/// Resolved value-axis setup for one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisOptions {
    pub kind: AxisKind,
    pub transform: AxisTransform,
    pub range: AxisRange,
    pub bands: Vec<Band>,
}

impl AxisOptions {
    /// Combines the active profile's ticks and bounds with the live bands.
    pub fn resolve(profile: &Profile, bands: &BandList, auto_zoom: AutoZoom) -> ChartResult<Self> {
        let transform = AxisTransform::from_breakpoints(&profile.tick_breakpoints)?;
        let kind = if transform.is_identity() {
            AxisKind::Linear
        } else {
            AxisKind::CustomTicks
        };

        let (min, max) = auto_zoom.range().unwrap_or((profile.y_min, profile.y_max));
        let range = match profile.range_type {
            RangeType::Soft => AxisRange::Soft { min, max },
            RangeType::Hard => AxisRange::Hard { min, max },
        };

        Ok(Self {
            kind,
            transform,
            range,
            bands: bands.to_vec(),
        })
    }

    #[must_use]
    pub fn ticks(&self) -> Vec<AxisTick> {
        self.transform.ticks()
    }
}
