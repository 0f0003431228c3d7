use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Uniform tick location paired with the breakpoint value it labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisTick {
    pub position: f64,
    pub value: f64,
}

/// Piecewise-linear scale that renders non-uniform breakpoints as evenly
/// spaced ticks.
///
/// For breakpoints `T = [t0, .., tn]` every breakpoint index `i` is placed at
/// `i * T[n] / n` in tick space, and values between two breakpoints are
/// interpolated linearly inside their segment.
///
/// Out-of-domain input never fails:
/// - values below `t0` clamp to position `0`, values above `tn` clamp to
///   `n * tick_interval`;
/// - positions below `0` map to `t0`, positions above the last tick map to `tn`;
/// - `NaN` passes through unchanged.
///
/// Serialized as the bare breakpoint list; deserializing runs the same
/// checks as [`CustomTickScale::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct CustomTickScale {
    breakpoints: Vec<f64>,
    tick_interval: f64,
}

impl CustomTickScale {
    /// Builds a scale from ordered breakpoints.
    ///
    /// Breakpoints must be finite, strictly increasing, at least two long and
    /// end on a positive value (the last breakpoint sets the tick spacing).
    pub fn new(breakpoints: &[f64]) -> ChartResult<Self> {
        if breakpoints.len() < 2 {
            return Err(ChartError::InvalidData(
                "custom ticks need at least two breakpoints".to_owned(),
            ));
        }
        if breakpoints.iter().any(|value| !value.is_finite()) {
            return Err(ChartError::InvalidData(
                "tick breakpoints must be finite".to_owned(),
            ));
        }
        if breakpoints.windows(2).any(|pair| pair[1] <= pair[0]) {
            return Err(ChartError::InvalidData(
                "tick breakpoints must be strictly increasing".to_owned(),
            ));
        }

        let last = breakpoints[breakpoints.len() - 1];
        if last <= 0.0 {
            return Err(ChartError::InvalidData(
                "last tick breakpoint must be > 0".to_owned(),
            ));
        }

        let segments = breakpoints.len() - 1;
        Ok(Self {
            breakpoints: breakpoints.to_vec(),
            tick_interval: last / segments as f64,
        })
    }

    #[must_use]
    pub fn breakpoints(&self) -> &[f64] {
        &self.breakpoints
    }

    /// Constant tick-space distance between two neighbouring breakpoints.
    #[must_use]
    pub fn tick_interval(&self) -> f64 {
        self.tick_interval
    }

    #[must_use]
    fn segment_count(&self) -> usize {
        self.breakpoints.len() - 1
    }

    #[must_use]
    fn max_position(&self) -> f64 {
        self.segment_count() as f64 * self.tick_interval
    }

    /// Tick locations `[0, d, 2d, .., n*d]`, one per breakpoint.
    #[must_use]
    pub fn tick_positions(&self) -> Vec<f64> {
        (0..self.breakpoints.len())
            .map(|index| index as f64 * self.tick_interval)
            .collect()
    }

    #[must_use]
    pub fn ticks(&self) -> Vec<AxisTick> {
        self.breakpoints
            .iter()
            .enumerate()
            .map(|(index, value)| AxisTick {
                position: index as f64 * self.tick_interval,
                value: *value,
            })
            .collect()
    }

    /// Maps a raw value into tick space.
    #[must_use]
    pub fn to_tick_space(&self, value: f64) -> f64 {
        if value.is_nan() {
            return value;
        }
        if value < self.breakpoints[0] {
            return 0.0;
        }

        for (index, pair) in self.breakpoints.windows(2).enumerate() {
            let (low, high) = (pair[0], pair[1]);
            if value <= high {
                return rescale(
                    value,
                    low,
                    high,
                    index as f64 * self.tick_interval,
                    (index + 1) as f64 * self.tick_interval,
                );
            }
        }

        self.max_position()
    }

    /// Maps a tick-space position back to a raw value.
    #[must_use]
    pub fn to_value_space(&self, position: f64) -> f64 {
        if position.is_nan() {
            return position;
        }
        if position < 0.0 {
            return self.breakpoints[0];
        }

        for (index, pair) in self.breakpoints.windows(2).enumerate() {
            let segment_start = index as f64 * self.tick_interval;
            let segment_end = (index + 1) as f64 * self.tick_interval;
            if position <= segment_end {
                return rescale(position, segment_start, segment_end, pair[0], pair[1]);
            }
        }

        self.breakpoints[self.segment_count()]
    }
}

impl TryFrom<Vec<f64>> for CustomTickScale {
    type Error = ChartError;

    fn try_from(breakpoints: Vec<f64>) -> ChartResult<Self> {
        Self::new(&breakpoints)
    }
}

impl From<CustomTickScale> for Vec<f64> {
    fn from(scale: CustomTickScale) -> Self {
        scale.breakpoints
    }
}

fn rescale(value: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    (value - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// Value-axis transform used by a chart.
///
/// `Identity` is the "no custom ticks" path: values pass through untouched and
/// the host falls back to its conventional linear axis.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum AxisTransform {
    #[default]
    Identity,
    Custom(CustomTickScale),
}

impl AxisTransform {
    /// Empty breakpoints yield `Identity`; anything else must form a valid
    /// [`CustomTickScale`].
    pub fn from_breakpoints(breakpoints: &[f64]) -> ChartResult<Self> {
        if breakpoints.is_empty() {
            return Ok(Self::Identity);
        }
        CustomTickScale::new(breakpoints).map(Self::Custom)
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        matches!(self, Self::Identity)
    }

    #[must_use]
    pub fn to_tick_space(&self, value: f64) -> f64 {
        match self {
            Self::Identity => value,
            Self::Custom(scale) => scale.to_tick_space(value),
        }
    }

    #[must_use]
    pub fn to_value_space(&self, position: f64) -> f64 {
        match self {
            Self::Identity => position,
            Self::Custom(scale) => scale.to_value_space(position),
        }
    }

    /// Explicit tick positions, or empty when the host axis picks its own.
    #[must_use]
    pub fn tick_positions(&self) -> Vec<f64> {
        match self {
            Self::Identity => Vec::new(),
            Self::Custom(scale) => scale.tick_positions(),
        }
    }

    #[must_use]
    pub fn ticks(&self) -> Vec<AxisTick> {
        match self {
            Self::Identity => Vec::new(),
            Self::Custom(scale) => scale.ticks(),
        }
    }
}
