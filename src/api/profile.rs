use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{Band, BandLimits};

/// Identifier of a saved profile; `0` is reserved for unsaved local edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(pub u64);

impl ProfileId {
    pub const UNSAVED: Self = Self(0);

    #[must_use]
    pub fn is_unsaved(self) -> bool {
        self == Self::UNSAVED
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a profile's `y_min`/`y_max` bound the value axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeType {
    /// The axis may grow past the bounds to fit data.
    #[default]
    Soft,
    Hard,
}

/// Named, persisted set of bands and tick breakpoints for one sensor type.
///
/// Owned by the catalog and treated as immutable; the editor only ever works
/// on copies of `bands`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: ProfileId,
    pub name: String,
    #[serde(default)]
    pub tick_breakpoints: Vec<f64>,
    pub bands: Vec<Band>,
    #[serde(default)]
    pub range_type: RangeType,
    pub y_min: f64,
    pub y_max: f64,
}

impl Profile {
    /// Constant profile used when the catalog offers nothing usable.
    #[must_use]
    pub fn builtin_default(limits: BandLimits, fallback_name: &str, color: &str) -> Self {
        Self {
            id: ProfileId::UNSAVED,
            name: fallback_name.to_owned(),
            tick_breakpoints: Vec::new(),
            bands: vec![Band::new(
                -limits.max_range,
                limits.max_range,
                color,
                "Range",
            )],
            range_type: RangeType::Soft,
            y_min: 0.0,
            y_max: 100.0,
        }
    }
}

/// Entry of the profile picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileOption {
    pub id: ProfileId,
    pub name: String,
}

/// Project-level ad-hoc bands and the profile that was active when they
/// were saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectOverride {
    pub bands: Vec<Band>,
    pub default_setting_id: ProfileId,
}

/// Persistence request emitted by a save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    pub sensor_type: String,
    pub bands: Vec<Band>,
    pub default_setting_id: ProfileId,
}
