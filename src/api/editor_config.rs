use serde::{Deserialize, Serialize};

use crate::core::{Band, BandLimits};
use crate::error::{ChartError, ChartResult};

/// Band editor bootstrap configuration.
///
/// Serializable so hosts can keep editor defaults next to their own chart
/// setup; every field falls back to its default when missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandEditorConfig {
    #[serde(default)]
    pub limits: BandLimits,
    #[serde(default = "default_new_band_template")]
    pub new_band_template: Band,
    #[serde(default = "default_initial_band_color")]
    pub initial_band_color: String,
    #[serde(default = "default_placeholder_name")]
    pub placeholder_name: String,
    #[serde(default = "default_fallback_profile_name")]
    pub fallback_profile_name: String,
    #[serde(default = "default_empty_label_replacement")]
    pub empty_label_replacement: String,
    #[serde(default = "default_auto_zoom_padding_ratio")]
    pub auto_zoom_padding_ratio: f64,
}

impl Default for BandEditorConfig {
    fn default() -> Self {
        Self {
            limits: BandLimits::default(),
            new_band_template: default_new_band_template(),
            initial_band_color: default_initial_band_color(),
            placeholder_name: default_placeholder_name(),
            fallback_profile_name: default_fallback_profile_name(),
            empty_label_replacement: default_empty_label_replacement(),
            auto_zoom_padding_ratio: default_auto_zoom_padding_ratio(),
        }
    }
}

impl BandEditorConfig {
    #[must_use]
    pub fn with_limits(mut self, limits: BandLimits) -> Self {
        self.limits = limits;
        self
    }

    #[must_use]
    pub fn with_new_band_template(mut self, band: Band) -> Self {
        self.new_band_template = band;
        self
    }

    #[must_use]
    pub fn with_placeholder_name(mut self, name: impl Into<String>) -> Self {
        self.placeholder_name = name.into();
        self
    }

    #[must_use]
    pub fn with_auto_zoom_padding_ratio(mut self, ratio: f64) -> Self {
        self.auto_zoom_padding_ratio = ratio;
        self
    }

    pub fn validate(self) -> ChartResult<Self> {
        self.limits.validate()?;
        if !self.auto_zoom_padding_ratio.is_finite() || self.auto_zoom_padding_ratio < 0.0 {
            return Err(ChartError::InvalidData(
                "auto zoom padding ratio must be finite and >= 0".to_owned(),
            ));
        }
        if !self.new_band_template.to.is_finite() {
            return Err(ChartError::InvalidData(
                "new band template bound must be finite".to_owned(),
            ));
        }
        Ok(self)
    }
}

fn default_new_band_template() -> Band {
    crate::core::band_list::default_new_band()
}

fn default_initial_band_color() -> String {
    "rgb(255,255,255)".to_owned()
}

fn default_placeholder_name() -> String {
    "My Changes".to_owned()
}

fn default_fallback_profile_name() -> String {
    "Default".to_owned()
}

fn default_empty_label_replacement() -> String {
    "New Color".to_owned()
}

fn default_auto_zoom_padding_ratio() -> f64 {
    0.1
}
