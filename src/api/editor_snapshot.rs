use serde::{Deserialize, Serialize};

use crate::core::Band;
use crate::error::{ChartError, ChartResult};

use super::{AutoZoom, ProfileManager, ProfileOption, Selection};

/// Serializable editor state used by regression tests and debugging tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorSnapshot {
    pub sensor_type: String,
    pub selection: Selection,
    pub committed_selection: Selection,
    pub working_bands: Vec<Band>,
    pub snapshot_for_unsaved: Vec<Band>,
    pub snapshot_for_cancel: Vec<Band>,
    pub profile_options: Vec<ProfileOption>,
    pub save_pending: bool,
    pub auto_zoom: AutoZoom,
}

impl ProfileManager {
    #[must_use]
    pub fn snapshot(&self) -> EditorSnapshot {
        EditorSnapshot {
            sensor_type: self.sensor_type().to_owned(),
            selection: self.selection(),
            committed_selection: self.committed_selection(),
            working_bands: self.bands().to_vec(),
            snapshot_for_unsaved: self.snapshot_for_unsaved().to_vec(),
            snapshot_for_cancel: self.snapshot_for_cancel().to_vec(),
            profile_options: self.profile_options(),
            save_pending: self.is_save_pending(),
            auto_zoom: self.auto_zoom(),
        }
    }

    /// Serializes the snapshot as pretty JSON for fixture-based checks.
    pub fn snapshot_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(&self.snapshot())
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize snapshot: {e}")))
    }
}
