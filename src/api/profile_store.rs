use indexmap::IndexMap;
use tracing::debug;

use crate::error::{ChartError, ChartResult};

use super::{Profile, ProjectOverride, SaveRequest};

/// Persistence boundary the editor talks to.
///
/// Implementations own transport and storage; the editor only shapes the
/// requests and applies the results.
pub trait ProfileStore {
    /// Saved profiles for a sensor type, in display order.
    fn load_profiles(&mut self, sensor_type: &str) -> ChartResult<Vec<Profile>>;

    fn load_project_override(&mut self, sensor_type: &str)
    -> ChartResult<Option<ProjectOverride>>;

    fn save_override(&mut self, request: &SaveRequest) -> ChartResult<()>;
}

/// Store kept entirely in memory, keyed by sensor type.
///
/// Used by headless hosts and tests. A one-shot failure can be armed to
/// exercise the save error path.
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: IndexMap<String, Vec<Profile>>,
    overrides: IndexMap<String, ProjectOverride>,
    pending_failure: Option<String>,
    save_count: usize,
}

impl InMemoryProfileStore {
    #[must_use]
    pub fn with_profiles(mut self, sensor_type: impl Into<String>, profiles: Vec<Profile>) -> Self {
        self.profiles.insert(sensor_type.into(), profiles);
        self
    }

    #[must_use]
    pub fn with_override(
        mut self,
        sensor_type: impl Into<String>,
        project_override: ProjectOverride,
    ) -> Self {
        self.overrides.insert(sensor_type.into(), project_override);
        self
    }

    /// Makes the next `save_override` call fail with `message`.
    pub fn fail_next_save(&mut self, message: impl Into<String>) {
        self.pending_failure = Some(message.into());
    }

    #[must_use]
    pub fn override_for(&self, sensor_type: &str) -> Option<&ProjectOverride> {
        self.overrides.get(sensor_type)
    }

    #[must_use]
    pub fn save_count(&self) -> usize {
        self.save_count
    }
}

impl ProfileStore for InMemoryProfileStore {
    fn load_profiles(&mut self, sensor_type: &str) -> ChartResult<Vec<Profile>> {
        Ok(self.profiles.get(sensor_type).cloned().unwrap_or_default())
    }

    fn load_project_override(
        &mut self,
        sensor_type: &str,
    ) -> ChartResult<Option<ProjectOverride>> {
        Ok(self.overrides.get(sensor_type).cloned())
    }

    fn save_override(&mut self, request: &SaveRequest) -> ChartResult<()> {
        if let Some(message) = self.pending_failure.take() {
            return Err(ChartError::Persistence(message));
        }

        debug!(
            sensor_type = %request.sensor_type,
            bands = request.bands.len(),
            default_setting_id = %request.default_setting_id,
            "store project override"
        );
        self.overrides.insert(
            request.sensor_type.clone(),
            ProjectOverride {
                bands: request.bands.clone(),
                default_setting_id: request.default_setting_id,
            },
        );
        self.save_count += 1;
        Ok(())
    }
}
