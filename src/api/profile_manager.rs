use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{AxisTransform, Band, BandEdit, BandList, EditOutcome};
use crate::error::{ChartError, ChartResult};

use super::{
    AutoZoom, AxisOptions, BandEditorConfig, Profile, ProfileId, ProfileOption, ProfileStore,
    ProjectOverride, SaveRequest,
};

/// Which band set the working copy is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    Bound(ProfileId),
    /// Local edits not bound to a saved profile (id `0`).
    Unsaved,
}

impl Selection {
    #[must_use]
    pub fn from_id(id: ProfileId) -> Self {
        if id.is_unsaved() {
            Self::Unsaved
        } else {
            Self::Bound(id)
        }
    }

    #[must_use]
    pub fn profile_id(self) -> ProfileId {
        match self {
            Self::Bound(id) => id,
            Self::Unsaved => ProfileId::UNSAVED,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    Applied,
    /// Queued until the in-flight save completes.
    Deferred,
}

#[derive(Debug, Clone)]
struct DeferredReload {
    profiles: Vec<Profile>,
    project_override: Option<ProjectOverride>,
}

/// Per-chart band editor: profile selection, the live band list and the
/// snapshots backing "My Changes" and Cancel.
///
/// One instance lives for one mounted chart of one sensor type; drop it and
/// mount a new one when the sensor type changes. Every transition copies band
/// data, so the working set, both snapshots and the profile catalog never
/// share storage.
#[derive(Debug, Clone)]
pub struct ProfileManager {
    sensor_type: String,
    config: BandEditorConfig,
    catalog: IndexMap<ProfileId, Profile>,
    builtin: Profile,
    selection: Selection,
    committed_selection: Selection,
    base_profile: Option<ProfileId>,
    working: BandList,
    snapshot_for_unsaved: BandList,
    snapshot_for_cancel: BandList,
    pending_save: Option<SaveRequest>,
    deferred_reload: Option<DeferredReload>,
    auto_zoom: AutoZoom,
}

impl ProfileManager {
    /// Mounts the editor from already-fetched catalog data.
    ///
    /// The initial profile is the override's `default_setting_id`, else the
    /// first catalog profile. An id missing from the catalog falls back to the
    /// profile named `fallback_profile_name`, then the first profile, then the
    /// built-in default bands.
    pub fn mount(
        sensor_type: impl Into<String>,
        config: BandEditorConfig,
        profiles: Vec<Profile>,
        project_override: Option<ProjectOverride>,
    ) -> ChartResult<Self> {
        let config = config.validate()?;
        let builtin = Profile::builtin_default(
            config.limits,
            &config.fallback_profile_name,
            &config.initial_band_color,
        );
        let working = builtin_bands(&config);

        let mut manager = Self {
            sensor_type: sensor_type.into(),
            config,
            catalog: IndexMap::new(),
            builtin,
            selection: Selection::Unsaved,
            committed_selection: Selection::Unsaved,
            base_profile: None,
            snapshot_for_unsaved: working.clone(),
            snapshot_for_cancel: working.clone(),
            working,
            pending_save: None,
            deferred_reload: None,
            auto_zoom: AutoZoom::default(),
        };
        manager.resolve_initial(profiles, project_override);
        Ok(manager)
    }

    /// Fetches catalog and override from `store`, then mounts.
    pub fn load<S: ProfileStore + ?Sized>(
        store: &mut S,
        sensor_type: impl Into<String>,
        config: BandEditorConfig,
    ) -> ChartResult<Self> {
        let sensor_type = sensor_type.into();
        let profiles = store.load_profiles(&sensor_type)?;
        let project_override = store.load_project_override(&sensor_type)?;
        Self::mount(sensor_type, config, profiles, project_override)
    }

    fn resolve_initial(
        &mut self,
        profiles: Vec<Profile>,
        project_override: Option<ProjectOverride>,
    ) {
        self.catalog = build_catalog(profiles);

        let requested = project_override
            .as_ref()
            .map(|project_override| project_override.default_setting_id)
            .unwrap_or_else(|| {
                self.catalog
                    .keys()
                    .next()
                    .copied()
                    .unwrap_or(ProfileId::UNSAVED)
            });

        let working;
        let selection = if requested.is_unsaved() {
            working = match &project_override {
                Some(project_override) => {
                    stored_or_builtin(&project_override.bands, &self.config, "project override")
                }
                None => BandList::single(
                    self.config.limits,
                    self.config.initial_band_color.clone(),
                    "",
                ),
            };
            self.base_profile = None;
            Selection::Unsaved
        } else {
            let resolved = self.fallback_profile(requested).map(|profile| {
                (
                    profile.id,
                    stored_or_builtin(&profile.bands, &self.config, &profile.name),
                )
            });
            match resolved {
                Some((id, bands)) => {
                    working = bands;
                    self.base_profile = Some(id);
                    Selection::Bound(id)
                }
                None => {
                    warn!(
                        sensor_type = %self.sensor_type,
                        requested = %requested,
                        "no catalog profile available, using built-in bands"
                    );
                    working = builtin_bands(&self.config);
                    self.base_profile = None;
                    Selection::Unsaved
                }
            }
        };

        debug!(
            sensor_type = %self.sensor_type,
            requested = %requested,
            selection = ?selection,
            catalog_len = self.catalog.len(),
            "resolved initial profile"
        );
        self.selection = selection;
        self.committed_selection = selection;
        self.snapshot_for_unsaved = working.clone();
        self.snapshot_for_cancel = working.clone();
        self.working = working;
    }

    fn fallback_profile(&self, requested: ProfileId) -> Option<&Profile> {
        if let Some(profile) = self.catalog.get(&requested) {
            return Some(profile);
        }
        debug!(requested = %requested, "requested profile missing, trying fallbacks");
        self.catalog
            .values()
            .find(|profile| profile.name == self.config.fallback_profile_name)
            .or_else(|| self.catalog.values().next())
    }

    /// Switches to a saved profile, or back to "My Changes" with id `0`.
    ///
    /// Leaving the unsaved state stores the working bands first so they can
    /// be restored later. Selecting `0` while already unsaved keeps the
    /// current edits.
    pub fn select(&mut self, id: ProfileId) -> ChartResult<()> {
        if id.is_unsaved() {
            if self.selection != Selection::Unsaved {
                self.working = self.snapshot_for_unsaved.clone();
                self.selection = Selection::Unsaved;
            }
            debug!(sensor_type = %self.sensor_type, "selected unsaved changes");
            return Ok(());
        }

        let profile = self
            .catalog
            .get(&id)
            .ok_or(ChartError::UnknownProfile { id })?;
        let bands = stored_or_builtin(&profile.bands, &self.config, &profile.name);

        if self.selection == Selection::Unsaved {
            self.snapshot_for_unsaved = self.working.clone();
        }
        self.working = bands;
        self.selection = Selection::Bound(id);
        self.base_profile = Some(id);
        debug!(sensor_type = %self.sensor_type, profile = %id, "selected profile");
        Ok(())
    }

    /// Applies one band edit; any applied edit detaches from the profile.
    pub fn apply_edit(&mut self, edit: BandEdit) -> EditOutcome {
        let outcome = self.working.apply(edit);
        if outcome.is_applied() && self.selection != Selection::Unsaved {
            debug!(
                sensor_type = %self.sensor_type,
                from = ?self.selection,
                "band edit switched editor to unsaved"
            );
            self.selection = Selection::Unsaved;
        }
        outcome
    }

    pub fn set_boundary(&mut self, index: usize, to: f64) -> EditOutcome {
        self.apply_edit(BandEdit::SetBoundary { index, to })
    }

    pub fn set_color(&mut self, index: usize, color: impl Into<String>) -> EditOutcome {
        self.apply_edit(BandEdit::SetColor {
            index,
            color: color.into(),
        })
    }

    pub fn set_label(&mut self, index: usize, text: impl Into<String>) -> EditOutcome {
        self.apply_edit(BandEdit::SetLabel {
            index,
            text: text.into(),
        })
    }

    /// Prepends a band built from the configured template.
    pub fn add_band(&mut self) -> EditOutcome {
        let band = self.config.new_band_template.clone();
        self.apply_edit(BandEdit::AddBand { band })
    }

    pub fn remove_band(&mut self) -> EditOutcome {
        self.apply_edit(BandEdit::RemoveBand)
    }

    /// Shapes the persistence request and marks a save as in flight.
    ///
    /// Empty labels are sent as `empty_label_replacement`.
    pub fn begin_save(&mut self) -> ChartResult<SaveRequest> {
        if self.pending_save.is_some() {
            return Err(ChartError::SaveInFlight);
        }

        let mut bands = self.working.clone();
        bands.fill_empty_labels(&self.config.empty_label_replacement);
        let request = SaveRequest {
            sensor_type: self.sensor_type.clone(),
            bands: bands.to_vec(),
            default_setting_id: self.selection.profile_id(),
        };
        debug!(
            sensor_type = %self.sensor_type,
            bands = request.bands.len(),
            default_setting_id = %request.default_setting_id,
            "save started"
        );
        self.pending_save = Some(request.clone());
        Ok(request)
    }

    /// Applies the outcome of the in-flight save.
    ///
    /// On success the saved bands become the Cancel reference point. On
    /// failure the editor state is left untouched and the error is returned.
    /// A reload queued during the save runs afterwards either way.
    pub fn finish_save(&mut self, result: ChartResult<()>) -> ChartResult<()> {
        let request = self.pending_save.take().ok_or(ChartError::NoPendingSave)?;
        let deferred = self.deferred_reload.take();

        match result {
            Ok(()) => {
                let saved = stored_or_builtin(&request.bands, &self.config, "saved bands");
                self.working
                    .fill_empty_labels(&self.config.empty_label_replacement);
                self.committed_selection = Selection::from_id(request.default_setting_id);
                if self.committed_selection == Selection::Unsaved {
                    self.snapshot_for_unsaved = saved.clone();
                }
                self.snapshot_for_cancel = saved;
                debug!(sensor_type = %self.sensor_type, "save finished");

                if let Some(reload) = deferred {
                    // The store now holds what was just saved.
                    self.resolve_initial(
                        reload.profiles,
                        Some(ProjectOverride {
                            bands: request.bands,
                            default_setting_id: request.default_setting_id,
                        }),
                    );
                }
                Ok(())
            }
            Err(err) => {
                warn!(sensor_type = %self.sensor_type, error = %err, "save failed");
                if let Some(reload) = deferred {
                    self.replace_catalog(reload.profiles);
                }
                Err(err)
            }
        }
    }

    /// Saves through `store` in one step.
    pub fn save<S: ProfileStore + ?Sized>(&mut self, store: &mut S) -> ChartResult<()> {
        let request = self.begin_save()?;
        let result = store.save_override(&request);
        self.finish_save(result)
    }

    /// Discards every edit since the last load or successful save.
    pub fn cancel(&mut self) {
        self.working = self.snapshot_for_cancel.clone();
        self.selection = self.committed_selection;
        if let Selection::Bound(id) = self.selection {
            self.base_profile = Some(id);
        }
        debug!(sensor_type = %self.sensor_type, selection = ?self.selection, "edits cancelled");
    }

    /// Re-runs mount resolution with fresh catalog data, or queues it while a
    /// save is in flight.
    pub fn reload(
        &mut self,
        profiles: Vec<Profile>,
        project_override: Option<ProjectOverride>,
    ) -> ReloadOutcome {
        if self.pending_save.is_some() {
            debug!(sensor_type = %self.sensor_type, "reload deferred behind pending save");
            self.deferred_reload = Some(DeferredReload {
                profiles,
                project_override,
            });
            return ReloadOutcome::Deferred;
        }
        self.resolve_initial(profiles, project_override);
        ReloadOutcome::Applied
    }

    pub fn reload_from<S: ProfileStore + ?Sized>(
        &mut self,
        store: &mut S,
    ) -> ChartResult<ReloadOutcome> {
        let profiles = store.load_profiles(&self.sensor_type)?;
        let project_override = store.load_project_override(&self.sensor_type)?;
        Ok(self.reload(profiles, project_override))
    }

    fn replace_catalog(&mut self, profiles: Vec<Profile>) {
        self.catalog = build_catalog(profiles);
        if let Selection::Bound(id) = self.selection {
            if !self.catalog.contains_key(&id) {
                warn!(profile = %id, "bound profile vanished from catalog");
                self.selection = Selection::Unsaved;
            }
        }
        if let Selection::Bound(id) = self.committed_selection {
            if !self.catalog.contains_key(&id) {
                self.committed_selection = Selection::Unsaved;
            }
        }
        if self
            .base_profile
            .is_some_and(|id| !self.catalog.contains_key(&id))
        {
            self.base_profile = None;
        }
    }

    /// Profile driving the axis: the bound profile, else the profile the
    /// unsaved edits started from, else the first catalog entry, else the
    /// built-in default.
    #[must_use]
    pub fn active_profile(&self) -> &Profile {
        let id = match self.selection {
            Selection::Bound(id) => Some(id),
            Selection::Unsaved => self.base_profile,
        };
        id.and_then(|id| self.catalog.get(&id))
            .or_else(|| self.catalog.values().next())
            .unwrap_or(&self.builtin)
    }

    pub fn axis_transform(&self) -> ChartResult<AxisTransform> {
        AxisTransform::from_breakpoints(&self.active_profile().tick_breakpoints)
    }

    pub fn axis_options(&self) -> ChartResult<AxisOptions> {
        AxisOptions::resolve(self.active_profile(), &self.working, self.auto_zoom)
    }

    /// Toggles auto zoom from the chart's current data extremes.
    pub fn toggle_auto_zoom(&mut self, data_min: f64, data_max: f64) -> bool {
        let padding_ratio = self.config.auto_zoom_padding_ratio;
        self.auto_zoom.toggle(data_min, data_max, padding_ratio)
    }

    /// Picker entries: the "My Changes" placeholder, then the catalog.
    #[must_use]
    pub fn profile_options(&self) -> Vec<ProfileOption> {
        std::iter::once(ProfileOption {
            id: ProfileId::UNSAVED,
            name: self.config.placeholder_name.clone(),
        })
        .chain(self.catalog.values().map(|profile| ProfileOption {
            id: profile.id,
            name: profile.name.clone(),
        }))
        .collect()
    }

    #[must_use]
    pub fn sensor_type(&self) -> &str {
        &self.sensor_type
    }

    #[must_use]
    pub fn config(&self) -> &BandEditorConfig {
        &self.config
    }

    #[must_use]
    pub fn selection(&self) -> Selection {
        self.selection
    }

    #[must_use]
    pub fn current_profile_id(&self) -> ProfileId {
        self.selection.profile_id()
    }

    /// Selection recorded at the last load or successful save.
    #[must_use]
    pub fn committed_selection(&self) -> Selection {
        self.committed_selection
    }

    #[must_use]
    pub fn bands(&self) -> &BandList {
        &self.working
    }

    #[must_use]
    pub fn band_slice(&self) -> &[Band] {
        self.working.bands()
    }

    #[must_use]
    pub fn snapshot_for_unsaved(&self) -> &BandList {
        &self.snapshot_for_unsaved
    }

    #[must_use]
    pub fn snapshot_for_cancel(&self) -> &BandList {
        &self.snapshot_for_cancel
    }

    #[must_use]
    pub fn profile(&self, id: ProfileId) -> Option<&Profile> {
        self.catalog.get(&id)
    }

    #[must_use]
    pub fn profiles(&self) -> impl Iterator<Item = &Profile> {
        self.catalog.values()
    }

    #[must_use]
    pub fn can_add_band(&self) -> bool {
        self.working.can_add()
    }

    #[must_use]
    pub fn can_remove_band(&self) -> bool {
        self.working.can_remove()
    }

    #[must_use]
    pub fn is_save_pending(&self) -> bool {
        self.pending_save.is_some()
    }

    #[must_use]
    pub fn has_deferred_reload(&self) -> bool {
        self.deferred_reload.is_some()
    }

    #[must_use]
    pub fn auto_zoom(&self) -> AutoZoom {
        self.auto_zoom
    }
}

fn build_catalog(profiles: Vec<Profile>) -> IndexMap<ProfileId, Profile> {
    let mut catalog = IndexMap::with_capacity(profiles.len());
    for profile in profiles {
        if profile.id.is_unsaved() {
            warn!(name = %profile.name, "skipping catalog profile with reserved id 0");
            continue;
        }
        if catalog.contains_key(&profile.id) {
            warn!(profile = %profile.id, "skipping duplicate catalog profile id");
            continue;
        }
        catalog.insert(profile.id, profile);
    }
    catalog
}

fn builtin_bands(config: &BandEditorConfig) -> BandList {
    BandList::single(config.limits, config.initial_band_color.clone(), "Range")
}

fn stored_or_builtin(bands: &[Band], config: &BandEditorConfig, source: &str) -> BandList {
    BandList::from_stored(bands, config.limits).unwrap_or_else(|err| {
        warn!(source, error = %err, "unusable stored bands, using built-in bands");
        builtin_bands(config)
    })
}
