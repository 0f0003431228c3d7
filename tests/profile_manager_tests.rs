use chart_zones::api::{
    BandEditorConfig, InMemoryProfileStore, Profile, ProfileId, ProfileManager, ProfileStore,
    ProjectOverride, RangeType, ReloadOutcome, Selection,
};
use chart_zones::core::{Band, BandList, EditOutcome, EditRejection, MAX_RANGE};
use chart_zones::error::ChartError;

const SENSOR: &str = "temperature";

fn profile_a() -> Profile {
    Profile {
        id: ProfileId(1),
        name: "Default".to_owned(),
        tick_breakpoints: vec![0.0, 5.0, 20.0, 100.0],
        bands: vec![
            Band::new(-MAX_RANGE, 20.0, "#00ff00", "Normal"),
            Band::new(20.0, MAX_RANGE, "#ff0000", "Hot"),
        ],
        range_type: RangeType::Soft,
        y_min: 0.0,
        y_max: 100.0,
    }
}

fn profile_b() -> Profile {
    Profile {
        id: ProfileId(2),
        name: "Greenhouse".to_owned(),
        tick_breakpoints: Vec::new(),
        bands: vec![
            Band::new(-MAX_RANGE, 10.0, "#0000ff", "Cold"),
            Band::new(10.0, 30.0, "#00ff00", "Grow"),
            Band::new(30.0, MAX_RANGE, "#ff0000", "Hot"),
        ],
        range_type: RangeType::Hard,
        y_min: -10.0,
        y_max: 50.0,
    }
}

fn catalog() -> Vec<Profile> {
    vec![profile_a(), profile_b()]
}

fn mount(project_override: Option<ProjectOverride>) -> ProfileManager {
    ProfileManager::mount(SENSOR, BandEditorConfig::default(), catalog(), project_override)
        .expect("mount editor")
}

fn bounds(list: &BandList) -> Vec<(f64, f64)> {
    list.bands().iter().map(|band| (band.from, band.to)).collect()
}

#[test]
fn mount_without_hint_binds_first_profile() {
    let manager = mount(None);

    assert_eq!(manager.selection(), Selection::Bound(ProfileId(1)));
    assert_eq!(manager.committed_selection(), Selection::Bound(ProfileId(1)));
    assert_eq!(manager.band_slice(), profile_a().bands.as_slice());
}

#[test]
fn mount_uses_override_default_setting() {
    let manager = mount(Some(ProjectOverride {
        bands: Vec::new(),
        default_setting_id: ProfileId(2),
    }));

    assert_eq!(manager.current_profile_id(), ProfileId(2));
    assert_eq!(manager.band_slice(), profile_b().bands.as_slice());
}

#[test]
fn mount_with_unsaved_override_restores_project_bands() {
    let project_bands = vec![
        Band::new(-MAX_RANGE, 42.0, "#123456", "Mine"),
        Band::new(42.0, MAX_RANGE, "#654321", "Also mine"),
    ];
    let manager = mount(Some(ProjectOverride {
        bands: project_bands.clone(),
        default_setting_id: ProfileId::UNSAVED,
    }));

    assert_eq!(manager.selection(), Selection::Unsaved);
    assert_eq!(manager.band_slice(), project_bands.as_slice());
    assert_eq!(manager.snapshot_for_unsaved().bands(), project_bands.as_slice());
}

#[test]
fn missing_profile_falls_back_to_default_name() {
    let manager = ProfileManager::mount(
        SENSOR,
        BandEditorConfig::default(),
        vec![profile_b(), profile_a()],
        Some(ProjectOverride {
            bands: Vec::new(),
            default_setting_id: ProfileId(99),
        }),
    )
    .expect("mount editor");

    assert_eq!(manager.selection(), Selection::Bound(ProfileId(1)));
}

#[test]
fn missing_profile_without_default_name_falls_back_to_first() {
    let manager = ProfileManager::mount(
        SENSOR,
        BandEditorConfig::default(),
        vec![profile_b()],
        Some(ProjectOverride {
            bands: Vec::new(),
            default_setting_id: ProfileId(99),
        }),
    )
    .expect("mount editor");

    assert_eq!(manager.selection(), Selection::Bound(ProfileId(2)));
}

#[test]
fn empty_catalog_falls_back_to_builtin_bands() {
    let manager = ProfileManager::mount(
        SENSOR,
        BandEditorConfig::default(),
        Vec::new(),
        Some(ProjectOverride {
            bands: Vec::new(),
            default_setting_id: ProfileId(7),
        }),
    )
    .expect("mount editor");

    assert_eq!(manager.selection(), Selection::Unsaved);
    assert_eq!(bounds(manager.bands()), vec![(-MAX_RANGE, MAX_RANGE)]);
    assert_eq!(manager.band_slice()[0].text, "Range");
    assert_eq!(manager.active_profile().name, "Default");
    assert_eq!(manager.active_profile().y_max, 100.0);
}

#[test]
fn empty_catalog_without_override_starts_with_blank_band() {
    let manager = ProfileManager::mount(SENSOR, BandEditorConfig::default(), Vec::new(), None)
        .expect("mount editor");

    assert_eq!(manager.selection(), Selection::Unsaved);
    assert_eq!(manager.band_slice()[0].color, "rgb(255,255,255)");
    assert_eq!(manager.band_slice()[0].text, "");
}

#[test]
fn every_applied_edit_forces_unsaved() {
    let mut manager = mount(None);
    assert_eq!(manager.set_label(0, "Fine"), EditOutcome::Applied);
    assert_eq!(manager.selection(), Selection::Unsaved);

    manager.select(ProfileId(2)).expect("select B");
    assert_eq!(manager.set_color(1, "#abcdef"), EditOutcome::Applied);
    assert_eq!(manager.selection(), Selection::Unsaved);
}

#[test]
fn rejected_edit_keeps_binding() {
    let mut manager = mount(None);

    let outcome = manager.set_boundary(1, 50.0);
    assert_eq!(
        outcome,
        EditOutcome::Rejected(EditRejection::FixedTopBoundary)
    );
    assert_eq!(manager.selection(), Selection::Bound(ProfileId(1)));
}

#[test]
fn direct_profile_switch_copies_bands() {
    let mut manager = mount(None);

    manager.select(ProfileId(2)).expect("select B");
    assert_eq!(manager.selection(), Selection::Bound(ProfileId(2)));
    assert_eq!(manager.band_slice(), profile_b().bands.as_slice());

    manager.set_boundary(0, 5.0);
    assert_eq!(
        manager.profile(ProfileId(2)).expect("catalog keeps B").bands,
        profile_b().bands
    );
}

#[test]
fn reselecting_profile_after_edit_reloads_saved_bands() {
    let mut manager = mount(None);
    manager.set_boundary(0, 35.0);
    assert_eq!(manager.selection(), Selection::Unsaved);

    manager.select(ProfileId(1)).expect("select A");

    assert_eq!(manager.selection(), Selection::Bound(ProfileId(1)));
    assert_eq!(manager.band_slice(), profile_a().bands.as_slice());
    assert_eq!(
        bounds(manager.snapshot_for_unsaved()),
        vec![(-MAX_RANGE, 35.0), (35.0, MAX_RANGE)]
    );
}

#[test]
fn selecting_unsaved_restores_stashed_edits() {
    let mut manager = mount(None);
    manager.add_band();
    manager.set_boundary(1, 60.0);
    let edited = manager.bands().clone();

    manager.select(ProfileId(2)).expect("select B");
    assert_eq!(manager.band_slice(), profile_b().bands.as_slice());

    manager.select(ProfileId::UNSAVED).expect("select unsaved");
    assert_eq!(manager.selection(), Selection::Unsaved);
    assert_eq!(manager.bands(), &edited);

    // Restored bands are a copy; editing them leaves the stash intact.
    manager.set_label(0, "changed");
    assert_eq!(manager.snapshot_for_unsaved(), &edited);
}

#[test]
fn selecting_unsaved_while_unsaved_keeps_current_edits() {
    let mut manager = mount(None);
    manager.set_boundary(0, 12.0);
    let edited = manager.bands().clone();

    manager.select(ProfileId::UNSAVED).expect("select unsaved");
    assert_eq!(manager.bands(), &edited);
}

#[test]
fn selecting_unknown_profile_is_an_error_and_keeps_state() {
    let mut manager = mount(None);
    let before = manager.snapshot();

    let err = manager.select(ProfileId(42)).expect_err("unknown id");
    assert!(matches!(err, ChartError::UnknownProfile { id } if id == ProfileId(42)));
    assert_eq!(manager.snapshot(), before);
}

#[test]
fn save_request_carries_working_bands_and_selection() {
    let mut manager = mount(None);
    manager.add_band();
    manager.set_label(0, "");

    let request = manager.begin_save().expect("start save");
    assert_eq!(request.sensor_type, SENSOR);
    assert_eq!(request.default_setting_id, ProfileId::UNSAVED);
    assert_eq!(request.bands.len(), 3);
    assert_eq!(request.bands[0].text, "New Color");
    assert!(manager.is_save_pending());

    let err = manager.begin_save().expect_err("second save in flight");
    assert!(matches!(err, ChartError::SaveInFlight));
}

#[test]
fn successful_save_becomes_cancel_reference() {
    let mut store = InMemoryProfileStore::default().with_profiles(SENSOR, catalog());
    let mut manager =
        ProfileManager::load(&mut store, SENSOR, BandEditorConfig::default()).expect("load");

    manager.set_boundary(0, 25.0);
    manager.save(&mut store).expect("save");
    assert_eq!(store.save_count(), 1);
    assert_eq!(manager.committed_selection(), Selection::Unsaved);

    manager.set_boundary(0, 80.0);
    manager.cancel();

    assert_eq!(
        bounds(manager.bands()),
        vec![(-MAX_RANGE, 25.0), (25.0, MAX_RANGE)]
    );
    assert_eq!(manager.selection(), Selection::Unsaved);

    let stored = store.override_for(SENSOR).expect("override saved");
    assert_eq!(stored.default_setting_id, ProfileId::UNSAVED);
    assert_eq!(stored.bands, manager.band_slice());
}

#[test]
fn cancel_restores_loaded_profile_binding() {
    let mut manager = mount(None);
    manager.set_boundary(0, 90.0);
    manager.select(ProfileId(2)).expect("select B");
    manager.remove_band();

    manager.cancel();

    assert_eq!(manager.selection(), Selection::Bound(ProfileId(1)));
    assert_eq!(manager.band_slice(), profile_a().bands.as_slice());
}

#[test]
fn failed_save_leaves_state_untouched() {
    let mut store = InMemoryProfileStore::default().with_profiles(SENSOR, catalog());
    let mut manager =
        ProfileManager::load(&mut store, SENSOR, BandEditorConfig::default()).expect("load");
    manager.set_boundary(0, 15.0);
    manager.set_label(0, "");
    let before = manager.snapshot();

    store.fail_next_save("backend unavailable");
    let err = manager.save(&mut store).expect_err("save fails");

    assert!(matches!(err, ChartError::Persistence(_)));
    assert!(!manager.is_save_pending());
    assert_eq!(manager.snapshot(), before);
    assert!(store.override_for(SENSOR).is_none());

    manager.save(&mut store).expect("retry succeeds");
    assert_eq!(store.save_count(), 1);
}

#[test]
fn finish_without_pending_save_is_an_error() {
    let mut manager = mount(None);
    let err = manager.finish_save(Ok(())).expect_err("nothing pending");
    assert!(matches!(err, ChartError::NoPendingSave));
}

#[test]
fn reload_during_save_is_deferred_until_completion() {
    let mut manager = mount(None);
    manager.set_boundary(0, 33.0);
    let request = manager.begin_save().expect("start save");

    // Catalog refreshed while the save is in flight; its override is stale.
    let outcome = manager.reload(
        catalog(),
        Some(ProjectOverride {
            bands: Vec::new(),
            default_setting_id: ProfileId(2),
        }),
    );
    assert_eq!(outcome, ReloadOutcome::Deferred);
    assert!(manager.has_deferred_reload());
    assert_eq!(
        bounds(manager.bands()),
        vec![(-MAX_RANGE, 33.0), (33.0, MAX_RANGE)]
    );

    manager.finish_save(Ok(())).expect("save completes");

    assert!(!manager.has_deferred_reload());
    assert_eq!(manager.selection(), Selection::Unsaved);
    assert_eq!(manager.band_slice(), request.bands.as_slice());
}

#[test]
fn reload_without_pending_save_applies_immediately() {
    let mut manager = mount(None);
    manager.set_boundary(0, 33.0);

    let outcome = manager.reload(vec![profile_b()], None);

    assert_eq!(outcome, ReloadOutcome::Applied);
    assert_eq!(manager.selection(), Selection::Bound(ProfileId(2)));
    assert_eq!(manager.band_slice(), profile_b().bands.as_slice());
}

#[test]
fn failed_save_with_deferred_reload_only_refreshes_catalog() {
    let mut manager = mount(None);
    manager.select(ProfileId(2)).expect("select B");
    manager.begin_save().expect("start save");
    manager.reload(vec![profile_a()], None);

    let err = manager
        .finish_save(Err(ChartError::Persistence("timeout".to_owned())))
        .expect_err("save failed");
    assert!(matches!(err, ChartError::Persistence(_)));

    assert_eq!(manager.selection(), Selection::Unsaved);
    assert_eq!(manager.band_slice(), profile_b().bands.as_slice());
    assert!(manager.profile(ProfileId(2)).is_none());
}

#[test]
fn profile_options_start_with_placeholder() {
    let manager = mount(None);

    let options = manager.profile_options();
    let ids: Vec<ProfileId> = options.iter().map(|option| option.id).collect();
    assert_eq!(ids, vec![ProfileId::UNSAVED, ProfileId(1), ProfileId(2)]);
    assert_eq!(options[0].name, "My Changes");
}

#[test]
fn reserved_and_duplicate_catalog_ids_are_skipped() {
    let mut reserved = profile_b();
    reserved.id = ProfileId::UNSAVED;
    let mut duplicate = profile_b();
    duplicate.name = "Shadow".to_owned();

    let manager = ProfileManager::mount(
        SENSOR,
        BandEditorConfig::default(),
        vec![reserved, profile_a(), profile_b(), duplicate],
        None,
    )
    .expect("mount editor");

    let names: Vec<&str> = manager.profiles().map(|profile| profile.name.as_str()).collect();
    assert_eq!(names, vec!["Default", "Greenhouse"]);
}

#[test]
fn add_and_remove_availability_follow_band_count() {
    let mut manager = mount(None);
    assert!(manager.can_add_band());
    assert!(manager.can_remove_band());

    while manager.can_add_band() {
        assert!(manager.add_band().is_applied());
    }
    assert_eq!(manager.bands().len(), 5);
    assert!(!manager.add_band().is_applied());

    while manager.can_remove_band() {
        assert!(manager.remove_band().is_applied());
    }
    assert_eq!(manager.bands().len(), 1);
    assert_eq!(bounds(manager.bands()), vec![(-MAX_RANGE, MAX_RANGE)]);
}

#[test]
fn reload_from_store_picks_up_saved_override() {
    let mut store = InMemoryProfileStore::default().with_profiles(SENSOR, catalog());
    let mut manager =
        ProfileManager::load(&mut store, SENSOR, BandEditorConfig::default()).expect("load");
    manager.select(ProfileId(2)).expect("select B");
    manager.save(&mut store).expect("save");

    let mut remounted =
        ProfileManager::load(&mut store, SENSOR, BandEditorConfig::default()).expect("reload");
    assert_eq!(remounted.selection(), Selection::Bound(ProfileId(2)));

    assert_eq!(
        remounted.reload_from(&mut store).expect("reload"),
        ReloadOutcome::Applied
    );
    assert_eq!(
        store
            .load_project_override(SENSOR)
            .expect("override")
            .map(|saved| saved.default_setting_id),
        Some(ProfileId(2))
    );
}

#[test]
fn invalid_config_is_rejected_at_mount() {
    let config = BandEditorConfig::default().with_auto_zoom_padding_ratio(f64::NAN);
    assert!(ProfileManager::mount(SENSOR, config, catalog(), None).is_err());
}
