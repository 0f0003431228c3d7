use chart_zones::api::{
    BandEditorConfig, EditorSnapshot, Profile, ProfileId, ProfileManager, RangeType, Selection,
};
use chart_zones::core::{Band, BandLimits, MAX_RANGE};

fn manager() -> ProfileManager {
    ProfileManager::mount(
        "co2",
        BandEditorConfig::default(),
        vec![Profile {
            id: ProfileId(3),
            name: "Office".to_owned(),
            tick_breakpoints: vec![0.0, 400.0, 1_000.0, 5_000.0],
            bands: vec![
                Band::new(-MAX_RANGE, 1_000.0, "#00ff00", "Fresh"),
                Band::new(1_000.0, MAX_RANGE, "#ff0000", "Stale"),
            ],
            range_type: RangeType::Soft,
            y_min: 0.0,
            y_max: 5_000.0,
        }],
        None,
    )
    .expect("mount editor")
}

#[test]
fn snapshot_reflects_selection_and_band_sets() {
    let mut manager = manager();
    manager.set_boundary(0, 800.0);

    let snapshot = manager.snapshot();
    assert_eq!(snapshot.sensor_type, "co2");
    assert_eq!(snapshot.selection, Selection::Unsaved);
    assert_eq!(snapshot.committed_selection, Selection::Bound(ProfileId(3)));
    assert_eq!(snapshot.working_bands[0].to, 800.0);
    assert_eq!(snapshot.snapshot_for_cancel[0].to, 1_000.0);
    assert_eq!(snapshot.profile_options.len(), 2);
    assert!(!snapshot.save_pending);
}

#[test]
fn snapshot_json_round_trips() {
    let manager = manager();

    let json = manager.snapshot_json_pretty().expect("serialize snapshot");
    let decoded: EditorSnapshot = serde_json::from_str(&json).expect("decode snapshot");
    assert_eq!(decoded, manager.snapshot());
}

#[test]
fn profile_json_uses_camel_case_fields() {
    let json = r##"{
        "id": 9,
        "name": "Lab",
        "tickBreakpoints": [0, 10, 100],
        "bands": [{ "from": -9999999, "to": 9999999, "color": "#fff" }],
        "rangeType": "hard",
        "yMin": -5,
        "yMax": 105
    }"##;

    let profile: Profile = serde_json::from_str(json).expect("decode profile");
    assert_eq!(profile.id, ProfileId(9));
    assert_eq!(profile.range_type, RangeType::Hard);
    assert_eq!(profile.tick_breakpoints, vec![0.0, 10.0, 100.0]);
    assert_eq!(profile.bands[0].text, "");
}

#[test]
fn partial_config_json_falls_back_to_defaults() {
    let config: BandEditorConfig =
        serde_json::from_str(r#"{ "limits": { "max_bands": 3 }, "placeholder_name": "Local" }"#)
            .expect("decode config");

    assert_eq!(config.limits.max_bands, 3);
    assert_eq!(config.limits.max_range, MAX_RANGE);
    assert_eq!(config.placeholder_name, "Local");
    assert_eq!(config.fallback_profile_name, "Default");
    assert_eq!(config.new_band_template.text, "New Color");
    assert!(config.validate().is_ok());
}

#[test]
fn zero_band_limit_is_rejected() {
    let config = BandEditorConfig::default().with_limits(BandLimits {
        max_range: MAX_RANGE,
        max_bands: 0,
    });
    assert!(config.validate().is_err());
}
