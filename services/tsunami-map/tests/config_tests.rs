//! Configuration loading tests.

use std::path::PathBuf;

use advisory_common::{Color, DuplicatePolicy};
use advisory_pipeline::{LabelPolicy, Mode};
use test_utils::{temp_file_with, workspace_root, DUPLICATE_REGIONS_GEOJSON, REGIONS_GEOJSON};
use tsunami_map::{AppState, MapConfig};

#[test]
fn test_sample_config_loads() {
    let path = workspace_root().join("config/tsunami-map.yaml");
    let config = MapConfig::from_file(&path).unwrap();

    assert_eq!(config.mode, Mode::Live);
    assert_eq!(config.poll_interval_secs, 60);
    assert_eq!(config.labels.policy, LabelPolicy::WarningOnly);
    assert_eq!(config.treatments.warning.fill_color, Color::named("red"));
    assert!(config.validate().is_ok());
}

#[test]
fn test_sample_regions_load() {
    let mut config = MapConfig::default();
    config.regions_path = workspace_root().join("data/tsunami_regions.geojson");
    config.mode = Mode::Fixture;

    let state = AppState::from_config(config).unwrap();
    let registry = state.controller.pipeline().registry();
    assert!(registry.contains("福島県"));
    assert!(registry.contains("青森県太平洋沿岸"));
    assert!(registry.duplicates().is_empty());
}

#[test]
fn test_partial_yaml_overrides_one_treatment() {
    let yaml = r##"
mode: fixture
treatments:
  watch:
    fillColor: "#ffa500"
    weight: 3
    opacity: 1.0
    fillOpacity: 0.5
labels:
  policy: any_grade
"##;
    let config = MapConfig::from_yaml(yaml).unwrap();

    assert_eq!(config.mode, Mode::Fixture);
    assert_eq!(config.labels.policy, LabelPolicy::AnyGrade);
    assert_eq!(config.treatments.watch.fill_color.to_rgba(), (255, 165, 0, 255));
    assert_eq!(config.treatments.watch.color, Color::named("black"));
    // Untouched grades keep their presets
    assert_eq!(config.treatments.warning.fill_color, Color::named("red"));
}

#[test]
fn test_invalid_treatment_fails_validation() {
    let yaml = r#"
treatments:
  warning:
    fillColor: red
    weight: 4
    opacity: 1.5
    fillOpacity: 0.7
"#;
    let config = MapConfig::from_yaml(yaml).unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_missing_config_file_is_an_error() {
    let err = MapConfig::from_file("/nonexistent/tsunami-map.yaml").unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to read config file"));
}

#[test]
fn test_reject_duplicates_fails_startup() {
    let regions = temp_file_with(DUPLICATE_REGIONS_GEOJSON, "geojson");
    let mut config = MapConfig::from_yaml("registry:\n  reject_duplicates: true\n").unwrap();
    config.regions_path = regions.path().to_path_buf();
    assert_eq!(config.duplicate_policy(), DuplicatePolicy::Reject);

    assert!(AppState::from_config(config).is_err());
}

#[tokio::test]
async fn test_fixture_file_replaces_builtin() {
    let regions = temp_file_with(REGIONS_GEOJSON, "geojson");
    let fixture = temp_file_with(
        r#"[{ "name": "宮城県", "grade": "Warning", "immediate": false,
             "maxHeight": { "value": 5, "description": "５ｍ" } }]"#,
        "json",
    );

    let mut config = MapConfig::default();
    config.mode = Mode::Fixture;
    config.regions_path = regions.path().to_path_buf();
    config.fixture_path = Some(PathBuf::from(fixture.path()));

    let state = AppState::from_config(config).unwrap();
    state.initial_load().await;

    let snapshot = state.controller.pipeline().snapshot().await.unwrap();
    assert_eq!(snapshot.styled.len(), 1);
    assert_eq!(snapshot.styled[0].name, "宮城県");
}
