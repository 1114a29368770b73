//! Unit tests for config module.

use spinebox::config::{EditorConfig, TeardownPolicy, default_config_path};
use spinebox::types::AnchorOrigin;
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn test_load_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("spinebox.json");
    fs::write(
        &path,
        r#"{
            "origin": "top_left",
            "min_width": 32.0,
            "max_height": 600.0,
            "teardown": "discard",
            "transition_ms": 200
        }"#,
    )
    .unwrap();

    let config = EditorConfig::load(&path).unwrap();

    assert_eq!(config.origin, AnchorOrigin::TopLeft);
    assert_eq!(config.teardown, TeardownPolicy::Discard);
    assert_eq!(config.size_constraints().min.width, 32.0);
    assert_eq!(config.size_constraints().max.unwrap().height, 600.0);
    assert_eq!(config.transition_timing().duration, Duration::from_millis(200));
    assert_eq!(config.transition_timing().reset_delay, Duration::from_millis(350));
    assert!(config.persist_on_commit);
}

#[test]
fn test_empty_object_is_default() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("spinebox.json");
    fs::write(&path, "{}").unwrap();

    assert_eq!(EditorConfig::load(&path).unwrap(), EditorConfig::default());
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempdir().unwrap();
    let err = EditorConfig::load(&dir.path().join("nope.json")).unwrap_err();
    assert!(err.to_string().contains("failed to read config"));
}

#[test]
fn test_malformed_json_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("spinebox.json");
    fs::write(&path, "{ origin: ").unwrap();

    let err = EditorConfig::load(&path).unwrap_err();
    assert!(err.to_string().contains("invalid config"));
}

#[test]
fn test_invalid_values_fail_validation() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("spinebox.json");
    fs::write(&path, r#"{ "min_width": 0.0 }"#).unwrap();

    assert!(EditorConfig::load(&path).is_err());
}

#[test]
fn test_default_paths() {
    // Should return Some on most systems
    let path = default_config_path();
    assert!(path.is_some() || cfg!(target_os = "unknown"));
    if let Some(path) = path {
        assert!(path.ends_with("spinebox/spinebox.json"));
    }
}
