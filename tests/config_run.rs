use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use target_whatagraph::ExportError;
use target_whatagraph::config::Config;
use target_whatagraph::observability::NoopObserver;

fn tmp_file(ext: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("target-whatagraph-config-{nanos}.{ext}"))
}

#[test]
fn config_file_is_read_from_disk() {
    let path = tmp_file("json");
    fs::write(
        &path,
        r#"{"access_token": "abc", "input_path": "tests/fixtures/input", "batch_size": 50}"#,
    )
    .unwrap();

    let config = Config::from_path(&path).unwrap();
    assert_eq!(config.input_path, PathBuf::from("tests/fixtures/input"));
    assert_eq!(config.batch_size, Some(50));
    fs::remove_file(path).unwrap();
}

#[test]
fn unreadable_config_file_is_a_config_error() {
    let err = Config::from_path("tests/fixtures/no_such_config.json").unwrap_err();
    assert!(matches!(err, ExportError::Config { .. }));
    assert!(err.to_string().contains("cannot read config file"));
}

#[test]
fn invalid_json_is_rejected() {
    let err = Config::from_json_str("{not json").unwrap_err();
    assert!(matches!(err, ExportError::Json(_)));
}

// The api_url points at a port nothing listens on; these runs must fail before any request.

#[test]
fn run_fails_on_a_bad_token_before_loading_input() {
    let config = Config {
        access_token: "line\nbreak".to_string(),
        ..Config::from_json_str(r#"{"access_token": "x", "input_path": "tests/fixtures/does_not_exist", "api_url": "http://127.0.0.1:9"}"#).unwrap()
    };

    let err = target_whatagraph::run(&config, Arc::new(NoopObserver)).unwrap_err();
    assert!(matches!(err, ExportError::Config { .. }));
}

#[test]
fn run_fails_on_missing_input_before_any_request() {
    let config = Config::from_json_str(
        r#"{"access_token": "x", "input_path": "tests/fixtures/does_not_exist", "api_url": "http://127.0.0.1:9"}"#,
    )
    .unwrap();

    let err = target_whatagraph::run(&config, Arc::new(NoopObserver)).unwrap_err();
    assert!(matches!(err, ExportError::Io(_)));
}
