use std::fs;
use std::time::Duration;

use docscribe::load_config::load_config;
use serial_test::serial;
use tempfile::tempdir;

const CONFIG_YAML: &str = r#"
features:
  - name: Authentication
    root: ./src/auth
    max_files: 30
  - name: Checkout
    root: ./src/checkout
model:
  name: test-model
  max_tokens: 2048
pacing:
  delay_seconds: 1
  cost_per_file: 0.01
"#;

fn set_secrets() {
    std::env::set_var("ANTHROPIC_API_KEY", "model-key");
    std::env::set_var("NOTION_API_KEY", "workspace-key");
    std::env::set_var("NOTION_DATABASE_ID", "db-123");
}

#[test]
#[serial]
fn loads_and_merges_yaml_with_env_secrets() {
    set_secrets();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(&path, CONFIG_YAML).unwrap();

    let config = load_config(&path).expect("config should load");

    assert_eq!(config.features.len(), 2);
    assert_eq!(config.features[0].name, "Authentication");
    assert_eq!(config.features[0].max_files, 30);
    // max_files falls back to the default when omitted.
    assert_eq!(config.features[1].max_files, 50);

    assert_eq!(config.model.api_key, "model-key");
    assert_eq!(config.model.name, "test-model");
    assert_eq!(config.model.max_tokens, 2048);

    assert_eq!(config.workspace.api_key, "workspace-key");
    assert_eq!(config.workspace.database_id, "db-123");

    assert_eq!(config.pacing.inter_feature_delay, Duration::from_secs(1));
    assert!((config.pacing.cost_per_file - 0.01).abs() < 1e-9);
}

#[test]
#[serial]
fn model_and_pacing_sections_are_optional() {
    set_secrets();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(&path, "features:\n  - name: Solo\n    root: ./src\n").unwrap();

    let config = load_config(&path).expect("minimal config should load");
    assert_eq!(config.features.len(), 1);
    assert_eq!(config.model.max_tokens, 4096);
    assert_eq!(config.pacing.inter_feature_delay, Duration::from_secs(5));
    assert!((config.pacing.cost_per_file - 0.015).abs() < 1e-9);
}

#[test]
#[serial]
fn missing_env_secret_is_an_error() {
    set_secrets();
    std::env::remove_var("NOTION_DATABASE_ID");
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(&path, CONFIG_YAML).unwrap();

    let err = load_config(&path).expect_err("missing secret should fail");
    assert!(err.to_string().contains("NOTION_DATABASE_ID"));
}

#[test]
#[serial]
fn empty_feature_list_is_rejected() {
    set_secrets();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(&path, "features: []\n").unwrap();

    assert!(load_config(&path).is_err());
}

#[test]
#[serial]
fn missing_config_file_is_an_error() {
    set_secrets();
    assert!(load_config("/definitely/not/here.yaml").is_err());
}

#[test]
#[serial]
fn malformed_yaml_is_an_error() {
    set_secrets();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(&path, "features: [not: {valid").unwrap();

    assert!(load_config(&path).is_err());
}
