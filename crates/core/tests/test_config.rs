//! Tests for configuration parsing

use std::time::Duration;

use textpro_core::config::CONFIG_FILENAME;
use textpro_core::license::EngineSettings;
use textpro_core::{Environment, TextProConfig};

#[test]
fn test_default_config() {
    let config = TextProConfig::default();
    assert_eq!(config.product.store_id, 157343);
    assert_eq!(config.product.product_id, 463516);
    assert_eq!(config.timing.tick_interval(), Duration::from_secs(5));
    assert_eq!(config.timing.environment, Environment::Production);
    assert_eq!(
        config.timing.offline_limit(),
        Duration::from_secs(7 * 24 * 60 * 60)
    );
    assert!(config.endpoints.validate.ends_with("/v1/licenses/validate"));
    assert!(config.storage.path.is_none());
}

#[test]
fn test_serialize_config() {
    let config = TextProConfig::default();
    let toml_str = toml::to_string(&config).unwrap();
    assert!(toml_str.contains("store_id"));
    assert!(toml_str.contains("tick_interval_ms"));
    assert!(!toml_str.contains("offline_limit_ms"));
}

#[test]
fn test_development_environment() {
    let config: TextProConfig = toml::from_str(
        r#"
[timing]
environment = "development"
"#,
    )
    .unwrap();
    assert_eq!(config.timing.offline_limit(), Duration::from_secs(30));
    assert_eq!(config.timing.tick_interval_ms, 5000);
}

#[test]
fn test_offline_limit_override_wins() {
    let config: TextProConfig = toml::from_str(
        r#"
[timing]
environment = "development"
offline_limit_ms = 1500
tick_interval_ms = 250
"#,
    )
    .unwrap();
    assert_eq!(config.timing.offline_limit(), Duration::from_millis(1500));
    assert_eq!(config.timing.tick_interval(), Duration::from_millis(250));
}

#[test]
fn test_partial_sections_keep_defaults() {
    let config: TextProConfig = toml::from_str(
        r#"
[product]
store_id = 42

[endpoints]
ping = "http://127.0.0.1:9/ping"

[instance]
name_prefix = "editor"
"#,
    )
    .unwrap();
    assert_eq!(config.product.store_id, 42);
    assert_eq!(config.product.product_id, 463516);
    assert_eq!(config.endpoints.ping, "http://127.0.0.1:9/ping");
    assert!(config.endpoints.activate.ends_with("/v1/licenses/activate"));
    assert_eq!(config.instance.name_prefix, "editor");
}

#[test]
fn test_engine_settings_from_config() {
    let mut config = TextProConfig::default();
    config.product.product_id = 7;
    config.timing.offline_limit_ms = Some(10);
    config.instance.name_prefix = "ide".into();

    let settings = EngineSettings::from(&config);
    assert_eq!(settings.store_id, 157343);
    assert_eq!(settings.product_id, 7);
    assert_eq!(settings.offline_limit, Duration::from_millis(10));
    assert_eq!(settings.instance_prefix, "ide");
}

#[test]
fn test_find_and_load_walks_ancestors() {
    let tmp = tempfile::tempdir().unwrap();
    let nested = tmp.path().join("a").join("b");
    std::fs::create_dir_all(&nested).unwrap();

    let mut config = TextProConfig::default();
    config.product.store_id = 99;
    config.save(&tmp.path().join(CONFIG_FILENAME)).unwrap();

    let loaded = TextProConfig::find_and_load(&nested).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_find_and_load_falls_back_to_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    let loaded = TextProConfig::find_and_load(tmp.path()).unwrap();
    assert_eq!(loaded.product.store_id, 157343);
}

#[test]
fn test_invalid_toml_is_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join(CONFIG_FILENAME);
    std::fs::write(&path, "[timing\ntick_interval_ms = ").unwrap();
    assert!(TextProConfig::from_file(&path).is_err());
}

#[test]
fn test_zero_tick_interval_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join(CONFIG_FILENAME);
    std::fs::write(&path, "[timing]\ntick_interval_ms = 0\n").unwrap();

    let err = TextProConfig::from_file(&path).unwrap_err();
    assert!(err.to_string().contains("tick_interval_ms"), "got: {err}");
}

#[test]
fn test_tick_interval_never_zero() {
    let mut config = TextProConfig::default();
    config.timing.tick_interval_ms = 0;
    assert!(config.validate().is_err());
    assert_eq!(config.timing.tick_interval(), Duration::from_millis(1));
}
