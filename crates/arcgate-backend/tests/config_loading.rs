//! Integration tests for loading gateway configuration from TOML.

use std::io::Write;

use arcgate_backend::{
    ConfigError, GatewayConfig, GatewaySnapshot, ServerType, SharedConfig,
    UuidConversion,
};

const FULL_CONFIG: &str = r#"
name_allowed_regular = "^[0-9a-zA-Z_]{3,16}$"
whitelist = true

[pipeline]
max_local_id_attempts = 4
max_concurrent_logins = 8

[session]
task_timeout_ms = 250

[services.official]
enable = true
name = "Official"
conv_uuid = "preserve"
conv_repeat = false
name_allowed_regular = ""
whitelist = false
refuse_repeated_login = false
auth_retry = 1

[services.official.body]
server_type = "official"
pass_ip = false

[services.custom]
enable = false
name = "Custom Auth"
conv_uuid = "offline"
conv_repeat = true
name_allowed_regular = "^[a-z]+$"
whitelist = true
refuse_repeated_login = true
safe_id = true
auth_retry = 2

[services.custom.body]
server_type = "custom"
post_mode = true
url = "https://auth.example/hasJoined"
post_content = "'{'\"username\":\"{0}\",\"serverId\":\"{1}\"{2}'}'"
pass_ip = true
pass_ip_content_by_post = ",\"ip\":\"{0}\""

# Missing `name`: rejected on its own.
[services.broken]
enable = true
conv_uuid = "random"
conv_repeat = false
name_allowed_regular = ""
whitelist = false
refuse_repeated_login = false
auth_retry = 1

[services.broken.body]
server_type = "official"
pass_ip = false
"#;

fn write_config(text: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(text.as_bytes()).expect("write config");
    file
}

#[test]
fn test_load_full_config_from_file() {
    let file = write_config(FULL_CONFIG);

    let config = GatewayConfig::load(file.path()).expect("config parses");

    assert!(config.whitelist);
    assert_eq!(config.pipeline.max_local_id_attempts, 4);
    assert_eq!(config.pipeline.max_concurrent_logins, 8);
    assert_eq!(config.session.task_timeout_ms, 250);
    // Unset keys keep their defaults.
    assert_eq!(config.session.queue_capacity, 256);
    assert_eq!(config.services.len(), 3);
}

#[test]
fn test_snapshot_drops_invalid_backend_only() {
    let config = GatewayConfig::from_toml_str(FULL_CONFIG).unwrap();

    let snapshot = GatewaySnapshot::build(config).unwrap();
    let registry = snapshot.registry();

    assert_eq!(registry.len(), 2);
    assert!(registry.get("broken").is_none());
    assert_eq!(registry.rejected().len(), 1);
    assert_eq!(registry.rejected()[0].path, "broken");
    assert!(matches!(
        registry.rejected()[0].error,
        ConfigError::MissingField("name")
    ));

    let custom = registry.get("custom").expect("custom loads");
    assert_eq!(custom.body().server_type(), ServerType::Custom);
    assert_eq!(custom.conv_uuid(), UuidConversion::NameDerived);
    assert!(custom.body().is_post());
    assert!(custom.safe_id());
}

#[test]
fn test_enabled_lists_only_enabled_backends() {
    let config = GatewayConfig::from_toml_str(FULL_CONFIG).unwrap();
    let snapshot = GatewaySnapshot::build(config).unwrap();

    let enabled = snapshot.registry().enabled();

    assert_eq!(enabled.len(), 1);
    assert_eq!(enabled[0].path(), "official");
}

#[test]
fn test_display_name_falls_back_to_path() {
    let config = GatewayConfig::from_toml_str(FULL_CONFIG).unwrap();
    let snapshot = GatewaySnapshot::build(config).unwrap();

    assert_eq!(snapshot.registry().display_name("custom"), "Custom Auth");
    assert_eq!(snapshot.registry().display_name("gone"), "gone");
}

#[test]
fn test_global_pattern_is_compiled() {
    let config = GatewayConfig::from_toml_str(FULL_CONFIG).unwrap();
    let snapshot = GatewaySnapshot::build(config).unwrap();

    let pattern = snapshot.name_pattern().expect("global pattern set");
    assert!(pattern.is_match("Notch"));
    assert!(!pattern.is_match("No"));
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = GatewayConfig::load(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(ConfigError::Io { .. })));
}

#[test]
fn test_load_malformed_file_is_toml_error() {
    let file = write_config("whitelist = [not toml");
    let result = GatewayConfig::load(file.path());
    assert!(matches!(result, Err(ConfigError::Toml { .. })));
}

#[test]
fn test_empty_config_uses_defaults() {
    let config = GatewayConfig::from_toml_str("").unwrap();
    let snapshot = GatewaySnapshot::build(config).unwrap();

    assert!(snapshot.name_pattern().is_none());
    assert!(!snapshot.whitelist());
    assert!(snapshot.registry().is_empty());
    assert_eq!(snapshot.pipeline().max_local_id_attempts, 16);
}

#[test]
fn test_reload_swaps_snapshot() {
    let shared = SharedConfig::new(
        GatewaySnapshot::build(GatewayConfig::default()).unwrap(),
    );
    let before = shared.load();

    shared
        .reload(GatewayConfig::from_toml_str(FULL_CONFIG).unwrap())
        .unwrap();

    // Old readers keep their snapshot; new readers see the reload.
    assert!(before.registry().is_empty());
    assert_eq!(shared.load().registry().len(), 2);
}

#[test]
fn test_reload_with_bad_global_pattern_keeps_old_snapshot() {
    let shared = SharedConfig::new(
        GatewaySnapshot::build(
            GatewayConfig::from_toml_str(FULL_CONFIG).unwrap(),
        )
        .unwrap(),
    );
    let bad = GatewayConfig {
        name_allowed_regular: "(".into(),
        ..GatewayConfig::default()
    };

    let result = shared.reload(bad);

    assert!(matches!(result, Err(ConfigError::InvalidRegex { .. })));
    assert_eq!(shared.load().registry().len(), 2);
}
