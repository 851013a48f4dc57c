use super::*;
use crate::form::EmptyFieldPolicy;
use std::collections::HashMap;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn test_defaults_without_file_or_env() {
    let config = Config::from_sources(FileConfig::default(), no_env).unwrap();
    assert_eq!(config.bind_addr.to_string(), "127.0.0.1:3000");
    assert_eq!(config.api_url, "http://localhost:1337");
    assert_eq!(config.request_timeout_secs, 30);
    assert_eq!(config.logging.level, "info");
    assert!(config.logging.file.is_none());
    assert!(!config.secure_cookies);
    assert_eq!(config.forms.empty_fields, EmptyFieldPolicy::Warn);
}

#[test]
fn test_generated_toml_parses_back() {
    let mut config = Config::default();
    config.api_url = "https://api.example.com".to_string();
    config.secure_cookies = true;
    config.logging.file = Some(LogFile {
        rotation: LogRotation::Hourly,
        ..Default::default()
    });
    config.forms.empty_fields = EmptyFieldPolicy::Block;

    let file: FileConfig = toml::from_str(&config.to_toml()).unwrap();
    let reloaded = Config::from_sources(file, no_env).unwrap();

    assert_eq!(reloaded.api_url, "https://api.example.com");
    assert_eq!(reloaded.bind_addr, config.bind_addr);
    assert_eq!(reloaded.max_upload_bytes, config.max_upload_bytes);
    assert!(reloaded.secure_cookies);
    assert_eq!(reloaded.logging, config.logging);
    assert_eq!(reloaded.forms.empty_fields, EmptyFieldPolicy::Block);
}

#[test]
fn test_env_overrides_file() {
    let file: FileConfig = toml::from_str(
        r#"
        bind_addr = "0.0.0.0:8080"
        api_url = "http://file-api:1337"
        request_timeout_secs = 5

        [forms]
        empty_fields = "block"
        "#,
    )
    .unwrap();

    let env = env_from(&[
        ("EVENTS_API_URL", "http://env-api:1337"),
        ("EVENTS_WEB_EMPTY_FIELDS", "warn"),
    ]);
    let config = Config::from_sources(file, env).unwrap();

    assert_eq!(config.api_url, "http://env-api:1337");
    assert_eq!(config.bind_addr.to_string(), "0.0.0.0:8080");
    assert_eq!(config.request_timeout_secs, 5);
    assert_eq!(config.forms.empty_fields, EmptyFieldPolicy::Warn);
}

#[test]
fn test_unparseable_timeout_env_falls_through() {
    let file = FileConfig {
        request_timeout_secs: Some(12),
        ..Default::default()
    };
    let config =
        Config::from_sources(file, env_from(&[("EVENTS_WEB_TIMEOUT_SECS", "soon")])).unwrap();
    assert_eq!(config.request_timeout_secs, 12);
}

#[test]
fn test_invalid_bind_address_is_an_error() {
    let result = Config::from_sources(
        FileConfig::default(),
        env_from(&[("EVENTS_WEB_BIND", "not-an-address")]),
    );
    assert!(result.is_err());
}

#[test]
fn test_partial_logging_section_keeps_defaults() {
    let file: FileConfig = toml::from_str(
        r#"
        [logging]
        level = "DEBUG"
        file_enabled = true
        file_dir = "/var/log/events-web"
        "#,
    )
    .unwrap();
    let config = Config::from_sources(file, no_env).unwrap();
    assert_eq!(config.logging.level, "debug");
    let sink = config.logging.file.unwrap();
    assert_eq!(sink.dir, std::path::PathBuf::from("/var/log/events-web"));
    assert_eq!(sink.rotation, LogRotation::Daily);
    assert_eq!(sink.prefix, "events-web");
}

#[test]
fn test_disabled_file_sink_ignores_its_settings() {
    let file: FileConfig = toml::from_str(
        r#"
        [logging]
        file_dir = "/tmp/elsewhere"
        "#,
    )
    .unwrap();
    let config = Config::from_sources(file, no_env).unwrap();
    assert!(config.logging.file.is_none());
}

#[test]
fn test_unknown_log_level_is_an_error() {
    let file: FileConfig = toml::from_str(
        r#"
        [logging]
        level = "verbose"
        "#,
    )
    .unwrap();
    let err = Config::from_sources(file, no_env).unwrap_err();
    assert!(err.to_string().contains("verbose"));
}

#[test]
fn test_unknown_rotation_fails_to_parse() {
    let result: Result<FileConfig, _> = toml::from_str(
        r#"
        [logging]
        file_rotation = "weekly"
        "#,
    );
    assert!(result.is_err());
}

#[test]
fn test_secure_cookies_from_env() {
    let file = FileConfig {
        secure_cookies: Some(false),
        ..Default::default()
    };
    let config =
        Config::from_sources(file, env_from(&[("EVENTS_WEB_SECURE_COOKIES", "true")])).unwrap();
    assert!(config.secure_cookies);
}

#[test]
fn test_missing_file_means_defaults() {
    let path = std::env::temp_dir().join("events-web-no-such-config.toml");
    let file = Config::load_file_config(Some(&path)).unwrap();
    assert!(file.api_url.is_none());
    assert!(file.logging.is_none());
}

#[test]
fn test_broken_file_is_an_error() {
    let path = std::env::temp_dir().join(format!(
        "events-web-broken-{}.toml",
        std::process::id()
    ));
    std::fs::write(&path, "bind_addr = [unterminated").unwrap();
    let result = Config::load_file_config(Some(&path));
    let _ = std::fs::remove_file(&path);
    assert!(result.is_err());
}
