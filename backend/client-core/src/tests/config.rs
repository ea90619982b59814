use crate::DEFAULT_SERVER_URL;
use crate::config::{
    ClientConfig, FileConfig, ServerSection, SessionSection, normalize_value, parse_server_url,
};
use crate::error::ConfigError;

use std::path::{Path, PathBuf};
use std::time::Duration;

#[test]
fn given_default_constant_when_read_then_points_at_local_server() {
    assert_eq!(DEFAULT_SERVER_URL, "http://localhost:8080");
}

#[test]
fn given_blank_values_when_normalized_then_treated_as_unset() {
    assert_eq!(normalize_value(None), None);
    assert_eq!(normalize_value(Some("")), None);
    assert_eq!(normalize_value(Some("   ")), None);
    assert_eq!(
        normalize_value(Some("  http://meiki.local ")),
        Some("http://meiki.local".to_string())
    );
}

/// **VALUE**: Verifies defaults when nothing is configured.
#[test]
fn given_no_overrides_when_resolving_then_uses_defaults() {
    let data_dir = Path::new("/tmp/meiki-data");

    let config = ClientConfig::resolve(FileConfig::default(), None, data_dir).unwrap();

    assert_eq!(config.server_url.as_str(), "http://localhost:8080/");
    assert_eq!(config.session_file, data_dir.join("session.json"));
    assert_eq!(config.request_timeout, None);
}

/// **VALUE**: Verifies the environment variable beats the config file.
#[test]
fn given_file_and_env_urls_when_resolving_then_env_wins() {
    let file = FileConfig {
        server: ServerSection {
            url: Some("http://from-file:1000".to_string()),
            request_timeout_secs: Some(5),
        },
        session: SessionSection {
            file: Some(PathBuf::from("/custom/session.json")),
        },
    };

    let config = ClientConfig::resolve(
        file,
        Some("http://from-env:2000".to_string()),
        Path::new("/unused"),
    )
    .unwrap();

    assert_eq!(config.server_url.as_str(), "http://from-env:2000/");
    assert_eq!(config.session_file, PathBuf::from("/custom/session.json"));
    assert_eq!(config.request_timeout, Some(Duration::from_secs(5)));
}

/// **VALUE**: An empty env var falls through to the next layer.
///
/// **BUG THIS CATCHES**: Would catch `MEIKI_SERVER_URL=` producing an invalid empty URL
/// instead of the default.
#[test]
fn given_empty_env_url_when_resolving_then_falls_back() {
    let config =
        ClientConfig::resolve(FileConfig::default(), Some(String::new()), Path::new("/d")).unwrap();

    assert_eq!(config.server_url.as_str(), "http://localhost:8080/");
}

#[test]
fn given_zero_timeout_when_resolving_then_validation_error() {
    let file = FileConfig {
        server: ServerSection {
            url: None,
            request_timeout_secs: Some(0),
        },
        ..FileConfig::default()
    };

    let result = ClientConfig::resolve(file, None, Path::new("/d"));

    assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
}

#[test]
fn given_non_http_scheme_when_parsing_server_url_then_rejected() {
    assert!(parse_server_url("ftp://localhost").is_err());
    assert!(parse_server_url("localhost:8080").is_err());
    assert!(parse_server_url("https://meiki.example").is_ok());
}

#[test]
fn given_override_when_applied_then_replaces_server_url() {
    let config = ClientConfig::resolve(FileConfig::default(), None, Path::new("/d")).unwrap();

    let overridden = config
        .clone()
        .with_server_url(Some("http://127.0.0.1:9999"))
        .unwrap();
    let untouched = config.clone().with_server_url(Some("  ")).unwrap();

    assert_eq!(overridden.server_url.as_str(), "http://127.0.0.1:9999/");
    assert_eq!(untouched, config);
}

#[test]
fn given_toml_file_when_loaded_then_sections_parsed() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[server]\nurl = \"http://meiki.local:8080\"\nrequest_timeout_secs = 10\n",
    )
    .unwrap();

    let file = FileConfig::load(dir.path()).unwrap();

    assert_eq!(file.server.url.as_deref(), Some("http://meiki.local:8080"));
    assert_eq!(file.server.request_timeout_secs, Some(10));
    assert_eq!(file.session, SessionSection::default());
}

#[test]
fn given_missing_toml_file_when_loaded_then_defaults() {
    let dir = tempfile::tempdir().unwrap();

    let file = FileConfig::load(dir.path()).unwrap();

    assert_eq!(file, FileConfig::default());
}

#[test]
fn given_corrupted_toml_file_when_loaded_then_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.toml"), "[server\nurl = ").unwrap();

    let result = FileConfig::load(dir.path());

    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

/// **VALUE**: Verifies the user-facing config text drops the variant prefix and location.
#[test]
fn given_zero_timeout_error_when_asking_user_message_then_reason_only() {
    let file = FileConfig {
        server: ServerSection {
            url: None,
            request_timeout_secs: Some(0),
        },
        ..FileConfig::default()
    };

    let err = ClientConfig::resolve(file, None, Path::new("/data")).unwrap_err();

    assert_eq!(err.user_message(), "request_timeout_secs must be greater than 0");
}
