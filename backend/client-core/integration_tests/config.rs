use client_core::DEFAULT_SERVER_URL;
use client_core::config::{ClientConfig, SERVER_URL_ENV};

use serial_test::serial;
use tempfile::TempDir;

struct EnvGuard;

impl EnvGuard {
    fn set(value: &str) -> Self {
        // SAFETY: tests touching the process environment are #[serial]
        unsafe { std::env::set_var(SERVER_URL_ENV, value) };
        EnvGuard
    }

    fn unset() -> Self {
        // SAFETY: tests touching the process environment are #[serial]
        unsafe { std::env::remove_var(SERVER_URL_ENV) };
        EnvGuard
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        // SAFETY: tests touching the process environment are #[serial]
        unsafe { std::env::remove_var(SERVER_URL_ENV) };
    }
}

/// **VALUE**: Verifies the env var beats `config.toml`.
#[test]
#[serial]
fn given_env_var_and_config_file_when_loading_then_env_var_wins() {
    let config_dir = TempDir::new().unwrap();
    let data_dir = TempDir::new().unwrap();
    std::fs::write(
        config_dir.path().join("config.toml"),
        "[server]\nurl = \"http://from-file:9000\"\n",
    )
    .unwrap();
    let _guard = EnvGuard::set("http://from-env:7000");

    let config = ClientConfig::load_from(config_dir.path(), data_dir.path()).unwrap();

    assert_eq!(config.server_url.as_str(), "http://from-env:7000/");
}

#[test]
#[serial]
fn given_empty_env_var_when_loading_then_falls_back_to_file() {
    let config_dir = TempDir::new().unwrap();
    let data_dir = TempDir::new().unwrap();
    std::fs::write(
        config_dir.path().join("config.toml"),
        "[server]\nurl = \"http://from-file:9000\"\n",
    )
    .unwrap();
    let _guard = EnvGuard::set("");

    let config = ClientConfig::load_from(config_dir.path(), data_dir.path()).unwrap();

    assert_eq!(config.server_url.as_str(), "http://from-file:9000/");
}

/// **VALUE**: Verifies a bare environment yields the built-in defaults.
#[test]
#[serial]
fn given_no_sources_when_loading_then_defaults_used() {
    let config_dir = TempDir::new().unwrap();
    let data_dir = TempDir::new().unwrap();
    let _guard = EnvGuard::unset();

    let config = ClientConfig::load_from(config_dir.path(), data_dir.path()).unwrap();

    assert_eq!(
        config.server_url.as_str().trim_end_matches('/'),
        DEFAULT_SERVER_URL
    );
    assert_eq!(config.session_file, data_dir.path().join("session.json"));
    assert_eq!(config.request_timeout, None);
}
