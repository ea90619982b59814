//! Client configuration.
//!
//! Resolution order, later wins:
//! 1. Built-in defaults (`http://localhost:8080`, session file in the data dir)
//! 2. `{config_dir}/meiki/config.toml`
//! 3. `.env` file (cwd, then executable directory)
//! 4. `MEIKI_SERVER_URL` environment variable
//! 5. Explicit override from the caller (e.g. a CLI flag)
//!
//! Empty or whitespace-only values count as unset at every layer.

use crate::DEFAULT_SERVER_URL;
use crate::error::config::ConfigError;

use common::ErrorLocation;

use std::env;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use url::Url;

/// Environment variable selecting the server base address.
pub const SERVER_URL_ENV: &str = "MEIKI_SERVER_URL";

const APP_DIR_NAME: &str = "meiki";
const CONFIG_FILE_NAME: &str = "config.toml";
const SESSION_FILE_NAME: &str = "session.json";

// ============================================
// FILE CONFIG
// ============================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerSection {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionSection {
    #[serde(default)]
    pub file: Option<PathBuf>,
}

/// Shape of `config.toml`. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub session: SessionSection,
}

impl FileConfig {
    /// Load `{config_dir}/config.toml`, or defaults when the file is missing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be read or parsed.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            debug!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path).map_err(|e| {
            warn!("Failed to read config file: {}", e);
            ConfigError::ReadError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                source: e,
            }
        })?;

        let config: FileConfig = toml::from_str(&contents).map_err(|e| {
            warn!("Failed to parse config TOML: {}", e);
            ConfigError::ParseError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                reason: e.to_string(),
            }
        })?;

        info!("Config loaded from {}", config_path.display());
        Ok(config)
    }
}

// ============================================
// RESOLVED CONFIG
// ============================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub server_url: Url,
    pub session_file: PathBuf,
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Load config using the platform config and data directories.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a platform directory cannot be determined or if
    /// any layer holds an invalid value.
    pub fn load() -> Result<Self, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::DirectoryNotFound {
                location: ErrorLocation::from(Location::caller()),
                what: "config directory",
            })?
            .join(APP_DIR_NAME);

        Self::load_from(&config_dir, &app_data_dir()?)
    }

    /// Load config from explicit directories. Reads `.env` and the process environment.
    pub fn load_from(config_dir: &Path, data_dir: &Path) -> Result<Self, ConfigError> {
        let env_loaded = try_load_dotenv();
        if !env_loaded {
            debug!("No .env file found - will check existing environment variables");
        }

        let file = FileConfig::load(config_dir)?;
        let env_url = match env::var(SERVER_URL_ENV) {
            Ok(value) => Some(value),
            Err(env::VarError::NotPresent) => None,
            Err(env::VarError::NotUnicode(_)) => {
                warn!("Env var {} contains invalid unicode, ignoring", SERVER_URL_ENV);
                None
            }
        };

        Self::resolve(file, env_url, data_dir)
    }

    /// Merge the layers without touching the filesystem or environment.
    pub fn resolve(
        file: FileConfig,
        env_url: Option<String>,
        data_dir: &Path,
    ) -> Result<Self, ConfigError> {
        let server_url = normalize_value(env_url.as_deref())
            .or_else(|| normalize_value(file.server.url.as_deref()))
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

        let session_file = file
            .session
            .file
            .filter(|path| !path.as_os_str().is_empty())
            .unwrap_or_else(|| data_dir.join(SESSION_FILE_NAME));

        let request_timeout = match file.server.request_timeout_secs {
            Some(0) => {
                return Err(ConfigError::ValidationError {
                    location: ErrorLocation::from(Location::caller()),
                    reason: "request_timeout_secs must be greater than 0".to_string(),
                });
            }
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };

        let config = Self {
            server_url: parse_server_url(&server_url)?,
            session_file,
            request_timeout,
        };

        debug!("Resolved server URL: {}", config.server_url);
        Ok(config)
    }

    /// Replace the server URL, ignoring empty overrides.
    pub fn with_server_url(mut self, server_url: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(value) = normalize_value(server_url) {
            self.server_url = parse_server_url(&value)?;
        }
        Ok(self)
    }
}

/// `{data_dir}/meiki`, where the session and log files live.
pub fn app_data_dir() -> Result<PathBuf, ConfigError> {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| ConfigError::DirectoryNotFound {
            location: ErrorLocation::from(Location::caller()),
            what: "data directory",
        })
}

#[track_caller]
pub(crate) fn parse_server_url(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|e| ConfigError::ValidationError {
        location: ErrorLocation::from(Location::caller()),
        reason: format!("Invalid server URL '{value}': {e}"),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::ValidationError {
            location: ErrorLocation::from(Location::caller()),
            reason: format!("Invalid server URL scheme: {}", url.scheme()),
        });
    }

    Ok(url)
}

pub(crate) fn normalize_value(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Attempts to load .env from known locations.
fn try_load_dotenv() -> bool {
    if let Ok(path) = dotenvy::dotenv() {
        info!("Loaded .env from: {:?}", path);
        return true;
    }

    if let Ok(exe_path) = env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let env_path = exe_dir.join(".env");
            if env_path.exists() {
                match dotenvy::from_path(&env_path) {
                    Ok(_) => {
                        info!("Loaded .env from: {:?}", env_path);
                        return true;
                    }
                    Err(e) => {
                        warn!("Failed to parse .env at {:?}: {}", env_path, e);
                    }
                }
            }
        }
    }

    false
}
