//! Client configuration loading from file and environment variables.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use voxroom_voice::MediaConfig;

/// Top-level client configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Backend service settings.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Media server settings.
    #[serde(default)]
    pub media: MediaConfig,

    /// Document upload settings.
    #[serde(default)]
    pub upload: UploadConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the token, document and upload endpoints live.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the backend, e.g. `http://localhost:5000`. Required.
    #[serde(default)]
    pub base_url: String,
}

/// Limits applied to documents before they are sent.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Largest accepted file, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_bytes: u64,

    /// How long a success message stays visible, in milliseconds.
    #[serde(default = "default_message_ttl_ms")]
    pub message_ttl_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "voxroom_client=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,

    /// File that receives log output. The terminal belongs to the UI.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_max_upload_bytes() -> u64 {
    10 * 1024 * 1024
}

fn default_message_ttl_ms() -> u64 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "voxroom.log".to_string()
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: default_max_upload_bytes(),
            message_ttl_ms: default_message_ttl_ms(),
        }
    }
}

impl UploadConfig {
    pub fn message_ttl(&self) -> Duration {
        Duration::from_millis(self.message_ttl_ms)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            file: default_log_file(),
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// No backend URL in the file or the environment.
    #[error("backend.base_url is required (or set VOXROOM_BACKEND_URL)")]
    MissingBackendUrl,

    /// The backend URL is not an http(s) URL.
    #[error("backend.base_url is not a valid http(s) URL: {0}")]
    InvalidBackendUrl(String),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `VOXROOM_BACKEND_URL` overrides `backend.base_url`
/// - `VOXROOM_MEDIA_URL` overrides `media.server_url` (`LIVEKIT_URL` is read
///   when it is unset)
/// - `VOXROOM_LOG_LEVEL` overrides `logging.level`
/// - `VOXROOM_LOG_JSON` overrides `logging.json` (set to "true" to enable)
/// - `VOXROOM_LOG_FILE` overrides `logging.file`
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed, or
/// if the resulting configuration has no usable backend URL.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Same as [`load_config`], reading overrides through `env`.
pub fn load_config_with_env(
    path: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    if let Some(url) = env("VOXROOM_BACKEND_URL") {
        config.backend.base_url = url;
    }
    if let Some(url) = env("VOXROOM_MEDIA_URL").or_else(|| env("LIVEKIT_URL")) {
        config.media.server_url = url;
    }
    if let Some(level) = env("VOXROOM_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = env("VOXROOM_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
    if let Some(file) = env("VOXROOM_LOG_FILE") {
        config.logging.file = file;
    }

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    let base_url = config.backend.base_url.trim();
    if base_url.is_empty() {
        return Err(ConfigError::MissingBackendUrl);
    }
    match url::Url::parse(base_url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => Err(ConfigError::InvalidBackendUrl(base_url.to_string())),
    }
}
