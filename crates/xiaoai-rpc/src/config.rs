//! Device configuration.
//!
//! Stored as camelCase JSON, by default at `~/.config/xiaoai/config.json`:
//!
//! ```json
//! { "host": "192.168.1.20", "port": 18888, "token": "...", "timeoutSecs": 10 }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use tracing::warn;

use crate::client::{DEFAULT_PORT, DEFAULT_TIMEOUT};
use crate::error::ConfigError;

const KNOWN_FIELDS: [&str; 4] = ["host", "port", "token", "timeoutSecs"];

/// Connection settings for one speaker
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_token"
    )]
    pub token: Option<Secret<String>>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

#[allow(clippy::ref_option)] // signature dictated by serde's serialize_with
fn serialize_token<S: Serializer>(
    token: &Option<Secret<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match token {
        Some(secret) => serializer.serialize_str(secret.expose_secret()),
        None => serializer.serialize_none(),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Default config file location, if the platform has a config directory.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "xiaoai").map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load config from file, falling back to defaults when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid JSON.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        warn_unknown_fields(&content, path);
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for an empty host, port 0 or a zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid("host must not be empty".to_string()));
        }
        if self.port == 0 {
            return Err(ConfigError::Invalid("port must be non-zero".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "timeoutSecs must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Effective config as JSON with the token masked.
    #[must_use]
    pub fn redacted(&self) -> Value {
        serde_json::json!({
            "host": self.host,
            "port": self.port,
            "token": self.token.as_ref().map(|_| "********"),
            "timeoutSecs": self.timeout_secs,
        })
    }
}

fn warn_unknown_fields(content: &str, path: &Path) {
    let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(content) else {
        return;
    };

    for key in obj.keys() {
        if !KNOWN_FIELDS.contains(&key.as_str()) {
            warn!("Unknown config field in {}: {key}", path.display());
        }
    }
}
