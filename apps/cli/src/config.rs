//! Uploader configuration.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/kobiton/upload.toml`
//! - Windows: `%APPDATA%/kobiton/upload.toml`
//!
//! A missing file means defaults. The file is never created automatically,
//! since it may hold credentials.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use kobiton_api::{ClientConfig, DEFAULT_BASE_URL};
use kobiton_upload::{PollConfig, UploadSettings};
use serde::{Deserialize, Serialize};

/// Uploader configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Kobiton API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// State queries before giving up on a rename.
    #[serde(default = "default_poll_max_attempts")]
    pub poll_max_attempts: u32,

    /// Pause between state queries in seconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}

fn default_request_timeout() -> u64 {
    60
}

fn default_poll_max_attempts() -> u32 {
    10
}

fn default_poll_interval() -> u64 {
    2
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
            poll_max_attempts: default_poll_max_attempts(),
            poll_interval_secs: default_poll_interval(),
            username: None,
            api_key: None,
        }
    }
}

impl Config {
    /// Loads `explicit` if given (it must exist), otherwise the platform
    /// default path if present, otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let path = config_path();
        if path.exists() {
            Self::from_file(&path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Config::default())
        }
    }

    fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Upload settings, with `base_url_override` taking precedence.
    pub fn settings(&self, base_url_override: Option<&str>) -> UploadSettings {
        UploadSettings {
            client: ClientConfig {
                base_url: base_url_override.unwrap_or(&self.base_url).to_string(),
                timeout: Duration::from_secs(self.request_timeout_secs),
            },
            poll: PollConfig {
                max_attempts: self.poll_max_attempts.max(1),
                interval: Duration::from_secs(self.poll_interval_secs),
            },
        }
    }
}

/// Returns the platform-specific configuration file path.
fn config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        PathBuf::from(appdata).join("kobiton").join("upload.toml")
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home)
            .join(".config")
            .join("kobiton")
            .join("upload.toml")
    }
}
