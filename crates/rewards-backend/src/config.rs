use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::auth::CLIENT_ID;
use crate::github::{RELEASE_HOST, RELEASE_PATH};
use crate::twitch::HELIX_HOST;

const APP_NAME: &str = "rewards-theater";
const CONFIG_FILE: &str = "config.json";

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_client_id")]
    pub client_id: String,
    #[serde(default = "default_helix_host")]
    pub helix_host: String,
    #[serde(default = "default_release_host")]
    pub release_host: String,
    #[serde(default = "default_release_path")]
    pub release_path: String,
    /// Version compared against the latest release
    #[serde(default = "default_current_version")]
    pub current_version: String,
    /// Worker thread override; never fewer than two are started
    #[serde(default)]
    pub worker_threads: Option<usize>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_client_id() -> String {
    CLIENT_ID.to_string()
}

fn default_helix_host() -> String {
    HELIX_HOST.to_string()
}

fn default_release_host() -> String {
    RELEASE_HOST.to_string()
}

fn default_release_path() -> String {
    RELEASE_PATH.to_string()
}

fn default_current_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_user_agent() -> String {
    format!("RewardsTheater/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client_id: default_client_id(),
            helix_host: default_helix_host(),
            release_host: default_release_host(),
            release_path: default_release_path(),
            current_version: default_current_version(),
            worker_threads: None,
            user_agent: default_user_agent(),
        }
    }
}

/// Configuration manager
///
/// Read-only: the file is loaded once and never written back.
pub struct ConfigManager {
    config: Config,
    path: PathBuf,
}

impl ConfigManager {
    /// Loads the configuration from the platform config directory
    pub fn new() -> Result<Self> {
        let config_file = Self::config_dir()?.join(CONFIG_FILE);
        Self::load_from(&config_file)
    }

    /// Loads the configuration from `path`
    ///
    /// A missing file yields the defaults, as does a malformed one (logged).
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let config = if path.exists() {
            let data = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&data).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed config file {}: {}", path.display(), e);
                Config::default()
            })
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
            Config::default()
        };

        Ok(Self {
            config,
            path: path.to_path_buf(),
        })
    }

    /// Gets a copy of the current configuration
    pub fn get(&self) -> Config {
        self.config.clone()
    }

    /// Path the configuration was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Could not determine config directory")?
            .join(APP_NAME))
    }
}
