use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use catalog_sync_bigcommerce::BigCommerceConfig;
use serde::{Deserialize, Serialize};

/// Environment variable that overrides `access_token` from the file.
pub const ACCESS_TOKEN_ENV: &str = "BIGCOMMERCE_ACCESS_TOKEN";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    pub store_hash: Option<String>,
    pub access_token: Option<String>,
    pub api_base_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    pub database: Option<PathBuf>,
}

fn default_timeout_secs() -> u64 {
    30
}

impl AppConfig {
    fn default_values() -> Self {
        Self {
            request_timeout_secs: default_timeout_secs(),
            ..Self::default()
        }
    }

    /// Remote connection settings. `token` is the value of the access token
    /// environment variable, if set; it wins over the file.
    pub fn bigcommerce(&self, token: Option<String>) -> Result<BigCommerceConfig> {
        let store_hash = self
            .store_hash
            .clone()
            .filter(|h| !h.is_empty())
            .context("store_hash is not configured")?;
        let access_token = token
            .or_else(|| self.access_token.clone())
            .filter(|t| !t.is_empty())
            .with_context(|| format!("no access token: set {ACCESS_TOKEN_ENV} or access_token"))?;

        Ok(BigCommerceConfig {
            store_hash,
            access_token,
            api_base_url: self.api_base_url.clone(),
            timeout: Some(Duration::from_secs(self.request_timeout_secs)),
        })
    }

    /// Database file, falling back to the platform data directory.
    pub fn database_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.database {
            return Ok(path.clone());
        }
        let base = dirs::data_dir().context("could not determine data directory")?;
        Ok(base.join("catalog-sync").join("catalog.db"))
    }
}

/// Config file path: `~/.config/catalog-sync/config.toml`
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("catalog-sync").join("config.toml"))
}

pub fn parse_config(contents: &str) -> Result<AppConfig, toml::de::Error> {
    toml::from_str(contents)
}

/// Load config from `path`, or the default location when `path` is `None`.
///
/// A missing file at the default location yields an empty config; an
/// explicitly given path must exist.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let (path, explicit) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => match config_path() {
            Some(p) => (p, false),
            None => return Ok(AppConfig::default_values()),
        },
    };

    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if !explicit && e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(AppConfig::default_values());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read config at {}", path.display()));
        }
    };

    parse_config(&contents).with_context(|| format!("failed to parse config at {}", path.display()))
}
