use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::api::DEFAULT_STORE_URL;

pub const STORE_URL_ENV: &str = "POSTGRID_STORE_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontendConfig {
    /// Origin of the document store; collections are read from
    /// `{store_url}/{resource}.json`.
    #[serde(default = "default_store_url")]
    pub store_url: String,

    /// Per-request timeout for store calls (in seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            store_url: default_store_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl FrontendConfig {
    /// Reads the config file when one exists, then applies environment
    /// overrides. A broken file is logged and replaced by defaults.
    pub fn load() -> Self {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::from_file(&path).unwrap_or_else(|err| {
                warn!("ignoring config file {}: {err:#}", path.display());
                Self::default()
            }),
            _ => Self::default(),
        };
        config.apply_env(std::env::var(STORE_URL_ENV).ok());
        info!("store URL: {}", config.store_url);
        config
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("postgrid").join("frontend.toml"))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("failed to parse frontend config")
    }

    fn apply_env(&mut self, store_url: Option<String>) {
        if let Some(url) = store_url.filter(|url| !url.trim().is_empty()) {
            self.store_url = url;
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

fn default_store_url() -> String {
    DEFAULT_STORE_URL.to_string()
}

fn default_request_timeout() -> u64 {
    15
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn empty_file_uses_defaults() {
        let config = FrontendConfig::from_toml_str("").expect("config");
        assert_eq!(config, FrontendConfig::default());
        assert_eq!(config.request_timeout(), Duration::from_secs(15));
    }

    #[test]
    fn file_values_are_read() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("frontend.toml");
        std::fs::write(
            &path,
            "store_url = \"http://127.0.0.1:9000\"\nrequest_timeout_secs = 3\n",
        )
        .expect("write");
        let config = FrontendConfig::from_file(&path).expect("config");
        assert_eq!(config.store_url, "http://127.0.0.1:9000");
        assert_eq!(config.request_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn env_override_wins_unless_blank() {
        let mut config = FrontendConfig::default();
        config.apply_env(Some("  ".into()));
        assert_eq!(config.store_url, DEFAULT_STORE_URL);
        config.apply_env(Some("http://localhost:8080".into()));
        assert_eq!(config.store_url, "http://localhost:8080");
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(FrontendConfig::from_toml_str("store_url = [").is_err());
    }
}
