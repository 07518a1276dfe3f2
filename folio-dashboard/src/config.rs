//! Dashboard configuration
//!
//! Loaded from `<config_dir>/folio-dashboard/config.toml` when present,
//! defaults otherwise. `FOLIO_HEALTH_URL` overrides the endpoint.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub endpoint: String,
    pub poll_interval_secs: u64,
    pub log_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub console_height: usize,
    pub refresh_millis: u64,
    pub log_level: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be greater than zero")]
    ZeroValue(&'static str),
    #[error("endpoint must be an http(s) URL, got '{0}'")]
    BadEndpoint(String),
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8080/api/health".to_string(),
            poll_interval_secs: 3,
            log_interval_secs: 2,
            request_timeout_secs: 5,
            console_height: 6,
            refresh_millis: 500,
            log_level: "info".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Load config from the OS-specific location, then apply env overrides
    pub async fn load() -> Result<Self> {
        let mut config = match Self::config_file_path() {
            Ok(path) if path.exists() => Self::load_from(&path).await?,
            _ => Self::default(),
        };
        if let Ok(url) = std::env::var("FOLIO_HEALTH_URL") {
            config.endpoint = url;
        }
        config.validate()?;
        Ok(config)
    }

    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid config in {}", path.display()))
    }

    /// Get OS-specific config file path
    pub fn config_file_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        path.push("folio-dashboard");
        path.push("config.toml");
        Ok(path)
    }

    /// Zero periods would make the tokio timers panic
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("poll_interval_secs", self.poll_interval_secs),
            ("log_interval_secs", self.log_interval_secs),
            ("request_timeout_secs", self.request_timeout_secs),
            ("refresh_millis", self.refresh_millis),
            ("console_height", self.console_height as u64),
        ];
        if let Some(&(name, _)) = checks.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::ZeroValue(name));
        }
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(ConfigError::BadEndpoint(self.endpoint.clone()));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn log_interval(&self) -> Duration {
        Duration::from_secs(self.log_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn refresh(&self) -> Duration {
        Duration::from_millis(self.refresh_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert_eq!(config.poll_interval(), Duration::from_secs(3));
        assert_eq!(config.log_interval(), Duration::from_secs(2));
        assert!(config.endpoint.ends_with("/api/health"));
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_config_file_path() {
        let path = DashboardConfig::config_file_path().unwrap();
        assert!(path.to_string_lossy().contains("folio-dashboard"));
        assert!(path.to_string_lossy().ends_with("config.toml"));
    }

    #[tokio::test]
    async fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "endpoint = \"https://example.dev/api/health\"\nconsole_height = 10").unwrap();

        let config = DashboardConfig::load_from(file.path()).await.unwrap();
        assert_eq!(config.endpoint, "https://example.dev/api/health");
        assert_eq!(config.console_height, 10);
        assert_eq!(config.poll_interval_secs, 3);
    }

    #[test]
    fn test_rejects_zero_periods_and_bad_endpoint() {
        let config = DashboardConfig { poll_interval_secs: 0, ..Default::default() };
        assert_eq!(config.validate(), Err(ConfigError::ZeroValue("poll_interval_secs")));

        let config = DashboardConfig { endpoint: "localhost:8080".into(), ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::BadEndpoint(_))));
    }
}
