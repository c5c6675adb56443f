use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::constants::server::{DEFAULT_PORT, PORT_ENV};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// JSON file replacing the embedded seed dataset.
    pub seed_path: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            worker_threads: 2,
            seed_path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,

    pub port: u16,

    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
        }
    }
}

/// Where the effective config came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Defaults => f.write_str("built-in defaults"),
        }
    }
}

impl Config {
    /// Reads the first config file found, or defaults, then applies
    /// environment overrides.
    pub fn load() -> Result<(Self, ConfigSource)> {
        let (mut config, source) = Self::load_first(&Self::config_paths())?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok((config, source))
    }

    /// Like [`Config::load`] but reads an explicit file.
    pub fn load_with_path(path: &Path) -> Result<(Self, ConfigSource)> {
        let mut config = Self::load_from_path(path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok((config, ConfigSource::File(path.to_path_buf())))
    }

    /// Loads the first existing file of `paths`, or defaults if none exists.
    pub fn load_first(paths: &[PathBuf]) -> Result<(Self, ConfigSource)> {
        match paths.iter().find(|p| p.exists()) {
            Some(path) => Ok((Self::load_from_path(path)?, ConfigSource::File(path.clone()))),
            None => Ok((Self::default(), ConfigSource::Defaults)),
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Applies `PORT` from `lookup`. An unset or empty value keeps the
    /// configured port.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(port) = lookup(PORT_ENV).filter(|p| !p.trim().is_empty()) {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid {PORT_ENV} value: {port}"))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            bail!("server.port must be between 1 and 65535");
        }

        self.server
            .host
            .parse::<IpAddr>()
            .with_context(|| format!("Invalid server.host: {}", self.server.host))?;

        Ok(())
    }

    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![Self::default_config_path()];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("reelbox").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".reelbox").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    /// Writes a default `config.toml` in the working directory. Returns
    /// `false` if one already exists.
    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            return Ok(false);
        }
        Self::default().save_to_path(&path)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 1234);
        assert_eq!(config.bind_address(), "0.0.0.0:1234");
        assert!(config.general.seed_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 8080

            [general]
            seed_path = "data/custom.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.seed_path.as_deref(), Some("data/custom.json"));
        assert!(config.observability.metrics_enabled);
    }

    #[test]
    fn test_port_env_override() {
        let mut config = Config::default();
        config
            .apply_env_overrides(|key| (key == "PORT").then(|| "4321".to_string()))
            .unwrap();
        assert_eq!(config.server.port, 4321);
    }

    #[test]
    fn test_empty_port_env_is_ignored() {
        let mut config = Config::default();
        config
            .apply_env_overrides(|_| Some("  ".to_string()))
            .unwrap();
        assert_eq!(config.server.port, 1234);
    }

    #[test]
    fn test_invalid_port_env_is_error() {
        let mut config = Config::default();
        let err = config
            .apply_env_overrides(|_| Some("http".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("Invalid PORT value"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.server.host = "localhost:80".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_first_reports_source() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let present = dir.path().join("config.toml");
        std::fs::write(&present, "[server]\nport = 7000\n").unwrap();

        let (config, source) =
            Config::load_first(&[missing.clone(), present.clone()]).unwrap();
        assert_eq!(config.server.port, 7000);
        assert_eq!(source, ConfigSource::File(present.clone()));
        assert_eq!(source.to_string(), present.display().to_string());

        let (config, source) = Config::load_first(&[missing]).unwrap();
        assert_eq!(config.server.port, 1234);
        assert_eq!(source, ConfigSource::Defaults);
        assert_eq!(source.to_string(), "built-in defaults");
    }

    #[test]
    fn test_load_with_path_reports_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reelbox.toml");
        std::fs::write(&path, "[general]\nlog_level = \"debug\"\n").unwrap();

        let (config, source) = Config::load_with_path(&path).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(source, ConfigSource::File(path));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.server.port = 9000;
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.server.port, 9000);
    }
}
