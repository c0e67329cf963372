use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::host::{Host, default_hosts};
use crate::probe::BackendKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_hosts")]
    pub hosts: Vec<Host>,
    #[serde(default)]
    pub backend: BackendKind,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            hosts: default_hosts(),
            backend: BackendKind::default(),
        }
    }
}

impl AppConfig {
    pub fn get_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NoConfigDir)?
            .join("Pinguin");

        fs::create_dir_all(&config_dir)?;
        Ok(config_dir.join("config.json"))
    }

    /// Loads the user's config, writing the defaults on first start.
    ///
    /// Never fails: problems are logged and the defaults are used.
    pub fn load() -> Self {
        let path = match Self::get_config_path() {
            Ok(path) => path,
            Err(e) => {
                warn!("{e}, using default hosts");
                return Self::default();
            }
        };

        if !path.exists() {
            let config = Self::default();
            match config.save_to(&path) {
                Ok(()) => info!("Wrote default config to {}", path.display()),
                Err(e) => warn!("Failed to write default config: {e}"),
            }
            return config;
        }

        Self::load_from(&path).unwrap_or_else(|e| {
            warn!("Failed to load {}: {e}, using default hosts", path.display());
            Self::default()
        })
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Hosts whose address cannot be probed. They stay in the list and
    /// will simply report loss.
    pub fn validate(&self) -> Vec<ConfigError> {
        self.hosts
            .iter()
            .filter_map(|host| host.validate().err())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pinguin-{}-{name}.json", std::process::id()))
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("roundtrip");
        let config = AppConfig {
            hosts: vec![Host::new("Local", "127.0.0.1")],
            backend: BackendKind::Icmp,
        };

        config.save_to(&path).unwrap();
        let loaded = AppConfig::load_from(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_malformed_file_is_error() {
        let path = temp_path("malformed");
        fs::write(&path, "{ hosts: nope").unwrap();
        let result = AppConfig::load_from(&path);
        let _ = fs::remove_file(&path);

        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_validate_reports_bad_hosts() {
        let config = AppConfig {
            hosts: vec![Host::new("Good", "8.8.8.8"), Host::new("Bad", "not a host")],
            backend: BackendKind::System,
        };

        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("Bad"));
    }
}
