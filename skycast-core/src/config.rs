use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf, time::Duration};

use crate::units::Units;

/// Environment variable that overrides the stored API credential.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// OpenWeather API credential.
    ///
    /// Example TOML:
    /// api_key = "..."
    /// units = "imperial"
    pub api_key: Option<String>,

    /// Preferred display units; metric when absent.
    pub units: Option<Units>,

    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Resolve the API credential: environment first, then the config file.
    pub fn api_key(&self) -> Result<String> {
        if let Ok(key) = env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                return Ok(key);
            }
        }

        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No API key configured.\n\
                     Hint: run `skycast configure` or set {API_KEY_ENV}."
                )
            })
    }

    pub fn units(&self) -> Units {
        self.units.unwrap_or_default()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_errors_when_not_set() {
        if env::var(API_KEY_ENV).is_ok() {
            // Ambient override present; nothing to assert here.
            return;
        }

        let cfg = Config::default();
        let err = cfg.api_key().unwrap_err();
        assert!(err.to_string().contains("Hint: run `skycast configure`"));
    }

    #[test]
    fn stored_api_key_is_returned() {
        let cfg = Config {
            api_key: Some("KEY".to_string()),
            ..Default::default()
        };

        assert_eq!(cfg.api_key().expect("key must resolve"), "KEY");
    }

    #[test]
    fn blank_stored_api_key_counts_as_missing() {
        if env::var(API_KEY_ENV).is_ok() {
            return;
        }

        let cfg = Config {
            api_key: Some("   ".to_string()),
            ..Default::default()
        };

        assert!(cfg.api_key().is_err());
    }

    #[test]
    fn defaults_apply_when_fields_absent() {
        let cfg: Config = toml::from_str("").expect("empty config must parse");

        assert_eq!(cfg.units(), Units::Metric);
        assert_eq!(cfg.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn units_roundtrip_through_toml() {
        let cfg = Config {
            units: Some(Units::Imperial),
            ..Default::default()
        };

        let text = toml::to_string_pretty(&cfg).expect("config must serialize");
        assert!(text.contains("imperial"));

        let back: Config = toml::from_str(&text).expect("config must parse back");
        assert_eq!(back.units(), Units::Imperial);
    }
}
