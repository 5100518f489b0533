//! Configuration file handling.
//!
//! Reads from `~/.config/drivebench/drivebench.toml`

use anyhow::{Context, Result};
use drivebench_core::SimulationSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// How long the UI waits for input before redrawing.
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
    /// Behaviour of the simulated drive.
    #[serde(default)]
    pub simulation: SimulationSettings,
}

fn default_tick_rate_ms() -> u64 {
    100
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate_ms(),
            simulation: SimulationSettings::default(),
        }
    }
}

impl Config {
    /// Load configuration from the config file.
    ///
    /// If `custom_path` is provided, load from that path.
    /// Otherwise, load from the default XDG config location.
    /// Creates a default config file if it doesn't exist (only for default path).
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self> {
        let is_custom = custom_path.is_some();
        let config_path = match custom_path {
            Some(path) => path,
            None => Self::config_path()?,
        };

        if !config_path.exists() {
            if is_custom {
                anyhow::bail!("Config file not found: {}", config_path.display());
            }
            let config = Config::default();
            config.save_to(&config_path)?;
            tracing::info!("Created default config at {}", config_path.display());
            return Ok(config);
        }

        let config = Self::read(&config_path)?;
        tracing::info!("Loaded config from {}: {:?}", config_path.display(), config);
        Ok(config)
    }

    /// Parse a config file.
    pub fn read(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Write the configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Get the path to the config file.
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;

        Ok(config_dir.join("drivebench").join("drivebench.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reads_partial_file_with_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("drivebench.toml");
        std::fs::write(&path, "tick_rate_ms = 50\n\n[simulation]\nfailure_rate = 0.0\n")
            .expect("write");

        let config = Config::load(Some(path)).expect("load");
        assert_eq!(config.tick_rate_ms, 50);
        assert_eq!(config.simulation.failure_rate, 0.0);
        assert_eq!(config.simulation.rpc_delay_ms, 800);
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("empty.toml");
        std::fs::write(&path, "").expect("write");
        assert_eq!(Config::load(Some(path)).expect("load"), Config::default());
    }

    #[test]
    fn missing_custom_path_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = Config::load(Some(dir.path().join("absent.toml"))).expect_err("missing");
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "tick_rate_ms = \"fast\"").expect("write");
        let err = Config::read(&path).expect_err("bad type");
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn saved_config_reads_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("drivebench.toml");
        let mut config = Config::default();
        config.simulation.seed_demo_data = false;

        config.save_to(&path).expect("save");
        assert_eq!(Config::read(&path).expect("read"), config);
    }
}
