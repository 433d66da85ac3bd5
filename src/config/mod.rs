//! Configuration management.
//!
//! Configuration can be built in code through [`ForestConfigBuilder`], read
//! from a `.json`/`.toml` file, and adjusted by `DTREE_*` environment
//! variables. [`ConfigManager`] tracks where the active configuration came
//! from.

pub mod core;

pub use self::core::{ForestConfig, ForestConfigBuilder};

use crate::core::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name looked up by the command line tool
pub const DEFAULT_CONFIG_FILE: &str = "dtree.toml";

/// Where a configuration was obtained from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Built-in defaults
    Default,
    /// Loaded from a file
    File(PathBuf),
}

/// Holds the active configuration and its provenance
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: ForestConfig,
    source: ConfigSource,
}

impl ConfigManager {
    /// Create a manager with the default configuration
    pub fn new() -> Self {
        ConfigManager {
            config: ForestConfig::default(),
            source: ConfigSource::Default,
        }
    }

    /// Create a manager from a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config = ForestConfig::load_from_file(path)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(ConfigManager {
            config,
            source: ConfigSource::File(path.to_path_buf()),
        })
    }

    /// Get the active configuration
    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    /// Get a mutable reference to the active configuration
    pub fn config_mut(&mut self) -> &mut ForestConfig {
        &mut self.config
    }

    /// Get the configuration source
    pub fn source(&self) -> &ConfigSource {
        &self.source
    }

    /// Apply `DTREE_*` environment overrides on top of the active configuration
    pub fn apply_environment_overrides(&mut self) -> Result<()> {
        self.config.apply_environment_overrides()
    }

    /// Consume the manager, returning the configuration
    pub fn into_config(self) -> ForestConfig {
        self.config
    }

    /// Get a one-line summary of the configuration
    pub fn summary(&self) -> String {
        format!(
            "source={:?} feature_offset={} raw_score={} strict_features={} reject_cycles={} threads={}",
            self.source,
            self.config.feature_offset,
            self.config.raw_score,
            self.config.strict_features,
            self.config.reject_cycles,
            self.config.effective_num_threads()
        )
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_manager_creation() {
        let manager = ConfigManager::new();
        assert_eq!(manager.source(), &ConfigSource::Default);
        assert_eq!(manager.config(), &ForestConfig::default());
    }

    #[test]
    fn test_config_manager_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "raw_score = true\n").unwrap();

        let manager = ConfigManager::from_file(&path).unwrap();
        assert!(manager.config().raw_score);
        assert_eq!(manager.source(), &ConfigSource::File(path));
    }

    #[test]
    fn test_config_manager_summary() {
        let mut manager = ConfigManager::new();
        manager.config_mut().strict_features = true;
        let summary = manager.summary();
        assert!(summary.contains("strict_features=true"));
        assert!(summary.contains("feature_offset=1"));
        assert!(manager.into_config().strict_features);
    }
}
