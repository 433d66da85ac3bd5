//! Core configuration structure and builder.
//!
//! [`ForestConfig`] gathers the options that shape loading and scoring:
//! how raw sparse indices map to model feature ids, what value is
//! published per row, how strictly inputs are checked, and how batches are
//! parallelised.

use crate::core::constants::*;
use crate::core::error::{ForestError, Result};
use crate::core::types::FeatureId;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Loading and scoring configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    /// Offset added to zero-based sparse indices to get model feature ids
    pub feature_offset: FeatureId,
    /// Publish the raw additive score instead of the probability
    pub raw_score: bool,
    /// Reject unsorted or duplicated feature ids instead of scoring them
    pub strict_features: bool,
    /// Reject models whose node graph contains a cycle
    pub reject_cycles: bool,
    /// Warn when the model header is not the expected literal
    pub check_header: bool,
    /// Threads used for batch scoring (0 = rayon default)
    pub num_threads: usize,
    /// Batches smaller than this are scored sequentially
    pub parallel_threshold: usize,
}

impl Default for ForestConfig {
    fn default() -> Self {
        ForestConfig {
            feature_offset: DEFAULT_FEATURE_OFFSET,
            raw_score: false,
            strict_features: false,
            reject_cycles: false,
            check_header: false,
            num_threads: DEFAULT_NUM_THREADS,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl ForestConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.parallel_threshold == 0 {
            return Err(ForestError::invalid_parameter(
                "parallel_threshold",
                self.parallel_threshold.to_string(),
                "must be at least 1",
            ));
        }

        if self.num_threads > num_cpus::get() * 4 {
            log::warn!(
                "num_threads ({}) is much larger than available cores ({})",
                self.num_threads,
                num_cpus::get()
            );
        }

        Ok(())
    }

    /// Load configuration from a `.json` or `.toml` file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ForestError::config(format!("Failed to read config file: {}", e)))?;

        let config: ForestConfig = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| ForestError::config(format!("Failed to parse JSON config: {}", e)))?,
            Some("toml") => toml::from_str(&content)
                .map_err(|e| ForestError::config(format!("Failed to parse TOML config: {}", e)))?,
            _ => {
                return Err(ForestError::config(
                    "Unsupported config file format. Use .json or .toml",
                ))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a `.json` or `.toml` file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::to_string_pretty(self)
                .map_err(|e| ForestError::config(format!("Failed to serialize to JSON: {}", e)))?,
            Some("toml") => toml::to_string_pretty(self)
                .map_err(|e| ForestError::config(format!("Failed to serialize to TOML: {}", e)))?,
            _ => {
                return Err(ForestError::config(
                    "Unsupported config file format. Use .json or .toml",
                ))
            }
        };

        std::fs::write(path, content)
            .map_err(|e| ForestError::config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Apply environment variable overrides to an existing configuration
    pub fn apply_environment_overrides(&mut self) -> Result<()> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        self.apply_overrides(&vars)?;
        self.validate()
    }

    fn apply_overrides(&mut self, vars: &HashMap<String, String>) -> Result<()> {
        if let Some(val) = vars.get(ENV_FEATURE_OFFSET) {
            self.feature_offset = val
                .parse()
                .map_err(|_| ForestError::config(format!("Invalid {}", ENV_FEATURE_OFFSET)))?;
        }
        if let Some(val) = vars.get(ENV_RAW_SCORE) {
            self.raw_score = parse_flag(ENV_RAW_SCORE, val)?;
        }
        if let Some(val) = vars.get(ENV_STRICT_FEATURES) {
            self.strict_features = parse_flag(ENV_STRICT_FEATURES, val)?;
        }
        if let Some(val) = vars.get(ENV_REJECT_CYCLES) {
            self.reject_cycles = parse_flag(ENV_REJECT_CYCLES, val)?;
        }
        if let Some(val) = vars.get(ENV_NUM_THREADS) {
            self.num_threads = val
                .parse()
                .map_err(|_| ForestError::config(format!("Invalid {}", ENV_NUM_THREADS)))?;
        }
        Ok(())
    }

    /// Get effective number of threads for batch scoring
    pub fn effective_num_threads(&self) -> usize {
        if self.num_threads == 0 {
            rayon::current_num_threads()
        } else {
            self.num_threads
        }
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ForestError::config(format!("Invalid {}: '{}'", name, value))),
    }
}

/// Configuration builder for fluent configuration creation
#[derive(Debug, Clone, Default)]
pub struct ForestConfigBuilder {
    config: ForestConfig,
}

impl ForestConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sparse index offset
    pub fn feature_offset(mut self, offset: FeatureId) -> Self {
        self.config.feature_offset = offset;
        self
    }

    /// Publish raw scores instead of probabilities
    pub fn raw_score(mut self, raw: bool) -> Self {
        self.config.raw_score = raw;
        self
    }

    /// Validate feature-id ordering before scoring
    pub fn strict_features(mut self, strict: bool) -> Self {
        self.config.strict_features = strict;
        self
    }

    /// Reject cyclic models at load time
    pub fn reject_cycles(mut self, reject: bool) -> Self {
        self.config.reject_cycles = reject;
        self
    }

    /// Warn on unexpected model headers
    pub fn check_header(mut self, check: bool) -> Self {
        self.config.check_header = check;
        self
    }

    /// Set the number of scoring threads
    pub fn num_threads(mut self, threads: usize) -> Self {
        self.config.num_threads = threads;
        self
    }

    /// Set the minimum batch size scored in parallel
    pub fn parallel_threshold(mut self, threshold: usize) -> Self {
        self.config.parallel_threshold = threshold;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ForestConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
