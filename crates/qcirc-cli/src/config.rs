//! Configuration for the qcirc CLI.
//!
//! Values are resolved with the following precedence (highest first):
//! 1. Command-line flags
//! 2. Environment variables (`QCIRC_` prefix)
//! 3. Configuration file (YAML, from `--config` or `QCIRC_CONFIG`)
//! 4. Default values

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest qubit ceiling a configuration may request.
pub const MAX_QUBIT_CEILING: u32 = 30;

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Simulator settings
    #[serde(default)]
    pub simulator: SimulatorConfig,

    /// Output formatting
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Simulator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Qubit ceiling for statevector previews.
    #[serde(default = "default_max_qubits")]
    pub max_qubits: u32,

    /// Shots sampled by `simulate` when `--shots` is not given. Zero disables
    /// sampling.
    #[serde(default)]
    pub default_shots: usize,

    /// Seed for sampling; entropy-seeded when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Output formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Decimal places for printed probabilities.
    #[serde(default = "default_precision")]
    pub probability_precision: usize,

    /// Basis states below this probability are not printed.
    #[serde(default = "default_threshold")]
    pub amplitude_threshold: f64,
}

/// Logging settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive; overrides `-v` and `--quiet` when set.
    #[serde(default)]
    pub filter: Option<String>,
}

fn default_max_qubits() -> u32 {
    qcirc_sim::DEFAULT_MAX_QUBITS
}

fn default_precision() -> usize {
    4
}

fn default_threshold() -> f64 {
    1e-10
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        SimulatorConfig {
            max_qubits: default_max_qubits(),
            default_shots: 0,
            seed: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            probability_precision: default_precision(),
            amplitude_threshold: default_threshold(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let config: Config = serde_yaml_ng::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an optional file, then apply environment
    /// overrides.
    ///
    /// The file path falls back to `QCIRC_CONFIG` when `config_file` is `None`.
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let path = config_file
            .map(str::to_string)
            .or_else(|| std::env::var("QCIRC_CONFIG").ok());

        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Config::default(),
        };

        let config = config.merge_vars(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Merge variables from `lookup` into this configuration.
    ///
    /// Only variables that are present override the current values;
    /// unparseable numbers are ignored.
    pub fn merge_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(val) = lookup("QCIRC_MAX_QUBITS").and_then(|v| v.parse().ok()) {
            self.simulator.max_qubits = val;
        }
        if let Some(val) = lookup("QCIRC_SHOTS").and_then(|v| v.parse().ok()) {
            self.simulator.default_shots = val;
        }
        if let Some(val) = lookup("QCIRC_SEED").and_then(|v| v.parse().ok()) {
            self.simulator.seed = Some(val);
        }
        if let Some(filter) = lookup("QCIRC_LOG") {
            self.logging.filter = Some(filter);
        }
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.simulator.max_qubits == 0 {
            return Err(ConfigError::ValidationError(
                "simulator.max_qubits must be at least 1".to_string(),
            ));
        }
        if self.simulator.max_qubits > MAX_QUBIT_CEILING {
            return Err(ConfigError::ValidationError(format!(
                "simulator.max_qubits {} exceeds the limit of {MAX_QUBIT_CEILING}",
                self.simulator.max_qubits
            )));
        }

        let threshold = self.output.amplitude_threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "output.amplitude_threshold must be a non-negative number, got {threshold}"
            )));
        }

        Ok(())
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "max_qubits={} shots={} precision={} threshold={}",
            self.simulator.max_qubits,
            self.simulator.default_shots,
            self.output.probability_precision,
            self.output.amplitude_threshold
        )
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}
