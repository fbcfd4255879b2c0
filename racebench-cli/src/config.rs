//! Configuration loading from racebench.toml
//!
//! racebench configuration can be specified in a `racebench.toml` file in the
//! project root. The file is discovered by walking up from the current
//! directory; command-line flags override its values.

use crate::executor::RunOptions;
use racebench_report::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// File name searched for by [`RaceConfig::discover`]
pub const CONFIG_FILE_NAME: &str = "racebench.toml";

/// Invalid configuration values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Duration string was empty
    #[error("empty duration string")]
    EmptyDuration,
    /// Duration number could not be parsed or was negative
    #[error("invalid duration number: {0}")]
    InvalidDurationNumber(String),
    /// Duration unit not recognised
    #[error("unknown duration unit: {0}")]
    UnknownDurationUnit(String),
    /// Confidence level outside (0, 1)
    #[error("confidence level must be between 0 and 1 (exclusive), got {0}")]
    InvalidConfidenceLevel(f64),
    /// Unknown output format
    #[error("{0}")]
    UnknownFormat(String),
}

/// racebench configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RaceConfig {
    /// Runner configuration
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Runner configuration for case measurement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Measurement time per case (e.g., "5s")
    #[serde(default = "default_time_budget")]
    pub time_budget: String,
    /// Minimum samples per case, enforced even with a zero budget
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,
    /// Hard ceiling per case, calibration included (e.g., "60s")
    #[serde(default = "default_max_wall_clock")]
    pub max_wall_clock: String,
    /// Preferred duration of one batch (e.g., "50ms")
    #[serde(default = "default_batch_target")]
    pub batch_target: String,
    /// Discarded batches after calibration
    #[serde(default = "default_warmup_batches")]
    pub warmup_batches: u32,
    /// Deadline for a whole suite; remaining cases are cancelled
    #[serde(default)]
    pub suite_timeout: Option<String>,
    /// Seed for the ordering generator (random when unset)
    #[serde(default)]
    pub seed: Option<u64>,
    /// Confidence level for the margin of error (e.g., 0.95)
    #[serde(default = "default_confidence_level")]
    pub confidence_level: f64,
    /// Pin the measuring thread to this CPU (Linux only)
    #[serde(default)]
    pub pin_cpu: Option<usize>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            time_budget: default_time_budget(),
            min_samples: default_min_samples(),
            max_wall_clock: default_max_wall_clock(),
            batch_target: default_batch_target(),
            warmup_batches: default_warmup_batches(),
            suite_timeout: None,
            seed: None,
            confidence_level: default_confidence_level(),
            pin_cpu: None,
        }
    }
}

fn default_time_budget() -> String {
    "5s".to_string()
}
fn default_min_samples() -> usize {
    racebench_core::DEFAULT_MIN_SAMPLES
}
fn default_max_wall_clock() -> String {
    "60s".to_string()
}
fn default_batch_target() -> String {
    "50ms".to_string()
}
fn default_warmup_batches() -> u32 {
    1
}
fn default_confidence_level() -> f64 {
    racebench_stats::DEFAULT_CONFIDENCE_LEVEL
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "human", "json", "csv", "markdown"
    #[serde(default = "default_format")]
    pub format: String,
    /// Show a progress bar while measuring
    #[serde(default = "default_progress")]
    pub progress: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            progress: default_progress(),
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}
fn default_progress() -> bool {
    true
}

impl RaceConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => Some(config),
                    Err(e) => {
                        tracing::warn!(path = %config_path.display(), error = %e, "ignoring unreadable config");
                        None
                    }
                };
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Resolve runner settings into [`RunOptions`]
    pub fn run_options(&self) -> Result<RunOptions, ConfigError> {
        let runner = &self.runner;
        let confidence_level = validate_confidence(runner.confidence_level)?;
        Ok(RunOptions {
            time_budget: Self::parse_duration(&runner.time_budget)?,
            min_samples: runner.min_samples,
            max_wall_clock: Self::parse_duration(&runner.max_wall_clock)?,
            batch_target: Self::parse_duration(&runner.batch_target)?,
            warmup_batches: runner.warmup_batches,
            suite_timeout: runner
                .suite_timeout
                .as_deref()
                .map(Self::parse_duration)
                .transpose()?,
            confidence_level,
            pin_cpu: runner.pin_cpu,
            show_progress: self.output.progress,
        })
    }

    /// Configured output format
    pub fn output_format(&self) -> Result<OutputFormat, ConfigError> {
        self.output
            .format
            .parse()
            .map_err(ConfigError::UnknownFormat)
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# racebench configuration

[runner]
# Measurement time per case
time_budget = "5s"
# Minimum samples per case (enforced even when time_budget is 0)
min_samples = 5
# Hard ceiling per case, calibration included
max_wall_clock = "60s"
# Preferred duration of one batch
batch_target = "50ms"
# Discarded batches after calibration
warmup_batches = 1
# Deadline for a whole suite (uncomment to enable)
# suite_timeout = "5m"
# Fixed ordering seed (uncomment to make case order reproducible)
# seed = 42
# Confidence level for the margin of error (0.0 to 1.0, exclusive)
confidence_level = 0.95
# Pin the measuring thread to a CPU, Linux only (uncomment to enable)
# pin_cpu = 2

[output]
# Default output format: human, json, csv, markdown
format = "human"
# Show a progress bar while measuring
progress = true
"#
        .to_string()
    }

    /// Parse duration string (e.g., "3s", "500ms", "2m")
    pub fn parse_duration(s: &str) -> Result<Duration, ConfigError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ConfigError::EmptyDuration);
        }

        // Find where the number ends and unit begins
        let (num_part, unit_part) = s
            .char_indices()
            .find(|(_, c)| c.is_alphabetic())
            .map(|(i, _)| s.split_at(i))
            .unwrap_or((s, "s"));

        let value: f64 = num_part
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidDurationNumber(num_part.to_string()))?;
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::InvalidDurationNumber(num_part.to_string()));
        }

        let multiplier: f64 = match unit_part.to_lowercase().as_str() {
            "ns" => 1.0,
            "us" | "µs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" | "min" => 60e9,
            _ => return Err(ConfigError::UnknownDurationUnit(unit_part.to_string())),
        };

        Ok(Duration::from_nanos((value * multiplier) as u64))
    }
}

/// Check that a confidence level lies strictly between 0 and 1
pub fn validate_confidence(level: f64) -> Result<f64, ConfigError> {
    if racebench_stats::is_valid_confidence(level) {
        Ok(level)
    } else {
        Err(ConfigError::InvalidConfidenceLevel(level))
    }
}
