//! Monitor configuration
//!
//! Loaded from a TOML file. Every field has a default, so an empty file (or no
//! file at all) yields a working configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Monitor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Time between two polls in milliseconds (default: 2000)
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Hard timeout for a live device request in milliseconds (default: 5000)
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_ms: u64,

    /// Maximum number of alerts kept in the feed (default: 10)
    #[serde(default = "default_feed_capacity")]
    pub feed_capacity: usize,

    /// Device address (`host[:port]`) to connect to on startup
    pub device: Option<String>,

    /// Alert thresholds per metric
    #[serde(default)]
    pub thresholds: Thresholds,
}

fn default_poll_interval() -> u64 {
    2000
}

fn default_fetch_timeout() -> u64 {
    5000
}

fn default_feed_capacity() -> usize {
    10
}

impl Config {
    /// Load configuration from file, or use defaults if no file exists
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.map(Path::to_path_buf).or_else(default_config_path);

        let Some(path) = config_path else {
            trace!("no config file found, using defaults");
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        trace!("loaded config: {config:?}");

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Reject settings the monitor cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            anyhow::bail!("poll_interval_ms must be greater than 0");
        }
        if self.fetch_timeout_ms == 0 {
            anyhow::bail!("fetch_timeout_ms must be greater than 0");
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}

fn default_config_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    let default_path = home.join(".config/envmon/monitor.toml");
    default_path.exists().then_some(default_path)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
            fetch_timeout_ms: default_fetch_timeout(),
            feed_capacity: default_feed_capacity(),
            device: None,
            thresholds: Thresholds::default(),
        }
    }
}

/// Bounds for a single metric.
///
/// A value below `warning_below` (or above `warning_above`) raises an alert; it
/// is critical when it also crosses the matching `critical_*` bound. A band
/// given in the config file replaces the default band entirely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub warning_below: Option<f64>,
    pub critical_below: Option<f64>,
    pub warning_above: Option<f64>,
    pub critical_above: Option<f64>,
}

impl Band {
    pub fn below(warning: f64, critical: f64) -> Self {
        Self {
            warning_below: Some(warning),
            critical_below: Some(critical),
            ..Self::default()
        }
    }

    pub fn above(warning: f64, critical: f64) -> Self {
        Self {
            warning_above: Some(warning),
            critical_above: Some(critical),
            ..Self::default()
        }
    }

    pub fn between(low: Band, high: Band) -> Self {
        Self {
            warning_below: low.warning_below,
            critical_below: low.critical_below,
            warning_above: high.warning_above,
            critical_above: high.critical_above,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub temperature: Band,
    pub humidity: Band,
    pub air_quality: Band,
    pub ammonia: Band,
    pub co2: Band,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            // optimal: 18-24°C
            temperature: Band::between(Band::below(18.0, 15.0), Band::above(24.0, 28.0)),
            // optimal: 50-70%
            humidity: Band::between(Band::below(50.0, 40.0), Band::above(70.0, 80.0)),
            air_quality: Band::below(60.0, 40.0),
            ammonia: Band::above(15.0, 25.0),
            co2: Band::above(500.0, 800.0),
        }
    }
}
