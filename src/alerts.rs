//! Threshold evaluation
//!
//! Turns a [`SensorReading`] into zero or more [`Alert`]s. Each metric is
//! checked on its own, so one reading can raise several alerts, but a single
//! rule never raises more than one: a value past the critical bound is reported
//! as critical only.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{
    SensorReading,
    config::{Band, Thresholds},
};

/// Category an alert is filed under
///
/// Ammonia and CO2 alerts are filed under `AirQuality`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertMetric {
    Temperature,
    Humidity,
    AirQuality,
}

impl fmt::Display for AlertMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AlertMetric::Temperature => "temperature",
            AlertMetric::Humidity => "humidity",
            AlertMetric::AirQuality => "air_quality",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Unique for the lifetime of the evaluator that raised it
    pub id: String,
    pub metric: AlertMetric,
    pub message: String,
    pub severity: Severity,
    pub timestamp: DateTime<Utc>,
}

/// Which side of a band a value fell out of
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Low,
    High,
}

impl Band {
    /// Classify a value against this band, `None` if it is within bounds.
    pub fn classify(&self, value: f64) -> Option<(Direction, Severity)> {
        let below = |bound: Option<f64>| bound.is_some_and(|bound| value < bound);
        let above = |bound: Option<f64>| bound.is_some_and(|bound| value > bound);

        if below(self.critical_below) {
            Some((Direction::Low, Severity::Critical))
        } else if below(self.warning_below) {
            Some((Direction::Low, Severity::Warning))
        } else if above(self.critical_above) {
            Some((Direction::High, Severity::Critical))
        } else if above(self.warning_above) {
            Some((Direction::High, Severity::Warning))
        } else {
            None
        }
    }
}

/// Monotonic source of alert identifiers
#[derive(Debug, Default)]
pub struct AlertIds {
    next: AtomicU64,
}

impl AlertIds {
    pub fn next(&self, tag: &str) -> String {
        let sequence = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{tag}-{sequence}")
    }
}

/// Evaluates readings against a fixed set of thresholds
#[derive(Debug, Default)]
pub struct AlertEvaluator {
    thresholds: Thresholds,
    ids: AlertIds,
}

impl AlertEvaluator {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            ids: AlertIds::default(),
        }
    }

    /// Evaluate a reading. Alerts come back in rule order: temperature,
    /// humidity, air quality, ammonia, CO2. Dust is never alerted on.
    pub fn evaluate(&self, reading: &SensorReading) -> Vec<Alert> {
        let Thresholds {
            temperature,
            humidity,
            air_quality,
            ammonia,
            co2,
        } = self.thresholds;

        let mut alerts = Vec::new();

        let value = reading.temperature;
        if let Some((direction, severity)) = temperature.classify(value) {
            let (tag, message) = match direction {
                Direction::Low => ("temp-cold", format!("Temperature too low: {value}°C")),
                Direction::High => ("temp-hot", format!("Temperature too high: {value}°C")),
            };
            alerts.push(self.raise(tag, AlertMetric::Temperature, message, severity, reading));
        }

        let value = reading.humidity;
        if let Some((direction, severity)) = humidity.classify(value) {
            let (tag, message) = match direction {
                Direction::Low => ("humidity-low", format!("Humidity too low: {value}%")),
                Direction::High => ("humidity-high", format!("Humidity too high: {value}%")),
            };
            alerts.push(self.raise(tag, AlertMetric::Humidity, message, severity, reading));
        }

        let value = reading.air_quality;
        if let Some((_, severity)) = air_quality.classify(value) {
            let message = format!("Poor air quality: {value}");
            alerts.push(self.raise(
                "air-poor",
                AlertMetric::AirQuality,
                message,
                severity,
                reading,
            ));
        }

        let value = reading.ammonia;
        if let Some((_, severity)) = ammonia.classify(value) {
            let message = format!("High ammonia levels: {value} ppm");
            alerts.push(self.raise(
                "ammonia-high",
                AlertMetric::AirQuality,
                message,
                severity,
                reading,
            ));
        }

        let value = reading.co2;
        if let Some((_, severity)) = co2.classify(value) {
            let message = format!("High CO2 levels: {value} ppm");
            alerts.push(self.raise(
                "co2-high",
                AlertMetric::AirQuality,
                message,
                severity,
                reading,
            ));
        }

        trace!("evaluated reading -> {} alert(s)", alerts.len());

        alerts
    }

    fn raise(
        &self,
        tag: &str,
        metric: AlertMetric,
        message: String,
        severity: Severity,
        reading: &SensorReading,
    ) -> Alert {
        Alert {
            id: self.ids.next(tag),
            metric,
            message,
            severity,
            timestamp: reading.timestamp,
        }
    }
}
