pub mod actors;
pub mod alerts;
pub mod config;
pub mod connection;
pub mod feed;
pub mod sources;
pub mod util;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single snapshot of every value the sensor board reports.
///
/// Readings are never mutated; each poll supersedes the previous one wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Temperature in °C
    pub temperature: f64,
    /// Relative humidity in %
    pub humidity: f64,
    /// Air quality index (0-100, higher is better)
    pub air_quality: f64,
    /// Ammonia concentration in ppm
    pub ammonia: f64,
    /// CO2 concentration in ppm
    pub co2: f64,
    /// Particulate matter in µg/m³
    pub dust: f64,
    pub timestamp: DateTime<Utc>,
}

/// Wire format served by a sensor device at `/api/sensors`.
///
/// Every field is optional; absent or `null` values are read as `0`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceReport {
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub air_quality: Option<f64>,
    #[serde(default)]
    pub ammonia: Option<f64>,
    #[serde(default)]
    pub co2: Option<f64>,
    #[serde(default)]
    pub dust: Option<f64>,
}

impl DeviceReport {
    /// Turn a device report into a reading stamped with `received_at`.
    pub fn into_reading(self, received_at: DateTime<Utc>) -> SensorReading {
        SensorReading {
            temperature: self.temperature.unwrap_or_default(),
            humidity: self.humidity.unwrap_or_default(),
            air_quality: self.air_quality.unwrap_or_default(),
            ammonia: self.ammonia.unwrap_or_default(),
            co2: self.co2.unwrap_or_default(),
            dust: self.dust.unwrap_or_default(),
            timestamp: received_at,
        }
    }
}

impl From<&SensorReading> for DeviceReport {
    fn from(reading: &SensorReading) -> Self {
        Self {
            temperature: Some(reading.temperature),
            humidity: Some(reading.humidity),
            air_quality: Some(reading.air_quality),
            ammonia: Some(reading.ammonia),
            co2: Some(reading.co2),
            dust: Some(reading.dust),
        }
    }
}
