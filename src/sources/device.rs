//! HTTP source for a live sensor board

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use tracing::trace;

use crate::{DeviceReport, SensorReading};

use super::{FetchError, FetchResult, ReadingSource};

/// Reads sensor values from `http://{address}/api/sensors`.
///
/// The HTTP client is built once and reused; its timeout bounds the whole
/// request including the body.
#[derive(Debug, Clone)]
pub struct DeviceSource {
    client: reqwest::Client,
}

impl DeviceSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ReadingSource for DeviceSource {
    async fn fetch_live(&self, address: &str) -> FetchResult<SensorReading> {
        let url = format!("http://{address}/api/sensors");

        trace!("requesting sensor report from {url}");

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Http(response.status().as_u16()));
        }

        let body = response.text().await?;
        let report: DeviceReport = serde_json::from_str(&body)?;

        trace!("successfully parsed sensor report");

        Ok(report.into_reading(Utc::now()))
    }
}
