//! Where readings come from
//!
//! A [`ReadingSource`] can always simulate a reading and can try to fetch one
//! from a live device. Live fetches never panic; every failure comes back as a
//! [`FetchError`].

pub mod device;
pub mod error;
pub mod simulator;

use async_trait::async_trait;

use crate::SensorReading;

pub use device::DeviceSource;
pub use error::{FetchError, FetchResult};

#[async_trait]
pub trait ReadingSource: Send + Sync {
    /// Produce a simulated reading. Never fails.
    fn simulate(&self) -> SensorReading {
        simulator::simulate()
    }

    /// Fetch the current reading from the device at `address` (`host[:port]`).
    async fn fetch_live(&self, address: &str) -> FetchResult<SensorReading>;
}
