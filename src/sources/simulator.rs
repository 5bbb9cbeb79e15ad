//! Simulated sensor board
//!
//! Temperature follows a slow sine wave around 22°C so that the readings drift
//! visibly over a couple of minutes; every other value is a base level plus
//! uniform noise.

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::{SensorReading, util::round1};

const BASE_TEMPERATURE: f64 = 22.0;
const TEMPERATURE_AMPLITUDE: f64 = 3.0;
const TEMPERATURE_PERIOD_MS: f64 = 60_000.0;

/// Produce a simulated reading for the current instant.
pub fn simulate() -> SensorReading {
    simulate_with(&mut rand::thread_rng(), Utc::now())
}

/// Produce a simulated reading from an explicit RNG and clock.
pub fn simulate_with<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> SensorReading {
    SensorReading {
        temperature: simulated_temperature(now),
        humidity: round1(65.0 + rng.gen_range(-5.0f64..5.0)),
        air_quality: (80.0 + rng.gen_range(0.0f64..20.0)).round(),
        ammonia: round1(10.0 + rng.gen_range(0.0f64..8.0)),
        co2: (400.0 + rng.gen_range(0.0f64..200.0)).round(),
        dust: round1(20.0 + rng.gen_range(0.0f64..15.0)),
        timestamp: now,
    }
}

/// Temperature is a pure function of the wall clock, always within 19-25°C.
pub fn simulated_temperature(now: DateTime<Utc>) -> f64 {
    let phase = now.timestamp_millis() as f64 / TEMPERATURE_PERIOD_MS;
    round1(BASE_TEMPERATURE + phase.sin() * TEMPERATURE_AMPLITUDE)
}
