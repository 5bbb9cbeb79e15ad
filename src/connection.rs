//! Connection mode state machine
//!
//! ```text
//!               connect(addr)                     fetch ok
//!  Simulated ─────────────────────► Live ◄──────────────────── ConnectingLive
//!     ▲  ▲                          │  │                        ▲    │
//!     │  └──── fetch failed ────────┘  └──── disconnect() ──────┘    │
//!     │                                                              │
//!     └───────────── toggle_simulation() / fetch failed ─────────────┘
//! ```
//!
//! `toggle_simulation()` from `Simulated` leads to `ConnectingLive`; the link is
//! only confirmed by `connect` or a successful live fetch.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Where readings are taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Simulated,
    Live,
}

/// Derived view of a [`ConnectionState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Simulated,
    /// Live mode requested, link not (or no longer) confirmed
    ConnectingLive,
    Live,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Simulated => "simulated",
            Phase::ConnectingLive => "connecting",
            Phase::Live => "live",
        };
        f.write_str(name)
    }
}

/// Connection state as published to readers.
///
/// `live_connected` is only ever true in live mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionState {
    pub mode: Mode,
    pub target_address: Option<String>,
    pub live_connected: bool,
}

impl ConnectionState {
    pub fn phase(&self) -> Phase {
        match (self.mode, self.live_connected) {
            (Mode::Simulated, _) => Phase::Simulated,
            (Mode::Live, false) => Phase::ConnectingLive,
            (Mode::Live, true) => Phase::Live,
        }
    }

    /// Switch to live mode against `address`. The link is assumed up until a
    /// poll says otherwise.
    pub fn connect(&mut self, address: impl Into<String>) {
        let address = address.into();
        debug!("connecting to {address}");

        self.mode = Mode::Live;
        self.target_address = Some(address);
        self.live_connected = true;
    }

    /// Drop the live link. The mode is left alone.
    pub fn disconnect(&mut self) {
        debug!("disconnecting");
        self.live_connected = false;
    }

    pub fn toggle_simulation(&mut self) {
        match self.mode {
            Mode::Simulated => {
                debug!("leaving simulation");
                self.mode = Mode::Live;
            }
            Mode::Live => {
                debug!("entering simulation");
                self.mode = Mode::Simulated;
                self.live_connected = false;
            }
        }
    }

    /// A live fetch failed: fall back to simulation.
    pub fn fall_back(&mut self) {
        self.mode = Mode::Simulated;
        self.live_connected = false;
    }

    /// A live fetch succeeded. Ignored outside of live mode.
    pub fn confirm_live(&mut self) {
        if self.mode == Mode::Live {
            self.live_connected = true;
        }
    }
}

impl Default for ConnectionState {
    fn default() -> Self {
        Self {
            mode: Mode::Simulated,
            target_address: None,
            live_connected: false,
        }
    }
}
