//! Message types for the monitor actor
//!
//! Intents from the presentation layer arrive as [`MonitorCommand`]s; the actor
//! answers by publishing a fresh [`Snapshot`] after every state change.

use serde::Serialize;
use tokio::sync::oneshot;

use crate::{SensorReading, alerts::Alert, connection::ConnectionState};

/// Everything a reader needs to render the monitor
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    /// Number of completed polls
    pub tick: u64,

    pub connection: ConnectionState,

    /// Latest reading, `None` until the first poll completes
    pub reading: Option<SensorReading>,

    /// Active alerts, newest first
    pub alerts: Vec<Alert>,
}

/// Commands that can be sent to the MonitorActor
#[derive(Debug)]
pub enum MonitorCommand {
    /// Switch to live mode against the given device address
    Connect { address: String },

    /// Drop the live link without leaving live mode
    Disconnect,

    /// Flip between simulated and live mode
    ToggleSimulation,

    /// Remove an alert from the feed
    DismissAlert { id: String },

    /// Trigger an immediate poll (bypassing the interval timer)
    ///
    /// Used for testing and manual refresh operations.
    PollNow {
        respond_to: oneshot::Sender<Snapshot>,
    },

    /// Stop polling. An in-flight poll is finished first.
    Shutdown,
}
