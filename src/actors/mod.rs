//! Actor-based monitoring engine
//!
//! A single [`monitor::MonitorActor`] owns the connection state, the latest
//! reading and the alert feed. It runs as its own tokio task:
//!
//! ```text
//!  Presentation ── intents (mpsc) ──►  MonitorActor  ── Snapshot (watch) ──► Presentation
//!                                          │   ▲
//!                               timer tick │   │ reading
//!                                          ▼   │
//!                                     ReadingSource (simulated / HTTP device)
//! ```
//!
//! ## Communication Patterns
//!
//! 1. **Commands**: intents are sent over an unbounded mpsc channel, so sending
//!    never blocks the caller
//! 2. **State**: every change is published to a watch channel; readers always
//!    see the latest complete snapshot
//! 3. **Request/Response**: `PollNow` answers over a oneshot channel

pub mod messages;
pub mod monitor;
