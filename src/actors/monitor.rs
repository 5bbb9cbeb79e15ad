//! MonitorActor - Polls the sensor source and maintains the alert feed
//!
//! ## Message Flow
//!
//! ```text
//! Timer tick → simulate / fetch live → (fallback on failure) → evaluate → feed → publish Snapshot
//!     ↑
//!     └─── Commands (Connect, Disconnect, ToggleSimulation, DismissAlert, PollNow, Shutdown)
//! ```
//!
//! ## Intents during a poll
//!
//! A live fetch can take up to the request timeout. Commands keep being handled
//! while it is in flight. A connection intent that arrives mid-poll wins over
//! the poll's own outcome: the poll still publishes its reading, but it does not
//! fall back or confirm the link on top of the newer intent.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, instrument, trace, warn};

use crate::{
    SensorReading,
    alerts::AlertEvaluator,
    config::Config,
    connection::{ConnectionState, Mode},
    feed::AlertFeed,
    sources::{FetchError, FetchResult, ReadingSource},
};

use super::messages::{MonitorCommand, Snapshot};

/// Shortest period the polling timer accepts
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Actor that drives the polling loop
pub struct MonitorActor {
    /// Reading source (simulation and live device)
    source: Arc<dyn ReadingSource>,

    evaluator: AlertEvaluator,

    connection: ConnectionState,

    /// Latest reading
    reading: Option<SensorReading>,

    feed: AlertFeed,

    /// Completed polls
    tick: u64,

    /// Bumped on every connection intent
    epoch: u64,

    interval_duration: Duration,

    /// Command receiver for intents and control messages
    command_rx: mpsc::UnboundedReceiver<MonitorCommand>,

    /// Publishes the state after every change
    snapshot_tx: watch::Sender<Snapshot>,

    /// PollNow requests that arrived while a poll was in flight
    waiting: Vec<oneshot::Sender<Snapshot>>,

    stopping: bool,
}

impl MonitorActor {
    pub fn new(
        config: &Config,
        source: Arc<dyn ReadingSource>,
        command_rx: mpsc::UnboundedReceiver<MonitorCommand>,
        snapshot_tx: watch::Sender<Snapshot>,
    ) -> Self {
        let mut connection = ConnectionState::default();
        if let Some(device) = &config.device {
            connection.connect(device.clone());
        }

        Self {
            source,
            evaluator: AlertEvaluator::new(config.thresholds),
            connection,
            reading: None,
            feed: AlertFeed::new(config.feed_capacity),
            tick: 0,
            epoch: 0,
            // tokio intervals panic on a zero period
            interval_duration: config.poll_interval().max(MIN_POLL_INTERVAL),
            command_rx,
            snapshot_tx,
            waiting: Vec::new(),
            stopping: false,
        }
    }

    /// Run the actor's main loop
    ///
    /// The first poll happens immediately. The loop runs until:
    /// - A Shutdown command is received
    /// - Every handle has been dropped
    #[instrument(skip(self))]
    pub async fn run(mut self) {
        debug!("starting monitor actor");

        self.publish();

        let mut ticker = interval(self.interval_duration);
        // a slow poll pushes the schedule back instead of bursting
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while !self.stopping {
            tokio::select! {
                _ = ticker.tick() => {
                    self.poll().await;
                }

                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(MonitorCommand::PollNow { respond_to }) => {
                            debug!("received PollNow command");
                            self.poll().await;
                            let _ = respond_to.send(self.snapshot());
                        }
                        Some(cmd) => self.handle_command(cmd),
                        None => {
                            warn!("command channel closed, shutting down");
                            break;
                        }
                    }
                }
            }
        }

        debug!("monitor actor stopped");
    }

    fn handle_command(&mut self, cmd: MonitorCommand) {
        match cmd {
            MonitorCommand::Connect { address } => {
                self.epoch += 1;
                self.connection.connect(address);
            }
            MonitorCommand::Disconnect => {
                self.epoch += 1;
                self.connection.disconnect();
            }
            MonitorCommand::ToggleSimulation => {
                self.epoch += 1;
                self.connection.toggle_simulation();
            }
            MonitorCommand::DismissAlert { id } => {
                if !self.feed.dismiss(&id) {
                    trace!("dismissed unknown alert {id}");
                }
            }
            MonitorCommand::PollNow { respond_to } => {
                // only reached mid-poll; answered once that poll is done
                self.waiting.push(respond_to);
                return;
            }
            MonitorCommand::Shutdown => {
                debug!("received shutdown command");
                self.stopping = true;
                return;
            }
        }

        self.publish();
    }

    /// Run one polling cycle. Always produces a reading.
    #[instrument(skip(self))]
    async fn poll(&mut self) {
        let epoch = self.epoch;

        let reading = match self.connection.mode {
            Mode::Simulated => self.source.simulate(),
            Mode::Live => {
                let result = match self.connection.target_address.clone() {
                    Some(address) => self.fetch(&address).await,
                    None => Err(FetchError::NoAddress),
                };

                // a connection intent issued mid-poll takes precedence
                let untouched = epoch == self.epoch;

                match result {
                    Ok(reading) => {
                        if untouched {
                            self.connection.confirm_live();
                        }
                        reading
                    }
                    Err(e) => {
                        warn!("live fetch failed, falling back to simulation: {e}");
                        if untouched {
                            self.connection.fall_back();
                        }
                        self.source.simulate()
                    }
                }
            }
        };

        let alerts = self.evaluator.evaluate(&reading);
        if !alerts.is_empty() {
            debug!("raised {} alert(s)", alerts.len());
        }

        self.feed.insert(alerts);
        self.reading = Some(reading);
        self.tick += 1;

        self.publish();

        let snapshot = self.snapshot();
        for respond_to in self.waiting.drain(..) {
            let _ = respond_to.send(snapshot.clone());
        }
    }

    /// Fetch from the device while still accepting commands.
    async fn fetch(&mut self, address: &str) -> FetchResult<SensorReading> {
        let source = Arc::clone(&self.source);
        let fetch = source.fetch_live(address);
        tokio::pin!(fetch);

        loop {
            tokio::select! {
                result = &mut fetch => return result,

                Some(cmd) = self.command_rx.recv() => {
                    self.handle_command(cmd);
                }
            }
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.tick,
            connection: self.connection.clone(),
            reading: self.reading.clone(),
            alerts: self.feed.snapshot(),
        }
    }

    fn publish(&self) {
        // fine if nobody is listening
        self.snapshot_tx.send_replace(self.snapshot());
    }
}

/// Handle for controlling a MonitorActor
///
/// Intents are fire-and-forget: they return as soon as the command is queued.
/// The handle can be cloned and shared across tasks.
#[derive(Clone)]
pub struct MonitorHandle {
    sender: mpsc::UnboundedSender<MonitorCommand>,

    snapshot_rx: watch::Receiver<Snapshot>,
}

impl MonitorHandle {
    /// Spawn a new monitor actor; polling starts right away.
    pub fn spawn(config: &Config, source: Arc<dyn ReadingSource>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(Snapshot::default());

        let actor = MonitorActor::new(config, source, cmd_rx, snapshot_tx);

        tokio::spawn(actor.run());

        Self {
            sender: cmd_tx,
            snapshot_rx,
        }
    }

    fn send(&self, cmd: MonitorCommand) -> Result<()> {
        self.sender
            .send(cmd)
            .map_err(|_| anyhow::anyhow!("monitor is not running"))
    }

    pub fn connect(&self, address: impl Into<String>) -> Result<()> {
        self.send(MonitorCommand::Connect {
            address: address.into(),
        })
    }

    pub fn disconnect(&self) -> Result<()> {
        self.send(MonitorCommand::Disconnect)
    }

    pub fn toggle_simulation(&self) -> Result<()> {
        self.send(MonitorCommand::ToggleSimulation)
    }

    pub fn dismiss_alert(&self, id: impl Into<String>) -> Result<()> {
        self.send(MonitorCommand::DismissAlert { id: id.into() })
    }

    /// Trigger an immediate poll and wait for the resulting snapshot
    pub async fn poll_now(&self) -> Result<Snapshot> {
        let (tx, rx) = oneshot::channel();
        self.send(MonitorCommand::PollNow { respond_to: tx })
            .context("failed to send PollNow command")?;

        rx.await.context("failed to receive response")
    }

    /// Latest published state
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshot_rx.clone()
    }

    /// Stop the actor and wait until it has exited
    pub async fn shutdown(&self) -> Result<()> {
        self.send(MonitorCommand::Shutdown)
            .context("failed to send Shutdown command")?;

        // resolves once the actor drops its sender
        let mut rx = self.snapshot_rx.clone();
        while rx.changed().await.is_ok() {}

        Ok(())
    }
}
