//! Bounded, newest-first alert feed

use std::collections::VecDeque;

use crate::alerts::Alert;

/// Default number of alerts kept in the feed
pub const DEFAULT_CAPACITY: usize = 10;

/// Active alerts, newest first.
///
/// When the feed is full the oldest alerts are evicted.
#[derive(Debug, Clone)]
pub struct AlertFeed {
    alerts: VecDeque<Alert>,
    capacity: usize,
}

impl AlertFeed {
    pub fn new(capacity: usize) -> Self {
        Self {
            alerts: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Prepend `alerts`, keeping their order, then drop whatever no longer fits.
    pub fn insert(&mut self, alerts: Vec<Alert>) {
        for alert in alerts.into_iter().rev() {
            self.alerts.push_front(alert);
        }
        self.alerts.truncate(self.capacity);
    }

    /// Remove the alert with the given id. Unknown ids are ignored.
    pub fn dismiss(&mut self, id: &str) -> bool {
        let before = self.alerts.len();
        self.alerts.retain(|alert| alert.id != id);
        self.alerts.len() != before
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter()
    }

    /// Owned copy for publishing
    pub fn snapshot(&self) -> Vec<Alert> {
        self.alerts.iter().cloned().collect()
    }
}

impl Default for AlertFeed {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
