//! Notification sink collaborating with the ledger.

use std::fmt;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Success => f.write_str("success"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// Fire-and-forget receiver of user-facing messages.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, message: &str, severity: Severity);
}

/// Sink that writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Success => info!(notification = message, "Notify"),
            Severity::Error => error!(notification = message, "Notify"),
        }
    }
}

/// Sink that keeps every notification in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    notifications: Mutex<Vec<(String, Severity)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications received so far, oldest first.
    pub fn notifications(&self) -> Vec<(String, Severity)> {
        self.notifications.lock().clone()
    }

    /// The most recent notification.
    pub fn last(&self) -> Option<(String, Severity)> {
        self.notifications.lock().last().cloned()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, message: &str, severity: Severity) {
        self.notifications.lock().push((message.to_string(), severity));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_keeps_order() {
        let sink = RecordingSink::new();
        sink.notify("first", Severity::Success);
        sink.notify("second", Severity::Error);

        assert_eq!(
            sink.notifications(),
            vec![
                ("first".to_string(), Severity::Success),
                ("second".to_string(), Severity::Error),
            ]
        );
        assert_eq!(sink.last(), Some(("second".to_string(), Severity::Error)));
    }
}
