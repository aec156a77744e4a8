//! Notifications: the live list, auto-dismiss bookkeeping, and the sink contract.
//!
//! The core never renders anything. A [`Notifier`] assigns ids and tracks
//! which notifications are live; every show/retract is forwarded to a
//! [`NotificationSink`] supplied by the host. Auto-dismiss timers are owned by
//! the session, which calls [`Notifier::expire`] when a delay elapses.
//!
//! Every show gets a fresh generation. A timer started for one show cannot
//! retract a later notification that reused the same id.

#[cfg(test)]
#[path = "notify_test.rs"]
mod notify_test;

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::consts::DEFAULT_NOTIFY_DELAY_MS;

/// Visual severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Danger,
    Warning,
    Info,
}

impl Severity {
    /// Header text a renderer shows above the message.
    #[must_use]
    pub fn header(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Danger => "Error",
            Self::Warning => "Warning",
            Self::Info => "Info",
        }
    }
}

/// A single string, or an ordered list of lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Message {
    Text(String),
    Lines(Vec<String>),
}

impl From<&str> for Message {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Message {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<String>> for Message {
    fn from(lines: Vec<String>) -> Self {
        Self::Lines(lines)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Lines(lines) => f.write_str(&lines.join("\n")),
        }
    }
}

/// A notification request. Missing fields are filled in by the [`Notifier`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub message: Message,
    pub severity: Severity,
    /// Auto-dismiss delay. `None` uses the notifier default; `Some(0)` disables it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<u64>,
}

impl NotificationData {
    #[must_use]
    pub fn new(message: impl Into<Message>, severity: Severity) -> Self {
        Self { id: None, message: message.into(), severity, delay_ms: None }
    }

    #[must_use]
    pub fn success(message: impl Into<Message>) -> Self {
        Self::new(message, Severity::Success)
    }

    #[must_use]
    pub fn danger(message: impl Into<Message>) -> Self {
        Self::new(message, Severity::Danger)
    }

    #[must_use]
    pub fn info(message: impl Into<Message>) -> Self {
        Self::new(message, Severity::Info)
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = Some(delay_ms);
        self
    }
}

/// A live notification as handed to the sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub message: Message,
    pub severity: Severity,
    /// Resolved auto-dismiss delay; 0 means the notification stays until dismissed.
    pub delay_ms: u64,
}

impl Notification {
    #[must_use]
    pub fn auto_dismisses(&self) -> bool {
        self.delay_ms > 0
    }
}

/// Host-side renderer contract.
pub trait NotificationSink {
    fn show(&mut self, notification: &Notification);
    fn retract(&mut self, id: &str);
}

/// What a sink observed, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SinkEvent {
    Shown(Notification),
    Retracted { id: String },
}

/// A vector is a recording sink.
impl NotificationSink for Vec<SinkEvent> {
    fn show(&mut self, notification: &Notification) {
        self.push(SinkEvent::Shown(notification.clone()));
    }

    fn retract(&mut self, id: &str) {
        self.push(SinkEvent::Retracted { id: id.to_owned() });
    }
}

/// Ordered list of live notifications.
#[derive(Debug, Clone)]
pub struct Notifier {
    default_delay_ms: u64,
    live: Vec<Notification>,
    generations: HashMap<String, u64>,
    next_generation: u64,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFY_DELAY_MS)
    }
}

impl Notifier {
    #[must_use]
    pub fn new(default_delay_ms: u64) -> Self {
        Self { default_delay_ms, live: Vec::new(), generations: HashMap::new(), next_generation: 0 }
    }

    #[must_use]
    pub fn default_delay_ms(&self) -> u64 {
        self.default_delay_ms
    }

    /// Live notifications, oldest first.
    #[must_use]
    pub fn live(&self) -> &[Notification] {
        &self.live
    }

    #[must_use]
    pub fn is_live(&self, id: &str) -> bool {
        self.live.iter().any(|n| n.id == id)
    }

    /// Generation of the live show under `id`, to pass back to [`Notifier::expire`].
    #[must_use]
    pub fn generation(&self, id: &str) -> Option<u64> {
        self.generations.get(id).copied()
    }

    /// Show a notification, assigning a UUID v4 id when none was supplied.
    ///
    /// A caller id that is already live replaces that notification in place.
    pub fn add(&mut self, data: NotificationData, sink: &mut dyn NotificationSink) -> Notification {
        let notification = Notification {
            id: data.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            message: data.message,
            severity: data.severity,
            delay_ms: data.delay_ms.unwrap_or(self.default_delay_ms),
        };
        match self.live.iter_mut().find(|n| n.id == notification.id) {
            Some(existing) => {
                sink.retract(&existing.id);
                existing.clone_from(&notification);
            }
            None => self.live.push(notification.clone()),
        }
        self.next_generation += 1;
        self.generations.insert(notification.id.clone(), self.next_generation);
        debug!(id = %notification.id, severity = ?notification.severity, "notification shown");
        sink.show(&notification);
        notification
    }

    /// Manual dismissal. Returns false if `id` is not live.
    pub fn dismiss(&mut self, id: &str, sink: &mut dyn NotificationSink) -> bool {
        let removed = self.remove(id, sink);
        if removed {
            debug!(%id, "notification dismissed");
        }
        removed
    }

    /// Auto-dismiss after the delay of show `generation` elapsed. No-op if
    /// already dismissed or replaced by a later show.
    pub fn expire(&mut self, id: &str, generation: u64, sink: &mut dyn NotificationSink) -> bool {
        if self.generation(id) != Some(generation) {
            debug!(%id, generation, "expiry for a replaced notification ignored");
            return false;
        }
        let removed = self.remove(id, sink);
        if removed {
            debug!(%id, "notification expired");
        }
        removed
    }

    fn remove(&mut self, id: &str, sink: &mut dyn NotificationSink) -> bool {
        let Some(index) = self.live.iter().position(|n| n.id == id) else {
            return false;
        };
        self.live.remove(index);
        self.generations.remove(id);
        sink.retract(id);
        true
    }
}
