//! User-visible notification collaborator.
//!
//! The core never surfaces failures to the user directly; limit breaches,
//! exclusivity rejections, and successful create/update/delete calls all
//! go through [`Notifier`]. Hosts plug in toasts, the CLI logs.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Warning,
    Error,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NotificationKind, message_key: &str, data: serde_json::Value);
}

impl<T: Notifier + ?Sized> Notifier for std::sync::Arc<T> {
    fn notify(&self, kind: NotificationKind, message_key: &str, data: serde_json::Value) {
        (**self).notify(kind, message_key, data)
    }
}

/// Discards all notifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _kind: NotificationKind, _message_key: &str, _data: serde_json::Value) {}
}

/// Emits notifications through tracing. Used by the CLI.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, kind: NotificationKind, message_key: &str, data: serde_json::Value) {
        match kind {
            NotificationKind::Success => tracing::info!(%message_key, %data, "notification"),
            NotificationKind::Warning => tracing::warn!(%message_key, %data, "notification"),
            NotificationKind::Error => tracing::error!(%message_key, %data, "notification"),
        }
    }
}

/// One captured notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message_key: String,
    pub data: serde_json::Value,
}

/// Collects notifications in memory. Used in tests and by hosts that
/// render their own toasts.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    captured: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all captured notifications, leaving the buffer empty.
    pub fn drain(&self) -> Vec<Notification> {
        match self.captured.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(_) => Vec::new(),
        }
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, kind: NotificationKind, message_key: &str, data: serde_json::Value) {
        if let Ok(mut guard) = self.captured.lock() {
            guard.push(Notification {
                kind,
                message_key: message_key.to_string(),
                data,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_notifier_captures_and_drains() {
        let notifier = MemoryNotifier::new();
        notifier.notify(
            NotificationKind::Success,
            "alarm.created",
            serde_json::json!({ "id": "a" }),
        );
        let captured = notifier.drain();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].message_key, "alarm.created");
        assert!(notifier.drain().is_empty());
    }
}
