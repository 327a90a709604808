//! User-visible notifications.
//!
//! The toast equivalent: stores publish success/error notices here and the
//! UI layer subscribes. Publishing is fire-and-forget; a notice with no
//! subscriber is silently dropped, exactly as a toast with no toaster
//! mounted would be.

use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 64;

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A single user-visible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Broadcast hub for user-visible notifications.
#[derive(Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notice>,
}

impl Notifier {
    /// Create a notifier with no subscribers yet.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Subscribe to notices published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.tx.subscribe()
    }

    /// Publish a success notice.
    pub fn success(&self, message: impl Into<String>) {
        self.publish(NoticeLevel::Success, message.into());
    }

    /// Publish an error notice.
    pub fn error(&self, message: impl Into<String>) {
        self.publish(NoticeLevel::Error, message.into());
    }

    fn publish(&self, level: NoticeLevel, message: String) {
        tracing::debug!(?level, %message, "notice");
        let _ = self.tx.send(Notice { level, message });
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribers_receive_notices_in_order() {
        let notifier = Notifier::new();
        let mut rx = notifier.subscribe();

        notifier.success("saved");
        notifier.error("broke");

        assert_eq!(
            rx.try_recv().unwrap(),
            Notice {
                level: NoticeLevel::Success,
                message: "saved".to_owned()
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            Notice {
                level: NoticeLevel::Error,
                message: "broke".to_owned()
            }
        );
    }

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        let notifier = Notifier::new();
        // Must not panic or error.
        notifier.error("nobody listening");
    }
}
