//! Cross-store synchronization events.
//!
//! The Menu store publishes a [`MenuCommitted`] event after every confirmed
//! mutation; the composition root subscribes the Restaurant store's
//! reconciliation entry points. The dependency stays one-directional: the
//! Menu store knows only this hub, and the Restaurant store knows nothing of
//! the Menu store at all.
//!
//! Delivery is synchronous and in subscription order, so reconciliation has
//! already happened by the time the publishing operation returns.

use std::sync::{Arc, Mutex};

use quick_bites_core::MenuItem;

/// Which kind of mutation the server confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitKind {
    Created,
    Updated,
}

/// A server-confirmed menu mutation, carrying the canonical record.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuCommitted {
    pub kind: CommitKind,
    pub menu: MenuItem,
}

type Handler = Box<dyn Fn(&MenuCommitted) + Send + Sync>;

/// Subscription hub for [`MenuCommitted`] events.
#[derive(Clone, Default)]
pub struct MenuEvents {
    subscribers: Arc<Mutex<Vec<Handler>>>,
}

impl MenuEvents {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for every future commit.
    pub fn subscribe(&self, handler: impl Fn(&MenuCommitted) + Send + Sync + 'static) {
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.push(Box::new(handler));
        }
    }

    /// Deliver `event` to every subscriber, in subscription order.
    pub(crate) fn publish(&self, event: &MenuCommitted) {
        if let Ok(subscribers) = self.subscribers.lock() {
            for handler in subscribers.iter() {
                handler(event);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use quick_bites_core::MenuId;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn menu(id: &str) -> MenuItem {
        MenuItem {
            id: MenuId::new(id),
            name: "Margherita".to_owned(),
            description: String::new(),
            price: 12,
            image: String::new(),
        }
    }

    #[test]
    fn test_publish_reaches_all_subscribers_synchronously() {
        let events = MenuEvents::new();
        let seen = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let seen = Arc::clone(&seen);
            events.subscribe(move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            });
        }

        events.publish(&MenuCommitted {
            kind: CommitKind::Created,
            menu: menu("m1"),
        });

        // Synchronous delivery: both handlers ran before publish returned.
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        let events = MenuEvents::new();
        events.publish(&MenuCommitted {
            kind: CommitKind::Updated,
            menu: menu("m2"),
        });
    }
}
