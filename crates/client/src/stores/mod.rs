//! Process-wide state stores.
//!
//! Each store is a cheaply cloneable handle over an `Arc` inner that owns its
//! state inside a `tokio::sync::watch` channel. Command methods are the only
//! writers; subscribers observe snapshots and wake on every commit. Stores
//! never expose their state mutably.
//!
//! Cross-store writes happen exclusively through the documented
//! Menu -> Restaurant reconciliation, wired as a [`MenuCommitted`] event
//! subscription by the composition root ([`crate::app::App`]).
//!
//! Every mutable store slot carries a [`RequestSeq`]: operations take a token
//! before the request goes out, and a settlement whose token is no longer the
//! latest issued for that slot is discarded whole - no state write, no
//! notification, no busy-flag change. Within a slot the freshest issued
//! request wins, not the last to settle.

mod events;
mod menu;
mod order;
mod restaurant;
mod session;
mod theme;

pub use events::{CommitKind, MenuCommitted, MenuEvents};
pub use menu::{MenuState, MenuStore};
pub use order::{OrderState, OrderStore};
pub use restaurant::{RestaurantState, RestaurantStore};
pub use session::{SessionState, SessionStore};
pub use theme::ThemeStore;

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic request sequencing for one store slot.
///
/// `begin` issues the next token; `is_current` tells a settling operation
/// whether it still owns the slot.
#[derive(Debug, Default)]
pub(crate) struct RequestSeq(AtomicU64);

impl RequestSeq {
    pub const fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    /// Issue the next token, invalidating every earlier one for this slot.
    pub fn begin(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether `token` is still the latest issued for this slot.
    pub fn is_current(&self, token: u64) -> bool {
        self.0.load(Ordering::SeqCst) == token
    }
}

#[cfg(test)]
mod tests {
    use super::RequestSeq;

    #[test]
    fn test_request_seq_latest_issued_wins() {
        let seq = RequestSeq::new();

        let first = seq.begin();
        let second = seq.begin();

        // The earlier request settles late: it must be discarded.
        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
    }

    #[test]
    fn test_request_seq_single_request_is_current() {
        let seq = RequestSeq::new();
        let token = seq.begin();
        assert!(seq.is_current(token));
    }
}
