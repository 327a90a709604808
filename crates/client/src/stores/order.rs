//! Order store: checkout and the consumer's own orders.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::instrument;
use url::Url;

use quick_bites_core::{CheckoutSessionRequest, Order};

use crate::api::ApiGateway;
use crate::notify::Notifier;
use crate::storage::Storage;

use super::RequestSeq;

const STORAGE_KEY: &str = "order-store";

/// Snapshot of the order store.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderState {
    pub loading: bool,
    /// The consumer's own orders.
    pub orders: Vec<Order>,
}

/// Durable projection; busy flags never persist.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PersistedOrders {
    orders: Vec<Order>,
}

/// Process-wide order store handle.
#[derive(Clone)]
pub struct OrderStore {
    inner: Arc<OrderStoreInner>,
}

struct OrderStoreInner {
    gateway: ApiGateway,
    notifier: Notifier,
    storage: Storage,
    state: watch::Sender<OrderState>,
    seq: RequestSeq,
}

impl OrderStore {
    /// Create the store, hydrating the persisted projection if one exists.
    #[must_use]
    pub fn new(gateway: ApiGateway, notifier: Notifier, storage: Storage) -> Self {
        let mut initial = OrderState::default();
        if let Some(persisted) = storage.load::<PersistedOrders>(STORAGE_KEY) {
            initial.orders = persisted.orders;
        }

        let (state, _) = watch::channel(initial);
        Self {
            inner: Arc::new(OrderStoreInner {
                gateway,
                notifier,
                storage,
                state,
                seq: RequestSeq::new(),
            }),
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> OrderState {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<OrderState> {
        self.inner.state.subscribe()
    }

    /// Create a checkout session and return the external payment page URL.
    ///
    /// The caller navigates the browser there; the client performs no further
    /// state transition after the redirect. Failures notify and return `None`.
    #[instrument(skip_all)]
    pub async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Option<Url> {
        let token = self.inner.seq.begin();
        self.set_loading(true);

        let redirect = match self.inner.gateway.create_checkout_session(request).await {
            Ok(ok) if self.inner.seq.is_current(token) => match Url::parse(&ok.data.url) {
                Ok(url) => Some(url),
                Err(error) => {
                    tracing::error!(%error, "checkout session returned an invalid URL");
                    self.inner
                        .notifier
                        .error("Checkout failed. Please try again.");
                    None
                }
            },
            Err(error) if self.inner.seq.is_current(token) => {
                tracing::warn!(%error, "checkout session creation failed");
                self.inner
                    .notifier
                    .error(error.user_message("Checkout failed. Please try again."));
                None
            }
            _ => return None,
        };

        self.set_loading(false);
        redirect
    }

    /// Fetch the consumer's own orders.
    #[instrument(skip_all)]
    pub async fn get_order_details(&self) {
        let token = self.inner.seq.begin();
        self.set_loading(true);

        match self.inner.gateway.fetch_orders().await {
            Ok(ok) if self.inner.seq.is_current(token) => {
                self.commit(|s| s.orders = ok.data.orders);
            }
            Err(error) if self.inner.seq.is_current(token) => {
                tracing::warn!(%error, "orders fetch failed");
                self.inner
                    .notifier
                    .error(error.user_message("Could not fetch your orders."));
            }
            _ => return,
        }

        self.set_loading(false);
    }

    fn set_loading(&self, loading: bool) {
        self.inner.state.send_modify(|s| s.loading = loading);
    }

    fn commit(&self, mutate: impl FnOnce(&mut OrderState)) {
        self.inner.state.send_modify(mutate);
        self.persist();
    }

    fn persist(&self) {
        let snapshot = self.inner.state.borrow();
        let projection = PersistedOrders {
            orders: snapshot.orders.clone(),
        };
        drop(snapshot);
        self.inner.storage.save(STORAGE_KEY, &projection);
    }
}
