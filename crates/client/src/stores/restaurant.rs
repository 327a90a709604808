//! Restaurant store: the owner's restaurant, the search projection, the
//! single-restaurant view, and the owner's incoming orders.
//!
//! The search projection and the single-restaurant projection are
//! independent copies; mutating one never touches the other. The `menus`
//! collection is denormalized here and kept consistent through the
//! reconciliation entry points the composition root wires to menu commits -
//! this store never learns who publishes them.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::instrument;

use quick_bites_core::{MenuItem, Order, OrderId, OrderStatus, Restaurant, RestaurantId};

use crate::api::{ApiGateway, RestaurantForm, SearchPage};
use crate::notify::Notifier;
use crate::storage::Storage;

use super::RequestSeq;

const STORAGE_KEY: &str = "restaurant-store";

/// Snapshot of the restaurant store.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RestaurantState {
    pub loading: bool,
    /// The authenticated owner's restaurant, `None` until created.
    pub restaurant: Option<Restaurant>,
    /// Latest search envelope, stored whole.
    pub searched_restaurant: Option<SearchPage>,
    /// Applied cuisine filters; a toggle-set that preserves application order.
    pub applied_filter: Vec<String>,
    /// Independent copy backing the restaurant-detail view.
    pub single_restaurant: Option<Restaurant>,
    /// The owner's incoming orders.
    pub restaurant_orders: Vec<Order>,
}

/// Durable projection; busy flags never persist.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedRestaurant {
    restaurant: Option<Restaurant>,
    searched_restaurant: Option<SearchPage>,
    applied_filter: Vec<String>,
    single_restaurant: Option<Restaurant>,
    restaurant_orders: Vec<Order>,
}

/// Process-wide restaurant store handle.
#[derive(Clone)]
pub struct RestaurantStore {
    inner: Arc<RestaurantStoreInner>,
}

struct RestaurantStoreInner {
    gateway: ApiGateway,
    notifier: Notifier,
    storage: Storage,
    state: watch::Sender<RestaurantState>,
    // One sequence per mutable slot; slots never invalidate each other.
    own_seq: RequestSeq,
    search_seq: RequestSeq,
    single_seq: RequestSeq,
    orders_seq: RequestSeq,
}

impl RestaurantStore {
    /// Create the store, hydrating the persisted projection if one exists.
    #[must_use]
    pub fn new(gateway: ApiGateway, notifier: Notifier, storage: Storage) -> Self {
        let mut initial = RestaurantState::default();
        if let Some(persisted) = storage.load::<PersistedRestaurant>(STORAGE_KEY) {
            initial.restaurant = persisted.restaurant;
            initial.searched_restaurant = persisted.searched_restaurant;
            initial.applied_filter = persisted.applied_filter;
            initial.single_restaurant = persisted.single_restaurant;
            initial.restaurant_orders = persisted.restaurant_orders;
        }

        let (state, _) = watch::channel(initial);
        Self {
            inner: Arc::new(RestaurantStoreInner {
                gateway,
                notifier,
                storage,
                state,
                own_seq: RequestSeq::new(),
                search_seq: RequestSeq::new(),
                single_seq: RequestSeq::new(),
                orders_seq: RequestSeq::new(),
            }),
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> RestaurantState {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RestaurantState> {
        self.inner.state.subscribe()
    }

    // =========================================================================
    // Owner's restaurant
    // =========================================================================

    /// Create the owner's restaurant.
    #[instrument(skip_all)]
    pub async fn create_restaurant(&self, form: RestaurantForm) {
        let token = self.inner.own_seq.begin();
        self.set_loading(true);

        match self.inner.gateway.create_restaurant(form).await {
            Ok(ok) if self.inner.own_seq.is_current(token) => {
                self.inner
                    .notifier
                    .success(ok.message.unwrap_or_else(|| "Restaurant created.".to_owned()));
                self.commit(|s| s.restaurant = Some(ok.data.restaurant));
            }
            Err(error) if self.inner.own_seq.is_current(token) => {
                tracing::warn!(%error, "restaurant creation failed");
                self.inner
                    .notifier
                    .error(error.user_message("Failed to create restaurant."));
            }
            _ => return,
        }

        self.set_loading(false);
    }

    /// Fetch the owner's restaurant. A 404 means they have none yet and
    /// resolves silently to `None`.
    #[instrument(skip_all)]
    pub async fn get_restaurant(&self) {
        let token = self.inner.own_seq.begin();
        self.set_loading(true);

        match self.inner.gateway.fetch_restaurant().await {
            Ok(ok) if self.inner.own_seq.is_current(token) => {
                self.commit(|s| s.restaurant = Some(ok.data.restaurant));
            }
            Err(error) if self.inner.own_seq.is_current(token) => {
                if error.status() == Some(404) {
                    self.commit(|s| s.restaurant = None);
                } else {
                    tracing::warn!(%error, "restaurant fetch failed");
                    self.inner
                        .notifier
                        .error("Could not fetch restaurant details.");
                }
            }
            _ => return,
        }

        self.set_loading(false);
    }

    /// Update the owner's restaurant.
    #[instrument(skip_all)]
    pub async fn update_restaurant(&self, form: RestaurantForm) {
        let token = self.inner.own_seq.begin();
        self.set_loading(true);

        match self.inner.gateway.update_restaurant(form).await {
            Ok(ok) if self.inner.own_seq.is_current(token) => {
                self.inner
                    .notifier
                    .success(ok.message.unwrap_or_else(|| "Restaurant updated.".to_owned()));
                self.commit(|s| s.restaurant = Some(ok.data.restaurant));
            }
            Err(error) if self.inner.own_seq.is_current(token) => {
                tracing::warn!(%error, "restaurant update failed");
                self.inner
                    .notifier
                    .error(error.user_message("Failed to update restaurant."));
            }
            _ => return,
        }

        self.set_loading(false);
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Search restaurants; the full envelope lands under `searched_restaurant`.
    #[instrument(skip_all, fields(text = %search_text))]
    pub async fn search_restaurant(
        &self,
        search_text: &str,
        search_query: &str,
        selected_cuisines: &[String],
    ) {
        let token = self.inner.search_seq.begin();
        self.set_loading(true);

        match self
            .inner
            .gateway
            .search_restaurants(search_text, search_query, selected_cuisines)
            .await
        {
            Ok(ok) if self.inner.search_seq.is_current(token) => {
                self.commit(|s| s.searched_restaurant = Some(ok.data));
            }
            Err(error) if self.inner.search_seq.is_current(token) => {
                tracing::warn!(%error, "restaurant search failed");
                self.inner.notifier.error(error.user_message("Search failed."));
            }
            _ => return,
        }

        self.set_loading(false);
    }

    /// Toggle a filter value: applying an applied value removes it, applying
    /// a new one appends it. Application order is preserved for display.
    pub fn set_applied_filter(&self, value: &str) {
        self.commit(|s| {
            if let Some(index) = s.applied_filter.iter().position(|v| v == value) {
                s.applied_filter.remove(index);
            } else {
                s.applied_filter.push(value.to_owned());
            }
        });
    }

    /// Clear every applied filter.
    pub fn reset_applied_filter(&self) {
        self.commit(|s| s.applied_filter.clear());
    }

    // =========================================================================
    // Single-restaurant view
    // =========================================================================

    /// Fetch one restaurant into the detail projection.
    #[instrument(skip_all, fields(restaurant_id = %restaurant_id))]
    pub async fn get_single_restaurant(&self, restaurant_id: &RestaurantId) {
        let token = self.inner.single_seq.begin();
        self.set_loading(true);

        match self.inner.gateway.fetch_single_restaurant(restaurant_id).await {
            Ok(ok) if self.inner.single_seq.is_current(token) => {
                self.commit(|s| s.single_restaurant = Some(ok.data.restaurant));
            }
            Err(error) if self.inner.single_seq.is_current(token) => {
                tracing::warn!(%error, "single restaurant fetch failed");
                self.inner
                    .notifier
                    .error(error.user_message("Could not find restaurant."));
            }
            _ => return,
        }

        self.set_loading(false);
    }

    // =========================================================================
    // Incoming orders
    // =========================================================================

    /// Fetch the owner's incoming orders.
    #[instrument(skip_all)]
    pub async fn get_restaurant_orders(&self) {
        let token = self.inner.orders_seq.begin();
        self.set_loading(true);

        match self.inner.gateway.fetch_restaurant_orders().await {
            Ok(ok) if self.inner.orders_seq.is_current(token) => {
                self.commit(|s| s.restaurant_orders = ok.data.orders);
            }
            Err(error) if self.inner.orders_seq.is_current(token) => {
                tracing::warn!(%error, "restaurant orders fetch failed");
                self.inner
                    .notifier
                    .error(error.user_message("Could not fetch orders."));
            }
            _ => return,
        }

        self.set_loading(false);
    }

    /// Change one incoming order's status; the server's canonical order
    /// replaces the local copy. Deliberately no busy flag: status changes are
    /// row-level actions in the orders view.
    #[instrument(skip_all, fields(order_id = %order_id, status = %status))]
    pub async fn update_restaurant_order(&self, order_id: &OrderId, status: OrderStatus) {
        let token = self.inner.orders_seq.begin();

        match self.inner.gateway.update_order_status(order_id, status).await {
            Ok(ok) if self.inner.orders_seq.is_current(token) => {
                let updated = ok.data.updated_order;
                self.commit(|s| {
                    if let Some(order) =
                        s.restaurant_orders.iter_mut().find(|o| o.id == updated.id)
                    {
                        *order = updated;
                    }
                });
                self.inner.notifier.success(
                    ok.message
                        .unwrap_or_else(|| "Order status updated.".to_owned()),
                );
            }
            Err(error) if self.inner.orders_seq.is_current(token) => {
                tracing::warn!(%error, "order status update failed");
                self.inner
                    .notifier
                    .error(error.user_message("Failed to update order status."));
            }
            _ => {}
        }
    }

    // =========================================================================
    // Reconciliation entry points (wired to menu commits by the composition root)
    // =========================================================================

    /// Fold a newly created menu item into the owner's `menus` collection.
    ///
    /// Replaces on identifier collision rather than appending, so the
    /// collection can never hold two entries for one identifier.
    pub fn add_menu_to_restaurant(&self, menu: MenuItem) {
        self.commit(|s| {
            if let Some(restaurant) = &mut s.restaurant {
                if let Some(existing) = restaurant.menus.iter_mut().find(|m| m.id == menu.id) {
                    *existing = menu;
                } else {
                    restaurant.menus.push(menu);
                }
            }
        });
    }

    /// Replace the matching menu item with its edited version. An identifier
    /// with no match is a no-op.
    pub fn update_menu_to_restaurant(&self, menu: MenuItem) {
        self.commit(|s| {
            if let Some(restaurant) = &mut s.restaurant
                && let Some(existing) = restaurant.menus.iter_mut().find(|m| m.id == menu.id)
            {
                *existing = menu;
            }
        });
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn set_loading(&self, loading: bool) {
        self.inner.state.send_modify(|s| s.loading = loading);
    }

    fn commit(&self, mutate: impl FnOnce(&mut RestaurantState)) {
        self.inner.state.send_modify(mutate);
        self.persist();
    }

    fn persist(&self) {
        let snapshot = self.inner.state.borrow();
        let projection = PersistedRestaurant {
            restaurant: snapshot.restaurant.clone(),
            searched_restaurant: snapshot.searched_restaurant.clone(),
            applied_filter: snapshot.applied_filter.clone(),
            single_restaurant: snapshot.single_restaurant.clone(),
            restaurant_orders: snapshot.restaurant_orders.clone(),
        };
        drop(snapshot);
        self.inner.storage.save(STORAGE_KEY, &projection);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use quick_bites_core::MenuId;
    use std::path::PathBuf;
    use std::time::Duration;
    use url::Url;

    fn test_store(dir: &std::path::Path) -> RestaurantStore {
        let config = ClientConfig {
            api_base_url: Url::parse("http://127.0.0.1:9").unwrap(),
            storage_dir: PathBuf::from(dir),
            request_timeout: Duration::from_secs(1),
            default_theme: quick_bites_core::Theme::Light,
        };
        let gateway = ApiGateway::new(&config).unwrap();
        let storage = Storage::open(dir).unwrap();
        RestaurantStore::new(gateway, Notifier::new(), storage)
    }

    fn restaurant(id: &str) -> Restaurant {
        Restaurant {
            id: RestaurantId::new(id),
            user: None,
            restaurant_name: "Luigi's Kitchen".to_owned(),
            city: "Naples".to_owned(),
            country: "Italy".to_owned(),
            delivery_time: 35,
            cuisines: vec!["italian".to_owned()],
            menus: Vec::new(),
            image_url: String::new(),
            created_at: None,
            updated_at: None,
        }
    }

    fn menu(id: &str, name: &str, price: u64) -> MenuItem {
        MenuItem {
            id: MenuId::new(id),
            name: name.to_owned(),
            description: String::new(),
            price,
            image: String::new(),
        }
    }

    #[test]
    fn test_filter_toggle_pair_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path());

        store.set_applied_filter("italian");
        store.set_applied_filter("fast-food");
        let before = store.snapshot().applied_filter;

        store.set_applied_filter("thai");
        store.set_applied_filter("thai");

        assert_eq!(store.snapshot().applied_filter, before);
    }

    #[test]
    fn test_filter_preserves_application_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path());

        store.set_applied_filter("thai");
        store.set_applied_filter("italian");
        store.set_applied_filter("fast-food");
        store.set_applied_filter("italian"); // toggle off

        assert_eq!(
            store.snapshot().applied_filter,
            vec!["thai".to_owned(), "fast-food".to_owned()]
        );
    }

    #[test]
    fn test_reset_applied_filter_clears_all() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path());

        store.set_applied_filter("italian");
        store.set_applied_filter("thai");
        store.reset_applied_filter();

        assert!(store.snapshot().applied_filter.is_empty());
    }

    #[test]
    fn test_menu_reconciliation_keeps_one_entry_per_identifier() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path());
        store.commit(|s| s.restaurant = Some(restaurant("r1")));

        // Arbitrary create/edit sequence over two identifiers.
        store.add_menu_to_restaurant(menu("m1", "Margherita", 12));
        store.add_menu_to_restaurant(menu("m2", "Calzone", 14));
        store.update_menu_to_restaurant(menu("m1", "Margherita DOP", 15));
        store.add_menu_to_restaurant(menu("m2", "Calzone Grande", 16));
        store.update_menu_to_restaurant(menu("m2", "Calzone Grande", 17));

        let menus = store.snapshot().restaurant.unwrap().menus;
        assert_eq!(menus.len(), 2);
        assert_eq!(menus[0].name, "Margherita DOP");
        assert_eq!(menus[0].price, 15);
        assert_eq!(menus[1].name, "Calzone Grande");
        assert_eq!(menus[1].price, 17);
    }

    #[test]
    fn test_update_without_match_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path());
        store.commit(|s| s.restaurant = Some(restaurant("r1")));

        store.update_menu_to_restaurant(menu("ghost", "Phantom", 1));

        assert!(store.snapshot().restaurant.unwrap().menus.is_empty());
    }

    #[test]
    fn test_reconciliation_without_restaurant_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path());

        store.add_menu_to_restaurant(menu("m1", "Margherita", 12));

        assert!(store.snapshot().restaurant.is_none());
    }

    #[test]
    fn test_persisted_projection_skips_loading() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path());

        store.set_loading(true);
        store.set_applied_filter("italian");

        let raw: serde_json::Value = {
            let text =
                std::fs::read_to_string(dir.path().join(format!("{STORAGE_KEY}.json"))).unwrap();
            serde_json::from_str(&text).unwrap()
        };
        assert!(raw.get("loading").is_none());
        assert_eq!(raw["appliedFilter"], serde_json::json!(["italian"]));
    }

    #[test]
    fn test_hydration_restores_domain_slices() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = test_store(dir.path());
            store.commit(|s| {
                s.restaurant = Some(restaurant("r1"));
                s.applied_filter = vec!["italian".to_owned()];
            });
        }

        let store = test_store(dir.path());
        let state = store.snapshot();
        assert_eq!(state.restaurant.unwrap().id, RestaurantId::new("r1"));
        assert_eq!(state.applied_filter, vec!["italian".to_owned()]);
        assert!(!state.loading);
    }
}
