//! Menu store: create and edit menu items.
//!
//! On every confirmed mutation the store publishes a [`MenuCommitted`] event
//! so the restaurant's denormalized `menus` collection can reconcile without
//! a second round-trip. This store holds no reference to any other store.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::instrument;

use quick_bites_core::{MenuId, MenuItem};

use crate::api::{ApiGateway, MenuForm};
use crate::notify::Notifier;
use crate::storage::Storage;

use super::events::{CommitKind, MenuCommitted, MenuEvents};
use super::RequestSeq;

const STORAGE_KEY: &str = "menu-store";

/// Snapshot of the menu store.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MenuState {
    pub loading: bool,
    /// The most recently created or edited menu item.
    pub menu: Option<MenuItem>,
}

/// Durable projection; busy flags never persist.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PersistedMenu {
    menu: Option<MenuItem>,
}

/// Process-wide menu store handle.
#[derive(Clone)]
pub struct MenuStore {
    inner: Arc<MenuStoreInner>,
}

struct MenuStoreInner {
    gateway: ApiGateway,
    notifier: Notifier,
    storage: Storage,
    state: watch::Sender<MenuState>,
    events: MenuEvents,
    seq: RequestSeq,
}

impl MenuStore {
    /// Create the store, hydrating the persisted projection if one exists.
    #[must_use]
    pub fn new(gateway: ApiGateway, notifier: Notifier, storage: Storage) -> Self {
        let mut initial = MenuState::default();
        if let Some(persisted) = storage.load::<PersistedMenu>(STORAGE_KEY) {
            initial.menu = persisted.menu;
        }

        let (state, _) = watch::channel(initial);
        Self {
            inner: Arc::new(MenuStoreInner {
                gateway,
                notifier,
                storage,
                state,
                events: MenuEvents::new(),
                seq: RequestSeq::new(),
            }),
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> MenuState {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<MenuState> {
        self.inner.state.subscribe()
    }

    /// The commit event hub, for the composition root to wire subscribers.
    #[must_use]
    pub fn events(&self) -> &MenuEvents {
        &self.inner.events
    }

    /// Create a menu item.
    #[instrument(skip_all)]
    pub async fn create_menu(&self, form: MenuForm) {
        let token = self.inner.seq.begin();
        self.set_loading(true);

        match self.inner.gateway.create_menu(form).await {
            Ok(ok) if self.inner.seq.is_current(token) => {
                self.inner
                    .notifier
                    .success(ok.message.unwrap_or_else(|| "Menu item created.".to_owned()));
                let menu = ok.data.menu;
                self.commit(|s| s.menu = Some(menu.clone()));
                // Publish only on success; subscribers reconcile synchronously.
                self.inner.events.publish(&MenuCommitted {
                    kind: CommitKind::Created,
                    menu,
                });
            }
            Err(error) if self.inner.seq.is_current(token) => {
                tracing::warn!(%error, "menu creation failed");
                self.inner
                    .notifier
                    .error(error.user_message("Failed to create menu item."));
            }
            _ => return,
        }

        self.set_loading(false);
    }

    /// Edit an existing menu item.
    #[instrument(skip_all, fields(menu_id = %menu_id))]
    pub async fn edit_menu(&self, menu_id: &MenuId, form: MenuForm) {
        let token = self.inner.seq.begin();
        self.set_loading(true);

        match self.inner.gateway.edit_menu(menu_id, form).await {
            Ok(ok) if self.inner.seq.is_current(token) => {
                self.inner
                    .notifier
                    .success(ok.message.unwrap_or_else(|| "Menu item updated.".to_owned()));
                let menu = ok.data.menu;
                self.commit(|s| s.menu = Some(menu.clone()));
                self.inner.events.publish(&MenuCommitted {
                    kind: CommitKind::Updated,
                    menu,
                });
            }
            Err(error) if self.inner.seq.is_current(token) => {
                tracing::warn!(%error, "menu edit failed");
                self.inner
                    .notifier
                    .error(error.user_message("Failed to update menu item."));
            }
            _ => return,
        }

        self.set_loading(false);
    }

    fn set_loading(&self, loading: bool) {
        self.inner.state.send_modify(|s| s.loading = loading);
    }

    fn commit(&self, mutate: impl FnOnce(&mut MenuState)) {
        self.inner.state.send_modify(mutate);
        self.persist();
    }

    fn persist(&self) {
        let snapshot = self.inner.state.borrow();
        let projection = PersistedMenu {
            menu: snapshot.menu.clone(),
        };
        drop(snapshot);
        self.inner.storage.save(STORAGE_KEY, &projection);
    }
}
