//! Application composition root.
//!
//! The only place stores are constructed and wired together. In particular
//! the one legitimate cross-store coupling - menu commits reconciling into
//! the restaurant's denormalized `menus` - is subscribed here, keeping the
//! stores themselves ignorant of each other.

use std::sync::Arc;

use crate::api::ApiGateway;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::notify::Notifier;
use crate::storage::Storage;
use crate::stores::{
    CommitKind, MenuStore, OrderStore, RestaurantStore, SessionStore, ThemeStore,
};

/// The assembled client application.
///
/// Cheaply cloneable; every store it exposes is a process-wide singleton.
#[derive(Clone)]
pub struct App {
    inner: Arc<AppInner>,
}

struct AppInner {
    config: ClientConfig,
    notifier: Notifier,
    session: SessionStore,
    restaurant: RestaurantStore,
    menu: MenuStore,
    order: OrderStore,
    theme: ThemeStore,
}

impl App {
    /// Build the gateway, storage, and stores, and wire the
    /// menu-to-restaurant reconciliation.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage directory cannot be prepared or the
    /// HTTP client cannot be constructed.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let storage = Storage::open(&config.storage_dir)?;
        let notifier = Notifier::new();
        let gateway = ApiGateway::new(&config)?;

        let session = SessionStore::new(gateway.clone(), notifier.clone(), storage.clone());
        let restaurant = RestaurantStore::new(gateway.clone(), notifier.clone(), storage.clone());
        let menu = MenuStore::new(gateway.clone(), notifier.clone(), storage.clone());
        let order = OrderStore::new(gateway, notifier.clone(), storage.clone());
        let theme = ThemeStore::new(storage, config.default_theme);

        // The one cross-store coupling point: confirmed menu mutations fold
        // into the restaurant's denormalized menu list.
        {
            let restaurant = restaurant.clone();
            menu.events().subscribe(move |event| match event.kind {
                CommitKind::Created => restaurant.add_menu_to_restaurant(event.menu.clone()),
                CommitKind::Updated => restaurant.update_menu_to_restaurant(event.menu.clone()),
            });
        }

        Ok(Self {
            inner: Arc::new(AppInner {
                config,
                notifier,
                session,
                restaurant,
                menu,
                order,
                theme,
            }),
        })
    }

    /// Run the startup sequence: apply the persisted theme, then probe the
    /// identity endpoint. Returns once the session has settled - after this,
    /// `is_checking_auth` is `false` and the route guards may run.
    pub async fn start(&self) {
        self.inner.theme.initialize_theme();
        self.inner.session.check_authentication().await;
    }

    /// Whether the startup auth probe has settled.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        !self.inner.session.snapshot().is_checking_auth
    }

    /// Get a reference to the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Get the notification hub.
    #[must_use]
    pub fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }

    /// Get the session store.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// Get the restaurant store.
    #[must_use]
    pub fn restaurant(&self) -> &RestaurantStore {
        &self.inner.restaurant
    }

    /// Get the menu store.
    #[must_use]
    pub fn menu(&self) -> &MenuStore {
        &self.inner.menu
    }

    /// Get the order store.
    #[must_use]
    pub fn order(&self) -> &OrderStore {
        &self.inner.order
    }

    /// Get the theme store.
    #[must_use]
    pub fn theme(&self) -> &ThemeStore {
        &self.inner.theme
    }
}
