//! Theme store: the two-valued display preference.
//!
//! No network dependency and a lifecycle independent of the session; the
//! preference survives logout and reload.

use std::sync::Arc;

use tokio::sync::watch;

use quick_bites_core::Theme;

use crate::storage::Storage;

const STORAGE_KEY: &str = "theme-store";

/// Process-wide theme store handle.
#[derive(Clone)]
pub struct ThemeStore {
    inner: Arc<ThemeStoreInner>,
}

struct ThemeStoreInner {
    storage: Storage,
    state: watch::Sender<Theme>,
    default_theme: Theme,
}

impl ThemeStore {
    /// Create the store. The state starts at the configured default until
    /// [`Self::initialize_theme`] applies the persisted preference.
    #[must_use]
    pub fn new(storage: Storage, default_theme: Theme) -> Self {
        let (state, _) = watch::channel(default_theme);
        Self {
            inner: Arc::new(ThemeStoreInner {
                storage,
                state,
                default_theme,
            }),
        }
    }

    /// Current theme.
    #[must_use]
    pub fn theme(&self) -> Theme {
        *self.inner.state.borrow()
    }

    /// Subscribe to theme changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Theme> {
        self.inner.state.subscribe()
    }

    /// Apply and persist a theme immediately.
    pub fn set_theme(&self, theme: Theme) {
        self.inner.state.send_modify(|t| *t = theme);
        self.inner.storage.save(STORAGE_KEY, &theme);
    }

    /// Apply the persisted preference, or the configured default, once at
    /// startup.
    pub fn initialize_theme(&self) {
        let theme = self
            .inner
            .storage
            .load::<Theme>(STORAGE_KEY)
            .unwrap_or(self.inner.default_theme);
        self.inner.state.send_modify(|t| *t = theme);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_store(dir: &std::path::Path, default_theme: Theme) -> ThemeStore {
        ThemeStore::new(Storage::open(dir).unwrap(), default_theme)
    }

    #[test]
    fn test_initialize_without_persisted_value_uses_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path(), Theme::Dark);

        store.initialize_theme();
        assert_eq!(store.theme(), Theme::Dark);
    }

    #[test]
    fn test_set_theme_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = test_store(dir.path(), Theme::Light);
            store.set_theme(Theme::Dark);
        }

        let store = test_store(dir.path(), Theme::Light);
        store.initialize_theme();
        assert_eq!(store.theme(), Theme::Dark);
    }

    #[test]
    fn test_subscribers_wake_on_set_theme() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path(), Theme::Light);
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.set_theme(Theme::Dark);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), Theme::Dark);
    }
}
