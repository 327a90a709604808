//! Session store: the authenticated user's identity and auth flags.
//!
//! Source of truth for route guarding. `user` and `is_authenticated` are
//! always set together or cleared together; `is_checking_auth` gates the
//! first render and drops exactly once, whatever `check_authentication`
//! runs into.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::instrument;

use quick_bites_core::User;

use crate::api::{ApiGateway, LoginInput, ProfileUpdate, SignupInput};
use crate::notify::Notifier;
use crate::storage::Storage;

use super::RequestSeq;

const STORAGE_KEY: &str = "user-store";

/// Snapshot of the session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub user: Option<User>,
    pub is_authenticated: bool,
    /// `true` until the startup auth probe settles; protected content must
    /// not render while this holds.
    pub is_checking_auth: bool,
    pub loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            user: None,
            is_authenticated: false,
            is_checking_auth: true,
            loading: false,
        }
    }
}

// =============================================================================
// Persistence projection
// =============================================================================

/// The slice of a [`User`] worth keeping across reloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedUser {
    fullname: String,
    email: String,
    admin: bool,
    is_verified: bool,
}

/// Durable projection of the session; never carries busy flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedSession {
    user: Option<PersistedUser>,
    is_authenticated: bool,
}

impl From<&User> for PersistedUser {
    fn from(user: &User) -> Self {
        Self {
            fullname: user.fullname.clone(),
            email: user.email.clone(),
            admin: user.admin,
            is_verified: user.is_verified,
        }
    }
}

impl From<PersistedUser> for User {
    fn from(persisted: PersistedUser) -> Self {
        // Profile details refresh on the next successful auth probe.
        Self {
            fullname: persisted.fullname,
            email: persisted.email,
            contact: 0,
            address: String::new(),
            city: String::new(),
            country: String::new(),
            profile_picture: String::new(),
            admin: persisted.admin,
            is_verified: persisted.is_verified,
        }
    }
}

// =============================================================================
// SessionStore
// =============================================================================

/// Process-wide session store handle.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

struct SessionStoreInner {
    gateway: ApiGateway,
    notifier: Notifier,
    storage: Storage,
    state: watch::Sender<SessionState>,
    seq: RequestSeq,
}

impl SessionStore {
    /// Create the store, hydrating the persisted projection if one exists.
    #[must_use]
    pub fn new(gateway: ApiGateway, notifier: Notifier, storage: Storage) -> Self {
        let mut initial = SessionState::default();
        if let Some(persisted) = storage.load::<PersistedSession>(STORAGE_KEY) {
            initial.user = persisted.user.map(User::from);
            initial.is_authenticated = persisted.is_authenticated;
        }

        let (state, _) = watch::channel(initial);
        Self {
            inner: Arc::new(SessionStoreInner {
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
    pub fn snapshot(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Create an account; on success the session becomes authenticated.
    #[instrument(skip_all)]
    pub async fn signup(&self, input: &SignupInput) {
        let token = self.inner.seq.begin();
        self.set_loading(true);

        match self.inner.gateway.signup(input).await {
            Ok(ok) if self.inner.seq.is_current(token) => {
                self.inner
                    .notifier
                    .success(ok.message.unwrap_or_else(|| "Account created.".to_owned()));
                self.commit(|s| {
                    s.user = Some(ok.data.user);
                    s.is_authenticated = true;
                });
            }
            Err(error) if self.inner.seq.is_current(token) => {
                tracing::warn!(%error, "signup failed");
                self.inner
                    .notifier
                    .error(error.user_message("Signup failed. Please try again."));
            }
            _ => return, // stale settlement: a newer request owns the slot
        }

        self.set_loading(false);
    }

    /// Log in; on success the session becomes authenticated.
    #[instrument(skip_all)]
    pub async fn login(&self, input: &LoginInput) {
        let token = self.inner.seq.begin();
        self.set_loading(true);

        match self.inner.gateway.login(input).await {
            Ok(ok) if self.inner.seq.is_current(token) => {
                self.inner
                    .notifier
                    .success(ok.message.unwrap_or_else(|| "Logged in.".to_owned()));
                self.commit(|s| {
                    s.user = Some(ok.data.user);
                    s.is_authenticated = true;
                });
            }
            Err(error) if self.inner.seq.is_current(token) => {
                tracing::warn!(%error, "login failed");
                self.inner
                    .notifier
                    .error(error.user_message("Login failed. Please check your credentials."));
            }
            _ => return,
        }

        self.set_loading(false);
    }

    /// Confirm the emailed verification code.
    #[instrument(skip_all)]
    pub async fn verify_email(&self, verification_code: &str) {
        let token = self.inner.seq.begin();
        self.set_loading(true);

        match self.inner.gateway.verify_email(verification_code).await {
            Ok(ok) if self.inner.seq.is_current(token) => {
                self.inner
                    .notifier
                    .success(ok.message.unwrap_or_else(|| "Email verified.".to_owned()));
                self.commit(|s| {
                    s.user = Some(ok.data.user);
                    s.is_authenticated = true;
                });
            }
            Err(error) if self.inner.seq.is_current(token) => {
                tracing::warn!(%error, "email verification failed");
                self.inner
                    .notifier
                    .error(error.user_message("Email verification failed."));
            }
            _ => return,
        }

        self.set_loading(false);
    }

    /// Probe the identity endpoint once, at startup.
    ///
    /// Any failure resolves silently to a logged-out session; no notification
    /// is raised. `is_checking_auth` drops in every path, success or not, so
    /// the route guard layer can start rendering.
    #[instrument(skip_all)]
    pub async fn check_authentication(&self) {
        let token = self.inner.seq.begin();

        let result = self.inner.gateway.check_auth().await;
        if self.inner.seq.is_current(token) {
            match result {
                Ok(ok) => self.commit(|s| {
                    s.user = Some(ok.data.user);
                    s.is_authenticated = true;
                }),
                Err(error) => {
                    tracing::debug!(%error, "auth probe resolved to logged-out");
                    self.commit(|s| {
                        s.user = None;
                        s.is_authenticated = false;
                    });
                }
            }
        }

        // The render gate drops exactly once, in every code path.
        self.inner.state.send_modify(|s| {
            s.is_checking_auth = false;
            s.loading = false;
        });
    }

    /// Log out. The remote invalidation is best-effort: local state clears
    /// unconditionally so a network error can never leave the client stuck
    /// authenticated.
    #[instrument(skip_all)]
    pub async fn logout(&self) {
        // Invalidate any in-flight auth operation; nothing settles after this.
        let _token = self.inner.seq.begin();
        self.set_loading(true);

        match self.inner.gateway.logout().await {
            Ok(ok) => {
                self.inner
                    .notifier
                    .success(ok.message.unwrap_or_else(|| "Logged out.".to_owned()));
            }
            Err(error) => {
                tracing::warn!(%error, "remote logout failed; clearing local session anyway");
                self.inner.notifier.error(error.user_message("Logout failed."));
            }
        }

        self.commit(|s| {
            s.user = None;
            s.is_authenticated = false;
            s.loading = false;
        });
    }

    /// Request a password-reset email. Only client-visible effect is a notice.
    #[instrument(skip_all)]
    pub async fn forgot_password(&self, email: &str) {
        let token = self.inner.seq.begin();
        self.set_loading(true);

        match self.inner.gateway.forgot_password(email).await {
            Ok(ok) if self.inner.seq.is_current(token) => {
                self.inner.notifier.success(
                    ok.message
                        .unwrap_or_else(|| "Password reset email sent.".to_owned()),
                );
            }
            Err(error) if self.inner.seq.is_current(token) => {
                self.inner
                    .notifier
                    .error(error.user_message("Request failed. Please try again."));
            }
            _ => return,
        }

        self.set_loading(false);
    }

    /// Set a new password using an emailed reset token.
    #[instrument(skip_all)]
    pub async fn reset_password(&self, reset_token: &str, new_password: &str) {
        let token = self.inner.seq.begin();
        self.set_loading(true);

        match self.inner.gateway.reset_password(reset_token, new_password).await {
            Ok(ok) if self.inner.seq.is_current(token) => {
                self.inner
                    .notifier
                    .success(ok.message.unwrap_or_else(|| "Password reset.".to_owned()));
            }
            Err(error) if self.inner.seq.is_current(token) => {
                self.inner
                    .notifier
                    .error(error.user_message("Password reset failed."));
            }
            _ => return,
        }

        self.set_loading(false);
    }

    /// Merge server-confirmed profile fields into the session user.
    #[instrument(skip_all)]
    pub async fn update_profile(&self, input: &ProfileUpdate) {
        let token = self.inner.seq.begin();
        self.set_loading(true);

        match self.inner.gateway.update_profile(input).await {
            Ok(ok) if self.inner.seq.is_current(token) => {
                self.inner
                    .notifier
                    .success(ok.message.unwrap_or_else(|| "Profile updated.".to_owned()));
                // The server returns the canonical merged user.
                self.commit(|s| s.user = Some(ok.data.user));
            }
            Err(error) if self.inner.seq.is_current(token) => {
                self.inner
                    .notifier
                    .error(error.user_message("Profile update failed."));
            }
            _ => return,
        }

        self.set_loading(false);
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn set_loading(&self, loading: bool) {
        // Transient; deliberately not persisted.
        self.inner.state.send_modify(|s| s.loading = loading);
    }

    fn commit(&self, mutate: impl FnOnce(&mut SessionState)) {
        self.inner.state.send_modify(mutate);
        self.persist();
    }

    fn persist(&self) {
        let snapshot = self.inner.state.borrow();
        let projection = PersistedSession {
            user: snapshot.user.as_ref().map(PersistedUser::from),
            is_authenticated: snapshot.is_authenticated,
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
    use std::path::PathBuf;
    use std::time::Duration;
    use url::Url;

    fn test_store(dir: &std::path::Path) -> SessionStore {
        let config = ClientConfig {
            // Discard port: unit tests never issue a request.
            api_base_url: Url::parse("http://127.0.0.1:9").unwrap(),
            storage_dir: PathBuf::from(dir),
            request_timeout: Duration::from_secs(1),
            default_theme: quick_bites_core::Theme::Light,
        };
        let gateway = ApiGateway::new(&config).unwrap();
        let storage = Storage::open(dir).unwrap();
        SessionStore::new(gateway, Notifier::new(), storage)
    }

    fn verified_user() -> User {
        User {
            fullname: "Ada Lovelace".to_owned(),
            email: "ada@example.com".to_owned(),
            contact: 5551234567,
            address: "12 Analytical Row".to_owned(),
            city: "London".to_owned(),
            country: "UK".to_owned(),
            profile_picture: String::new(),
            admin: false,
            is_verified: true,
        }
    }

    #[test]
    fn test_initial_state_gates_rendering() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path());

        let state = store.snapshot();
        assert!(state.is_checking_auth);
        assert!(!state.is_authenticated);
        assert!(state.user.is_none());
    }

    #[test]
    fn test_persisted_projection_drops_transient_and_detail_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path());

        store.commit(|s| {
            s.user = Some(verified_user());
            s.is_authenticated = true;
            s.loading = true;
        });

        let raw: serde_json::Value = {
            let text =
                std::fs::read_to_string(dir.path().join(format!("{STORAGE_KEY}.json"))).unwrap();
            serde_json::from_str(&text).unwrap()
        };

        // Only the partial projection lands on disk.
        assert_eq!(raw["isAuthenticated"], serde_json::json!(true));
        assert_eq!(raw["user"]["fullname"], serde_json::json!("Ada Lovelace"));
        assert_eq!(raw["user"]["isVerified"], serde_json::json!(true));
        assert!(raw["user"].get("address").is_none());
        assert!(raw["user"].get("contact").is_none());
        assert!(raw.get("loading").is_none());
        assert!(raw.get("isCheckingAuth").is_none());
    }

    #[test]
    fn test_hydration_restores_partial_user_and_auth_flag() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = test_store(dir.path());
            store.commit(|s| {
                s.user = Some(verified_user());
                s.is_authenticated = true;
            });
        }

        // A fresh store over the same directory sees the projection.
        let store = test_store(dir.path());
        let state = store.snapshot();
        assert!(state.is_authenticated);
        let user = state.user.unwrap();
        assert_eq!(user.fullname, "Ada Lovelace");
        assert!(user.is_verified);
        // Detail fields were not persisted; they reset until the next probe.
        assert!(user.address.is_empty());
        // The render gate is never persisted: it starts up again.
        assert!(state.is_checking_auth);
    }

    #[test]
    fn test_loading_flag_is_not_persisted_by_set_loading() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path());

        store.set_loading(true);
        assert!(store.snapshot().loading);
        assert!(!dir.path().join(format!("{STORAGE_KEY}.json")).exists());
    }
}
