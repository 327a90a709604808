//! QuickBites client entry point.
//!
//! Boots the application layer the way the single-page UI shell would:
//! load configuration, assemble the stores, surface notices in the log the
//! way toasts would surface on screen, then run the startup sequence and
//! report where the route guards would send a visitor.

#![cfg_attr(not(test), forbid(unsafe_code))]

use quick_bites_client::app::App;
use quick_bites_client::config::ClientConfig;
use quick_bites_client::guards;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing with EnvFilter.
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "quick_bites_client=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ClientConfig::from_env().expect("Failed to load configuration");
    tracing::info!(api = %config.api_base_url, "configuration loaded");

    let app = App::new(config).expect("Failed to initialize application");

    // Surface notices in the log, the way the UI surfaces toasts.
    let mut notices = app.notifier().subscribe();
    tokio::spawn(async move {
        while let Ok(notice) = notices.recv().await {
            tracing::info!(level = ?notice.level, "{}", notice.message);
        }
    });

    app.start().await;

    let session = app.session().snapshot();
    tracing::info!(
        authenticated = session.is_authenticated,
        checking_auth = session.is_checking_auth,
        theme = %app.theme().theme(),
        "startup complete"
    );

    tracing::info!(
        home = ?guards::protected_route(&session),
        login = ?guards::authenticated_user(&session),
        admin = ?guards::admin_route(&session),
        "route guard decisions"
    );
}
