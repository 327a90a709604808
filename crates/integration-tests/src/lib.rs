//! Integration tests for QuickBites.
//!
//! Each test spins up an in-process axum mock of the remote food-ordering
//! API on an ephemeral port, points a freshly assembled [`App`] at it, and
//! drives the stores end-to-end: requests go over real HTTP, the cookie jar
//! carries the session, and every assertion runs against observable store
//! state.
//!
//! Run with: `cargo test -p quick-bites-integration-tests`

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use url::Url;

use quick_bites_client::app::App;
use quick_bites_client::config::ClientConfig;
use quick_bites_core::Theme;

/// A request observed by the mock backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: String,
}

/// Shared request log for a mock backend.
pub type RequestLog = Arc<Mutex<Vec<RecordedRequest>>>;

/// Create an empty request log.
#[must_use]
pub fn request_log() -> RequestLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Axum middleware-style layer: record every request into `log`.
pub fn recording(log: RequestLog, router: Router) -> Router {
    use axum::extract::Request;
    use axum::middleware::{self, Next};

    router.layer(middleware::from_fn(move |req: Request, next: Next| {
        let log = Arc::clone(&log);
        async move {
            log.lock().unwrap().push(RecordedRequest {
                method: req.method().to_string(),
                path: req.uri().path().to_owned(),
                query: req.uri().query().unwrap_or_default().to_owned(),
            });
            next.run(req).await
        }
    }))
}

/// Bind `router` on an ephemeral port and serve it for the rest of the test.
pub async fn spawn_backend(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock backend");
    let addr = listener.local_addr().expect("Failed to read local addr");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Mock backend crashed");
    });

    addr
}

/// Client configuration pointed at the mock backend.
#[must_use]
pub fn test_config(addr: SocketAddr, storage_dir: &Path) -> ClientConfig {
    ClientConfig {
        api_base_url: Url::parse(&format!("http://{addr}")).expect("valid addr"),
        storage_dir: storage_dir.to_path_buf(),
        request_timeout: Duration::from_secs(2),
        default_theme: Theme::Light,
    }
}

/// Assemble an [`App`] against the mock backend with its own storage dir.
#[must_use]
pub fn test_app(addr: SocketAddr, storage_dir: &Path) -> App {
    App::new(test_config(addr, storage_dir)).expect("Failed to assemble app")
}

/// An app whose gateway points at a port nothing listens on - every request
/// fails at the transport layer.
#[must_use]
pub fn unreachable_app(storage_dir: &Path) -> App {
    let addr: SocketAddr = "127.0.0.1:9".parse().expect("valid addr");
    App::new(test_config(addr, storage_dir)).expect("Failed to assemble app")
}

/// A user JSON body as the backend serves it.
#[must_use]
pub fn user_json(fullname: &str, admin: bool, is_verified: bool) -> serde_json::Value {
    serde_json::json!({
        "fullname": fullname,
        "email": format!("{}@example.com", uuid::Uuid::new_v4()),
        "contact": 5551234567u64,
        "address": "12 Analytical Row",
        "city": "London",
        "country": "UK",
        "profilePicture": "",
        "admin": admin,
        "isVerified": is_verified,
    })
}

/// A restaurant JSON body as the backend serves it.
#[must_use]
pub fn restaurant_json(id: &str, name: &str, menus: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "_id": id,
        "restaurantName": name,
        "city": "Naples",
        "country": "Italy",
        "deliveryTime": 35,
        "cuisines": ["italian"],
        "menus": menus,
        "imageUrl": "https://img.example.com/r.png",
    })
}

/// A menu item JSON body as the backend serves it.
#[must_use]
pub fn menu_json(id: &str, name: &str, price: u64) -> serde_json::Value {
    serde_json::json!({
        "_id": id,
        "name": name,
        "description": "",
        "price": price,
        "image": "",
    })
}
