//! Menu store end-to-end: multipart mutations against the mock backend and
//! the reconciliation of confirmed commits into the restaurant's
//! denormalized `menus` collection.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;

use axum::Json;
use axum::Router;
use axum::extract::{Multipart, Path};
use axum::routing::{get, post, put};

use quick_bites_client::api::MenuForm;
use quick_bites_core::MenuId;
use quick_bites_integration_tests::{menu_json, restaurant_json, spawn_backend, test_app};

/// Collect the text fields of a multipart body.
async fn form_fields(mut multipart: Multipart) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_owned();
        let value = field.text().await.unwrap_or_default();
        fields.insert(name, value);
    }
    fields
}

/// Backend that echoes submitted menu fields back as the canonical record,
/// the way the real API returns the stored document.
fn menu_router() -> Router {
    Router::new()
        .route(
            "/api/v1/restaurant",
            get(|| async {
                Json(serde_json::json!({
                    "success": true,
                    "restaurant":
                        restaurant_json("r1", "Luigi's Kitchen", serde_json::json!([])),
                }))
            }),
        )
        .route(
            "/api/v1/menu",
            post(|multipart: Multipart| async move {
                let fields = form_fields(multipart).await;
                let price: u64 = fields["price"].parse().unwrap();
                Json(serde_json::json!({
                    "success": true,
                    "message": "Menu item created.",
                    "menu": menu_json("m-created", &fields["name"], price),
                }))
            }),
        )
        .route(
            "/api/v1/menu/{id}",
            put(|Path(id): Path<String>, multipart: Multipart| async move {
                let fields = form_fields(multipart).await;
                let price: u64 = fields["price"].parse().unwrap();
                Json(serde_json::json!({
                    "success": true,
                    "message": "Menu item updated.",
                    "menu": menu_json(&id, &fields["name"], price),
                }))
            }),
        )
}

fn form(name: &str, price: u64) -> MenuForm {
    MenuForm {
        name: name.to_owned(),
        description: "Wood-fired".to_owned(),
        price,
        image: None,
    }
}

#[tokio::test]
async fn test_create_menu_reconciles_into_restaurant() {
    let addr = spawn_backend(menu_router()).await;
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(addr, dir.path());

    app.restaurant().get_restaurant().await;
    app.menu().create_menu(form("Margherita", 12)).await;

    // The menu store holds the canonical record...
    let menu = app.menu().snapshot().menu.unwrap();
    assert_eq!(menu.id, MenuId::new("m-created"));
    assert_eq!(menu.name, "Margherita");

    // ...and the restaurant's denormalized list reflects it without a refetch.
    let menus = app.restaurant().snapshot().restaurant.unwrap().menus;
    assert_eq!(menus.len(), 1);
    assert_eq!(menus[0].id, MenuId::new("m-created"));
    assert_eq!(menus[0].price, 12);
}

#[tokio::test]
async fn test_edit_menu_replaces_by_identifier_never_duplicates() {
    let addr = spawn_backend(menu_router()).await;
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(addr, dir.path());

    app.restaurant().get_restaurant().await;
    app.menu().create_menu(form("Margherita", 12)).await;
    app.menu()
        .edit_menu(&MenuId::new("m-created"), form("Margherita DOP", 15))
        .await;
    app.menu()
        .edit_menu(&MenuId::new("m-created"), form("Margherita DOP", 16))
        .await;

    // Exactly one entry per identifier, carrying the latest payload.
    let menus = app.restaurant().snapshot().restaurant.unwrap().menus;
    assert_eq!(menus.len(), 1);
    assert_eq!(menus[0].name, "Margherita DOP");
    assert_eq!(menus[0].price, 16);
}

#[tokio::test]
async fn test_failed_create_does_not_touch_either_store() {
    let router = Router::new()
        .route(
            "/api/v1/restaurant",
            get(|| async {
                Json(serde_json::json!({
                    "success": true,
                    "restaurant":
                        restaurant_json("r1", "Luigi's Kitchen", serde_json::json!([])),
                }))
            }),
        )
        .route(
            "/api/v1/menu",
            post(|_multipart: Multipart| async {
                (
                    axum::http::StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({
                        "success": false,
                        "message": "Image is required",
                    })),
                )
            }),
        );
    let addr = spawn_backend(router).await;
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(addr, dir.path());
    let mut notices = app.notifier().subscribe();

    app.restaurant().get_restaurant().await;
    app.menu().create_menu(form("Margherita", 12)).await;

    // No commit event fired: both stores are exactly as before.
    assert!(app.menu().snapshot().menu.is_none());
    assert!(
        app.restaurant()
            .snapshot()
            .restaurant
            .unwrap()
            .menus
            .is_empty()
    );
    assert_eq!(notices.try_recv().unwrap().message, "Image is required");
}
