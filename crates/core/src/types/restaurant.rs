//! Restaurant and menu records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{MenuId, RestaurantId};

/// A restaurant as served by the remote API.
///
/// Owns an ordered collection of [`MenuItem`]s under `menus`. The search
/// projection and the single-restaurant projection held by the client are
/// independent copies of this shape, never aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    #[serde(rename = "_id")]
    pub id: RestaurantId,
    /// Identifier of the owning user account.
    #[serde(default)]
    pub user: Option<String>,
    pub restaurant_name: String,
    pub city: String,
    pub country: String,
    /// Estimated delivery time in minutes.
    pub delivery_time: u32,
    #[serde(default)]
    pub cuisines: Vec<String>,
    #[serde(default)]
    pub menus: Vec<MenuItem>,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A single dish on a restaurant's menu.
///
/// Belongs to exactly one restaurant; the back-reference is by identity only,
/// so a menu item travels as a self-contained record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    #[serde(rename = "_id")]
    pub id: MenuId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Price in whole currency units, as the API serves it.
    pub price: u64,
    #[serde(default)]
    pub image: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_json() -> serde_json::Value {
        serde_json::json!({
            "_id": "665f1c2e9b1d4a0012ab34cd",
            "user": "665f1c2e9b1d4a0012ab34aa",
            "restaurantName": "Luigi's Kitchen",
            "city": "Naples",
            "country": "Italy",
            "deliveryTime": 35,
            "cuisines": ["italian", "pizza"],
            "menus": [{
                "_id": "665f1c2e9b1d4a0012ab34ce",
                "name": "Margherita",
                "description": "Tomato, mozzarella, basil",
                "price": 12,
                "image": "https://img.example.com/margherita.png"
            }],
            "imageUrl": "https://img.example.com/luigis.png"
        })
    }

    #[test]
    fn test_restaurant_deserializes_nested_menus() {
        let restaurant: Restaurant = serde_json::from_value(sample_json()).unwrap();
        assert_eq!(restaurant.id, RestaurantId::new("665f1c2e9b1d4a0012ab34cd"));
        assert_eq!(restaurant.restaurant_name, "Luigi's Kitchen");
        assert_eq!(restaurant.delivery_time, 35);
        assert_eq!(restaurant.menus.len(), 1);
        assert_eq!(restaurant.menus[0].name, "Margherita");
    }

    #[test]
    fn test_restaurant_roundtrips_id_field_name() {
        let restaurant: Restaurant = serde_json::from_value(sample_json()).unwrap();
        let value = serde_json::to_value(&restaurant).unwrap();
        // The wire name stays `_id`; nothing downstream should see `id`.
        assert!(value.get("_id").is_some());
        assert!(value.get("id").is_none());
    }
}
