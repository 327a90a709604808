//! Order records and the checkout request shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{MenuId, OrderId, RestaurantId};

/// Lifecycle state of a placed order.
///
/// The wire values are the lowercase concatenated forms the API serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    #[serde(rename = "outfordelivery")]
    OutForDelivery,
    Delivered,
}

/// Error parsing an [`OrderStatus`] from its wire form.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid order status: {0}")]
pub struct OrderStatusError(pub String);

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::OutForDelivery => "outfordelivery",
            Self::Delivered => "delivered",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = OrderStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "preparing" => Ok(Self::Preparing),
            "outfordelivery" => Ok(Self::OutForDelivery),
            "delivered" => Ok(Self::Delivered),
            other => Err(OrderStatusError(other.to_owned())),
        }
    }
}

/// Delivery contact details captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryDetails {
    pub name: String,
    pub email: String,
    pub address: String,
    pub city: String,
}

/// One line of a cart as it appears inside an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub menu_id: MenuId,
    pub name: String,
    #[serde(default)]
    pub image: String,
    pub price: u64,
    pub quantity: u32,
}

/// A placed order.
///
/// Two independent collections of these exist client-side: the consumer's own
/// orders and a restaurant owner's incoming orders. They are fetched and
/// mutated separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    pub delivery_details: DeliveryDetails,
    #[serde(default)]
    pub cart_items: Vec<CartItem>,
    #[serde(default)]
    pub total_amount: u64,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// The payload sent to the checkout-session endpoint.
///
/// The response carries a redirect URL to the external payment page; the
/// client navigates there directly and performs no further state transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionRequest {
    pub cart_items: Vec<CartItem>,
    pub delivery_details: DeliveryDetails,
    pub restaurant_id: RestaurantId,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_wire_values() {
        for (status, wire) in [
            (OrderStatus::Pending, "\"pending\""),
            (OrderStatus::Confirmed, "\"confirmed\""),
            (OrderStatus::Preparing, "\"preparing\""),
            (OrderStatus::OutForDelivery, "\"outfordelivery\""),
            (OrderStatus::Delivered, "\"delivered\""),
        ] {
            assert_eq!(serde_json::to_string(&status).unwrap(), wire);
            let back: OrderStatus = serde_json::from_str(wire).unwrap();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn test_order_status_from_str_rejects_unknown() {
        let err = "shipped".parse::<OrderStatus>().unwrap_err();
        assert_eq!(err.to_string(), "invalid order status: shipped");
    }

    #[test]
    fn test_order_deserializes() {
        let json = serde_json::json!({
            "_id": "665f1c2e9b1d4a0012ab34d0",
            "deliveryDetails": {
                "name": "Ada Lovelace",
                "email": "ada@example.com",
                "address": "12 Analytical Row",
                "city": "London"
            },
            "cartItems": [{
                "menuId": "665f1c2e9b1d4a0012ab34ce",
                "name": "Margherita",
                "image": "",
                "price": 12,
                "quantity": 2
            }],
            "totalAmount": 24,
            "status": "preparing"
        });

        let order: Order = serde_json::from_value(json).unwrap();
        assert_eq!(order.status, OrderStatus::Preparing);
        assert_eq!(order.cart_items[0].quantity, 2);
        assert_eq!(order.total_amount, 24);
    }
}
