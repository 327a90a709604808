//! Domain types mirrored from the remote API.

mod id;
mod order;
mod restaurant;
mod theme;
mod user;

pub use id::{MenuId, OrderId, RestaurantId};
pub use order::{
    CartItem, CheckoutSessionRequest, DeliveryDetails, Order, OrderStatus, OrderStatusError,
};
pub use restaurant::{MenuItem, Restaurant};
pub use theme::{Theme, ThemeError};
pub use user::User;
