//! Checkout and consumer-order endpoints (`/api/v1/order`).

use serde::Deserialize;
use tracing::instrument;

use quick_bites_core::{CheckoutSessionRequest, Order};

use super::{ApiError, ApiGateway, Success};

const PREFIX: &str = "/api/v1/order";

/// Envelope payload carrying the external payment page URL.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSessionPayload {
    pub url: String,
}

/// Envelope payload carrying the consumer's own orders.
#[derive(Debug, Clone, Deserialize)]
pub struct OrdersPayload {
    #[serde(default)]
    pub orders: Vec<Order>,
}

impl ApiGateway {
    /// `POST /api/v1/order/checkout/create-checkout-session`
    ///
    /// The response is a redirect URL to the external payment page; the
    /// caller navigates the browser there and no further client-side state
    /// transition happens.
    #[instrument(skip_all)]
    pub async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<Success<CheckoutSessionPayload>, ApiError> {
        let url = self.url(&format!("{PREFIX}/checkout/create-checkout-session"));
        self.execute(self.http().post(url).json(request)).await
    }

    /// `GET /api/v1/order/`
    #[instrument(skip_all)]
    pub async fn fetch_orders(&self) -> Result<Success<OrdersPayload>, ApiError> {
        let url = self.url(&format!("{PREFIX}/"));
        self.execute(self.http().get(url)).await
    }
}
