//! Restaurant endpoints (`/api/v1/restaurant`).
//!
//! Create and update carry an optional image and therefore use multipart
//! form encoding; everything else is plain JSON.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use quick_bites_core::{Order, OrderId, OrderStatus, Restaurant, RestaurantId};

use super::{ApiError, ApiGateway, ImageFile, Success};

const PREFIX: &str = "/api/v1/restaurant";

/// Form data for creating or updating a restaurant.
#[derive(Debug, Clone)]
pub struct RestaurantForm {
    pub restaurant_name: String,
    pub city: String,
    pub country: String,
    /// Estimated delivery time in minutes.
    pub delivery_time: u32,
    pub cuisines: Vec<String>,
    pub image: Option<ImageFile>,
}

impl RestaurantForm {
    fn into_multipart(self) -> Result<reqwest::multipart::Form, ApiError> {
        // Cuisines travel as a JSON-encoded array inside the form, matching
        // what the server's parser expects.
        let cuisines = serde_json::to_string(&self.cuisines)
            .map_err(|e| ApiError::Malformed(e.to_string()))?;

        let mut form = reqwest::multipart::Form::new()
            .text("restaurantName", self.restaurant_name)
            .text("city", self.city)
            .text("country", self.country)
            .text("deliveryTime", self.delivery_time.to_string())
            .text("cuisines", cuisines);

        if let Some(image) = self.image {
            form = form.part("imageFile", image.into_part()?);
        }

        Ok(form)
    }
}

/// Envelope payload carrying a single restaurant.
#[derive(Debug, Clone, Deserialize)]
pub struct RestaurantPayload {
    pub restaurant: Restaurant,
}

/// The search envelope, stored whole under the search projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub data: Vec<Restaurant>,
}

/// Envelope payload carrying the restaurant's incoming orders.
#[derive(Debug, Clone, Deserialize)]
pub struct RestaurantOrdersPayload {
    #[serde(default)]
    pub orders: Vec<Order>,
}

/// Envelope payload carrying the canonical order after a status change.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatedOrderPayload {
    #[serde(rename = "updatedOrder")]
    pub updated_order: Order,
}

impl ApiGateway {
    /// `POST /api/v1/restaurant` (multipart)
    #[instrument(skip_all)]
    pub async fn create_restaurant(
        &self,
        form: RestaurantForm,
    ) -> Result<Success<RestaurantPayload>, ApiError> {
        let url = self.url(PREFIX);
        let multipart = form.into_multipart()?;
        self.execute(self.http().post(url).multipart(multipart)).await
    }

    /// `GET /api/v1/restaurant`
    ///
    /// Returns the authenticated owner's restaurant; 404 means they have not
    /// created one yet.
    #[instrument(skip_all)]
    pub async fn fetch_restaurant(&self) -> Result<Success<RestaurantPayload>, ApiError> {
        let url = self.url(PREFIX);
        self.execute(self.http().get(url)).await
    }

    /// `PUT /api/v1/restaurant` (multipart)
    #[instrument(skip_all)]
    pub async fn update_restaurant(
        &self,
        form: RestaurantForm,
    ) -> Result<Success<RestaurantPayload>, ApiError> {
        let url = self.url(PREFIX);
        let multipart = form.into_multipart()?;
        self.execute(self.http().put(url).multipart(multipart)).await
    }

    /// `GET /api/v1/restaurant/search/:text?searchQuery=&selectedCuisines=`
    ///
    /// `search_query` is always present (possibly empty); `selected_cuisines`
    /// joins with commas and is omitted entirely when no filter is applied.
    #[instrument(skip_all, fields(text = %search_text))]
    pub async fn search_restaurants(
        &self,
        search_text: &str,
        search_query: &str,
        selected_cuisines: &[String],
    ) -> Result<Success<SearchPage>, ApiError> {
        let url = self.url(&format!(
            "{PREFIX}/search/{}",
            urlencoding::encode(search_text)
        ));

        let mut params: Vec<(&str, String)> = vec![("searchQuery", search_query.to_owned())];
        if !selected_cuisines.is_empty() {
            params.push(("selectedCuisines", selected_cuisines.join(",")));
        }

        self.execute(self.http().get(url).query(&params)).await
    }

    /// `GET /api/v1/restaurant/:id`
    #[instrument(skip_all, fields(restaurant_id = %restaurant_id))]
    pub async fn fetch_single_restaurant(
        &self,
        restaurant_id: &RestaurantId,
    ) -> Result<Success<RestaurantPayload>, ApiError> {
        let url = self.url(&format!("{PREFIX}/{restaurant_id}"));
        self.execute(self.http().get(url)).await
    }

    /// `GET /api/v1/restaurant/order`
    #[instrument(skip_all)]
    pub async fn fetch_restaurant_orders(
        &self,
    ) -> Result<Success<RestaurantOrdersPayload>, ApiError> {
        let url = self.url(&format!("{PREFIX}/order"));
        self.execute(self.http().get(url)).await
    }

    /// `PUT /api/v1/restaurant/order/:id/status`
    #[instrument(skip_all, fields(order_id = %order_id, status = %status))]
    pub async fn update_order_status(
        &self,
        order_id: &OrderId,
        status: OrderStatus,
    ) -> Result<Success<UpdatedOrderPayload>, ApiError> {
        let url = self.url(&format!("{PREFIX}/order/{order_id}/status"));
        let body = serde_json::json!({ "status": status });
        self.execute(self.http().put(url).json(&body)).await
    }
}
