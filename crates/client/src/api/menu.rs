//! Menu endpoints (`/api/v1/menu`).
//!
//! Both mutations carry an optional image and use multipart form encoding.

use serde::Deserialize;
use tracing::instrument;

use quick_bites_core::{MenuId, MenuItem};

use super::{ApiError, ApiGateway, ImageFile, Success};

const PREFIX: &str = "/api/v1/menu";

/// Form data for creating or editing a menu item.
#[derive(Debug, Clone)]
pub struct MenuForm {
    pub name: String,
    pub description: String,
    /// Price in whole currency units.
    pub price: u64,
    pub image: Option<ImageFile>,
}

impl MenuForm {
    fn into_multipart(self) -> Result<reqwest::multipart::Form, ApiError> {
        let mut form = reqwest::multipart::Form::new()
            .text("name", self.name)
            .text("description", self.description)
            .text("price", self.price.to_string());

        if let Some(image) = self.image {
            form = form.part("image", image.into_part()?);
        }

        Ok(form)
    }
}

/// Envelope payload carrying the canonical menu item.
#[derive(Debug, Clone, Deserialize)]
pub struct MenuPayload {
    pub menu: MenuItem,
}

impl ApiGateway {
    /// `POST /api/v1/menu` (multipart)
    #[instrument(skip_all)]
    pub async fn create_menu(&self, form: MenuForm) -> Result<Success<MenuPayload>, ApiError> {
        let url = self.url(PREFIX);
        let multipart = form.into_multipart()?;
        self.execute(self.http().post(url).multipart(multipart)).await
    }

    /// `PUT /api/v1/menu/:id` (multipart)
    #[instrument(skip_all, fields(menu_id = %menu_id))]
    pub async fn edit_menu(
        &self,
        menu_id: &MenuId,
        form: MenuForm,
    ) -> Result<Success<MenuPayload>, ApiError> {
        let url = self.url(&format!("{PREFIX}/{menu_id}"));
        let multipart = form.into_multipart()?;
        self.execute(self.http().put(url).multipart(multipart)).await
    }
}
