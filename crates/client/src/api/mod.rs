//! Remote API gateway.
//!
//! One `reqwest` client (with a cookie store carrying the HTTP-only session
//! cookie) behind typed endpoint methods, split per resource:
//!
//! - [`user`] - identity and session operations (`/api/v1/user`)
//! - [`restaurant`] - restaurant CRUD, search, incoming orders (`/api/v1/restaurant`)
//! - [`menu`] - menu item mutations (`/api/v1/menu`)
//! - [`order`] - checkout and the consumer's orders (`/api/v1/order`)
//!
//! Every response travels in the uniform envelope
//! `{ success: boolean, message?: string, <payload> }`. The gateway validates
//! it at the boundary: a missing or non-boolean `success` is [`ApiError::Malformed`],
//! `success:false` or a non-2xx status is [`ApiError::Rejected`], and only a
//! well-formed success envelope reaches payload deserialization.

mod menu;
mod order;
mod restaurant;
mod user;

pub use menu::{MenuForm, MenuPayload};
pub use order::{CheckoutSessionPayload, OrdersPayload};
pub use restaurant::{
    RestaurantForm, RestaurantOrdersPayload, RestaurantPayload, SearchPage, UpdatedOrderPayload,
};
pub use user::{AuthPayload, LoginInput, ProfileUpdate, SignupInput};

use std::sync::Arc;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::ClientConfig;

// =============================================================================
// Errors
// =============================================================================

/// Errors that can occur when talking to the remote API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be completed (network, timeout, DNS).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with an error payload or a `success:false` envelope.
    #[error("rejected ({status}): {}", message.as_deref().unwrap_or("no message"))]
    Rejected {
        /// HTTP status code of the response.
        status: u16,
        /// Server-supplied message, shown verbatim to the user when present.
        message: Option<String>,
    },

    /// The response did not match the envelope contract.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ApiError {
    /// The server-supplied message, if the server rejected the request with one.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => message.as_deref(),
            Self::Transport(_) | Self::Malformed(_) => None,
        }
    }

    /// The message to show the user: the server's own words when it rejected
    /// the request, otherwise the operation's generic fallback.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_owned()
    }

    /// HTTP status of the rejection, when the server answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::Transport(_) | Self::Malformed(_) => None,
        }
    }
}

// =============================================================================
// Envelope
// =============================================================================

/// A validated success envelope: the optional server message plus the payload.
#[derive(Debug, Clone)]
pub struct Success<T> {
    /// Server-supplied message, surfaced as a success notice.
    pub message: Option<String>,
    /// Payload deserialized from the envelope body.
    pub data: T,
}

/// Payload for operations whose envelope carries nothing beyond
/// `success`/`message` (logout, password flows).
#[derive(Debug, Clone, Copy, serde::Deserialize)]
pub struct Ack {}

// =============================================================================
// ApiGateway
// =============================================================================

/// Typed client for the remote food-ordering API.
///
/// Cheaply cloneable; each store holds one. The session identity travels in
/// an HTTP-only cookie owned entirely by the underlying cookie store - no
/// client code ever reads it.
#[derive(Clone)]
pub struct ApiGateway {
    inner: Arc<GatewayInner>,
}

struct GatewayInner {
    client: reqwest::Client,
    base: String,
}

impl ApiGateway {
    /// Create a new gateway from the client configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(GatewayInner {
                client,
                base: config.api_base(),
            }),
        })
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base)
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.inner.client
    }

    /// Send a request and validate the response envelope.
    ///
    /// Returns the deserialized payload for a well-formed success envelope;
    /// every other outcome maps onto the [`ApiError`] taxonomy.
    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Success<T>, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        // Read the body as text first for better error diagnostics.
        let body = response.text().await?;

        let value: serde_json::Value = match serde_json::from_str(&body) {
            Ok(value) => value,
            Err(error) => {
                if !status.is_success() {
                    // Non-JSON error page (proxy, crash); no server message.
                    return Err(ApiError::Rejected {
                        status: status.as_u16(),
                        message: None,
                    });
                }
                tracing::error!(
                    status = %status,
                    body = %body.chars().take(500).collect::<String>(),
                    "API returned unparseable body"
                );
                return Err(ApiError::Malformed(error.to_string()));
            }
        };

        let message = value
            .get("message")
            .and_then(serde_json::Value::as_str)
            .map(ToOwned::to_owned);

        if !status.is_success() {
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        match value.get("success").and_then(serde_json::Value::as_bool) {
            Some(true) => {}
            Some(false) => {
                return Err(ApiError::Rejected {
                    status: status.as_u16(),
                    message,
                });
            }
            None => {
                tracing::error!(
                    status = %status,
                    "API envelope missing boolean `success` field"
                );
                return Err(ApiError::Malformed(
                    "envelope missing boolean `success` field".to_owned(),
                ));
            }
        }

        let data: T = serde_json::from_value(value).map_err(|error| {
            tracing::error!(%error, "API success envelope had unexpected payload shape");
            ApiError::Malformed(error.to_string())
        })?;

        Ok(Success { message, data })
    }
}

/// An image attached to a multipart create/update request.
///
/// The server forwards it to the external media host; the client never
/// inspects the bytes.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub(crate) fn into_part(self) -> Result<reqwest::multipart::Part, ApiError> {
        let part = reqwest::multipart::Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.content_type)?;
        Ok(part)
    }
}
