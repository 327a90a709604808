//! User identity as served by the remote identity endpoint.

use serde::{Deserialize, Serialize};

/// The authenticated user's identity and contact details.
///
/// Mirrors the `user` object of the remote API; the server owns every field.
/// `admin` marks restaurant owners, `is_verified` tracks the email
/// verification flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub fullname: String,
    pub email: String,
    /// Contact number; the API serves it as a JSON number.
    #[serde(default)]
    pub contact: u64,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub profile_picture: String,
    #[serde(default)]
    pub admin: bool,
    #[serde(default)]
    pub is_verified: bool,
}
