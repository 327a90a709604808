//! Identity and session endpoints (`/api/v1/user`).

use serde::{Deserialize, Serialize};
use tracing::instrument;

use quick_bites_core::User;

use super::{Ack, ApiError, ApiGateway, Success};

const PREFIX: &str = "/api/v1/user";

/// Signup request payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupInput {
    pub fullname: String,
    pub email: String,
    pub password: String,
    pub contact: u64,
}

/// Login request payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Partial profile update; only the present fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fullname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

/// Envelope payload carrying the authenticated user.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthPayload {
    pub user: User,
}

impl ApiGateway {
    /// `POST /api/v1/user/signup`
    #[instrument(skip_all, fields(email = %input.email))]
    pub async fn signup(&self, input: &SignupInput) -> Result<Success<AuthPayload>, ApiError> {
        let url = self.url(&format!("{PREFIX}/signup"));
        self.execute(self.http().post(url).json(input)).await
    }

    /// `POST /api/v1/user/login`
    #[instrument(skip_all, fields(email = %input.email))]
    pub async fn login(&self, input: &LoginInput) -> Result<Success<AuthPayload>, ApiError> {
        let url = self.url(&format!("{PREFIX}/login"));
        self.execute(self.http().post(url).json(input)).await
    }

    /// `POST /api/v1/user/verify-email`
    #[instrument(skip_all)]
    pub async fn verify_email(&self, code: &str) -> Result<Success<AuthPayload>, ApiError> {
        let url = self.url(&format!("{PREFIX}/verify-email"));
        let body = serde_json::json!({ "verificationCode": code });
        self.execute(self.http().post(url).json(&body)).await
    }

    /// `GET /api/v1/user/check-auth`
    ///
    /// The session travels in the cookie jar; the request carries no body.
    #[instrument(skip_all)]
    pub async fn check_auth(&self) -> Result<Success<AuthPayload>, ApiError> {
        let url = self.url(&format!("{PREFIX}/check-auth"));
        self.execute(self.http().get(url)).await
    }

    /// `POST /api/v1/user/logout`
    #[instrument(skip_all)]
    pub async fn logout(&self) -> Result<Success<Ack>, ApiError> {
        let url = self.url(&format!("{PREFIX}/logout"));
        self.execute(self.http().post(url)).await
    }

    /// `POST /api/v1/user/forgot-password`
    #[instrument(skip_all)]
    pub async fn forgot_password(&self, email: &str) -> Result<Success<Ack>, ApiError> {
        let url = self.url(&format!("{PREFIX}/forgot-password"));
        let body = serde_json::json!({ "email": email });
        self.execute(self.http().post(url).json(&body)).await
    }

    /// `POST /api/v1/user/reset-password/:token`
    #[instrument(skip_all)]
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<Success<Ack>, ApiError> {
        let url = self.url(&format!("{PREFIX}/reset-password/{}", urlencoding::encode(token)));
        let body = serde_json::json!({ "newPassword": new_password });
        self.execute(self.http().post(url).json(&body)).await
    }

    /// `PUT /api/v1/user/profile/update`
    #[instrument(skip_all)]
    pub async fn update_profile(
        &self,
        input: &ProfileUpdate,
    ) -> Result<Success<AuthPayload>, ApiError> {
        let url = self.url(&format!("{PREFIX}/profile/update"));
        self.execute(self.http().put(url).json(input)).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_update_omits_absent_fields() {
        let update = ProfileUpdate {
            city: Some("Naples".to_owned()),
            ..ProfileUpdate::default()
        };

        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value, serde_json::json!({ "city": "Naples" }));
    }

    #[test]
    fn test_profile_update_uses_wire_field_names() {
        let update = ProfileUpdate {
            profile_picture: Some("https://img.example.com/a.png".to_owned()),
            ..ProfileUpdate::default()
        };

        let value = serde_json::to_value(&update).unwrap();
        assert!(value.get("profilePicture").is_some());
        assert!(value.get("profile_picture").is_none());
    }
}
