//! Seam for the external auth/session provider.
//!
//! The provider owns credentials, tokens and sessions; this crate only
//! translates its HTTP-shaped responses into the API error taxonomy.

use async_trait::async_trait;
use thiserror::Error;

use crate::error::ApiError;

/// A provider response: an HTTP-like status, the session-establishing
/// `Set-Cookie` header when one was issued, and the JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderResponse {
    pub status: u16,
    pub set_cookie: Option<String>,
    pub body: serde_json::Value,
}

impl ProviderResponse {
    /// Builds a bare success response.
    pub fn ok() -> Self {
        Self {
            status: 200,
            set_cookie: None,
            body: serde_json::Value::Null,
        }
    }

    /// Sets the response body.
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = body;
        self
    }

    /// Sets the session cookie header value.
    pub fn with_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.set_cookie = Some(cookie.into());
        self
    }

    /// The action URL the provider minted for a send-style call
    /// (verification or password-reset link).
    pub fn action_url(&self) -> Option<&str> {
        self.body.get("url").and_then(|v| v.as_str())
    }

    /// The user id embedded in the response body, if any.
    pub fn user_id(&self) -> Option<uuid::Uuid> {
        self.body
            .get("user")
            .and_then(|u| u.get("id"))
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse().ok())
    }
}

/// Errors raised by the provider.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider answered with an error status; the status is the
    /// authoritative signal for translation.
    #[error("Provider error {status}: {message}")]
    Api { status: u16, message: String },
    /// The provider could not be reached at all.
    #[error("Provider unreachable: {0}")]
    Transport(String),
}

impl ProviderError {
    /// Default translation into the API taxonomy. Callers with
    /// operation-specific wording (login) map their statuses first.
    pub fn into_api_error(self) -> ApiError {
        match self {
            ProviderError::Api { status, message } => match status {
                400 | 401 => ApiError::BadRequest(message),
                403 => ApiError::Forbidden(message),
                404 => ApiError::NotFound,
                409 => ApiError::Conflict(message),
                _ => ApiError::server("Auth provider failure", message),
            },
            ProviderError::Transport(detail) => {
                ApiError::server("Auth provider unreachable", detail)
            }
        }
    }
}

/// Trait for the external auth/session provider API.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Creates credentials for a new user.
    async fn sign_up_email(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<ProviderResponse, ProviderError>;

    /// Signs a user in; success carries the session cookie.
    async fn sign_in_email(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderResponse, ProviderError>;

    /// Consumes a verification token.
    async fn verify_email(&self, token: &str) -> Result<ProviderResponse, ProviderError>;

    /// Mints and returns a fresh verification link for the user.
    async fn send_verification_email(&self, email: &str)
        -> Result<ProviderResponse, ProviderError>;

    /// Mints and returns a password-reset link for the user.
    async fn request_password_reset(
        &self,
        email: &str,
        redirect_to: &str,
    ) -> Result<ProviderResponse, ProviderError>;

    /// Consumes a reset token and stores the new password.
    async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<ProviderResponse, ProviderError>;

    /// Changes the password for the session's user.
    async fn change_password(
        &self,
        session_token: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<ProviderResponse, ProviderError>;

    /// Revokes the given session.
    async fn revoke_session(&self, session_token: &str)
        -> Result<ProviderResponse, ProviderError>;

    /// Returns the session for a token, or a 404-status error if none.
    async fn get_session(&self, session_token: &str) -> Result<ProviderResponse, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_url_extraction() {
        let response = ProviderResponse::ok()
            .with_body(serde_json::json!({ "url": "https://app/verify?token=t" }));
        assert_eq!(response.action_url(), Some("https://app/verify?token=t"));
        assert!(ProviderResponse::ok().action_url().is_none());
    }

    #[test]
    fn test_user_id_extraction() {
        let id = uuid::Uuid::new_v4();
        let response =
            ProviderResponse::ok().with_body(serde_json::json!({ "user": { "id": id } }));
        assert_eq!(response.user_id(), Some(id));
    }

    #[test]
    fn test_api_error_translation_by_status() {
        let conflict = ProviderError::Api {
            status: 409,
            message: "duplicate".to_string(),
        };
        assert_eq!(
            conflict.into_api_error(),
            ApiError::Conflict("duplicate".to_string())
        );

        let forbidden = ProviderError::Api {
            status: 403,
            message: "nope".to_string(),
        };
        assert_eq!(
            forbidden.into_api_error(),
            ApiError::Forbidden("nope".to_string())
        );

        let unknown = ProviderError::Api {
            status: 502,
            message: "upstream".to_string(),
        };
        assert!(matches!(unknown.into_api_error(), ApiError::ServerError(_)));
    }

    #[test]
    fn test_transport_error_is_server_error() {
        let err = ProviderError::Transport("connection refused".to_string());
        assert!(matches!(err.into_api_error(), ApiError::ServerError(_)));
    }
}
