//! API-level error taxonomy shared by every service.
//!
//! Reads deliberately merge "entity absent" and "caller unauthorized" into a
//! single [`ApiError::NotFound`]: existence is never leaked to callers that
//! cannot see the entity.

use thiserror::Error;

/// Errors surfaced to API callers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Entity absent, or the caller is not allowed to see it.
    #[error("Not found")]
    NotFound,
    /// A unique field already exists (e.g. signup email).
    #[error("{0}")]
    Conflict(String),
    /// Validation failure, expired/invalid token, or missing input.
    #[error("{0}")]
    BadRequest(String),
    /// Authenticated but not allowed (e.g. unverified email at login).
    #[error("{0}")]
    Forbidden(String),
    /// Unexpected failure; details stay server-side.
    #[error("{0}")]
    ServerError(String),
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Wraps an unexpected failure, logging the detail server-side.
    pub fn server<E: std::fmt::Display>(context: &str, err: E) -> Self {
        tracing::error!(error = %err, "{context}");
        ApiError::ServerError(context.to_string())
    }
}

/// Maps an [`ApiError`] to an HTTP status code.
///
/// Pure function so the mapping can be tested without an HTTP stack:
///
/// - `NotFound` -> 404
/// - `Conflict` -> 409
/// - `BadRequest` -> 400
/// - `Forbidden` -> 403
/// - `ServerError` -> 500
pub fn api_error_status(error: &ApiError) -> u16 {
    match error {
        ApiError::NotFound => 404,
        ApiError::Conflict(_) => 409,
        ApiError::BadRequest(_) => 400,
        ApiError::Forbidden(_) => 403,
        ApiError::ServerError(_) => 500,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        assert_eq!(api_error_status(&ApiError::NotFound), 404);
    }

    #[test]
    fn test_conflict_maps_to_409() {
        let error = ApiError::Conflict("User already exists".to_string());
        assert_eq!(api_error_status(&error), 409);
    }

    #[test]
    fn test_bad_request_maps_to_400() {
        let error = ApiError::BadRequest("Project ID is required".to_string());
        assert_eq!(api_error_status(&error), 400);
    }

    #[test]
    fn test_forbidden_maps_to_403() {
        let error = ApiError::Forbidden("Email not verified".to_string());
        assert_eq!(api_error_status(&error), 403);
    }

    #[test]
    fn test_server_error_maps_to_500() {
        let error = ApiError::ServerError("Failed to create user".to_string());
        assert_eq!(api_error_status(&error), 500);
    }

    #[test]
    fn test_not_found_display_is_opaque() {
        assert_eq!(ApiError::NotFound.to_string(), "Not found");
    }

    #[test]
    fn test_conflict_display() {
        let error = ApiError::Conflict("User already exists".to_string());
        assert_eq!(error.to_string(), "User already exists");
    }
}
