//! The JSON response envelope every route answers with.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use findecisions_core::error::{api_error_status, ApiError};

/// The `{ success, message, data, error }` shape every API response uses.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
    pub error: Option<String>,
}

/// A 200 success envelope.
pub fn ok<T: Serialize>(message: &str, data: T) -> (StatusCode, Json<Envelope<T>>) {
    (
        StatusCode::OK,
        Json(Envelope {
            success: true,
            message: message.to_string(),
            data: Some(data),
            error: None,
        }),
    )
}

/// A 201 success envelope.
pub fn created<T: Serialize>(message: &str, data: T) -> (StatusCode, Json<Envelope<T>>) {
    (
        StatusCode::CREATED,
        Json(Envelope {
            success: true,
            message: message.to_string(),
            data: Some(data),
            error: None,
        }),
    )
}

/// Handler error: wraps the API error taxonomy and renders the failure
/// envelope with the matching status code.
#[derive(Debug)]
pub struct AppError(pub ApiError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(api_error_status(&self.0))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let message = self.0.to_string();

        let body = Envelope::<serde_json::Value> {
            success: false,
            message: message.clone(),
            data: None,
            error: Some(message),
        };

        (status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<ApiError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_shape() {
        let (status, Json(envelope)) = ok("Projects fetched", vec![1, 2, 3]);
        assert_eq!(status, StatusCode::OK);
        assert!(envelope.success);
        assert_eq!(envelope.data, Some(vec![1, 2, 3]));
        assert!(envelope.error.is_none());
    }

    #[test]
    fn test_error_envelope_status() {
        let response = AppError(ApiError::NotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response =
            AppError(ApiError::Conflict("User already exists".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
