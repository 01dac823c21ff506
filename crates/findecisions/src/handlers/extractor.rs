//! Session identity extractor.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::CookieJar;
use uuid::Uuid;

use crate::provider::http::SESSION_COOKIE_NAME;
use crate::state::AppState;

use super::envelope::Envelope;

/// The authenticated user behind the request's session.
///
/// Reads the session cookie (or an `Authorization: Bearer` header) and
/// resolves it through the auth provider. Every miss is the same 401; the
/// reason is logged, not leaked.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub session_token: String,
}

/// Rejection for missing or invalid sessions.
#[derive(Debug)]
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let body = Envelope::<serde_json::Value> {
            success: false,
            message: "Authentication required".to_string(),
            data: None,
            error: Some("Authentication required".to_string()),
        };
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

/// Pulls the raw session token out of the request, cookie first, then an
/// `Authorization: Bearer` header. Does not validate it; logout and session
/// lookup want the token even when it may already be dead.
pub(super) fn session_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE_NAME) {
        return Some(cookie.value().to_string());
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(String::from)
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(&parts.headers) else {
            return Err(AuthRejection);
        };

        let session = state.auth.get_session(&token).await.map_err(|err| {
            tracing::debug!(error = %err, "Session lookup failed");
            AuthRejection
        })?;

        let id = session.user_id().ok_or_else(|| {
            tracing::debug!("Session response carried no user id");
            AuthRejection
        })?;

        Ok(CurrentUser {
            id,
            session_token: token,
        })
    }
}
