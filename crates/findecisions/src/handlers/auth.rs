//! Auth route handlers.
//!
//! Thin layer over [`AuthService`]: validate input, call the orchestrator,
//! render the envelope, and forward the provider's session cookie where one
//! is issued (login, and verify-email's auto-sign-in).

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use findecisions_core::error::ApiError;

use crate::models::{
    ChangePasswordRequest, LoginRequest, RequestPasswordResetRequest, ResendVerificationRequest,
    ResetPasswordRequest, SignupRequest, VerifyEmailQuery,
};
use crate::state::AppState;

use super::extractor::session_token;
use super::{created, ok, AppError, CurrentUser, HandlerResult};

/// Renders a success envelope and forwards the provider's Set-Cookie.
fn with_session_cookie(
    response: (StatusCode, Json<super::Envelope<serde_json::Value>>),
    cookie: Option<String>,
) -> Response {
    let mut response = response.into_response();
    if let Some(cookie) = cookie {
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().insert(header::SET_COOKIE, value);
            }
            Err(err) => {
                tracing::warn!(error = %err, "Dropping malformed session cookie");
            }
        }
    }
    response
}

pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> HandlerResult<impl IntoResponse> {
    if request.name.trim().is_empty()
        || request.email.trim().is_empty()
        || request.password.is_empty()
    {
        return Err(AppError(ApiError::BadRequest(
            "Missing required fields".to_string(),
        )));
    }

    state
        .auth
        .sign_up(&request.name, &request.email, &request.password)
        .await?;

    Ok(created(
        "User registered successfully",
        serde_json::Value::Null,
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> HandlerResult<Response> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(AppError(ApiError::BadRequest(
            "Missing required fields".to_string(),
        )));
    }

    let cookie = state.auth.login(&request.email, &request.password).await?;
    Ok(with_session_cookie(
        ok("Login successful", serde_json::Value::Null),
        cookie,
    ))
}

pub async fn verify_email(
    State(state): State<AppState>,
    Query(query): Query<VerifyEmailQuery>,
) -> HandlerResult<Response> {
    let token = query
        .token
        .filter(|t| !t.is_empty())
        .ok_or(AppError(ApiError::BadRequest("Missing token".to_string())))?;

    let cookie = state.auth.verify_email(&token).await?;
    Ok(with_session_cookie(
        ok("Email verified successfully", serde_json::Value::Null),
        cookie,
    ))
}

pub async fn resend_verify_email(
    State(state): State<AppState>,
    Json(request): Json<ResendVerificationRequest>,
) -> HandlerResult<impl IntoResponse> {
    if request.email.trim().is_empty() {
        return Err(AppError(ApiError::BadRequest(
            "Missing required fields".to_string(),
        )));
    }

    state.auth.resend_verification(&request.email).await?;
    Ok(ok("Verification email sent", serde_json::Value::Null))
}

pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> HandlerResult<impl IntoResponse> {
    let token = session_token(&headers);
    state.auth.logout(token.as_deref()).await?;
    Ok(ok("Logged out successfully", serde_json::Value::Null))
}

pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(request): Json<RequestPasswordResetRequest>,
) -> HandlerResult<impl IntoResponse> {
    if request.email.trim().is_empty() {
        return Err(AppError(ApiError::BadRequest(
            "Missing required fields".to_string(),
        )));
    }

    let redirect_to = request.redirect_to.unwrap_or_default();
    state
        .auth
        .request_password_reset(&request.email, &redirect_to)
        .await?;
    Ok(ok("Password reset email sent", serde_json::Value::Null))
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> HandlerResult<impl IntoResponse> {
    if request.token.is_empty() || request.new_password.is_empty() {
        return Err(AppError(ApiError::BadRequest(
            "Missing required fields".to_string(),
        )));
    }

    state
        .auth
        .reset_password(&request.token, &request.new_password)
        .await?;
    Ok(ok("Password reset successfully", serde_json::Value::Null))
}

pub async fn change_password(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<ChangePasswordRequest>,
) -> HandlerResult<impl IntoResponse> {
    if request.current_password.is_empty() || request.new_password.is_empty() {
        return Err(AppError(ApiError::BadRequest(
            "Missing required fields".to_string(),
        )));
    }

    state
        .auth
        .change_password(
            Some(&user.session_token),
            &request.current_password,
            &request.new_password,
        )
        .await?;
    Ok(ok("Password changed successfully", serde_json::Value::Null))
}

pub async fn get_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> HandlerResult<impl IntoResponse> {
    let token = session_token(&headers).ok_or(AppError(ApiError::BadRequest(
        "No session token provided".to_string(),
    )))?;

    let session = state.auth.get_session(&token).await?;
    Ok(ok("Session fetched successfully", session.body))
}
