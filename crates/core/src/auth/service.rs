//! Auth orchestration.
//!
//! Coordinates the identity lifecycle (signup, verify, login, reset, change
//! password) against the external provider, enforcing the application-side
//! preconditions the provider does not know about: duplicate-email checks
//! against the relational store, and pending-token markers in the cache
//! that rate-limit repeated verification/reset sends.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::cache::{self, Cache};
use crate::domain::User;
use crate::error::{ApiError, Result};
use crate::queue::{EmailJob, NotificationProducer};
use crate::storage::UserRepository;

use super::{AuthProvider, ProviderError, ProviderResponse};

/// How long a pending-token marker blocks repeated sends. Matches the
/// provider-side token expiry.
pub const PENDING_MARKER_TTL_SECONDS: u64 = 300;

/// Orchestrates identity operations across the provider, the user store,
/// the cache, and the notification queue.
#[derive(Clone)]
pub struct AuthService {
    provider: Arc<dyn AuthProvider>,
    users: Arc<dyn UserRepository>,
    cache: Arc<dyn Cache>,
    producer: NotificationProducer,
    marker_ttl: Duration,
}

impl AuthService {
    pub fn new(
        provider: Arc<dyn AuthProvider>,
        users: Arc<dyn UserRepository>,
        cache: Arc<dyn Cache>,
        producer: NotificationProducer,
        marker_ttl: Duration,
    ) -> Self {
        Self {
            provider,
            users,
            cache,
            producer,
            marker_ttl,
        }
    }

    /// Registers a new identity.
    ///
    /// The duplicate-email check runs against our own store first; when it
    /// trips, the provider is never called. On success a verification email
    /// job is enqueued around the link the provider minted, and the pending
    /// marker is set.
    pub async fn sign_up(&self, name: &str, email: &str, password: &str) -> Result<()> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(ApiError::Conflict("User already exists".to_string()));
        }

        let response = self
            .provider
            .sign_up_email(name, email, password)
            .await
            .map_err(ProviderError::into_api_error)?;

        let user_id = response.user_id().unwrap_or_else(uuid::Uuid::new_v4);
        let user = User::new(name, email).with_id(user_id);
        self.users.create_user(&user).await?;

        // Registration stands even without a verification link; the user
        // can request one through the resend path, which does insist on it.
        if let Some(url) = response.action_url() {
            self.producer
                .enqueue(&EmailJob::verification(email, url))
                .await?;
            self.set_marker(&cache::verification_marker_key(user_id)).await;
        } else {
            tracing::warn!(%user_id, "Provider returned no action URL, skipping verification email");
        }

        tracing::info!(%user_id, "User signed up");
        Ok(())
    }

    /// Re-sends the verification email, rate-limited by the pending marker.
    pub async fn resend_verification(&self, email: &str) -> Result<()> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(ApiError::NotFound)?;

        if user.email_verified {
            return Err(ApiError::BadRequest("Email already verified".to_string()));
        }

        let marker_key = cache::verification_marker_key(user.id);
        if self.marker_present(&marker_key).await {
            return Err(ApiError::BadRequest(
                "Previous verification token has not expired yet".to_string(),
            ));
        }

        let response = self
            .provider
            .send_verification_email(email)
            .await
            .map_err(ProviderError::into_api_error)?;

        let url = response
            .action_url()
            .ok_or_else(|| ApiError::ServerError("Provider returned no action URL".to_string()))?;

        self.producer
            .enqueue(&EmailJob::verification(email, url))
            .await?;
        self.set_marker(&marker_key).await;

        Ok(())
    }

    /// Signs a user in; returns the session-establishing `Set-Cookie` value
    /// for the HTTP layer to forward.
    pub async fn login(&self, email: &str, password: &str) -> Result<Option<String>> {
        let response = match self.provider.sign_in_email(email, password).await {
            Ok(response) => response,
            Err(err) => return Err(Self::map_login_error(err)),
        };

        match response.status {
            401 => Err(ApiError::BadRequest(
                "User not found or invalid password".to_string(),
            )),
            403 => Err(ApiError::Forbidden("Email not verified".to_string())),
            s if s >= 500 => Err(ApiError::ServerError("Auth provider failure".to_string())),
            _ => Ok(response.set_cookie),
        }
    }

    fn map_login_error(err: ProviderError) -> ApiError {
        match err {
            ProviderError::Api { status: 401, .. } => {
                ApiError::BadRequest("User not found or invalid password".to_string())
            }
            ProviderError::Api { status: 403, .. } => {
                ApiError::Forbidden("Email not verified".to_string())
            }
            other => other.into_api_error(),
        }
    }

    /// Consumes a verification token; forwards the auto-sign-in cookie.
    pub async fn verify_email(&self, token: &str) -> Result<Option<String>> {
        let response = self
            .provider
            .verify_email(token)
            .await
            .map_err(|err| match err {
                ProviderError::Api { status: 401, .. } => {
                    ApiError::BadRequest("token expired or invalid".to_string())
                }
                other => other.into_api_error(),
            })?;

        match response.status {
            401 => Err(ApiError::BadRequest("token expired or invalid".to_string())),
            s if s >= 500 => Err(ApiError::ServerError("Auth provider failure".to_string())),
            _ => {
                // Keep the mirrored verification flag in step with the provider.
                if let Some(user_id) = response.user_id() {
                    if let Err(err) = self.users.set_email_verified(user_id).await {
                        tracing::warn!(%user_id, error = %err, "Failed to mirror verified flag");
                    }
                }
                Ok(response.set_cookie)
            }
        }
    }

    /// Revokes the session behind `token`.
    pub async fn logout(&self, token: Option<&str>) -> Result<()> {
        let token = match token {
            Some(t) if !t.is_empty() => t,
            _ => {
                return Err(ApiError::BadRequest(
                    "No session token provided".to_string(),
                ))
            }
        };

        self.provider
            .revoke_session(token)
            .await
            .map_err(ProviderError::into_api_error)?;
        Ok(())
    }

    /// Starts a password reset: store existence check, pending-marker rate
    /// limit, then enqueue the reset email around the provider-minted link.
    pub async fn request_password_reset(&self, email: &str, redirect_to: &str) -> Result<()> {
        if self.users.find_by_email(email).await?.is_none() {
            return Err(ApiError::NotFound);
        }

        let marker_key = cache::reset_marker_key(email);
        if self.marker_present(&marker_key).await {
            return Err(ApiError::BadRequest(
                "Previous reset token has not expired yet".to_string(),
            ));
        }

        let response = self
            .provider
            .request_password_reset(email, redirect_to)
            .await
            .map_err(ProviderError::into_api_error)?;

        let url = response
            .action_url()
            .ok_or_else(|| ApiError::ServerError("Provider returned no action URL".to_string()))?;

        self.producer
            .enqueue(&EmailJob::password_reset(email, url))
            .await?;
        self.set_marker(&marker_key).await;

        Ok(())
    }

    /// Completes a password reset with a provider token.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<()> {
        self.provider
            .reset_password(token, new_password)
            .await
            .map_err(ProviderError::into_api_error)?;
        Ok(())
    }

    /// Changes the password for an authenticated session.
    pub async fn change_password(
        &self,
        session_token: Option<&str>,
        current_password: &str,
        new_password: &str,
    ) -> Result<()> {
        let token = match session_token {
            Some(t) if !t.is_empty() => t,
            _ => {
                return Err(ApiError::BadRequest(
                    "No session token provided".to_string(),
                ))
            }
        };

        self.provider
            .change_password(token, current_password, new_password)
            .await
            .map_err(ProviderError::into_api_error)?;
        Ok(())
    }

    /// Returns the provider's session payload; an absent session is
    /// `NotFound`, never an empty success.
    pub async fn get_session(&self, session_token: &str) -> Result<ProviderResponse> {
        let response = self
            .provider
            .get_session(session_token)
            .await
            .map_err(ProviderError::into_api_error)?;

        if response.body.is_null() {
            return Err(ApiError::NotFound);
        }
        Ok(response)
    }

    async fn marker_present(&self, key: &str) -> bool {
        cache::get_json::<String>(self.cache.as_ref(), key)
            .await
            .is_some()
    }

    async fn set_marker(&self, key: &str) {
        cache::set_json(
            self.cache.as_ref(),
            key,
            &Utc::now().to_rfc3339(),
            self.marker_ttl,
        )
        .await;
    }
}
