//! HTTP client for the external auth provider.
//!
//! The provider exposes a REST surface (sign-up/sign-in/verify/reset over
//! JSON, sessions carried in a cookie). Every call is normalized into
//! `ProviderResponse`; non-2xx statuses become `ProviderError::Api` with the
//! provider's own message when the body carries one.

use async_trait::async_trait;
use reqwest::header;
use serde_json::json;

use findecisions_core::auth::{AuthProvider, ProviderError, ProviderResponse};

/// Cookie the provider issues sessions under.
pub const SESSION_COOKIE_NAME: &str = "better-auth.session_token";

pub struct HttpAuthProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthProvider {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn session_cookie(token: &str) -> String {
        format!("{SESSION_COOKIE_NAME}={token}")
    }

    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<ProviderResponse, ProviderError> {
        let response = request
            .send()
            .await
            .map_err(|err| ProviderError::Transport(err.to_string()))?;

        let status = response.status().as_u16();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body: serde_json::Value = response.json().await.unwrap_or(serde_json::Value::Null);

        if status >= 400 {
            let message = body
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("auth provider request failed")
                .to_string();
            return Err(ProviderError::Api { status, message });
        }

        Ok(ProviderResponse {
            status,
            set_cookie,
            body,
        })
    }

    async fn post_json(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<ProviderResponse, ProviderError> {
        self.execute(self.client.post(self.url(path)).json(&body))
            .await
    }

    async fn post_with_session(
        &self,
        path: &str,
        session_token: &str,
        body: serde_json::Value,
    ) -> Result<ProviderResponse, ProviderError> {
        self.execute(
            self.client
                .post(self.url(path))
                .header(header::COOKIE, Self::session_cookie(session_token))
                .json(&body),
        )
        .await
    }
}

#[async_trait]
impl AuthProvider for HttpAuthProvider {
    async fn sign_up_email(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<ProviderResponse, ProviderError> {
        self.post_json(
            "/sign-up/email",
            json!({ "name": name, "email": email, "password": password }),
        )
        .await
    }

    async fn sign_in_email(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderResponse, ProviderError> {
        self.post_json(
            "/sign-in/email",
            json!({ "email": email, "password": password }),
        )
        .await
    }

    async fn verify_email(&self, token: &str) -> Result<ProviderResponse, ProviderError> {
        self.execute(
            self.client
                .get(self.url("/verify-email"))
                .query(&[("token", token)]),
        )
        .await
    }

    async fn send_verification_email(
        &self,
        email: &str,
    ) -> Result<ProviderResponse, ProviderError> {
        self.post_json("/send-verification-email", json!({ "email": email }))
            .await
    }

    async fn request_password_reset(
        &self,
        email: &str,
        redirect_to: &str,
    ) -> Result<ProviderResponse, ProviderError> {
        self.post_json(
            "/request-password-reset",
            json!({ "email": email, "redirectTo": redirect_to }),
        )
        .await
    }

    async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<ProviderResponse, ProviderError> {
        self.post_json(
            "/reset-password",
            json!({ "token": token, "newPassword": new_password }),
        )
        .await
    }

    async fn change_password(
        &self,
        session_token: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<ProviderResponse, ProviderError> {
        self.post_with_session(
            "/change-password",
            session_token,
            json!({
                "currentPassword": current_password,
                "newPassword": new_password,
            }),
        )
        .await
    }

    async fn revoke_session(
        &self,
        session_token: &str,
    ) -> Result<ProviderResponse, ProviderError> {
        self.post_with_session("/sign-out", session_token, json!({}))
            .await
    }

    async fn get_session(&self, session_token: &str) -> Result<ProviderResponse, ProviderError> {
        self.execute(
            self.client
                .get(self.url("/get-session"))
                .header(header::COOKIE, Self::session_cookie(session_token)),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_normalized() {
        let provider = HttpAuthProvider::new("http://localhost:3567/");
        assert_eq!(
            provider.url("/sign-in/email"),
            "http://localhost:3567/sign-in/email"
        );
    }

    #[test]
    fn test_session_cookie_format() {
        assert_eq!(
            HttpAuthProvider::session_cookie("abc"),
            "better-auth.session_token=abc"
        );
    }
}
