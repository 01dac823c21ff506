//! Resend API client.

use async_trait::async_trait;
use serde::Serialize;

use findecisions_core::queue::{EmailError, EmailSender};

const RESEND_API_URL: &str = "https://api.resend.com/emails";
const FROM_ADDRESS: &str = "Find Decisions <onboarding@resend.dev>";

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

/// Sends transactional email through the Resend HTTP API.
pub struct ResendEmailSender {
    client: reqwest::Client,
    api_key: String,
}

impl ResendEmailSender {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl EmailSender for ResendEmailSender {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), EmailError> {
        let request = SendEmailRequest {
            from: FROM_ADDRESS,
            to: [to],
            subject,
            html,
        };

        let response = self
            .client
            .post(RESEND_API_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| EmailError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmailError::Provider(format!(
                "resend returned {status}: {body}"
            )));
        }

        tracing::debug!(to, subject, "Email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_resend_shape() {
        let request = SendEmailRequest {
            from: FROM_ADDRESS,
            to: ["ada@example.com"],
            subject: "Verify your email address",
            html: "<p>hi</p>",
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["from"], FROM_ADDRESS);
        assert_eq!(value["to"][0], "ada@example.com");
        assert_eq!(value["subject"], "Verify your email address");
        assert_eq!(value["html"], "<p>hi</p>");
    }
}
