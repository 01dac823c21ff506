use serde::{Deserialize, Serialize};

/// An email delivery job. Immutable once enqueued; consumed at-least-once,
/// so the content must be safe to send twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailJob {
    /// Recipient address.
    pub email: String,
    pub subject: String,
    /// HTML body.
    pub body: String,
}

impl EmailJob {
    /// Composes a "verify your email" job around a provider-minted URL.
    pub fn verification(email: impl Into<String>, url: &str) -> Self {
        Self {
            email: email.into(),
            subject: "Verify your email address".to_string(),
            body: format!("Click the link to verify your email: {url}"),
        }
    }

    /// Composes a "reset your password" job around a provider-minted URL.
    pub fn password_reset(email: impl Into<String>, url: &str) -> Self {
        Self {
            email: email.into(),
            subject: "Reset your password".to_string(),
            body: format!("Click the link to reset your password: {url}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_job_contains_url() {
        let job = EmailJob::verification("ada@example.com", "https://app/verify?token=t");
        assert_eq!(job.subject, "Verify your email address");
        assert!(job.body.contains("https://app/verify?token=t"));
    }

    #[test]
    fn test_job_round_trips_through_json() {
        let job = EmailJob::password_reset("ada@example.com", "https://app/reset?token=t");
        let bytes = serde_json::to_vec(&job).unwrap();
        let decoded: EmailJob = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(job, decoded);
    }
}
