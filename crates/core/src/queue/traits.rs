use async_trait::async_trait;
use thiserror::Error;

use super::Result;

/// A message pulled from the queue but not yet acknowledged.
///
/// Until [`JobQueue::ack`] is called the broker still owns the message; a
/// consumer that dies holding a delivery leaves it eligible for redelivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub payload: Vec<u8>,
}

/// Trait for a durable, named job queue with manual acknowledgment.
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Publishes a payload. Returns once the broker has accepted it; does
    /// not wait for consumption.
    async fn publish(&self, payload: &[u8]) -> Result<()>;

    /// Waits for and returns the next delivery.
    async fn receive(&self) -> Result<Delivery>;

    /// Acknowledges a delivery after successful processing.
    async fn ack(&self, delivery: Delivery) -> Result<()>;

    /// Returns an unprocessable delivery to the queue for redelivery.
    async fn requeue(&self, delivery: Delivery) -> Result<()>;

    /// Returns deliveries stranded in flight by a dead consumer to the
    /// queue. Called when a consumer (re)starts; brokers that track
    /// in-flight messages themselves need no override.
    async fn recover(&self) -> Result<()> {
        Ok(())
    }
}

/// Errors from the downstream email provider.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("Email provider error: {0}")]
    Provider(String),
    #[error("Email transport error: {0}")]
    Transport(String),
}

/// Trait for the external email provider.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Sends one email. Implementations must tolerate being called more
    /// than once for the same logical message (at-least-once delivery).
    async fn send(&self, to: &str, subject: &str, html: &str)
        -> std::result::Result<(), EmailError>;
}
