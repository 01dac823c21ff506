use thiserror::Error;

/// Errors that can occur on the notification queue.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueueError {
    #[error("Queue connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Publish failed: {0}")]
    PublishFailed(String),
    #[error("Consume failed: {0}")]
    ConsumeFailed(String),
}

/// Result type for queue operations.
pub type Result<T> = std::result::Result<T, QueueError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_failed_display() {
        let error = QueueError::PublishFailed("broker unreachable".to_string());
        assert_eq!(error.to_string(), "Publish failed: broker unreachable");
    }
}
