use std::sync::Arc;

use crate::error::ApiError;

use super::{EmailJob, JobQueue};

/// Producer side of the notification pipeline.
///
/// Serializes [`EmailJob`]s and publishes them to the queue. Publishing is
/// fire-and-forget with respect to delivery: the producer never waits for
/// the consumer. A failed publish is still surfaced so the caller can
/// decide what to do with it.
#[derive(Clone)]
pub struct NotificationProducer {
    queue: Arc<dyn JobQueue>,
}

impl NotificationProducer {
    pub fn new(queue: Arc<dyn JobQueue>) -> Self {
        Self { queue }
    }

    /// Enqueues an email job.
    pub async fn enqueue(&self, job: &EmailJob) -> Result<(), ApiError> {
        let payload = serde_json::to_vec(job)
            .map_err(|err| ApiError::server("Failed to encode email job", err))?;

        self.queue
            .publish(&payload)
            .await
            .map_err(|err| ApiError::server("Failed to enqueue email job", err))?;

        tracing::debug!(to = %job.email, subject = %job.subject, "Email job enqueued");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::{Delivery, QueueError, Result};
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    struct RecordingQueue {
        published: Mutex<Vec<Vec<u8>>>,
        fail: bool,
    }

    #[async_trait]
    impl JobQueue for RecordingQueue {
        async fn publish(&self, payload: &[u8]) -> Result<()> {
            if self.fail {
                return Err(QueueError::PublishFailed("broker down".to_string()));
            }
            self.published.lock().await.push(payload.to_vec());
            Ok(())
        }

        async fn receive(&self) -> Result<Delivery> {
            unimplemented!("producer tests never consume")
        }

        async fn ack(&self, _delivery: Delivery) -> Result<()> {
            Ok(())
        }

        async fn requeue(&self, _delivery: Delivery) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_enqueue_publishes_json_payload() {
        let queue = Arc::new(RecordingQueue {
            published: Mutex::new(Vec::new()),
            fail: false,
        });
        let producer = NotificationProducer::new(queue.clone());

        let job = EmailJob::verification("ada@example.com", "https://app/verify");
        producer.enqueue(&job).await.unwrap();

        let published = queue.published.lock().await;
        assert_eq!(published.len(), 1);
        let decoded: EmailJob = serde_json::from_slice(&published[0]).unwrap();
        assert_eq!(decoded, job);
    }

    #[tokio::test]
    async fn test_publish_failure_surfaces_as_server_error() {
        let queue = Arc::new(RecordingQueue {
            published: Mutex::new(Vec::new()),
            fail: true,
        });
        let producer = NotificationProducer::new(queue);

        let job = EmailJob::verification("ada@example.com", "https://app/verify");
        let err = producer.enqueue(&job).await.unwrap_err();
        assert!(matches!(err, ApiError::ServerError(_)));
    }
}
