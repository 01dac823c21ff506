//! Consumer side of the notification pipeline.
//!
//! A single long-lived loop: receive, deserialize, send, acknowledge only
//! after the provider accepted the message. Anything that fails is returned
//! to the queue, giving at-least-once delivery; duplicate sends are
//! harmless for the emails this system produces.
//!
//! There is no redelivery cap: a payload that can never be processed will
//! keep cycling. Known limitation, carried from the system this replaces.

use std::sync::Arc;

use super::{EmailJob, EmailSender, JobQueue, Result};

/// Drains the notification queue and delivers emails.
pub struct NotificationConsumer<Q, S>
where
    Q: JobQueue + ?Sized,
    S: EmailSender + ?Sized,
{
    queue: Arc<Q>,
    sender: Arc<S>,
}

impl<Q, S> NotificationConsumer<Q, S>
where
    Q: JobQueue + ?Sized,
    S: EmailSender + ?Sized,
{
    pub fn new(queue: Arc<Q>, sender: Arc<S>) -> Self {
        Self { queue, sender }
    }

    /// Runs the consumer loop until the queue returns a hard error.
    ///
    /// Recovers in-flight deliveries first, so a delivery stranded by a
    /// previous loop crash is redelivered as soon as the loop restarts.
    pub async fn run(&self) -> Result<()> {
        self.queue.recover().await?;
        tracing::info!("Notification consumer started");
        loop {
            let delivery = self.queue.receive().await?;
            self.process(delivery).await?;
        }
    }

    /// Handles a single delivery: ack on success, requeue on any failure.
    async fn process(&self, delivery: super::Delivery) -> Result<()> {
        let job: EmailJob = match serde_json::from_slice(&delivery.payload) {
            Ok(job) => job,
            Err(err) => {
                tracing::warn!(error = %err, "Malformed email job payload, returning to queue");
                return self.queue.requeue(delivery).await;
            }
        };

        match self.sender.send(&job.email, &job.subject, &job.body).await {
            Ok(()) => {
                tracing::debug!(to = %job.email, subject = %job.subject, "Email delivered");
                self.queue.ack(delivery).await
            }
            Err(err) => {
                tracing::warn!(to = %job.email, error = %err, "Email send failed, returning to queue");
                self.queue.requeue(delivery).await
            }
        }
    }
}
