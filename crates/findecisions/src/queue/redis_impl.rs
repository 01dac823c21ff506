//! Redis list queue.
//!
//! Reliable-queue pattern over two lists: producers LPUSH onto the main
//! list; the consumer BLMOVEs the tail onto a processing list, and the
//! message is only LREMed from the processing list on ack. Requeue pushes
//! the payload back onto the consuming end of the main list. On startup,
//! and again whenever the consumer loop restarts, the processing list is
//! drained back onto the main list so deliveries left in flight by a dead
//! consumer are redelivered.

use async_trait::async_trait;
use redis::AsyncCommands;

use findecisions_core::queue::{Delivery, JobQueue, QueueError, Result};

/// Seconds BLMOVE blocks before the receive loop re-polls.
const BLOCK_SECONDS: usize = 5;

/// Maps Redis errors to QueueError.
fn map_redis_error(err: redis::RedisError) -> QueueError {
    if err.is_connection_refusal() || err.is_timeout() || err.is_connection_dropped() {
        QueueError::ConnectionFailed(err.to_string())
    } else {
        QueueError::ConsumeFailed(err.to_string())
    }
}

pub struct RedisQueue {
    conn: redis::aio::ConnectionManager,
    queue_key: String,
    processing_key: String,
}

impl RedisQueue {
    /// Connects and drains any leftover in-flight deliveries back onto the
    /// main list.
    pub async fn new(url: &str, queue_name: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(map_redis_error)?;
        let conn = redis::aio::ConnectionManager::new(client)
            .await
            .map_err(map_redis_error)?;

        let queue = Self {
            conn,
            queue_key: queue_name.to_string(),
            processing_key: format!("{queue_name}:processing"),
        };
        queue.drain_processing().await?;
        Ok(queue)
    }

    async fn drain_processing(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let mut recovered = 0usize;

        loop {
            let moved: Option<Vec<u8>> = redis::cmd("LMOVE")
                .arg(&self.processing_key)
                .arg(&self.queue_key)
                .arg("RIGHT")
                .arg("LEFT")
                .query_async(&mut conn)
                .await
                .map_err(map_redis_error)?;

            if moved.is_none() {
                break;
            }
            recovered += 1;
        }

        if recovered > 0 {
            tracing::info!(recovered, queue = %self.queue_key, "Requeued in-flight deliveries");
        }
        Ok(())
    }
}

#[async_trait]
impl JobQueue for RedisQueue {
    async fn publish(&self, payload: &[u8]) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.lpush::<_, _, ()>(&self.queue_key, payload)
            .await
            .map_err(|err| QueueError::PublishFailed(err.to_string()))?;
        Ok(())
    }

    async fn receive(&self) -> Result<Delivery> {
        let mut conn = self.conn.clone();
        loop {
            let payload: Option<Vec<u8>> = redis::cmd("BLMOVE")
                .arg(&self.queue_key)
                .arg(&self.processing_key)
                .arg("RIGHT")
                .arg("LEFT")
                .arg(BLOCK_SECONDS)
                .query_async(&mut conn)
                .await
                .map_err(map_redis_error)?;

            if let Some(payload) = payload {
                return Ok(Delivery { payload });
            }
            // Timed out without a message; block again.
        }
    }

    async fn ack(&self, delivery: Delivery) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.lrem::<_, _, ()>(&self.processing_key, 1, delivery.payload.as_slice())
            .await
            .map_err(map_redis_error)?;
        Ok(())
    }

    async fn requeue(&self, delivery: Delivery) -> Result<()> {
        let mut conn = self.conn.clone();
        // Push back before removing from the processing list. A crash
        // between the two commands then leaves a duplicate, never a lost
        // message; duplicates are within the at-least-once contract.
        conn.rpush::<_, _, ()>(&self.queue_key, delivery.payload.as_slice())
            .await
            .map_err(map_redis_error)?;
        conn.lrem::<_, _, ()>(&self.processing_key, 1, delivery.payload.as_slice())
            .await
            .map_err(map_redis_error)?;
        Ok(())
    }

    async fn recover(&self) -> Result<()> {
        self.drain_processing().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use uuid::Uuid;

    fn redis_url() -> String {
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
    }

    fn test_queue_name() -> String {
        format!("test:queue:{}", Uuid::new_v4())
    }

    /// Skip test if Redis not available.
    async fn get_test_queue() -> Option<RedisQueue> {
        RedisQueue::new(&redis_url(), &test_queue_name()).await.ok()
    }

    #[tokio::test]
    async fn test_publish_receive_ack() {
        let Some(queue) = get_test_queue().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        queue.publish(b"job").await.unwrap();

        let delivery = tokio::time::timeout(Duration::from_secs(10), queue.receive())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(delivery.payload, b"job");
        queue.ack(delivery).await.unwrap();
    }

    #[tokio::test]
    async fn test_requeued_delivery_is_redelivered() {
        let Some(queue) = get_test_queue().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        queue.publish(b"retry-me").await.unwrap();

        let delivery = tokio::time::timeout(Duration::from_secs(10), queue.receive())
            .await
            .unwrap()
            .unwrap();
        queue.requeue(delivery).await.unwrap();

        let redelivered = tokio::time::timeout(Duration::from_secs(10), queue.receive())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(redelivered.payload, b"retry-me");
        queue.ack(redelivered).await.unwrap();
    }

    #[tokio::test]
    async fn test_recover_returns_stranded_delivery() {
        let Some(queue) = get_test_queue().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        queue.publish(b"stranded").await.unwrap();

        // Take the delivery in flight and drop it without ack or requeue,
        // as a crashed consumer loop would.
        let delivery = tokio::time::timeout(Duration::from_secs(10), queue.receive())
            .await
            .unwrap()
            .unwrap();
        drop(delivery);

        queue.recover().await.unwrap();

        let redelivered = tokio::time::timeout(Duration::from_secs(10), queue.receive())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(redelivered.payload, b"stranded");
        queue.ack(redelivered).await.unwrap();
    }
}
