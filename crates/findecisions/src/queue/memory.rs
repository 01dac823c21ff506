//! In-process queue backend.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use findecisions_core::queue::{Delivery, JobQueue, Result};

/// FIFO queue over a `VecDeque`, with a `Notify` to wake a waiting consumer.
///
/// Deliveries are in flight between `receive` and `ack`/`requeue`; with a
/// single in-process consumer a crash loses nothing the process itself
/// would not lose anyway.
pub struct MemoryQueue {
    messages: Mutex<VecDeque<Vec<u8>>>,
    notify: Notify,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(VecDeque::new()),
            notify: Notify::new(),
        }
    }
}

impl Default for MemoryQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JobQueue for MemoryQueue {
    async fn publish(&self, payload: &[u8]) -> Result<()> {
        self.messages.lock().await.push_back(payload.to_vec());
        self.notify.notify_one();
        Ok(())
    }

    async fn receive(&self) -> Result<Delivery> {
        loop {
            if let Some(payload) = self.messages.lock().await.pop_front() {
                return Ok(Delivery { payload });
            }
            self.notify.notified().await;
        }
    }

    async fn ack(&self, _delivery: Delivery) -> Result<()> {
        Ok(())
    }

    async fn requeue(&self, delivery: Delivery) -> Result<()> {
        self.messages.lock().await.push_back(delivery.payload);
        self.notify.notify_one();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_publish_then_receive() {
        let queue = MemoryQueue::new();
        queue.publish(b"job").await.unwrap();

        let delivery = queue.receive().await.unwrap();
        assert_eq!(delivery.payload, b"job");
        queue.ack(delivery).await.unwrap();
    }

    #[tokio::test]
    async fn test_receive_waits_for_publish() {
        let queue = Arc::new(MemoryQueue::new());

        let consumer = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.receive().await.unwrap().payload })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        queue.publish(b"late").await.unwrap();

        let payload = tokio::time::timeout(Duration::from_secs(1), consumer)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(payload, b"late");
    }

    #[tokio::test]
    async fn test_requeued_delivery_comes_back() {
        let queue = MemoryQueue::new();
        queue.publish(b"retry-me").await.unwrap();

        let delivery = queue.receive().await.unwrap();
        queue.requeue(delivery).await.unwrap();

        let redelivered = queue.receive().await.unwrap();
        assert_eq!(redelivered.payload, b"retry-me");
    }

    #[tokio::test]
    async fn test_fifo_ordering() {
        let queue = MemoryQueue::new();
        queue.publish(b"first").await.unwrap();
        queue.publish(b"second").await.unwrap();

        assert_eq!(queue.receive().await.unwrap().payload, b"first");
        assert_eq!(queue.receive().await.unwrap().payload, b"second");
    }
}
