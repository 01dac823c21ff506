use std::time::Duration;

use async_trait::async_trait;

use super::Result;

/// Trait for basic cache operations.
///
/// Backends report their failures through [`Result`]; the soft-fail policy
/// (cache errors never break a request) lives one layer up, in
/// [`super::get_json`] and friends.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Gets a value from the cache by key.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Sets a value in the cache with an optional TTL.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()>;

    /// Deletes a value from the cache by key.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Deletes every key starting with `prefix`. Deleting an empty key range
    /// is a no-op, so repeated calls are idempotent.
    async fn delete_prefix(&self, prefix: &str) -> Result<()>;
}
