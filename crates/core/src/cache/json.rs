//! Soft-fail JSON layer over the [`Cache`] trait.
//!
//! The cache is never the source of truth, so a failing cache must never
//! fail a request: lookups degrade to a miss, writes and invalidations are
//! logged and swallowed. Backends still report their errors through
//! [`super::Result`]; this layer is where they stop propagating.

use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};

use super::Cache;

/// Reads and decodes a JSON value from the cache.
///
/// Any backend error or decode failure is treated as a miss.
pub async fn get_json<T: DeserializeOwned>(cache: &dyn Cache, key: &str) -> Option<T> {
    match cache.get(key).await {
        Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(key, error = %err, "Cached value failed to decode, treating as miss");
                None
            }
        },
        Ok(None) => None,
        Err(err) => {
            tracing::warn!(key, error = %err, "Cache read failed, treating as miss");
            None
        }
    }
}

/// Encodes and stores a JSON value with a TTL. Failures are swallowed.
pub async fn set_json<T: Serialize>(cache: &dyn Cache, key: &str, value: &T, ttl: Duration) {
    let bytes = match serde_json::to_vec(value) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(key, error = %err, "Failed to encode value for cache");
            return;
        }
    };

    if let Err(err) = cache.set(key, &bytes, Some(ttl)).await {
        tracing::warn!(key, error = %err, "Cache write failed");
    }
}

/// Deletes every key under `prefix`. Failures are swallowed: a missed
/// invalidation is bounded by the entry TTL.
pub async fn invalidate_prefix(cache: &dyn Cache, prefix: &str) {
    if let Err(err) = cache.delete_prefix(prefix).await {
        tracing::warn!(prefix, error = %err, "Cache invalidation failed");
    }
}
