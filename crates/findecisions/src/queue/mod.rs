//! Queue backends for the email notification pipeline. Exactly one is
//! selected via cargo features, matching the cache backend choice.

#[cfg(any(feature = "memory", test))]
pub mod memory;

#[cfg(feature = "redis")]
pub mod redis_impl;
