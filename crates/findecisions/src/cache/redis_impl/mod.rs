//! Redis cache backend.

mod cache;
mod error;

pub use cache::RedisCache;
pub use error::map_redis_error;
