use std::{env, time::Duration};

use findecisions_core::auth::PENDING_MARKER_TTL_SECONDS;

const DEFAULT_CACHE_TTL_SECONDS: u64 = 60;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cache TTL in seconds (default: 60)
    pub cache_ttl_seconds: u64,
    /// Maximum number of cache entries (default: 10,000)
    pub cache_max_entries: usize,
    /// Pending-token marker TTL in seconds (default: 300)
    pub marker_ttl_seconds: u64,
    /// Email queue name (default: "sendVerificationEmail")
    pub queue_name: String,
    /// Base URL of the external auth provider
    pub auth_provider_url: String,
    /// Resend API key (empty disables real sends)
    pub resend_api_key: String,
    /// Redis connection URL (default: "redis://localhost:6379")
    /// Note: Only used when the `redis` feature is enabled.
    #[allow(dead_code)]
    pub redis_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHE_TTL_SECONDS` - Cache TTL in seconds (default: 60; invalid or
    ///   zero values fall back to the default)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 10,000)
    /// - `PENDING_MARKER_TTL_SECONDS` - Verification/reset marker TTL (default: 300)
    /// - `QUEUE_NAME` - Email queue name (default: "sendVerificationEmail")
    /// - `AUTH_PROVIDER_URL` - Auth provider base URL (default: "http://localhost:3567")
    /// - `RESEND_API_KEY` - Resend API key (default: empty)
    /// - `REDIS_URL` - Redis connection URL (default: "redis://localhost:6379")
    pub fn from_env() -> Self {
        Self {
            cache_ttl_seconds: env::var("CACHE_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&v| v > 0)
                .unwrap_or(DEFAULT_CACHE_TTL_SECONDS),
            cache_max_entries: env::var("CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
            marker_ttl_seconds: env::var("PENDING_MARKER_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&v| v > 0)
                .unwrap_or(PENDING_MARKER_TTL_SECONDS),
            queue_name: env::var("QUEUE_NAME")
                .unwrap_or_else(|_| "sendVerificationEmail".to_string()),
            auth_provider_url: env::var("AUTH_PROVIDER_URL")
                .unwrap_or_else(|_| "http://localhost:3567".to_string()),
            resend_api_key: env::var("RESEND_API_KEY").unwrap_or_default(),
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
        }
    }

    /// Get cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    /// Get marker TTL as a Duration.
    pub fn marker_ttl(&self) -> Duration {
        Duration::from_secs(self.marker_ttl_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_conversions() {
        let config = Config {
            cache_ttl_seconds: 120,
            cache_max_entries: 10_000,
            marker_ttl_seconds: 600,
            queue_name: "sendVerificationEmail".to_string(),
            auth_provider_url: "http://localhost:3567".to_string(),
            resend_api_key: String::new(),
            redis_url: "redis://localhost:6379".to_string(),
        };

        assert_eq!(config.cache_ttl(), Duration::from_secs(120));
        assert_eq!(config.marker_ttl(), Duration::from_secs(600));
    }

    #[test]
    fn test_invalid_cache_ttl_falls_back_to_default() {
        env::set_var("CACHE_TTL_SECONDS", "not-a-number");
        let config = Config::from_env();
        assert_eq!(config.cache_ttl_seconds, DEFAULT_CACHE_TTL_SECONDS);

        env::set_var("CACHE_TTL_SECONDS", "0");
        let config = Config::from_env();
        assert_eq!(config.cache_ttl_seconds, DEFAULT_CACHE_TTL_SECONDS);

        env::remove_var("CACHE_TTL_SECONDS");
    }

    #[test]
    fn test_default_values() {
        env::remove_var("CACHE_MAX_ENTRIES");
        env::remove_var("PENDING_MARKER_TTL_SECONDS");
        env::remove_var("QUEUE_NAME");

        let config = Config::from_env();

        assert_eq!(config.cache_max_entries, 10_000);
        assert_eq!(config.marker_ttl_seconds, 300);
        assert_eq!(config.queue_name, "sendVerificationEmail");
    }
}
