//! Shared application state.
//!
//! All collaborators are constructed once and shared through `Arc`s; the
//! state itself is cheap to clone per request. Backend combinations are
//! selected at compile time via cargo features.

use std::sync::Arc;

use tokio::task::JoinHandle;

use findecisions_core::auth::{AuthProvider, AuthService};
use findecisions_core::cache::Cache;
use findecisions_core::queue::{
    EmailSender, JobQueue, NotificationConsumer, NotificationProducer,
};
use findecisions_core::storage::{
    DecisionRepository, InviteRepository, MembershipRepository, ProjectRepository, UserRepository,
};

use crate::config::Config;
use crate::storage::cached::{CachedDecisionRepository, CachedProjectRepository};

// ============================================================================
// Compile-time feature validation
// ============================================================================

// Cache + queue features: exactly one must be enabled, they are mutually exclusive
#[cfg(all(feature = "memory", feature = "redis"))]
compile_error!("Cannot enable both 'memory' and 'redis' backend features");

#[cfg(not(any(feature = "memory", feature = "redis")))]
compile_error!("Must enable exactly one backend feature: 'memory' or 'redis'");

#[cfg(not(feature = "inmemory"))]
compile_error!("Must enable the 'inmemory' storage feature");

/// Shared application state.
///
/// This is cloned for each request handler and contains shared resources:
/// repositories, the cached read layers, and the auth orchestrator.
#[derive(Clone)]
pub struct AppState {
    /// User records mirrored from the auth provider.
    pub users: Arc<dyn UserRepository>,
    /// Raw project store, for authorization checks outside the cached layer.
    pub project_store: Arc<dyn ProjectRepository>,
    /// Project memberships.
    pub members: Arc<dyn MembershipRepository>,
    /// Project invites.
    pub invites: Arc<dyn InviteRepository>,
    /// Cached project reads and invalidating writes.
    pub projects: Arc<CachedProjectRepository>,
    /// Cached decision reads and invalidating writes.
    pub decisions: Arc<CachedDecisionRepository>,
    /// Auth orchestration over the external provider.
    pub auth: AuthService,

    queue: Arc<dyn JobQueue>,
    email: Arc<dyn EmailSender>,
}

impl AppState {
    /// Wires the state from its collaborators.
    #[allow(clippy::too_many_arguments)]
    fn build(
        users: Arc<dyn UserRepository>,
        project_store: Arc<dyn ProjectRepository>,
        decision_store: Arc<dyn DecisionRepository>,
        members: Arc<dyn MembershipRepository>,
        invites: Arc<dyn InviteRepository>,
        cache: Arc<dyn Cache>,
        queue: Arc<dyn JobQueue>,
        email: Arc<dyn EmailSender>,
        provider: Arc<dyn AuthProvider>,
        config: &Config,
    ) -> Self {
        let projects = Arc::new(CachedProjectRepository::new(
            project_store.clone(),
            cache.clone(),
            config.cache_ttl(),
        ));
        let decisions = Arc::new(CachedDecisionRepository::new(
            decision_store,
            project_store.clone(),
            members.clone(),
            cache.clone(),
            config.cache_ttl(),
        ));

        let producer = NotificationProducer::new(queue.clone());
        let auth = AuthService::new(
            provider,
            users.clone(),
            cache,
            producer,
            config.marker_ttl(),
        );

        Self {
            users,
            project_store,
            members,
            invites,
            projects,
            decisions,
            auth,
            queue,
            email,
        }
    }

    /// Spawns the email consumer loop. The task runs until aborted; a hard
    /// queue error is logged and the loop restarts after a short pause.
    pub fn spawn_consumer(&self) -> JoinHandle<()> {
        let consumer = NotificationConsumer::new(self.queue.clone(), self.email.clone());
        tokio::spawn(async move {
            loop {
                if let Err(err) = consumer.run().await {
                    tracing::error!(error = %err, "Notification consumer stopped, restarting");
                    tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                }
            }
        })
    }
}

// ============================================================================
// Factory functions for different backend combinations
// ============================================================================

#[cfg(all(feature = "inmemory", feature = "memory"))]
mod inmemory_memory {
    use super::*;
    use crate::cache::memory::MemoryCache;
    use crate::email::ResendEmailSender;
    use crate::provider::HttpAuthProvider;
    use crate::queue::memory::MemoryQueue;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates AppState with in-memory storage, cache, and queue.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            if config.resend_api_key.is_empty() {
                tracing::warn!("RESEND_API_KEY is empty; email delivery will fail and requeue");
            }

            let store = Arc::new(InMemoryRepository::new());
            let cache = Arc::new(MemoryCache::new(config.cache_max_entries));
            let queue = Arc::new(MemoryQueue::new());
            let email = Arc::new(ResendEmailSender::new(&config.resend_api_key));
            let provider = Arc::new(HttpAuthProvider::new(&config.auth_provider_url));

            Ok(Self::build(
                store.clone(),
                store.clone(),
                store.clone(),
                store.clone(),
                store,
                cache,
                queue,
                email,
                provider,
                config,
            ))
        }
    }
}

#[cfg(all(feature = "inmemory", feature = "redis"))]
mod inmemory_redis {
    use super::*;
    use crate::cache::redis_impl::RedisCache;
    use crate::email::ResendEmailSender;
    use crate::provider::HttpAuthProvider;
    use crate::queue::redis_impl::RedisQueue;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates AppState with in-memory storage and Redis cache + queue.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            if config.resend_api_key.is_empty() {
                tracing::warn!("RESEND_API_KEY is empty; email delivery will fail and requeue");
            }

            let store = Arc::new(InMemoryRepository::new());
            let cache = Arc::new(RedisCache::new(&config.redis_url).await?);
            let queue = Arc::new(RedisQueue::new(&config.redis_url, &config.queue_name).await?);
            let email = Arc::new(ResendEmailSender::new(&config.resend_api_key));
            let provider = Arc::new(HttpAuthProvider::new(&config.auth_provider_url));

            Ok(Self::build(
                store.clone(),
                store.clone(),
                store.clone(),
                store.clone(),
                store,
                cache,
                queue,
                email,
                provider,
                config,
            ))
        }
    }
}

// ============================================================================
// Test support
// ============================================================================

#[cfg(test)]
pub mod test_support {
    use super::*;
    use crate::cache::memory::MemoryCache;
    use crate::queue::memory::MemoryQueue;
    use crate::storage::InMemoryRepository;
    use async_trait::async_trait;
    use uuid::Uuid;

    use findecisions_core::auth::{ProviderError, ProviderResponse};
    use findecisions_core::queue::EmailError;

    /// Session token the stub provider accepts.
    pub const TEST_SESSION_TOKEN: &str = "valid-session";

    /// Auth provider that accepts everything and knows one session.
    pub struct StubAuthProvider {
        pub user_id: Uuid,
    }

    impl StubAuthProvider {
        fn user_response(&self) -> ProviderResponse {
            ProviderResponse::ok().with_body(serde_json::json!({
                "user": { "id": self.user_id },
                "url": "https://app.example.com/verify?token=stub",
            }))
        }
    }

    #[async_trait]
    impl findecisions_core::auth::AuthProvider for StubAuthProvider {
        async fn sign_up_email(
            &self,
            _name: &str,
            _email: &str,
            _password: &str,
        ) -> Result<ProviderResponse, ProviderError> {
            Ok(self.user_response())
        }

        async fn sign_in_email(
            &self,
            _email: &str,
            _password: &str,
        ) -> Result<ProviderResponse, ProviderError> {
            Ok(self
                .user_response()
                .with_cookie(format!("better-auth.session_token={TEST_SESSION_TOKEN}")))
        }

        async fn verify_email(&self, _token: &str) -> Result<ProviderResponse, ProviderError> {
            Ok(self.user_response())
        }

        async fn send_verification_email(
            &self,
            _email: &str,
        ) -> Result<ProviderResponse, ProviderError> {
            Ok(self.user_response())
        }

        async fn request_password_reset(
            &self,
            _email: &str,
            _redirect_to: &str,
        ) -> Result<ProviderResponse, ProviderError> {
            Ok(ProviderResponse::ok()
                .with_body(serde_json::json!({ "url": "https://app.example.com/reset?token=stub" })))
        }

        async fn reset_password(
            &self,
            _token: &str,
            _new_password: &str,
        ) -> Result<ProviderResponse, ProviderError> {
            Ok(ProviderResponse::ok())
        }

        async fn change_password(
            &self,
            _session_token: &str,
            _current_password: &str,
            _new_password: &str,
        ) -> Result<ProviderResponse, ProviderError> {
            Ok(ProviderResponse::ok())
        }

        async fn revoke_session(
            &self,
            _session_token: &str,
        ) -> Result<ProviderResponse, ProviderError> {
            Ok(ProviderResponse::ok())
        }

        async fn get_session(
            &self,
            session_token: &str,
        ) -> Result<ProviderResponse, ProviderError> {
            if session_token == TEST_SESSION_TOKEN {
                Ok(self.user_response())
            } else {
                Err(ProviderError::Api {
                    status: 404,
                    message: "session not found".to_string(),
                })
            }
        }
    }

    /// Email sender that records instead of delivering.
    #[derive(Default)]
    pub struct NullEmailSender;

    #[async_trait]
    impl EmailSender for NullEmailSender {
        async fn send(&self, _to: &str, _subject: &str, _html: &str) -> Result<(), EmailError> {
            Ok(())
        }
    }

    impl AppState {
        /// State backed entirely by in-process fakes; returns the acting
        /// user recognized by [`TEST_SESSION_TOKEN`], already mirrored into
        /// the user store.
        pub async fn for_tests() -> (Self, Uuid) {
            let config = Config {
                cache_ttl_seconds: 60,
                cache_max_entries: 1_000,
                marker_ttl_seconds: 300,
                queue_name: "sendVerificationEmail".to_string(),
                auth_provider_url: "http://localhost:0".to_string(),
                resend_api_key: String::new(),
                redis_url: "redis://localhost:6379".to_string(),
            };

            let user = findecisions_core::domain::User::new("Test User", "test@example.com")
                .verified();
            let user_id = user.id;

            let store = Arc::new(InMemoryRepository::new());
            store.create_user(&user).await.expect("seed test user");

            let state = Self::build(
                store.clone(),
                store.clone(),
                store.clone(),
                store.clone(),
                store,
                Arc::new(MemoryCache::new(config.cache_max_entries)),
                Arc::new(MemoryQueue::new()),
                Arc::new(NullEmailSender),
                Arc::new(StubAuthProvider { user_id }),
                &config,
            );

            (state, user_id)
        }
    }
}
