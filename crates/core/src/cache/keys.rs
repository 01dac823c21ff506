//! Structured cache key construction.
//!
//! Every cached view lives under `cache:<entity>:<scope>:<params...>`. Keys
//! and their invalidation prefixes are built from the same [`CacheKey`]
//! builder, so a prefix is guaranteed to contain exactly the keys it was
//! derived from, which is the property prefix invalidation depends on.

use uuid::Uuid;

/// Builder for hierarchical cache keys.
///
/// # Examples
///
/// ```
/// use findecisions_core::cache::CacheKey;
/// use uuid::Uuid;
///
/// let id = Uuid::nil();
/// let key = CacheKey::new("projects", "one")
///     .param(id)
///     .pair("user", id)
///     .build();
/// assert_eq!(
///     key,
///     "cache:projects:one:00000000-0000-0000-0000-000000000000:user:00000000-0000-0000-0000-000000000000"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct CacheKey {
    segments: Vec<String>,
}

impl CacheKey {
    /// Starts a key for the given entity and scope.
    pub fn new(entity: &str, scope: &str) -> Self {
        Self {
            segments: vec!["cache".to_string(), entity.to_string(), scope.to_string()],
        }
    }

    /// Appends a positional parameter segment.
    pub fn param(mut self, value: impl ToString) -> Self {
        self.segments.push(value.to_string());
        self
    }

    /// Appends a named parameter as a `name:value` segment pair.
    pub fn pair(mut self, name: &str, value: impl ToString) -> Self {
        self.segments.push(name.to_string());
        self.segments.push(value.to_string());
        self
    }

    /// Renders the full key.
    pub fn build(&self) -> String {
        self.segments.join(":")
    }
}

/// Key for a single project as seen by `user_id`.
///
/// Authorization shapes what a user can see, so the acting user is part of
/// the key; invalidation uses [`project_key_prefix`] to clear every user's
/// view at once.
pub fn project_key(project_id: Uuid, user_id: Uuid) -> String {
    CacheKey::new("projects", "one")
        .param(project_id)
        .pair("user", user_id)
        .build()
}

/// Prefix covering all user-scoped views of a single project.
pub fn project_key_prefix(project_id: Uuid) -> String {
    CacheKey::new("projects", "one").param(project_id).build()
}

/// Key for one page of the projects administered by `admin_id`.
pub fn owned_projects_key(admin_id: Uuid, page: u64, limit: u64) -> String {
    CacheKey::new("projects", "list")
        .pair("owner", admin_id)
        .pair("page", page)
        .pair("limit", limit)
        .build()
}

/// Prefix covering every page/limit of an admin's project list.
pub fn owned_projects_prefix(admin_id: Uuid) -> String {
    CacheKey::new("projects", "list").pair("owner", admin_id).build()
}

/// Key for one page of the public project listing.
pub fn public_projects_key(page: u64, limit: u64) -> String {
    CacheKey::new("projects", "list")
        .param("public")
        .pair("page", page)
        .pair("limit", limit)
        .build()
}

/// Prefix covering every page/limit of the public project listing.
pub fn public_projects_prefix() -> String {
    CacheKey::new("projects", "list").param("public").build()
}

/// Key for a single decision as seen by `user_id`.
pub fn decision_key(decision_id: Uuid, user_id: Uuid) -> String {
    CacheKey::new("decisions", "one")
        .param(decision_id)
        .pair("user", user_id)
        .build()
}

/// Prefix covering all user-scoped views of a single decision.
pub fn decision_key_prefix(decision_id: Uuid) -> String {
    CacheKey::new("decisions", "one").param(decision_id).build()
}

/// Key for one page of a project's decisions as seen by `user_id`.
pub fn decisions_by_project_key(project_id: Uuid, user_id: Uuid, page: u64, limit: u64) -> String {
    CacheKey::new("decisions", "list")
        .pair("project", project_id)
        .pair("user", user_id)
        .pair("page", page)
        .pair("limit", limit)
        .build()
}

/// Prefix covering every cached decision list of a project, regardless of
/// acting user or pagination.
pub fn decisions_by_project_prefix(project_id: Uuid) -> String {
    CacheKey::new("decisions", "list").pair("project", project_id).build()
}

/// Marker recording that a verification email was just sent to `user_id`.
///
/// While present, resend requests are rejected; it expires on its own TTL.
pub fn verification_marker_key(user_id: Uuid) -> String {
    format!("auth:verification:{user_id}")
}

/// Marker recording that a password-reset email was just sent to `email`.
pub fn reset_marker_key(email: &str) -> String {
    format!("auth:reset:{email}")
}
