//! Cached decision repository.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use findecisions_core::cache::{self, Cache};
use findecisions_core::domain::{ActorRole, Decision, Project};
use findecisions_core::error::{ApiError, Result};
use findecisions_core::storage::{
    DecisionRepository, MembershipRepository, Paginated, ProjectRepository,
};

/// Input for recording a decision.
#[derive(Debug, Clone)]
pub struct NewDecision {
    pub project_id: Uuid,
    pub action: String,
    pub reason: String,
    pub outcome: String,
    pub context: Option<serde_json::Value>,
}

/// Partial update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct DecisionPatch {
    pub action: Option<String>,
    pub reason: Option<String>,
    pub outcome: Option<String>,
    pub context: Option<serde_json::Value>,
}

/// Decision store with read-through caching.
///
/// Decisions are visible to the owning project's admin and its active
/// members; a public project does not open its decisions. Updates and
/// deletes are restricted further, to the project admin or the decision's
/// original actor. Every rejection is `NotFound`.
pub struct CachedDecisionRepository {
    store: Arc<dyn DecisionRepository>,
    projects: Arc<dyn ProjectRepository>,
    members: Arc<dyn MembershipRepository>,
    cache: Arc<dyn Cache>,
    ttl: Duration,
}

impl CachedDecisionRepository {
    pub fn new(
        store: Arc<dyn DecisionRepository>,
        projects: Arc<dyn ProjectRepository>,
        members: Arc<dyn MembershipRepository>,
        cache: Arc<dyn Cache>,
        ttl: Duration,
    ) -> Self {
        Self {
            store,
            projects,
            members,
            cache,
            ttl,
        }
    }

    /// Resolves the acting user's role in a project, or `NotFound` when
    /// they have none.
    async fn role_in(&self, project: &Project, acting_user: Uuid) -> Result<ActorRole> {
        if project.admin_id == acting_user {
            return Ok(ActorRole::Admin);
        }
        if self.members.is_active_member(project.id, acting_user).await? {
            return Ok(ActorRole::Member);
        }
        Err(ApiError::NotFound)
    }

    async fn load_project(&self, project_id: Uuid) -> Result<Project> {
        self.projects
            .get_project(project_id)
            .await?
            .ok_or(ApiError::NotFound)
    }

    async fn invalidate_decision(&self, decision_id: Uuid, project_id: Uuid) {
        cache::invalidate_prefix(
            self.cache.as_ref(),
            &cache::decision_key_prefix(decision_id),
        )
        .await;
        cache::invalidate_prefix(
            self.cache.as_ref(),
            &cache::decisions_by_project_prefix(project_id),
        )
        .await;
    }

    pub async fn get_one(&self, acting_user: Uuid, id: Uuid) -> Result<Decision> {
        let key = cache::decision_key(id, acting_user);
        if let Some(decision) = cache::get_json::<Decision>(self.cache.as_ref(), &key).await {
            return Ok(decision);
        }

        let decision = self
            .store
            .get_decision(id)
            .await?
            .ok_or(ApiError::NotFound)?;
        let project = self.load_project(decision.project_id).await?;
        self.role_in(&project, acting_user).await?;

        cache::set_json(self.cache.as_ref(), &key, &decision, self.ttl).await;
        Ok(decision)
    }

    pub async fn get_by_project(
        &self,
        acting_user: Uuid,
        project_id: Uuid,
        page: u64,
        limit: u64,
    ) -> Result<Paginated<Decision>> {
        let project = self.load_project(project_id).await?;
        self.role_in(&project, acting_user).await?;

        let skip = (page - 1) * limit;
        let key = cache::decisions_by_project_key(project_id, acting_user, page, limit);
        if let Some(listing) =
            cache::get_json::<Paginated<Decision>>(self.cache.as_ref(), &key).await
        {
            return Ok(listing);
        }

        let page_data = self.store.list_by_project(project_id, limit, skip).await?;
        let listing = Paginated::from_page(page_data, limit, skip);

        cache::set_json(self.cache.as_ref(), &key, &listing, self.ttl).await;
        Ok(listing)
    }

    pub async fn create(&self, acting_user: Uuid, input: NewDecision) -> Result<Decision> {
        let project = self.load_project(input.project_id).await?;
        let role = self.role_in(&project, acting_user).await?;

        let mut decision = Decision::new(
            input.project_id,
            acting_user,
            role,
            input.action,
            input.reason,
            input.outcome,
        );
        if let Some(context) = input.context {
            decision = decision.with_context(context);
        }

        self.store.create_decision(&decision).await?;
        cache::invalidate_prefix(
            self.cache.as_ref(),
            &cache::decisions_by_project_prefix(input.project_id),
        )
        .await;

        tracing::debug!(decision_id = %decision.id, project_id = %input.project_id, "Decision recorded");
        Ok(decision)
    }

    /// Loads a decision for mutation: allowed for the project admin or the
    /// decision's original actor, masked as `NotFound` for everyone else.
    async fn load_for_write(&self, acting_user: Uuid, id: Uuid) -> Result<Decision> {
        let decision = self
            .store
            .get_decision(id)
            .await?
            .ok_or(ApiError::NotFound)?;
        let project = self.load_project(decision.project_id).await?;

        if project.admin_id != acting_user && decision.actor_id != acting_user {
            return Err(ApiError::NotFound);
        }
        Ok(decision)
    }

    pub async fn update(&self, acting_user: Uuid, id: Uuid, patch: DecisionPatch) -> Result<Decision> {
        let mut decision = self.load_for_write(acting_user, id).await?;

        if let Some(action) = patch.action {
            decision.action = action;
        }
        if let Some(reason) = patch.reason {
            decision.reason = reason;
        }
        if let Some(outcome) = patch.outcome {
            decision.outcome = outcome;
        }
        if let Some(context) = patch.context {
            decision.context = context;
        }
        decision.updated_at = Utc::now();

        self.store.update_decision(&decision).await?;
        self.invalidate_decision(id, decision.project_id).await;

        Ok(decision)
    }

    pub async fn delete(&self, acting_user: Uuid, id: Uuid) -> Result<()> {
        let decision = self.load_for_write(acting_user, id).await?;

        self.store.delete_decision(id).await?;
        self.invalidate_decision(id, decision.project_id).await;

        tracing::debug!(decision_id = %id, "Decision deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::memory::MemoryCache;
    use crate::storage::InMemoryRepository;
    use findecisions_core::domain::ProjectMember;
    use findecisions_core::storage::UserRepository as _;

    struct Fixture {
        repo: CachedDecisionRepository,
        store: Arc<InMemoryRepository>,
        admin: Uuid,
        member: Uuid,
        stranger: Uuid,
        project: Project,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(InMemoryRepository::new());
        let cache = Arc::new(MemoryCache::new(64));

        let admin = Uuid::new_v4();
        let member = Uuid::new_v4();
        let stranger = Uuid::new_v4();

        let project = Project::new("Roadmap", admin);
        store.create_project(&project).await.unwrap();
        store
            .add_member(&ProjectMember::active(project.id, member))
            .await
            .unwrap();

        let repo = CachedDecisionRepository::new(
            store.clone(),
            store.clone(),
            store.clone(),
            cache,
            Duration::from_secs(60),
        );

        Fixture {
            repo,
            store,
            admin,
            member,
            stranger,
            project,
        }
    }

    fn new_decision(project_id: Uuid) -> NewDecision {
        NewDecision {
            project_id,
            action: "adopt rust".to_string(),
            reason: "performance".to_string(),
            outcome: "approved".to_string(),
            context: None,
        }
    }

    #[tokio::test]
    async fn test_admin_creates_with_admin_role() {
        let fx = fixture().await;
        let decision = fx
            .repo
            .create(fx.admin, new_decision(fx.project.id))
            .await
            .unwrap();
        assert_eq!(decision.actor_type, ActorRole::Admin);
    }

    #[tokio::test]
    async fn test_active_member_creates_with_member_role() {
        let fx = fixture().await;
        let decision = fx
            .repo
            .create(fx.member, new_decision(fx.project.id))
            .await
            .unwrap();
        assert_eq!(decision.actor_type, ActorRole::Member);
    }

    #[tokio::test]
    async fn test_stranger_cannot_create_or_list() {
        let fx = fixture().await;

        let err = fx
            .repo
            .create(fx.stranger, new_decision(fx.project.id))
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::NotFound);

        let err = fx
            .repo
            .get_by_project(fx.stranger, fx.project.id, 1, 10)
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::NotFound);
    }

    #[tokio::test]
    async fn test_member_sees_fresh_decision_after_create() {
        let fx = fixture().await;

        // Warm the member's cached (empty) listing first.
        let empty = fx
            .repo
            .get_by_project(fx.member, fx.project.id, 1, 10)
            .await
            .unwrap();
        assert_eq!(empty.pagination.total_items, 0);

        fx.repo
            .create(fx.admin, new_decision(fx.project.id))
            .await
            .unwrap();

        // Create invalidated the per-project prefix across all users.
        let listing = fx
            .repo
            .get_by_project(fx.member, fx.project.id, 1, 10)
            .await
            .unwrap();
        assert_eq!(listing.pagination.total_items, 1);
    }

    #[tokio::test]
    async fn test_actor_may_update_own_decision() {
        let fx = fixture().await;
        let decision = fx
            .repo
            .create(fx.member, new_decision(fx.project.id))
            .await
            .unwrap();

        let updated = fx
            .repo
            .update(
                fx.member,
                decision.id,
                DecisionPatch {
                    outcome: Some("reversed".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.outcome, "reversed");
    }

    #[tokio::test]
    async fn test_other_member_cannot_update_someone_elses_decision() {
        let fx = fixture().await;
        let other_member = Uuid::new_v4();
        fx.store
            .add_member(&ProjectMember::active(fx.project.id, other_member))
            .await
            .unwrap();

        let decision = fx
            .repo
            .create(fx.member, new_decision(fx.project.id))
            .await
            .unwrap();

        let err = fx
            .repo
            .update(
                other_member,
                decision.id,
                DecisionPatch {
                    outcome: Some("hijacked".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::NotFound);

        // Store is untouched.
        let stored = fx.store.get_decision(decision.id).await.unwrap().unwrap();
        assert_eq!(stored.outcome, "approved");
    }

    #[tokio::test]
    async fn test_admin_may_delete_member_decision() {
        let fx = fixture().await;
        let decision = fx
            .repo
            .create(fx.member, new_decision(fx.project.id))
            .await
            .unwrap();

        fx.repo.delete(fx.admin, decision.id).await.unwrap();

        let err = fx.repo.get_one(fx.admin, decision.id).await.unwrap_err();
        assert_eq!(err, ApiError::NotFound);
    }

    #[tokio::test]
    async fn test_mirrored_users_do_not_affect_decision_visibility() {
        // Membership, not mere account existence, grants access.
        let fx = fixture().await;
        let bystander = findecisions_core::domain::User::new("By", "by@example.com");
        fx.store.create_user(&bystander).await.unwrap();

        let decision = fx
            .repo
            .create(fx.admin, new_decision(fx.project.id))
            .await
            .unwrap();

        let err = fx.repo.get_one(bystander.id, decision.id).await.unwrap_err();
        assert_eq!(err, ApiError::NotFound);
    }
}
