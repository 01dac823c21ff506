use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Decision, InviteStatus, Project, ProjectInvite, ProjectMember, User};

use super::{Page, Result};

/// Repository for user records mirrored from the auth provider.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Gets a user by their ID.
    async fn get_user(&self, id: Uuid) -> Result<Option<User>>;

    /// Gets a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Creates a new user.
    async fn create_user(&self, user: &User) -> Result<()>;

    /// Marks a user's email as verified.
    async fn set_email_verified(&self, id: Uuid) -> Result<()>;
}

/// Repository for project operations.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Gets a project by its ID.
    async fn get_project(&self, id: Uuid) -> Result<Option<Project>>;

    /// Lists projects administered by `admin_id`, newest first, with the
    /// total count taken from the same snapshot.
    async fn list_by_admin(&self, admin_id: Uuid, limit: u64, skip: u64) -> Result<Page<Project>>;

    /// Lists public projects, newest first.
    async fn list_public(&self, limit: u64, skip: u64) -> Result<Page<Project>>;

    /// Creates a new project.
    async fn create_project(&self, project: &Project) -> Result<()>;

    /// Updates an existing project.
    async fn update_project(&self, project: &Project) -> Result<()>;

    /// Deletes a project by its ID.
    async fn delete_project(&self, id: Uuid) -> Result<()>;
}

/// Repository for decision operations.
#[async_trait]
pub trait DecisionRepository: Send + Sync {
    /// Gets a decision by its ID.
    async fn get_decision(&self, id: Uuid) -> Result<Option<Decision>>;

    /// Lists a project's decisions, newest first, with the total count taken
    /// from the same snapshot.
    async fn list_by_project(
        &self,
        project_id: Uuid,
        limit: u64,
        skip: u64,
    ) -> Result<Page<Decision>>;

    /// Creates a new decision.
    async fn create_decision(&self, decision: &Decision) -> Result<()>;

    /// Updates an existing decision.
    async fn update_decision(&self, decision: &Decision) -> Result<()>;

    /// Deletes a decision by its ID.
    async fn delete_decision(&self, id: Uuid) -> Result<()>;
}

/// Repository for project membership operations.
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Returns true if `user_id` is an active member of the project.
    async fn is_active_member(&self, project_id: Uuid, user_id: Uuid) -> Result<bool>;

    /// Adds a membership record.
    async fn add_member(&self, member: &ProjectMember) -> Result<()>;

    /// Lists all members of a project.
    async fn list_members(&self, project_id: Uuid) -> Result<Vec<ProjectMember>>;
}

/// Repository for project invite operations.
#[async_trait]
pub trait InviteRepository: Send + Sync {
    /// Gets an invite by its ID.
    async fn get_invite(&self, id: Uuid) -> Result<Option<ProjectInvite>>;

    /// Creates a new invite.
    async fn create_invite(&self, invite: &ProjectInvite) -> Result<()>;

    /// Lists all invites sent by `user_id`.
    async fn list_by_inviter(&self, user_id: Uuid) -> Result<Vec<ProjectInvite>>;

    /// Lists invites addressed to `user_id`, newest first, with the total
    /// count taken from the same snapshot.
    async fn list_for_target(
        &self,
        user_id: Uuid,
        limit: u64,
        skip: u64,
    ) -> Result<Page<ProjectInvite>>;

    /// Records the response to an invite.
    async fn set_status(
        &self,
        id: Uuid,
        status: InviteStatus,
        responded_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<()>;
}
