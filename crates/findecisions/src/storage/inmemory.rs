//! In-memory storage backend.
//!
//! `HashMap`s under tokio `RwLock`s, one per entity. List operations take
//! the total count and the page slice under a single read guard, so the
//! pair is consistent the way a transactional count+find would be.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use findecisions_core::domain::{
    Decision, InviteStatus, MemberStatus, Project, ProjectInvite, ProjectMember, User,
};
use findecisions_core::storage::{
    DecisionRepository, InviteRepository, MembershipRepository, Page, ProjectRepository,
    RepositoryError, Result, UserRepository,
};

#[derive(Default)]
pub struct InMemoryRepository {
    users: RwLock<HashMap<Uuid, User>>,
    projects: RwLock<HashMap<Uuid, Project>>,
    decisions: RwLock<HashMap<Uuid, Decision>>,
    members: RwLock<Vec<ProjectMember>>,
    invites: RwLock<HashMap<Uuid, ProjectInvite>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Sorts newest first and slices out one page, together with the total
/// count of the filtered set.
fn paginate<T: Clone>(mut items: Vec<T>, limit: u64, skip: u64, created_at: impl Fn(&T) -> DateTime<Utc>) -> Page<T> {
    items.sort_by_key(|item| std::cmp::Reverse(created_at(item)));
    let total = items.len() as u64;
    let items = items
        .into_iter()
        .skip(skip as usize)
        .take(limit as usize)
        .collect();
    Page { items, total }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn create_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        if users.values().any(|existing| existing.email == user.email) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "User",
                id: user.email.clone(),
            });
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn set_email_verified(&self, id: Uuid) -> Result<()> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or(RepositoryError::NotFound {
            entity_type: "User",
            id: id.to_string(),
        })?;
        user.email_verified = true;
        Ok(())
    }
}

#[async_trait]
impl ProjectRepository for InMemoryRepository {
    async fn get_project(&self, id: Uuid) -> Result<Option<Project>> {
        Ok(self.projects.read().await.get(&id).cloned())
    }

    async fn list_by_admin(&self, admin_id: Uuid, limit: u64, skip: u64) -> Result<Page<Project>> {
        let projects = self.projects.read().await;
        let owned: Vec<Project> = projects
            .values()
            .filter(|project| project.admin_id == admin_id)
            .cloned()
            .collect();
        Ok(paginate(owned, limit, skip, |p| p.created_at))
    }

    async fn list_public(&self, limit: u64, skip: u64) -> Result<Page<Project>> {
        let projects = self.projects.read().await;
        let public: Vec<Project> = projects
            .values()
            .filter(|project| project.public)
            .cloned()
            .collect();
        Ok(paginate(public, limit, skip, |p| p.created_at))
    }

    async fn create_project(&self, project: &Project) -> Result<()> {
        self.projects
            .write()
            .await
            .insert(project.id, project.clone());
        Ok(())
    }

    async fn update_project(&self, project: &Project) -> Result<()> {
        let mut projects = self.projects.write().await;
        if !projects.contains_key(&project.id) {
            return Err(RepositoryError::NotFound {
                entity_type: "Project",
                id: project.id.to_string(),
            });
        }
        projects.insert(project.id, project.clone());
        Ok(())
    }

    async fn delete_project(&self, id: Uuid) -> Result<()> {
        self.projects.write().await.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl DecisionRepository for InMemoryRepository {
    async fn get_decision(&self, id: Uuid) -> Result<Option<Decision>> {
        Ok(self.decisions.read().await.get(&id).cloned())
    }

    async fn list_by_project(
        &self,
        project_id: Uuid,
        limit: u64,
        skip: u64,
    ) -> Result<Page<Decision>> {
        let decisions = self.decisions.read().await;
        let in_project: Vec<Decision> = decisions
            .values()
            .filter(|decision| decision.project_id == project_id)
            .cloned()
            .collect();
        Ok(paginate(in_project, limit, skip, |d| d.created_at))
    }

    async fn create_decision(&self, decision: &Decision) -> Result<()> {
        self.decisions
            .write()
            .await
            .insert(decision.id, decision.clone());
        Ok(())
    }

    async fn update_decision(&self, decision: &Decision) -> Result<()> {
        let mut decisions = self.decisions.write().await;
        if !decisions.contains_key(&decision.id) {
            return Err(RepositoryError::NotFound {
                entity_type: "Decision",
                id: decision.id.to_string(),
            });
        }
        decisions.insert(decision.id, decision.clone());
        Ok(())
    }

    async fn delete_decision(&self, id: Uuid) -> Result<()> {
        self.decisions.write().await.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl MembershipRepository for InMemoryRepository {
    async fn is_active_member(&self, project_id: Uuid, user_id: Uuid) -> Result<bool> {
        Ok(self.members.read().await.iter().any(|member| {
            member.project_id == project_id
                && member.member_id == user_id
                && member.status == MemberStatus::Active
        }))
    }

    async fn add_member(&self, member: &ProjectMember) -> Result<()> {
        let mut members = self.members.write().await;
        let exists = members
            .iter()
            .any(|m| m.project_id == member.project_id && m.member_id == member.member_id);
        if exists {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "ProjectMember",
                id: member.member_id.to_string(),
            });
        }
        members.push(member.clone());
        Ok(())
    }

    async fn list_members(&self, project_id: Uuid) -> Result<Vec<ProjectMember>> {
        Ok(self
            .members
            .read()
            .await
            .iter()
            .filter(|member| member.project_id == project_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl InviteRepository for InMemoryRepository {
    async fn get_invite(&self, id: Uuid) -> Result<Option<ProjectInvite>> {
        Ok(self.invites.read().await.get(&id).cloned())
    }

    async fn create_invite(&self, invite: &ProjectInvite) -> Result<()> {
        self.invites.write().await.insert(invite.id, invite.clone());
        Ok(())
    }

    async fn list_by_inviter(&self, user_id: Uuid) -> Result<Vec<ProjectInvite>> {
        let invites = self.invites.read().await;
        let mut sent: Vec<ProjectInvite> = invites
            .values()
            .filter(|invite| invite.invited_by == user_id)
            .cloned()
            .collect();
        sent.sort_by_key(|invite| std::cmp::Reverse(invite.created_at));
        Ok(sent)
    }

    async fn list_for_target(
        &self,
        user_id: Uuid,
        limit: u64,
        skip: u64,
    ) -> Result<Page<ProjectInvite>> {
        let invites = self.invites.read().await;
        let received: Vec<ProjectInvite> = invites
            .values()
            .filter(|invite| invite.target == user_id)
            .cloned()
            .collect();
        Ok(paginate(received, limit, skip, |i| i.created_at))
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: InviteStatus,
        responded_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut invites = self.invites.write().await;
        let invite = invites.get_mut(&id).ok_or(RepositoryError::NotFound {
            entity_type: "ProjectInvite",
            id: id.to_string(),
        })?;
        invite.status = status;
        invite.responded_at = Some(responded_at);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let repo = InMemoryRepository::new();
        repo.create_user(&User::new("Ada", "ada@example.com"))
            .await
            .unwrap();

        let err = repo
            .create_user(&User::new("Imposter", "ada@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_list_by_admin_counts_and_slices_together() {
        let repo = InMemoryRepository::new();
        let admin = Uuid::new_v4();
        for i in 0..5 {
            repo.create_project(&Project::new(format!("p{i}"), admin))
                .await
                .unwrap();
        }
        repo.create_project(&Project::new("other", Uuid::new_v4()))
            .await
            .unwrap();

        let page = repo.list_by_admin(admin, 2, 2).await.unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.items.len(), 2);
    }

    #[tokio::test]
    async fn test_decisions_list_newest_first() {
        let repo = InMemoryRepository::new();
        let project_id = Uuid::new_v4();
        let actor = Uuid::new_v4();

        let mut older = Decision::new(
            project_id,
            actor,
            findecisions_core::domain::ActorRole::Admin,
            "a",
            "r",
            "o",
        );
        older.created_at = Utc::now() - chrono::Duration::hours(1);
        let newer = Decision::new(
            project_id,
            actor,
            findecisions_core::domain::ActorRole::Admin,
            "b",
            "r",
            "o",
        );

        repo.create_decision(&older).await.unwrap();
        repo.create_decision(&newer).await.unwrap();

        let page = repo.list_by_project(project_id, 10, 0).await.unwrap();
        assert_eq!(page.items[0].id, newer.id);
        assert_eq!(page.items[1].id, older.id);
    }

    #[tokio::test]
    async fn test_membership_status_gates_activity() {
        let repo = InMemoryRepository::new();
        let project_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        assert!(!repo.is_active_member(project_id, user_id).await.unwrap());

        repo.add_member(&ProjectMember::active(project_id, user_id))
            .await
            .unwrap();
        assert!(repo.is_active_member(project_id, user_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_invite_set_status_records_response_time() {
        let repo = InMemoryRepository::new();
        let invite = ProjectInvite::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            chrono::Duration::minutes(5),
        );
        repo.create_invite(&invite).await.unwrap();

        let responded_at = Utc::now();
        repo.set_status(invite.id, InviteStatus::Rejected, responded_at)
            .await
            .unwrap();

        let stored = repo.get_invite(invite.id).await.unwrap().unwrap();
        assert_eq!(stored.status, InviteStatus::Rejected);
        assert_eq!(stored.responded_at, Some(responded_at));
    }
}
