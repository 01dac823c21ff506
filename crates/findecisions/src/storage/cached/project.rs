//! Cached project repository.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use findecisions_core::cache::{self, Cache};
use findecisions_core::domain::Project;
use findecisions_core::error::{ApiError, Result};
use findecisions_core::storage::{Page, Paginated, ProjectRepository};

/// Input for creating a project.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    pub public: bool,
}

/// Partial update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub public: Option<bool>,
}

/// Project store with read-through caching and per-user visibility.
///
/// A project is visible to its admin and, when public, to everyone.
/// Nonexistent and unauthorized are both `NotFound`: callers can never
/// probe for the existence of a project they cannot see.
pub struct CachedProjectRepository {
    store: Arc<dyn ProjectRepository>,
    cache: Arc<dyn Cache>,
    ttl: Duration,
}

impl CachedProjectRepository {
    pub fn new(store: Arc<dyn ProjectRepository>, cache: Arc<dyn Cache>, ttl: Duration) -> Self {
        Self { store, cache, ttl }
    }

    fn is_visible(project: &Project, acting_user: Uuid) -> bool {
        project.public || project.admin_id == acting_user
    }

    /// Loads a project, enforcing admin ownership. Used by writes, which
    /// are never admitted for public-but-foreign projects.
    async fn load_owned(&self, acting_user: Uuid, id: Uuid) -> Result<Project> {
        let project = self
            .store
            .get_project(id)
            .await?
            .ok_or(ApiError::NotFound)?;
        if project.admin_id != acting_user {
            return Err(ApiError::NotFound);
        }
        Ok(project)
    }

    /// Invalidates every cached view a project write could have changed.
    async fn invalidate_views(&self, project_id: Uuid, admin_id: Uuid) {
        cache::invalidate_prefix(self.cache.as_ref(), &cache::project_key_prefix(project_id))
            .await;
        cache::invalidate_prefix(self.cache.as_ref(), &cache::owned_projects_prefix(admin_id))
            .await;
        cache::invalidate_prefix(self.cache.as_ref(), &cache::public_projects_prefix()).await;
    }

    pub async fn get_one(&self, acting_user: Uuid, id: Uuid) -> Result<Project> {
        let key = cache::project_key(id, acting_user);
        if let Some(project) = cache::get_json::<Project>(self.cache.as_ref(), &key).await {
            return Ok(project);
        }

        let project = self
            .store
            .get_project(id)
            .await?
            .ok_or(ApiError::NotFound)?;
        if !Self::is_visible(&project, acting_user) {
            return Err(ApiError::NotFound);
        }

        cache::set_json(self.cache.as_ref(), &key, &project, self.ttl).await;
        Ok(project)
    }

    pub async fn get_owned(
        &self,
        acting_user: Uuid,
        page: u64,
        limit: u64,
    ) -> Result<Paginated<Project>> {
        let skip = (page - 1) * limit;
        let key = cache::owned_projects_key(acting_user, page, limit);
        if let Some(listing) = cache::get_json::<Paginated<Project>>(self.cache.as_ref(), &key).await
        {
            return Ok(listing);
        }

        let page_data: Page<Project> = self.store.list_by_admin(acting_user, limit, skip).await?;
        let listing = Paginated::from_page(page_data, limit, skip);

        cache::set_json(self.cache.as_ref(), &key, &listing, self.ttl).await;
        Ok(listing)
    }

    pub async fn get_public(&self, page: u64, limit: u64) -> Result<Paginated<Project>> {
        let skip = (page - 1) * limit;
        let key = cache::public_projects_key(page, limit);
        if let Some(listing) = cache::get_json::<Paginated<Project>>(self.cache.as_ref(), &key).await
        {
            return Ok(listing);
        }

        let page_data = self.store.list_public(limit, skip).await?;
        let listing = Paginated::from_page(page_data, limit, skip);

        cache::set_json(self.cache.as_ref(), &key, &listing, self.ttl).await;
        Ok(listing)
    }

    pub async fn create(&self, acting_user: Uuid, input: NewProject) -> Result<Project> {
        let mut project = Project::new(input.name, acting_user);
        project.description = input.description;
        project.public = input.public;

        self.store.create_project(&project).await?;
        self.invalidate_views(project.id, acting_user).await;

        tracing::debug!(project_id = %project.id, "Project created");
        Ok(project)
    }

    pub async fn update(&self, acting_user: Uuid, id: Uuid, patch: ProjectPatch) -> Result<Project> {
        let mut project = self.load_owned(acting_user, id).await?;

        if let Some(name) = patch.name {
            project.name = name;
        }
        if let Some(description) = patch.description {
            project.description = Some(description);
        }
        if let Some(public) = patch.public {
            project.public = public;
        }
        project.updated_at = Utc::now();

        self.store.update_project(&project).await?;
        self.invalidate_views(id, acting_user).await;

        Ok(project)
    }

    pub async fn delete(&self, acting_user: Uuid, id: Uuid) -> Result<()> {
        self.load_owned(acting_user, id).await?;

        self.store.delete_project(id).await?;
        self.invalidate_views(id, acting_user).await;

        tracing::debug!(project_id = %id, "Project deleted");
        Ok(())
    }
}
