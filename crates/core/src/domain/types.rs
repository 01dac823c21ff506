use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An application user, as mirrored from the auth provider's user table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new unverified user.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            email_verified: false,
            created_at: Utc::now(),
        }
    }

    /// Sets a specific ID for this user (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Marks the email as verified.
    pub fn verified(mut self) -> Self {
        self.email_verified = true;
        self
    }
}

/// A project that groups decisions, administered by a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub admin_id: Uuid,
    /// Public projects are visible to everyone; private ones only to their
    /// admin and active members.
    pub public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Creates a new private project administered by `admin_id`.
    pub fn new(name: impl Into<String>, admin_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            admin_id,
            public: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the description for this project.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets a specific ID for this project (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Marks this project as publicly visible.
    pub fn public(mut self) -> Self {
        self.public = true;
        self
    }
}

/// The role the actor held in the owning project when a decision was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorRole {
    Admin,
    Member,
}

/// A recorded decision inside a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub id: Uuid,
    pub project_id: Uuid,
    pub action: String,
    pub reason: String,
    pub outcome: String,
    /// Free-form structured context captured alongside the decision.
    pub context: serde_json::Value,
    pub actor_id: Uuid,
    pub actor_type: ActorRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Decision {
    /// Creates a new decision recorded by `actor_id` with the given role.
    pub fn new(
        project_id: Uuid,
        actor_id: Uuid,
        actor_type: ActorRole,
        action: impl Into<String>,
        reason: impl Into<String>,
        outcome: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            project_id,
            action: action.into(),
            reason: reason.into(),
            outcome: outcome.into(),
            context: serde_json::Value::Object(serde_json::Map::new()),
            actor_id,
            actor_type,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the structured context for this decision.
    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context = context;
        self
    }

    /// Sets a specific ID for this decision (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }
}

/// Membership status inside a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Active,
    Inactive,
}

/// A user's membership in a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMember {
    pub project_id: Uuid,
    pub member_id: Uuid,
    pub status: MemberStatus,
    pub joined_at: DateTime<Utc>,
}

impl ProjectMember {
    /// Creates an active membership.
    pub fn active(project_id: Uuid, member_id: Uuid) -> Self {
        Self {
            project_id,
            member_id,
            status: MemberStatus::Active,
            joined_at: Utc::now(),
        }
    }
}

/// Lifecycle of a project invite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InviteStatus {
    Pending,
    Accepted,
    Rejected,
}

/// An invitation for `target` to join a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInvite {
    pub id: Uuid,
    pub project_id: Uuid,
    pub invited_by: Uuid,
    pub target: Uuid,
    pub status: InviteStatus,
    pub expires_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ProjectInvite {
    /// Creates a pending invite that expires after `ttl`.
    pub fn new(project_id: Uuid, invited_by: Uuid, target: Uuid, ttl: chrono::Duration) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            project_id,
            invited_by,
            target,
            status: InviteStatus::Pending,
            expires_at: now + ttl,
            responded_at: None,
            created_at: now,
        }
    }

    /// Returns true if the invite expired at or before `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_is_unverified() {
        let user = User::new("Ada", "ada@example.com");
        assert!(!user.email_verified);
        assert!(user.verified().email_verified);
    }

    #[test]
    fn test_new_project_is_private() {
        let admin = Uuid::new_v4();
        let project = Project::new("Roadmap", admin);
        assert!(!project.public);
        assert_eq!(project.admin_id, admin);
        assert!(project.public().public);
    }

    #[test]
    fn test_invite_expiry() {
        let invite = ProjectInvite::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            chrono::Duration::minutes(5),
        );
        assert!(!invite.is_expired(Utc::now()));
        assert!(invite.is_expired(Utc::now() + chrono::Duration::minutes(6)));
    }

    #[test]
    fn test_decision_serializes_actor_type_lowercase() {
        let decision = Decision::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            ActorRole::Admin,
            "adopt rust",
            "performance",
            "approved",
        );
        let json = serde_json::to_value(&decision).unwrap();
        assert_eq!(json["actorType"], "admin");
    }

    #[test]
    fn test_invite_status_serializes_uppercase() {
        let json = serde_json::to_value(InviteStatus::Pending).unwrap();
        assert_eq!(json, "PENDING");
    }
}
