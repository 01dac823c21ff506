mod types;

pub use types::{
    ActorRole, Decision, InviteStatus, MemberStatus, Project, ProjectInvite, ProjectMember, User,
};
