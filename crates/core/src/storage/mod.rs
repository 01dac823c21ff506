mod error;
mod pagination;
mod traits;

pub use error::{RepositoryError, Result};
pub use pagination::{Page, Paginated, Pagination};
pub use traits::{
    DecisionRepository, InviteRepository, MembershipRepository, ProjectRepository, UserRepository,
};
