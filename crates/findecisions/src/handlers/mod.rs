pub mod auth;
pub mod decisions;
mod envelope;
mod extractor;
pub mod health;
pub mod invites;
pub mod projects;

pub use envelope::{created, ok, AppError, Envelope};
pub use extractor::CurrentUser;

/// Result type for handler bodies; the error renders the failure envelope.
pub type HandlerResult<T> = Result<T, AppError>;
