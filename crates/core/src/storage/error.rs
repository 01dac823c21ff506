use thiserror::Error;

use crate::error::ApiError;

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

impl From<RepositoryError> for ApiError {
    /// Store failures reaching a caller unmapped are server errors; services
    /// translate NotFound/AlreadyExists deliberately before this applies.
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { .. } => ApiError::NotFound,
            RepositoryError::AlreadyExists { entity_type, .. } => {
                ApiError::Conflict(format!("{entity_type} already exists"))
            }
            RepositoryError::ConnectionFailed(detail) | RepositoryError::QueryFailed(detail) => {
                tracing::error!(error = %detail, "Repository failure");
                ApiError::ServerError("Storage failure".to_string())
            }
        }
    }
}
