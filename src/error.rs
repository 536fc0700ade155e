use crate::models::{ItemId, UserId};

/// Errors surfaced by the interaction engine and its collaborators
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Invalid interaction kind: {0}")]
    InvalidInteractionKind(String),

    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Event stream unavailable: {0}")]
    PublishUnavailable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::StorageUnavailable(e.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        AppError::StorageUnavailable(format!("migration failed: {}", e))
    }
}

impl From<redis::RedisError> for AppError {
    fn from(e: redis::RedisError) -> Self {
        AppError::PublishUnavailable(e.to_string())
    }
}

impl AppError {
    /// Whether the failure happened before anything was written
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            AppError::InvalidInteractionKind(_) | AppError::ItemNotFound(_) | AppError::UserNotFound(_)
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlx_error_maps_to_storage_unavailable() {
        let err: AppError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, AppError::StorageUnavailable(_)));
        assert!(!err.is_rejection());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            AppError::InvalidInteractionKind("favorite".to_string()).to_string(),
            "Invalid interaction kind: favorite"
        );
        assert_eq!(
            AppError::UserNotFound(UserId(3)).to_string(),
            "User not found: 3"
        );
        assert!(AppError::ItemNotFound(ItemId::new("x")).is_rejection());
    }
}
