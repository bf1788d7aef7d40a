use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Post not found")]
    PostNotFound,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Optimistic lock conflict: post {id} was modified concurrently (expected version {version:?})")]
    OptimisticLockConflict { id: i32, version: Option<i32> },

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl DomainError {
    pub fn to_status_code(&self) -> u16 {
        match self {
            Self::PostNotFound => 404,
            Self::ValidationError(_) => 400,
            Self::OptimisticLockConflict { .. } | Self::DatabaseError(_) => 500,
        }
    }
}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::PostNotFound,
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}
