/// Errors surfaced by a recommendation run
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Short label for the failing stage, used as a log field
    pub fn stage(&self) -> &'static str {
        match self {
            AppError::Database(_) => "fetch",
            AppError::Cache(_) | AppError::Serialization(_) => "publish",
            AppError::InvalidData(_) => "decode",
            AppError::Internal(_) => "internal",
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
