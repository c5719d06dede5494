pub mod like_repository;
pub mod message_repository;
pub mod profile_repository;

#[cfg(test)]
pub(crate) mod memory;

/// Failures reported by the backing stores.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The row already exists. Expected for repeated likes.
    #[error("uniqueness constraint violated")]
    UniquenessConflict,

    /// A write named an id with no profile row.
    #[error("unknown reference: {0}")]
    UnknownReference(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::UniquenessConflict
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                StoreError::UnknownReference(db_err.message().to_string())
            }
            _ => StoreError::Unavailable(err.to_string()),
        }
    }
}
