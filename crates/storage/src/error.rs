use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    #[error("Participant is already checked in")]
    AlreadyCheckedIn,

    #[error("This adjustment requires a reason and a non-zero amount")]
    MissingReason,
}

pub type Result<T> = std::result::Result<T, StorageError>;
