use thiserror::Error;

/// Failures surfaced by the stores.
///
/// "No such row" is not an error: lookups return `Ok(None)` for it.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("request was cancelled")]
    Cancelled,

    #[error("database deadline exceeded")]
    DeadlineExceeded,
}
