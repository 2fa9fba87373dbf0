//! Error taxonomy for the service layer.
//!
//! Every variant is a permanent failure: nothing here is worth retrying.

use crate::database::StorageError;
use crate::models::SchedulerError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflicting update: {0}")]
    Conflict(String),
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
    #[error("storage error: {0}")]
    Storage(StorageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(what) => ServiceError::NotFound(what),
            StorageError::Conflict(what) => ServiceError::Conflict(what),
            other => ServiceError::Storage(other),
        }
    }
}

impl ServiceError {
    /// True when the caller sent something unusable (an HTTP 400 equivalent).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ServiceError::Validation(_) | ServiceError::Scheduler(SchedulerError::InvalidRating(_))
        )
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
