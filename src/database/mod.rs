//! Storage contracts for highlights, import jobs and digests.
//!
//! Stores are constructed by the caller and passed into the services, so the
//! same service code runs against SQLite or the in-memory store.

#[cfg(test)]
pub(crate) mod contract;
pub mod db;
pub mod memory;

pub use db::SqliteStore;
pub use memory::InMemoryStore;

use crate::models::{DigestPreview, Highlight, ImportJob, ImportStatus, ReviewState};
use chrono::{DateTime, Utc};

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("{0} not found")]
    NotFound(String),
    /// The stored record changed between read and write.
    #[error("{0}")]
    Conflict(String),
    #[error("timestamp {0} is outside the storable range")]
    InvalidTimestamp(DateTime<Utc>),
    #[error("invalid stored value: {0}")]
    InvalidValue(String),
    #[error("stored JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("store lock poisoned")]
    LockPoisoned,
}

pub type Result<T> = std::result::Result<T, StorageError>;

pub trait HighlightRepository {
    /// Inserts all highlights or none of them.
    fn insert_highlights(&self, highlights: &[Highlight]) -> Result<()>;

    fn get_highlight(&self, id: &str) -> Result<Highlight>;

    fn list_highlights(&self, user_id: &str) -> Result<Vec<Highlight>>;

    /// Replaces the review state only if the stored review count still equals
    /// `expected_review_count`. Fails with `Conflict` otherwise.
    fn update_review_state(
        &self,
        id: &str,
        expected_review_count: u32,
        state: &ReviewState,
    ) -> Result<()>;

    fn delete_highlight(&self, id: &str) -> Result<()>;
}

pub trait ImportJobRepository {
    fn create_job(&self, job: &ImportJob) -> Result<()>;

    fn update_job_status(
        &self,
        id: &str,
        status: ImportStatus,
        processed_at: DateTime<Utc>,
        failure_reason: Option<&str>,
    ) -> Result<()>;

    /// Jobs for a user, most recently submitted first.
    fn list_jobs(&self, user_id: &str) -> Result<Vec<ImportJob>>;
}

pub trait DigestRepository {
    fn save_digest(&self, digest: &DigestPreview) -> Result<()>;

    /// The digest with the latest `scheduled_for`, if any.
    fn latest_digest(&self, user_id: &str) -> Result<Option<DigestPreview>>;
}

/// Everything the CLI needs from one backing store.
pub trait Store: HighlightRepository + ImportJobRepository + DigestRepository {}

impl<T> Store for T where T: HighlightRepository + ImportJobRepository + DigestRepository {}

pub(crate) fn conflict(id: &str, expected: u32, found: u32) -> StorageError {
    StorageError::Conflict(format!(
        "highlight {id} was reviewed concurrently (expected review count {expected}, found {found})"
    ))
}
