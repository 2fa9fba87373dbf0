//! In-memory store backed by mutex-guarded maps.

use super::{
    DigestRepository, HighlightRepository, ImportJobRepository, Result, StorageError, conflict,
};
use crate::models::{DigestPreview, Highlight, ImportJob, ImportStatus, ReviewState};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
pub struct InMemoryStore {
    highlights: Mutex<HashMap<String, Highlight>>,
    import_jobs: Mutex<HashMap<String, ImportJob>>,
    digests: Mutex<HashMap<String, DigestPreview>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex.lock().map_err(|_| StorageError::LockPoisoned)
}

impl HighlightRepository for InMemoryStore {
    fn insert_highlights(&self, highlights: &[Highlight]) -> Result<()> {
        let mut map = lock(&self.highlights)?;
        if let Some(duplicate) = highlights.iter().find(|h| map.contains_key(&h.id)) {
            return Err(StorageError::Conflict(format!(
                "highlight {} already exists",
                duplicate.id
            )));
        }
        for highlight in highlights {
            map.insert(highlight.id.clone(), highlight.clone());
        }
        Ok(())
    }

    fn get_highlight(&self, id: &str) -> Result<Highlight> {
        lock(&self.highlights)?
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(format!("highlight {id}")))
    }

    fn list_highlights(&self, user_id: &str) -> Result<Vec<Highlight>> {
        let mut highlights: Vec<Highlight> = lock(&self.highlights)?
            .values()
            .filter(|h| h.user_id == user_id)
            .cloned()
            .collect();
        highlights.sort_by(|a, b| b.captured_at.cmp(&a.captured_at).then_with(|| a.id.cmp(&b.id)));
        Ok(highlights)
    }

    fn update_review_state(
        &self,
        id: &str,
        expected_review_count: u32,
        state: &ReviewState,
    ) -> Result<()> {
        let mut map = lock(&self.highlights)?;
        let existing = map
            .get_mut(id)
            .ok_or_else(|| StorageError::NotFound(format!("highlight {id}")))?;
        if existing.review.review_count != expected_review_count {
            return Err(conflict(id, expected_review_count, existing.review.review_count));
        }
        existing.review = state.clone();
        Ok(())
    }

    fn delete_highlight(&self, id: &str) -> Result<()> {
        lock(&self.highlights)?
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(format!("highlight {id}")))
    }
}

impl ImportJobRepository for InMemoryStore {
    fn create_job(&self, job: &ImportJob) -> Result<()> {
        lock(&self.import_jobs)?.insert(job.id.clone(), job.clone());
        Ok(())
    }

    fn update_job_status(
        &self,
        id: &str,
        status: ImportStatus,
        processed_at: DateTime<Utc>,
        failure_reason: Option<&str>,
    ) -> Result<()> {
        let mut jobs = lock(&self.import_jobs)?;
        let job = jobs
            .get_mut(id)
            .ok_or_else(|| StorageError::NotFound(format!("import job {id}")))?;
        job.status = status;
        job.processed_at = Some(processed_at);
        job.failure_reason = failure_reason.map(str::to_string);
        Ok(())
    }

    fn list_jobs(&self, user_id: &str) -> Result<Vec<ImportJob>> {
        let mut jobs: Vec<ImportJob> = lock(&self.import_jobs)?
            .values()
            .filter(|job| job.user_id == user_id)
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at).then_with(|| a.id.cmp(&b.id)));
        Ok(jobs)
    }
}

impl DigestRepository for InMemoryStore {
    fn save_digest(&self, digest: &DigestPreview) -> Result<()> {
        lock(&self.digests)?.insert(digest.id.clone(), digest.clone());
        Ok(())
    }

    fn latest_digest(&self, user_id: &str) -> Result<Option<DigestPreview>> {
        Ok(lock(&self.digests)?
            .values()
            .filter(|digest| digest.user_id == user_id)
            .max_by(|a, b| a.scheduled_for.cmp(&b.scheduled_for).then_with(|| b.id.cmp(&a.id)))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::contract;

    #[test]
    fn test_highlight_round_trip() {
        contract::highlight_round_trip(&InMemoryStore::new());
    }

    #[test]
    fn test_review_update_checks_count() {
        contract::review_update_checks_count(&InMemoryStore::new());
    }

    #[test]
    fn test_graded_review_keeps_sub_second_times() {
        contract::graded_review_keeps_sub_second_times(&InMemoryStore::new());
    }

    #[test]
    fn test_missing_highlight() {
        contract::missing_highlight(&InMemoryStore::new());
    }

    #[test]
    fn test_delete_highlight() {
        contract::delete_highlight(&InMemoryStore::new());
    }

    #[test]
    fn test_import_job_lifecycle() {
        contract::import_job_lifecycle(&InMemoryStore::new());
    }

    #[test]
    fn test_latest_digest() {
        contract::latest_digest(&InMemoryStore::new());
    }
}
