//! Import pipeline: records a job and bootstraps a schedule for every entry.

use crate::database::{HighlightRepository, ImportJobRepository};
use crate::error::Result;
use crate::models::{
    Highlight, HighlightImportPayload, ImportJob, ImportStatus, initial_review_state,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub job: ImportJob,
    pub highlights: Vec<Highlight>,
}

/// Validates the payload, then stores the highlights under a tracked job.
///
/// Invalid payloads are rejected before a job is created. A storage failure
/// marks the job failed and is returned to the caller. If only the job status
/// update fails, the error is logged and the job is returned as it was stored.
pub fn process_highlight_import<S>(
    store: &S,
    user_id: &str,
    payload: &HighlightImportPayload,
    now: DateTime<Utc>,
) -> Result<ImportResult>
where
    S: HighlightRepository + ImportJobRepository,
{
    let entries = payload.parse_entries()?;

    let mut job = ImportJob::processing(user_id, payload.source, now);
    store.create_job(&job)?;

    let highlights = entries
        .into_iter()
        .map(|entry| -> Result<Highlight> {
            let review = initial_review_state(entry.captured_at, now)?;
            Ok(Highlight::from_new(user_id, entry, review))
        })
        .collect::<Result<Vec<_>>>();

    let stored = highlights.and_then(|highlights| {
        store.insert_highlights(&highlights)?;
        Ok(highlights)
    });

    match stored {
        Ok(highlights) => {
            // Highlights are committed at this point.
            match store.update_job_status(&job.id, ImportStatus::Completed, now, None) {
                Ok(()) => {
                    job.status = ImportStatus::Completed;
                    job.processed_at = Some(now);
                }
                Err(err) => {
                    tracing::error!(
                        job_id = %job.id,
                        error = %err,
                        "could not mark import completed"
                    );
                }
            }
            tracing::info!(
                job_id = %job.id,
                source = %payload.source,
                count = highlights.len(),
                "import completed"
            );
            Ok(ImportResult { job, highlights })
        }
        Err(err) => {
            let reason = err.to_string();
            tracing::warn!(job_id = %job.id, error = %reason, "import failed");
            if let Err(status_err) =
                store.update_job_status(&job.id, ImportStatus::Failed, now, Some(&reason))
            {
                tracing::error!(
                    job_id = %job.id,
                    error = %status_err,
                    "could not mark import failed"
                );
            }
            Err(err)
        }
    }
}
