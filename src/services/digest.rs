//! Digest scheduling. Rendering and delivery happen elsewhere.

use crate::database::{DigestRepository, HighlightRepository};
use crate::error::Result;
use crate::models::{DigestPreview, DigestRequestPayload};

/// Cap on how many not-yet-due highlights a digest mentions as recent.
pub const MAX_RECENTLY_ADDED: usize = 5;

/// Counts what will be due by `scheduled_for` and stores a digest preview.
pub fn schedule_digest<S>(store: &S, payload: &DigestRequestPayload) -> Result<DigestPreview>
where
    S: HighlightRepository + DigestRepository,
{
    payload.validate()?;

    let highlights = store.list_highlights(&payload.user_id)?;
    let due = highlights
        .iter()
        .filter(|highlight| highlight.review.is_due(payload.scheduled_for))
        .count();
    let recently_added = (highlights.len() - due).min(MAX_RECENTLY_ADDED);

    let digest = DigestPreview::new(&payload.user_id, payload.scheduled_for, due, recently_added);
    store.save_digest(&digest)?;

    tracing::info!(
        digest_id = %digest.id,
        scheduled_for = %digest.scheduled_for,
        highlight_count = due,
        "digest scheduled"
    );
    Ok(digest)
}

pub fn latest_digest_for_user<S: DigestRepository>(
    store: &S,
    user_id: &str,
) -> Result<Option<DigestPreview>> {
    Ok(store.latest_digest(user_id)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{InMemoryStore, contract};
    use chrono::Duration;

    #[test]
    fn test_digest_counts_due_and_recent() {
        let store = InMemoryStore::new();
        let now = contract::now();
        let mut highlights = Vec::new();
        for days in 0..8 {
            let mut highlight = contract::sample_highlight("demo-user", &format!("h{days}"), 1);
            highlight.review.next_review_at = now + Duration::days(days);
            highlights.push(highlight);
        }
        store.insert_highlights(&highlights).unwrap();

        let payload = DigestRequestPayload {
            user_id: "demo-user".to_string(),
            scheduled_for: now + Duration::days(1),
        };
        let digest = schedule_digest(&store, &payload).unwrap();

        assert_eq!(digest.highlight_count, 2);
        assert_eq!(digest.recently_added_count, MAX_RECENTLY_ADDED);
        assert_eq!(digest.actions.len(), 2);
        assert_eq!(digest.actions[0].href, format!("/digests/{}", digest.id));
        assert_eq!(latest_digest_for_user(&store, "demo-user").unwrap(), Some(digest));
    }

    #[test]
    fn test_digest_for_empty_library() {
        let store = InMemoryStore::new();
        let payload = DigestRequestPayload {
            user_id: "demo-user".to_string(),
            scheduled_for: contract::now(),
        };
        let digest = schedule_digest(&store, &payload).unwrap();
        assert_eq!(digest.highlight_count, 0);
        assert_eq!(digest.recently_added_count, 0);
    }
}
