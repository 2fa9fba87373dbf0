//! Review submission and the due queue.
//!
//! Grading reads the stored state, runs the scheduler and writes the result
//! back only if nobody graded the same highlight in between.

use crate::database::HighlightRepository;
use crate::error::Result;
use crate::models::{
    Highlight, QueueItem, Rating, ReviewFeedbackPayload, compute_next_review, select_due,
};
use chrono::{DateTime, Utc};

/// Grades a highlight and returns it with its new schedule.
pub fn submit_review_feedback<S: HighlightRepository>(
    store: &S,
    payload: &ReviewFeedbackPayload,
    now: DateTime<Utc>,
) -> Result<Highlight> {
    payload.validate()?;
    let rating: Rating = payload.rating.parse()?;

    let mut highlight = store.get_highlight(&payload.highlight_id)?;
    let previous_count = highlight.review.review_count;

    let next = compute_next_review(&highlight.review, rating, now).inspect_err(|err| {
        tracing::error!(
            highlight_id = %highlight.id,
            error = %err,
            "refusing to schedule corrupted review state"
        );
    })?;

    tracing::debug!(
        highlight_id = %highlight.id,
        %rating,
        interval_days = next.interval_days,
        ease_factor = next.ease_factor,
        "scheduled next review"
    );

    store
        .update_review_state(&highlight.id, previous_count, &next)
        .inspect_err(|err| {
            tracing::warn!(highlight_id = %highlight.id, error = %err, "review not saved");
        })?;

    highlight.review = next;
    tracing::info!(
        highlight_id = %highlight.id,
        review_count = highlight.review.review_count,
        next_review_at = %highlight.review.next_review_at,
        "review recorded"
    );
    Ok(highlight)
}

/// Due highlights for a user, most overdue first, at most `limit` of them.
pub fn review_queue<S: HighlightRepository>(
    store: &S,
    user_id: &str,
    now: DateTime<Utc>,
    limit: usize,
) -> Result<Vec<QueueItem>> {
    let highlights = store.list_highlights(user_id)?;
    let mut queue = select_due(&highlights, now);
    queue.truncate(limit);
    Ok(queue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{InMemoryStore, contract};
    use crate::error::ServiceError;
    use crate::models::{RecommendedAction, ReviewState, SchedulerError};
    use chrono::Duration;

    fn payload(id: &str, rating: &str) -> ReviewFeedbackPayload {
        ReviewFeedbackPayload {
            highlight_id: id.to_string(),
            rating: rating.to_string(),
        }
    }

    fn seeded(store: &InMemoryStore) -> Highlight {
        let highlight = contract::sample_highlight("demo-user", "graded", 3);
        store.insert_highlights(std::slice::from_ref(&highlight)).unwrap();
        highlight
    }

    #[test]
    fn test_review_sequence_follows_bootstrap_intervals() {
        let store = InMemoryStore::new();
        let highlight = seeded(&store);
        let now = contract::now();

        let first = submit_review_feedback(&store, &payload(&highlight.id, "good"), now).unwrap();
        assert_eq!(first.review.interval_days, 1);
        assert_eq!(first.review.review_count, 1);

        let later = now + Duration::days(1);
        let second = submit_review_feedback(&store, &payload(&highlight.id, "hard"), later).unwrap();
        assert_eq!(second.review.interval_days, 6);
        assert_eq!(second.review.next_review_at, later + Duration::days(6));

        let stored = store.get_highlight(&highlight.id).unwrap();
        assert_eq!(stored.review, second.review);
    }

    #[test]
    fn test_unknown_rating_is_a_client_error() {
        let store = InMemoryStore::new();
        let highlight = seeded(&store);

        let err = submit_review_feedback(&store, &payload(&highlight.id, "meh"), contract::now())
            .unwrap_err();
        assert!(matches!(err, ServiceError::Scheduler(SchedulerError::InvalidRating(_))));
        assert!(err.is_client_error());
        assert_eq!(store.get_highlight(&highlight.id).unwrap(), highlight);
    }

    #[test]
    fn test_missing_highlight() {
        let store = InMemoryStore::new();
        let err = submit_review_feedback(&store, &payload("nope", "good"), contract::now()).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[test]
    fn test_corrupted_state_is_left_untouched() {
        let store = InMemoryStore::new();
        let mut highlight = contract::sample_highlight("demo-user", "corrupt", 1);
        highlight.review.ease_factor = 0.9;
        store.insert_highlights(std::slice::from_ref(&highlight)).unwrap();

        let err = submit_review_feedback(&store, &payload(&highlight.id, "easy"), contract::now())
            .unwrap_err();
        assert!(matches!(err, ServiceError::Scheduler(SchedulerError::InvalidState(_))));
        assert!(!err.is_client_error());
        assert_eq!(store.get_highlight(&highlight.id).unwrap().review.ease_factor, 0.9);
    }

    #[test]
    fn test_queue_is_limited_and_ordered() {
        let store = InMemoryStore::new();
        let now = contract::now();
        let mut highlights = Vec::new();
        for (index, overdue_days) in [1i64, 5, 3].into_iter().enumerate() {
            let mut highlight = contract::sample_highlight("demo-user", &format!("item {index}"), 10);
            highlight.review = ReviewState {
                mastery_score: 0.9,
                next_review_at: now - Duration::days(overdue_days),
                ..ReviewState::new(now)
            };
            highlights.push(highlight);
        }
        store.insert_highlights(&highlights).unwrap();

        let queue = review_queue(&store, "demo-user", now, 2).unwrap();
        assert_eq!(queue.len(), 2);
        assert_eq!(queue[0].highlight_id, highlights[1].id);
        assert_eq!(queue[1].highlight_id, highlights[2].id);
        assert!(queue.iter().all(|item| item.recommended_action == RecommendedAction::Graduate));
    }
}
