//! Behaviour every store must share; run against each implementation.

use super::{DigestRepository, HighlightRepository, ImportJobRepository, StorageError};
use crate::models::{
    DigestPreview, Highlight, HighlightSource, ImportJob, ImportStatus, NewHighlight,
    ReviewFeedbackPayload, ReviewState,
};
use crate::services::submit_review_feedback;
use chrono::{DateTime, Duration, TimeZone, Utc};

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap()
}

pub fn sample_highlight(user_id: &str, text: &str, captured_days_ago: i64) -> Highlight {
    let entry = NewHighlight {
        text: text.to_string(),
        source_title: "Spaced Repetition Playbook".to_string(),
        author: Some("N. Ortega".to_string()),
        location: Some("Loc 42".to_string()),
        captured_at: now() - Duration::days(captured_days_ago),
        tags: vec!["memory".to_string(), "focus".to_string()],
    };
    Highlight::from_new(user_id, entry, ReviewState::new(now()))
}

pub fn highlight_round_trip<S: HighlightRepository>(store: &S) {
    let older = sample_highlight("demo-user", "older", 4);
    let newer = sample_highlight("demo-user", "newer", 1);
    let other = sample_highlight("someone-else", "not mine", 2);
    store
        .insert_highlights(&[older.clone(), newer.clone(), other])
        .unwrap();

    let listed = store.list_highlights("demo-user").unwrap();
    assert_eq!(listed, vec![newer.clone(), older]);

    let fetched = store.get_highlight(&newer.id).unwrap();
    assert_eq!(fetched, newer);
}

pub fn review_update_checks_count<S: HighlightRepository>(store: &S) {
    let highlight = sample_highlight("demo-user", "graded", 1);
    store.insert_highlights(std::slice::from_ref(&highlight)).unwrap();

    let updated = ReviewState {
        ease_factor: 2.6,
        interval_days: 1,
        mastery_score: 0.05,
        review_count: 1,
        last_reviewed_at: Some(now()),
        next_review_at: now() + Duration::days(1),
    };
    store.update_review_state(&highlight.id, 0, &updated).unwrap();
    assert_eq!(store.get_highlight(&highlight.id).unwrap().review, updated);

    let err = store.update_review_state(&highlight.id, 0, &updated).unwrap_err();
    assert!(matches!(err, StorageError::Conflict(_)));
}

pub fn graded_review_keeps_sub_second_times<S: HighlightRepository>(store: &S) {
    let now = now() + Duration::nanoseconds(750_123_456);
    let mut highlight = sample_highlight("demo-user", "precise", 2);
    highlight.captured_at = now - Duration::days(2);
    store.insert_highlights(std::slice::from_ref(&highlight)).unwrap();
    assert_eq!(store.get_highlight(&highlight.id).unwrap(), highlight);

    let payload = ReviewFeedbackPayload {
        highlight_id: highlight.id.clone(),
        rating: "good".to_string(),
    };
    let reviewed = submit_review_feedback(store, &payload, now).unwrap();

    let stored = store.get_highlight(&highlight.id).unwrap();
    assert_eq!(stored, reviewed);
    assert!(stored.review.next_review_at >= now + Duration::days(1));
}

pub fn missing_highlight<S: HighlightRepository>(store: &S) {
    assert!(matches!(store.get_highlight("nope"), Err(StorageError::NotFound(_))));
    assert!(matches!(
        store.update_review_state("nope", 0, &ReviewState::new(now())),
        Err(StorageError::NotFound(_))
    ));
}

pub fn delete_highlight<S: HighlightRepository>(store: &S) {
    let highlight = sample_highlight("demo-user", "to delete", 1);
    store.insert_highlights(std::slice::from_ref(&highlight)).unwrap();

    store.delete_highlight(&highlight.id).unwrap();
    assert!(store.list_highlights("demo-user").unwrap().is_empty());
    assert!(matches!(
        store.delete_highlight(&highlight.id),
        Err(StorageError::NotFound(_))
    ));
}

pub fn import_job_lifecycle<S: ImportJobRepository>(store: &S) {
    let first = ImportJob::processing("demo-user", HighlightSource::Kindle, now() - Duration::hours(2));
    let second = ImportJob::processing("demo-user", HighlightSource::Manual, now());
    store.create_job(&first).unwrap();
    store.create_job(&second).unwrap();

    store
        .update_job_status(&first.id, ImportStatus::Failed, now(), Some("disk full"))
        .unwrap();

    let jobs = store.list_jobs("demo-user").unwrap();
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].id, second.id);
    assert_eq!(jobs[1].status, ImportStatus::Failed);
    assert_eq!(jobs[1].processed_at, Some(now()));
    assert_eq!(jobs[1].failure_reason.as_deref(), Some("disk full"));

    assert!(store.list_jobs("someone-else").unwrap().is_empty());
    assert!(matches!(
        store.update_job_status("nope", ImportStatus::Completed, now(), None),
        Err(StorageError::NotFound(_))
    ));
}

pub fn latest_digest<S: DigestRepository>(store: &S) {
    assert!(store.latest_digest("demo-user").unwrap().is_none());

    let later = DigestPreview::new("demo-user", now() + Duration::days(7), 3, 1);
    let sooner = DigestPreview::new("demo-user", now() + Duration::days(2), 5, 0);
    store.save_digest(&later).unwrap();
    store.save_digest(&sooner).unwrap();
    store
        .save_digest(&DigestPreview::new("someone-else", now() + Duration::days(30), 1, 1))
        .unwrap();

    assert_eq!(store.latest_digest("demo-user").unwrap(), Some(later));
}
