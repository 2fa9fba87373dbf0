//! Manual notes are highlights captured by hand, right now.

use crate::database::HighlightRepository;
use crate::error::Result;
use crate::models::{Highlight, NewHighlight, NotePayload, initial_review_state};
use chrono::{DateTime, Utc};

pub fn create_manual_note<S: HighlightRepository>(
    store: &S,
    user_id: &str,
    payload: &NotePayload,
    now: DateTime<Utc>,
) -> Result<Highlight> {
    payload.validate()?;

    let entry = NewHighlight {
        text: payload.text.clone(),
        source_title: payload.source_title.clone(),
        author: payload.author.clone(),
        location: None,
        captured_at: now,
        tags: payload.tags.clone(),
    };
    let highlight = Highlight::from_new(user_id, entry, initial_review_state(now, now)?);
    store.insert_highlights(std::slice::from_ref(&highlight))?;

    tracing::info!(highlight_id = %highlight.id, "manual note created");
    Ok(highlight)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::InMemoryStore;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_note_is_due_tomorrow() {
        let now = Utc.with_ymd_and_hms(2024, 2, 2, 18, 0, 0).unwrap();
        let store = InMemoryStore::new();
        let payload = NotePayload {
            text: "Summaries help, but original words carry context.".to_string(),
            source_title: "Notebook".to_string(),
            author: None,
            tags: vec!["mindset".to_string()],
        };

        let note = create_manual_note(&store, "demo-user", &payload, now).unwrap();

        assert_eq!(note.captured_at, now);
        assert_eq!(note.review.next_review_at, now + Duration::days(1));
        assert_eq!(store.get_highlight(&note.id).unwrap(), note);
    }

    #[test]
    fn test_blank_note_is_rejected() {
        let store = InMemoryStore::new();
        let payload = NotePayload {
            text: "  ".to_string(),
            source_title: "Notebook".to_string(),
            author: None,
            tags: Vec::new(),
        };
        assert!(create_manual_note(&store, "demo-user", &payload, Utc::now()).is_err());
        assert!(store.list_highlights("demo-user").unwrap().is_empty());
    }
}
