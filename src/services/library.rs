//! Browsing a user's library.

use crate::database::HighlightRepository;
use crate::error::Result;
use crate::models::Highlight;

/// A user's highlights, most recently captured first, optionally capped.
pub fn list_library<S: HighlightRepository>(
    store: &S,
    user_id: &str,
    limit: Option<usize>,
) -> Result<Vec<Highlight>> {
    let mut highlights = store.list_highlights(user_id)?;
    if let Some(limit) = limit {
        highlights.truncate(limit);
    }
    tracing::debug!(user_id, count = highlights.len(), "library listed");
    Ok(highlights)
}
