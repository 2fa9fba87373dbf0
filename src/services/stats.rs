//! Dashboard numbers for a user's library.

use crate::database::HighlightRepository;
use crate::error::Result;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryStats {
    pub total_highlights: usize,
    pub due_for_review: usize,
    pub reviewed: usize,
    pub weekly_reviews_completed: usize,
    /// Mean mastery as a percentage.
    pub retention_score: u32,
    pub streak_weeks: u32,
}

pub fn library_stats<S: HighlightRepository>(
    store: &S,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<LibraryStats> {
    let highlights = store.list_highlights(user_id)?;
    let week_ago = now - Duration::days(7);

    let total_highlights = highlights.len();
    let due_for_review = highlights.iter().filter(|h| h.review.is_due(now)).count();
    let reviewed = highlights.iter().filter(|h| h.review.review_count > 0).count();
    let weekly_reviews_completed = highlights
        .iter()
        .filter(|h| h.review.last_reviewed_at.is_some_and(|at| at >= week_ago))
        .count();

    let mastery_sum: f64 = highlights.iter().map(|h| h.review.mastery_score).sum();
    let retention_score = (mastery_sum / total_highlights.max(1) as f64 * 100.0).round() as u32;
    let streak_weeks = ((weekly_reviews_completed as f64 / 3.0).round() as u32).max(1);

    Ok(LibraryStats {
        total_highlights,
        due_for_review,
        reviewed,
        weekly_reviews_completed,
        retention_score,
        streak_weeks,
    })
}
