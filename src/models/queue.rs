//! Selection of highlights that are due for review.
use super::Highlight;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Mastery above which a due item is suggested for graduation.
pub const GRADUATION_MASTERY: f64 = 0.8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendedAction {
    Review,
    Graduate,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueItem {
    pub highlight_id: String,
    pub text: String,
    pub source_title: String,
    pub due_at: DateTime<Utc>,
    pub mastery_score: f64,
    pub recommended_action: RecommendedAction,
}

/// Returns the due highlights, most overdue first. Ties go to the most
/// recently captured highlight.
pub fn select_due(highlights: &[Highlight], now: DateTime<Utc>) -> Vec<QueueItem> {
    let mut due: Vec<&Highlight> = highlights
        .iter()
        .filter(|highlight| highlight.review.is_due(now))
        .collect();

    due.sort_by(|a, b| {
        a.review
            .next_review_at
            .cmp(&b.review.next_review_at)
            .then_with(|| b.captured_at.cmp(&a.captured_at))
    });

    due.into_iter()
        .map(|highlight| QueueItem {
            highlight_id: highlight.id.clone(),
            text: highlight.text.clone(),
            source_title: highlight.source_title.clone(),
            due_at: highlight.review.next_review_at,
            mastery_score: highlight.review.mastery_score,
            recommended_action: if highlight.review.mastery_score > GRADUATION_MASTERY {
                RecommendedAction::Graduate
            } else {
                RecommendedAction::Review
            },
        })
        .collect()
}
