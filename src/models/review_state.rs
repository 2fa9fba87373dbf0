//! Learning progress of a single highlight.
use super::scheduler::SchedulerError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Hard floor for the ease factor.
pub const MIN_EASE_FACTOR: f64 = 1.3;
/// SM-2 starting ease.
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// Snapshot of a highlight's review schedule.
///
/// Ease factor and interval drive scheduling. The mastery score is a
/// reporting value for the UI and digest selection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewState {
    pub ease_factor: f64,
    pub interval_days: u32,
    pub mastery_score: f64,
    pub review_count: u32,
    pub last_reviewed_at: Option<DateTime<Utc>>,
    pub next_review_at: DateTime<Utc>,
}

impl ReviewState {
    /// State for an item that has never been scheduled; due immediately.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            ease_factor: DEFAULT_EASE_FACTOR,
            interval_days: 1,
            mastery_score: 0.0,
            review_count: 0,
            last_reviewed_at: None,
            next_review_at: now,
        }
    }

    /// Rejects corrupted state instead of letting it flow into a new schedule.
    pub fn validate(&self) -> Result<(), SchedulerError> {
        if !self.ease_factor.is_finite() || self.ease_factor < MIN_EASE_FACTOR {
            return Err(SchedulerError::InvalidState(format!(
                "ease factor {} is below the {MIN_EASE_FACTOR} floor",
                self.ease_factor
            )));
        }
        if !self.mastery_score.is_finite() || !(0.0..=1.0).contains(&self.mastery_score) {
            return Err(SchedulerError::InvalidState(format!(
                "mastery score {} is outside [0, 1]",
                self.mastery_score
            )));
        }
        if self.interval_days < 1 {
            return Err(SchedulerError::InvalidState(
                "interval must be at least one day".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_at <= now
    }
}
