//! Spaced repetition scheduler for highlights.
//!
//! An SM-2 style ease/interval model with a four-level rating:
//! - The first graded review schedules 1 day out, the second 6 days out
//! - From the third review on, the interval grows by the previous ease factor
//!   and is then scaled by the rating's multiplier
//! - The ease factor moves by the rating's delta, is rounded to hundredths when
//!   it moves, and never drops below 1.3
//! - The mastery score follows half the ease delta and is clamped to [0, 1]
//!
//! Every function here is pure: the caller passes `now` in.

use super::{MIN_EASE_FACTOR, Rating, ReviewState, review_state::DEFAULT_EASE_FACTOR};
use chrono::{DateTime, Duration, Utc};

pub const FIRST_INTERVAL_DAYS: u32 = 1;
pub const SECOND_INTERVAL_DAYS: u32 = 6;
/// Upper bound so long runs of `easy` stay representable as dates.
pub const MAX_INTERVAL_DAYS: u32 = 36_500;

/// Imports older than this many days bootstrap with `again`.
pub const STALE_AGE_DAYS: f64 = 14.0;
/// Imports older than this many days bootstrap with `hard`.
pub const AGING_AGE_DAYS: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchedulerError {
    #[error("invalid rating: {0:?} (expected again, hard, good or easy)")]
    InvalidRating(String),
    #[error("invalid review state: {0}")]
    InvalidState(String),
}

/// Computes the review state that follows grading `state` with `rating` at `now`.
///
/// The input is validated first; a corrupted snapshot is an error, never
/// silently repaired.
pub fn compute_next_review(
    state: &ReviewState,
    rating: Rating,
    now: DateTime<Utc>,
) -> Result<ReviewState, SchedulerError> {
    state.validate()?;

    // A zero delta keeps the stored ease exactly; otherwise round to hundredths.
    let ease_factor = if rating.ease_delta() == 0.0 {
        state.ease_factor
    } else {
        round_hundredths(state.ease_factor + rating.ease_delta()).max(MIN_EASE_FACTOR)
    };

    let interval_days = match state.review_count {
        0 => FIRST_INTERVAL_DAYS,
        1 => SECOND_INTERVAL_DAYS,
        _ => {
            let grown = (f64::from(state.interval_days) * state.ease_factor).round();
            whole_days(grown * rating.interval_multiplier())
        }
    };

    let mastery_score =
        round_hundredths((state.mastery_score + rating.ease_delta() / 2.0).clamp(0.0, 1.0));

    let next_review_at = now
        .checked_add_signed(Duration::days(i64::from(interval_days)))
        .ok_or_else(|| {
            SchedulerError::InvalidState(format!(
                "next review {interval_days} days after {now} is out of range"
            ))
        })?;

    Ok(ReviewState {
        ease_factor,
        interval_days,
        mastery_score,
        review_count: state.review_count.saturating_add(1),
        last_reviewed_at: Some(now),
        next_review_at,
    })
}

/// Synthetic rating for a highlight that has never been reviewed, based on
/// how long ago it was captured.
pub fn bootstrap_rating(age: Duration) -> Rating {
    let age_days = (age.num_seconds().max(0) as f64) / 86_400.0;
    if age_days > STALE_AGE_DAYS {
        Rating::Again
    } else if age_days > AGING_AGE_DAYS {
        Rating::Hard
    } else {
        Rating::Good
    }
}

fn baseline_mastery(rating: Rating) -> f64 {
    match rating {
        Rating::Again => 0.3,
        Rating::Hard => 0.35,
        _ => 0.45,
    }
}

/// Initial schedule for a freshly imported highlight.
///
/// Runs one scheduling step anchored at the capture time, so old material is
/// due right away. The result still reports zero graded reviews.
pub fn initial_review_state(
    captured_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<ReviewState, SchedulerError> {
    let anchor = captured_at.min(now);
    let rating = bootstrap_rating(now - anchor);

    let baseline = ReviewState {
        ease_factor: DEFAULT_EASE_FACTOR,
        mastery_score: baseline_mastery(rating),
        ..ReviewState::new(anchor)
    };

    let scheduled = compute_next_review(&baseline, rating, anchor)?;

    Ok(ReviewState {
        review_count: 0,
        last_reviewed_at: None,
        ..scheduled
    })
}

fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// Ceiling to whole days, ignoring float noise like 24.000000000000004.
fn whole_days(raw: f64) -> u32 {
    let days = (raw - 1e-9).ceil();
    if days < f64::from(FIRST_INTERVAL_DAYS) {
        FIRST_INTERVAL_DAYS
    } else if days >= f64::from(MAX_INTERVAL_DAYS) {
        MAX_INTERVAL_DAYS
    } else {
        days as u32
    }
}
