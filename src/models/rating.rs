//! User feedback on a single review attempt.
use super::scheduler::SchedulerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Recall difficulty reported by the user, ordered from worst to best.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Again,
    Hard,
    Good,
    Easy,
}

impl Rating {
    pub const ALL: [Rating; 4] = [Rating::Again, Rating::Hard, Rating::Good, Rating::Easy];

    /// Change applied to the ease factor (and, halved, to the mastery score).
    pub fn ease_delta(self) -> f64 {
        match self {
            Rating::Again => -0.2,
            Rating::Hard => -0.05,
            Rating::Good => 0.0,
            Rating::Easy => 0.1,
        }
    }

    /// Scale applied to the grown interval from the third review onward.
    pub fn interval_multiplier(self) -> f64 {
        match self {
            Rating::Again => 0.5,
            Rating::Hard => 0.8,
            Rating::Good => 1.6,
            Rating::Easy => 2.2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rating::Again => "again",
            Rating::Hard => "hard",
            Rating::Good => "good",
            Rating::Easy => "easy",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rating {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "again" => Ok(Rating::Again),
            "hard" => Ok(Rating::Hard),
            "good" => Ok(Rating::Good),
            "easy" => Ok(Rating::Easy),
            _ => Err(SchedulerError::InvalidRating(s.to_string())),
        }
    }
}
