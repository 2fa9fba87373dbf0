//! Highlight is a captured passage plus its review schedule.
use super::ReviewState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightSource {
    Kindle,
    Manual,
    Integration,
}

impl HighlightSource {
    pub fn as_str(self) -> &'static str {
        match self {
            HighlightSource::Kindle => "kindle",
            HighlightSource::Manual => "manual",
            HighlightSource::Integration => "integration",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "kindle" => Some(HighlightSource::Kindle),
            "manual" => Some(HighlightSource::Manual),
            "integration" => Some(HighlightSource::Integration),
            _ => None,
        }
    }
}

impl fmt::Display for HighlightSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    pub id: String,
    pub user_id: String,
    pub source_id: String,
    pub source_title: String,
    pub author: Option<String>,
    pub text: String,
    pub location: Option<String>,
    pub captured_at: DateTime<Utc>,
    pub tags: Vec<String>,
    pub review: ReviewState,
}

/// A highlight as it arrives from an import or a manual note, before it has
/// an id or a schedule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHighlight {
    pub text: String,
    pub source_title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub captured_at: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Highlight {
    pub fn from_new(user_id: &str, entry: NewHighlight, review: ReviewState) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            source_id: uuid::Uuid::new_v4().to_string(),
            source_title: entry.source_title,
            author: entry.author,
            text: entry.text,
            location: entry.location,
            captured_at: entry.captured_at,
            tags: entry.tags,
            review,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_from_new_assigns_fresh_ids() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let entry = NewHighlight {
            text: "Knowledge compounds.".to_string(),
            source_title: "Spaced Repetition Playbook".to_string(),
            author: Some("N. Ortega".to_string()),
            location: None,
            captured_at: now,
            tags: vec!["memory".to_string()],
        };

        let first = Highlight::from_new("demo-user", entry.clone(), ReviewState::new(now));
        let second = Highlight::from_new("demo-user", entry, ReviewState::new(now));

        assert_ne!(first.id, second.id);
        assert_ne!(first.id, first.source_id);
        assert_eq!(first.user_id, "demo-user");
        assert_eq!(first.tags, vec!["memory".to_string()]);
    }

    #[test]
    fn test_source_names() {
        for source in [
            HighlightSource::Kindle,
            HighlightSource::Manual,
            HighlightSource::Integration,
        ] {
            assert_eq!(HighlightSource::parse(source.as_str()), Some(source));
        }
        assert_eq!(HighlightSource::parse("pocket"), None);
    }
}
