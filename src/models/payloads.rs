//! Request payloads accepted from callers, with their validation rules.
use super::{HighlightSource, NewHighlight};
use crate::error::ServiceError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportEntry {
    pub text: String,
    pub source_title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub captured_at: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightImportPayload {
    pub source: HighlightSource,
    pub entries: Vec<ImportEntry>,
}

impl HighlightImportPayload {
    /// Validates every entry and converts them into unscheduled highlights.
    pub fn parse_entries(&self) -> Result<Vec<NewHighlight>, ServiceError> {
        if self.entries.is_empty() {
            return Err(ServiceError::Validation(
                "import must contain at least one entry".to_string(),
            ));
        }

        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| -> Result<NewHighlight, ServiceError> {
                require_text(&entry.text, &format!("entries[{index}].text"))?;
                require_text(&entry.source_title, &format!("entries[{index}].sourceTitle"))?;
                let captured_at = DateTime::parse_from_rfc3339(entry.captured_at.trim())
                    .map_err(|e| {
                        ServiceError::Validation(format!(
                            "entries[{index}].capturedAt {:?} is not an RFC 3339 timestamp: {e}",
                            entry.captured_at
                        ))
                    })?
                    .with_timezone(&Utc);

                Ok(NewHighlight {
                    text: entry.text.clone(),
                    source_title: entry.source_title.clone(),
                    author: entry.author.clone(),
                    location: entry.location.clone(),
                    captured_at,
                    tags: entry.tags.clone(),
                })
            })
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePayload {
    pub text: String,
    pub source_title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NotePayload {
    pub fn validate(&self) -> Result<(), ServiceError> {
        require_text(&self.text, "text")?;
        require_text(&self.source_title, "sourceTitle")
    }
}

/// Rating stays a string here so unknown values surface as an invalid rating
/// rather than a generic decode failure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewFeedbackPayload {
    pub highlight_id: String,
    pub rating: String,
}

impl ReviewFeedbackPayload {
    pub fn validate(&self) -> Result<(), ServiceError> {
        require_text(&self.highlight_id, "highlightId")
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigestRequestPayload {
    pub user_id: String,
    pub scheduled_for: DateTime<Utc>,
}

impl DigestRequestPayload {
    pub fn validate(&self) -> Result<(), ServiceError> {
        require_text(&self.user_id, "userId")
    }
}

fn require_text(value: &str, field: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        Err(ServiceError::Validation(format!("{field} must not be empty")))
    } else {
        Ok(())
    }
}
