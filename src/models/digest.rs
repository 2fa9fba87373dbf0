//! Periodic digest previews.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestAction {
    pub label: String,
    pub href: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigestPreview {
    pub id: String,
    pub user_id: String,
    pub scheduled_for: DateTime<Utc>,
    pub highlight_count: usize,
    pub recently_added_count: usize,
    pub actions: Vec<DigestAction>,
}

impl DigestPreview {
    pub fn new(
        user_id: &str,
        scheduled_for: DateTime<Utc>,
        highlight_count: usize,
        recently_added_count: usize,
    ) -> Self {
        let id = uuid::Uuid::new_v4().to_string();
        let actions = Self::actions_for(&id);
        Self {
            id,
            user_id: user_id.to_string(),
            scheduled_for,
            highlight_count,
            recently_added_count,
            actions,
        }
    }

    /// Links offered alongside a digest.
    pub fn actions_for(id: &str) -> Vec<DigestAction> {
        vec![
            DigestAction {
                label: "View Digest".to_string(),
                href: format!("/digests/{id}"),
            },
            DigestAction {
                label: "Reschedule".to_string(),
                href: format!("/digests/{id}/schedule"),
            },
        ]
    }
}
