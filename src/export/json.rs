//! JSON import/export for highlights.
//! Reads import payloads from files and writes a user's highlights back out.

use crate::error::Result;
use crate::models::{Highlight, HighlightImportPayload};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Exports highlights to a pretty-printed JSON array at the given path.
pub fn export_highlights_to_path(highlights: &[Highlight], path: impl AsRef<Path>) -> Result<()> {
    let json_string = serde_json::to_string_pretty(highlights)?;
    let mut file = File::create(path.as_ref())?;
    file.write_all(json_string.as_bytes())?;
    tracing::info!(
        path = %path.as_ref().display(),
        count = highlights.len(),
        "highlights exported"
    );
    Ok(())
}

/// Reads an import payload (camelCase JSON) from a file.
/// Entries are not validated here; the import pipeline does that.
pub fn import_payload_from_path(path: impl AsRef<Path>) -> Result<HighlightImportPayload> {
    let mut file = File::open(path.as_ref())?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    let payload: HighlightImportPayload = serde_json::from_str(&contents)?;

    tracing::debug!(
        path = %path.as_ref().display(),
        entries = payload.entries.len(),
        "import payload read"
    );
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::contract;
    use crate::error::ServiceError;
    use crate::models::HighlightSource;
    use std::fs;

    #[test]
    fn test_export_highlights_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        let highlights = vec![
            contract::sample_highlight("demo-user", "first", 1),
            contract::sample_highlight("demo-user", "second", 2),
        ];

        export_highlights_to_path(&highlights, &path).unwrap();

        let written: Vec<Highlight> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, highlights);
        assert!(fs::read_to_string(&path).unwrap().contains("\"sourceTitle\""));
    }

    #[test]
    fn test_import_payload_from_path() {
        let json_content = r#"{
  "source": "kindle",
  "entries": [
    {
      "text": "Knowledge compounds when you resurface highlights.",
      "sourceTitle": "Spaced Repetition Playbook",
      "author": "N. Ortega",
      "location": "Loc 310",
      "capturedAt": "2024-01-03T12:00:00Z",
      "tags": ["memory"]
    }
  ]
}"#;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("import.json");
        fs::write(&path, json_content).unwrap();

        let payload = import_payload_from_path(&path).unwrap();
        assert_eq!(payload.source, HighlightSource::Kindle);
        assert_eq!(payload.entries.len(), 1);
        assert_eq!(payload.entries[0].source_title, "Spaced Repetition Playbook");
        assert_eq!(payload.entries[0].tags, vec!["memory".to_string()]);
    }

    #[test]
    fn test_import_nonexistent_file() {
        let result = import_payload_from_path("nonexistent_file_xyz123.json");
        assert!(matches!(result, Err(ServiceError::Io(_))));
    }

    #[test]
    fn test_import_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invalid.json");
        fs::write(&path, "{ this is not valid json }").unwrap();

        let result = import_payload_from_path(&path);
        assert!(matches!(result, Err(ServiceError::Json(_))));
    }
}
