use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A note as returned by the server.
///
/// Only the id and the displayed fields are typed; any other fields the
/// server sends are kept in `extra` and round-trip unchanged. The client
/// imposes no invariants on the record beyond the server-assigned id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Note {
    /// Title for list display, falling back for untitled notes.
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(t) if !t.is_empty() => t,
            _ => "(untitled)",
        }
    }

    /// Body text, empty string if the server sent none.
    pub fn body(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }

    /// The most recent of the server timestamps, for the list's age column.
    pub fn last_touched(&self) -> Option<DateTime<Utc>> {
        self.updated_at.or(self.created_at)
    }
}

/// Fields sent to the server when creating or updating a note.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_fields_pass_through() {
        let json = r#"{"id": 7, "title": "groceries", "content": "milk",
                       "owner": "alice", "pinned": true}"#;
        let note: Note = serde_json::from_str(json).unwrap();
        assert_eq!(note.id, 7);
        assert_eq!(note.display_title(), "groceries");
        assert_eq!(note.extra["owner"], "alice");
        assert_eq!(note.extra["pinned"], true);

        // Round-trip keeps the untyped fields
        let back = serde_json::to_value(&note).unwrap();
        assert_eq!(back["owner"], "alice");
        assert_eq!(back["pinned"], true);
    }

    #[test]
    fn test_minimal_note_parses() {
        let note: Note = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert_eq!(note.display_title(), "(untitled)");
        assert_eq!(note.body(), "");
        assert!(note.last_touched().is_none());
    }

    #[test]
    fn test_last_touched_prefers_updated_at() {
        let json = r#"{"id": 2,
                       "created_at": "2025-01-01T00:00:00Z",
                       "updated_at": "2025-06-01T12:30:00Z"}"#;
        let note: Note = serde_json::from_str(json).unwrap();
        assert_eq!(note.last_touched(), note.updated_at);
    }
}
