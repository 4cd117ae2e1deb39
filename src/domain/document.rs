//! Uploaded documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user-supplied file tracked for the lifetime of a session.
///
/// Documents are immutable once created; the only way to change the
/// tracked set is to add or remove whole documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier
    pub id: Uuid,

    /// Original file name, including extension
    pub name: String,

    /// Declared size in bytes
    pub size: u64,

    /// Declared MIME type (may be empty)
    pub mime_type: String,

    /// When intake accepted the file
    pub uploaded_at: DateTime<Utc>,

    /// Full text content, if it was read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Document {
    /// Create a new document with a fresh id and the current timestamp
    pub fn new(name: impl Into<String>, size: u64, mime_type: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            size,
            mime_type: mime_type.into(),
            uploaded_at: Utc::now(),
            content: None,
        }
    }

    /// Attach text content
    pub fn with_content(mut self, content: String) -> Self {
        self.content = Some(content);
        self
    }

    /// Human-readable size, e.g. "1.5 KB"
    pub fn display_size(&self) -> String {
        format_size(self.size)
    }
}

/// Format a byte count using 1024-based units.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    // At most two decimals; f64 Display drops trailing zeros
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_creation() {
        let doc = Document::new("policy.txt", 42, "text/plain")
            .with_content("Minimum attendance: 75%".to_string());

        assert_eq!(doc.name, "policy.txt");
        assert_eq!(doc.size, 42);
        assert_eq!(doc.content.as_deref(), Some("Minimum attendance: 75%"));
    }

    #[test]
    fn test_ids_are_distinct() {
        let a = Document::new("a.txt", 1, "text/plain");
        let b = Document::new("a.txt", 1, "text/plain");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 Bytes");
        assert_eq!(format_size(512), "512 Bytes");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1024 * 1024), "1 MB");
    }
}
