//! Scanned documents attached to a client.

use serde::{Deserialize, Serialize};

use super::parse_date;

/// A scanned PDF or image. The payload is stored as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, uniffi::Record)]
pub struct ScannedNote {
    pub scanned_note_id: Option<i64>,
    pub client_id: i64,
    pub document_name: Option<String>,
    pub document_date: Option<String>,
    /// Type label such as "PDF" or "PNG"
    pub document_type: Option<String>,
    pub description: Option<String>,
    pub content: Vec<u8>,
}

impl ScannedNote {
    pub fn new(client_id: i64, content: Vec<u8>) -> Self {
        Self {
            scanned_note_id: None,
            client_id,
            document_name: None,
            document_date: None,
            document_type: None,
            description: None,
            content,
        }
    }

    pub fn is_pdf(&self) -> bool {
        self.document_type
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case("pdf"))
    }

    /// Any typed document that is not a PDF is treated as an image.
    pub fn is_image(&self) -> bool {
        !self.is_pdf() && self.document_type.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// `"name (dd/mm/yyyy)"` with fallbacks for missing parts.
    pub fn display_name(&self) -> String {
        let name = self.document_name.as_deref().unwrap_or("Untitled");
        let date = self
            .document_date
            .as_deref()
            .and_then(parse_date)
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| "No date".to_string());
        format!("{} ({})", name, date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_kind() {
        let mut note = ScannedNote::new(1, vec![]);
        assert!(!note.is_pdf());
        assert!(!note.is_image());

        note.document_type = Some("pdf".into());
        assert!(note.is_pdf());
        assert!(!note.is_image());

        note.document_type = Some("PNG".into());
        assert!(note.is_image());
    }

    #[test]
    fn test_display_name() {
        let mut note = ScannedNote::new(1, vec![]);
        assert_eq!(note.display_name(), "Untitled (No date)");

        note.document_name = Some("Blood panel".into());
        note.document_date = Some("2024-02-01".into());
        assert_eq!(note.display_name(), "Blood panel (01/02/2024)");
    }
}
