//! Scanned document operations.

use rusqlite::{params, Row};
use tracing::debug;

use super::repository::{
    execute, like_pattern, query_count, query_list, query_optional, ClientScoped, MatchStyle,
    Repository,
};
use super::{Database, DbResult};
use crate::models::ScannedNote;

const SELECT_SCANNED_NOTE: &str = r#"
    SELECT ScannedNotesID, ClientID, Document_Name, Document_Date, Document_Type,
           Description, Scanned_Document
    FROM Scanned_Notes
"#;

const SCANNED_NOTE_ORDER: &str = "ORDER BY Document_Date DESC, ScannedNotesID DESC";

fn scanned_note_from_row(row: &Row<'_>) -> rusqlite::Result<ScannedNote> {
    Ok(ScannedNote {
        scanned_note_id: row.get(0)?,
        client_id: row.get(1)?,
        document_name: row.get(2)?,
        document_date: row.get(3)?,
        document_type: row.get(4)?,
        description: row.get(5)?,
        content: row.get::<_, Option<Vec<u8>>>(6)?.unwrap_or_default(),
    })
}

/// Scanned documents, newest document date first.
pub struct ScannedNoteRepository<'a> {
    db: &'a Database,
}

impl Database {
    pub fn scanned_notes(&self) -> ScannedNoteRepository<'_> {
        ScannedNoteRepository { db: self }
    }
}

impl ScannedNoteRepository<'_> {
    /// Prefix search on document name, limited to one client.
    pub fn search_by_client(&self, client_id: i64, term: &str) -> DbResult<Vec<ScannedNote>> {
        let Some(pattern) = like_pattern(term, MatchStyle::Prefix) else {
            return self.get_by_client_id(client_id);
        };
        query_list(
            self.db,
            &format!(
                r#"{SELECT_SCANNED_NOTE}
                WHERE ClientID = ?1 AND Document_Name LIKE ?2 ESCAPE '\'
                {SCANNED_NOTE_ORDER}"#
            ),
            params![client_id, pattern],
            scanned_note_from_row,
        )
    }

    pub fn count_by_client(&self, client_id: i64) -> DbResult<i64> {
        query_count(
            self.db,
            "SELECT COUNT(*) FROM Scanned_Notes WHERE ClientID = ?1",
            [client_id],
        )
    }
}

impl Repository for ScannedNoteRepository<'_> {
    type Entity = ScannedNote;

    fn get_all(&self) -> DbResult<Vec<ScannedNote>> {
        query_list(
            self.db,
            &format!("{SELECT_SCANNED_NOTE} {SCANNED_NOTE_ORDER}"),
            [],
            scanned_note_from_row,
        )
    }

    fn get_by_id(&self, id: i64) -> DbResult<Option<ScannedNote>> {
        query_optional(
            self.db,
            &format!("{SELECT_SCANNED_NOTE} WHERE ScannedNotesID = ?1"),
            [id],
            scanned_note_from_row,
        )
    }

    fn add(&self, note: &ScannedNote) -> DbResult<i64> {
        let conn = self.db.connect()?;
        conn.execute(
            r#"
            INSERT INTO Scanned_Notes (
                Document_Name, Document_Date, Document_Type,
                Description, Scanned_Document, ClientID
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                note.document_name,
                note.document_date,
                note.document_type,
                note.description,
                note.content,
                note.client_id,
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!(
            scanned_note_id = id,
            client_id = note.client_id,
            bytes = note.content.len(),
            "Inserted scanned note"
        );
        Ok(id)
    }

    fn update(&self, note: &ScannedNote) -> DbResult<bool> {
        let Some(id) = note.scanned_note_id else {
            return Ok(false);
        };
        let rows_affected = execute(
            self.db,
            r#"
            UPDATE Scanned_Notes SET
                Document_Name = ?2,
                Document_Date = ?3,
                Document_Type = ?4,
                Description = ?5,
                Scanned_Document = ?6,
                ClientID = ?7
            WHERE ScannedNotesID = ?1
            "#,
            params![
                id,
                note.document_name,
                note.document_date,
                note.document_type,
                note.description,
                note.content,
                note.client_id,
            ],
        )?;
        debug!(scanned_note_id = id, rows_affected, "Updated scanned note");
        Ok(rows_affected > 0)
    }

    fn delete(&self, id: i64) -> DbResult<bool> {
        let rows_affected = execute(
            self.db,
            "DELETE FROM Scanned_Notes WHERE ScannedNotesID = ?1",
            [id],
        )?;
        debug!(scanned_note_id = id, rows_affected, "Deleted scanned note");
        Ok(rows_affected > 0)
    }

    fn search(&self, term: &str) -> DbResult<Vec<ScannedNote>> {
        let Some(pattern) = like_pattern(term, MatchStyle::Prefix) else {
            return self.get_all();
        };
        query_list(
            self.db,
            &format!(
                r#"{SELECT_SCANNED_NOTE}
                WHERE Document_Name LIKE ?1 ESCAPE '\'
                {SCANNED_NOTE_ORDER}"#
            ),
            [pattern],
            scanned_note_from_row,
        )
    }

    fn count(&self) -> DbResult<i64> {
        query_count(self.db, "SELECT COUNT(*) FROM Scanned_Notes", [])
    }
}

impl ClientScoped for ScannedNoteRepository<'_> {
    fn get_by_client_id(&self, client_id: i64) -> DbResult<Vec<ScannedNote>> {
        query_list(
            self.db,
            &format!("{SELECT_SCANNED_NOTE} WHERE ClientID = ?1 {SCANNED_NOTE_ORDER}"),
            [client_id],
            scanned_note_from_row,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Client;

    fn note(client_id: i64, name: &str, date: &str) -> ScannedNote {
        let mut note = ScannedNote::new(client_id, b"%PDF-1.7".to_vec());
        note.document_name = Some(name.into());
        note.document_date = Some(date.into());
        note.document_type = Some("PDF".into());
        note
    }

    #[test]
    fn test_insert_and_get_keeps_bytes() {
        let db = Database::open_in_memory().unwrap();
        let client_id = db.clients().add(&Client::new("Jane Doe")).unwrap();

        let id = db.scanned_notes().add(&note(client_id, "Referral letter", "2024-05-01")).unwrap();
        let fetched = db.scanned_notes().get_by_id(id).unwrap().unwrap();

        assert_eq!(fetched.content, b"%PDF-1.7".to_vec());
        assert!(fetched.is_pdf());
        assert_eq!(fetched.display_name(), "Referral letter (01/05/2024)");
    }

    #[test]
    fn test_search_by_client() {
        let db = Database::open_in_memory().unwrap();
        let jane = db.clients().add(&Client::new("Jane Doe")).unwrap();
        let john = db.clients().add(&Client::new("John Roe")).unwrap();

        db.scanned_notes().add(&note(jane, "Blood results", "2024-01-01")).unwrap();
        db.scanned_notes().add(&note(jane, "Referral", "2024-02-01")).unwrap();
        db.scanned_notes().add(&note(john, "Blood results", "2024-03-01")).unwrap();

        assert_eq!(db.scanned_notes().search_by_client(jane, "blood").unwrap().len(), 1);
        assert_eq!(db.scanned_notes().search_by_client(jane, " ").unwrap().len(), 2);
        assert_eq!(db.scanned_notes().search("blood").unwrap().len(), 2);
        assert!(db.scanned_notes().search("results").unwrap().is_empty());
        assert_eq!(db.scanned_notes().count_by_client(john).unwrap(), 1);

        let newest = &db.scanned_notes().get_by_client_id(jane).unwrap()[0];
        assert_eq!(newest.document_name.as_deref(), Some("Referral"));
    }
}
