//! Prescription operations. Supplement lines follow the same full-replace
//! save as medical histories.

use rusqlite::{params, Connection, Row};
use tracing::debug;

use super::master_detail::{replace_details, DetailRow, MasterRow};
use super::repository::{
    execute, like_pattern, query_count, query_list, query_optional, ClientScoped, MatchStyle,
    Repository,
};
use super::{Database, DbResult};
use crate::models::{Prescription, PrescriptionSupplement};

const SELECT_PRESCRIPTION: &str = r#"
    SELECT p.PrescriptionID, p.ClientID, c.Name, p.Prescription_Date,
           p.Next_Appointment_Date, p.Recommendations
    FROM Prescription p
    JOIN Client c ON c.ClientID = p.ClientID
"#;

const PRESCRIPTION_ORDER: &str = "ORDER BY p.Prescription_Date DESC, p.PrescriptionID DESC";

fn prescription_from_row(row: &Row<'_>) -> rusqlite::Result<Prescription> {
    Ok(Prescription {
        prescription_id: row.get(0)?,
        client_id: row.get(1)?,
        client_name: row.get(2)?,
        prescription_date: row.get(3)?,
        next_appointment_date: row.get(4)?,
        recommendations: row.get(5)?,
    })
}

fn prescription_supplement_from_row(row: &Row<'_>) -> rusqlite::Result<PrescriptionSupplement> {
    Ok(PrescriptionSupplement {
        prescription_supplement_id: row.get(0)?,
        prescription_id: row.get(1)?,
        supplement_id: row.get(2)?,
        supplement_name: row.get(3)?,
        breakfast: row.get(4)?,
        lunch: row.get(5)?,
        dinner: row.get(6)?,
        bedtime: row.get(7)?,
    })
}

impl MasterRow for Prescription {
    const TABLE: &'static str = "Prescription";

    fn row_id(&self) -> Option<i64> {
        self.prescription_id
    }

    fn insert(&self, conn: &Connection) -> rusqlite::Result<i64> {
        conn.execute(
            r#"
            INSERT INTO Prescription (Prescription_Date, Next_Appointment_Date, Recommendations, ClientID)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                self.prescription_date,
                self.next_appointment_date,
                self.recommendations,
                self.client_id,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn update(&self, conn: &Connection) -> rusqlite::Result<usize> {
        conn.execute(
            r#"
            UPDATE Prescription SET
                Prescription_Date = ?2,
                Next_Appointment_Date = ?3,
                Recommendations = ?4,
                ClientID = ?5
            WHERE PrescriptionID = ?1
            "#,
            params![
                self.prescription_id,
                self.prescription_date,
                self.next_appointment_date,
                self.recommendations,
                self.client_id,
            ],
        )
    }
}

impl DetailRow for PrescriptionSupplement {
    const DELETE_FOR_PARENT: &'static str =
        "DELETE FROM Prescription_Supplements WHERE PrescriptionID = ?1";

    fn row_id(&self) -> Option<i64> {
        self.prescription_supplement_id
    }

    fn insert_under(&self, conn: &Connection, parent_id: i64) -> rusqlite::Result<i64> {
        conn.execute(
            r#"
            INSERT INTO Prescription_Supplements (
                Breakfast, Lunch, Dinner, Bedtime, PrescriptionID, SupplementID
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                self.breakfast,
                self.lunch,
                self.dinner,
                self.bedtime,
                parent_id,
                self.supplement_id,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }
}

/// Prescriptions, most recent first.
pub struct PrescriptionRepository<'a> {
    db: &'a Database,
}

impl Database {
    pub fn prescriptions(&self) -> PrescriptionRepository<'_> {
        PrescriptionRepository { db: self }
    }
}

impl PrescriptionRepository<'_> {
    pub fn add_with_supplements(
        &self,
        prescription: &Prescription,
        supplements: &[PrescriptionSupplement],
    ) -> DbResult<i64> {
        self.db
            .add_with_details("add prescription", prescription, |conn, prescription_id| {
                replace_details(conn, prescription_id, supplements).map(|_| ())
            })
    }

    /// Update the prescription and make its stored lines equal `supplements`.
    pub fn update_with_supplements(
        &self,
        prescription: &Prescription,
        supplements: &[PrescriptionSupplement],
    ) -> DbResult<bool> {
        self.db
            .update_with_details("update prescription", prescription, |conn, prescription_id| {
                replace_details(conn, prescription_id, supplements).map(|_| ())
            })
    }

    pub fn get_supplements(&self, prescription_id: i64) -> DbResult<Vec<PrescriptionSupplement>> {
        query_list(
            self.db,
            r#"
            SELECT ps.Prescription_SupplementsID, ps.PrescriptionID, ps.SupplementID, s.Name,
                   ps.Breakfast, ps.Lunch, ps.Dinner, ps.Bedtime
            FROM Prescription_Supplements ps
            JOIN Supplements s ON s.SupplementID = ps.SupplementID
            WHERE ps.PrescriptionID = ?1
            ORDER BY ps.Prescription_SupplementsID
            "#,
            [prescription_id],
            prescription_supplement_from_row,
        )
    }
}

impl Repository for PrescriptionRepository<'_> {
    type Entity = Prescription;

    fn get_all(&self) -> DbResult<Vec<Prescription>> {
        query_list(
            self.db,
            &format!("{SELECT_PRESCRIPTION} {PRESCRIPTION_ORDER}"),
            [],
            prescription_from_row,
        )
    }

    fn get_by_id(&self, id: i64) -> DbResult<Option<Prescription>> {
        query_optional(
            self.db,
            &format!("{SELECT_PRESCRIPTION} WHERE p.PrescriptionID = ?1"),
            [id],
            prescription_from_row,
        )
    }

    /// Runs as a master-detail save, so a missing client surfaces as
    /// [`DbError::Transaction`] wrapping a constraint error. Check it with
    /// [`DbError::is_constraint`].
    ///
    /// [`DbError::Transaction`]: super::DbError::Transaction
    /// [`DbError::is_constraint`]: super::DbError::is_constraint
    fn add(&self, prescription: &Prescription) -> DbResult<i64> {
        self.add_with_supplements(prescription, &[])
    }

    /// Updates the prescription row only.
    fn update(&self, prescription: &Prescription) -> DbResult<bool> {
        let conn = self.db.connect()?;
        let rows_affected = prescription.update(&conn)?;
        debug!(prescription_id = ?prescription.prescription_id, rows_affected, "Updated prescription");
        Ok(rows_affected > 0)
    }

    fn delete(&self, id: i64) -> DbResult<bool> {
        let rows_affected = execute(
            self.db,
            "DELETE FROM Prescription WHERE PrescriptionID = ?1",
            [id],
        )?;
        debug!(prescription_id = id, rows_affected, "Deleted prescription");
        Ok(rows_affected > 0)
    }

    fn search(&self, term: &str) -> DbResult<Vec<Prescription>> {
        let Some(pattern) = like_pattern(term, MatchStyle::Substring) else {
            return self.get_all();
        };
        query_list(
            self.db,
            &format!(
                r#"{SELECT_PRESCRIPTION}
                WHERE c.Name LIKE ?1 ESCAPE '\'
                   OR p.Recommendations LIKE ?1 ESCAPE '\'
                {PRESCRIPTION_ORDER}"#
            ),
            [pattern],
            prescription_from_row,
        )
    }

    fn count(&self) -> DbResult<i64> {
        query_count(self.db, "SELECT COUNT(*) FROM Prescription", [])
    }
}

impl ClientScoped for PrescriptionRepository<'_> {
    fn get_by_client_id(&self, client_id: i64) -> DbResult<Vec<Prescription>> {
        query_list(
            self.db,
            &format!("{SELECT_PRESCRIPTION} WHERE p.ClientID = ?1 {PRESCRIPTION_ORDER}"),
            [client_id],
            prescription_from_row,
        )
    }
}
