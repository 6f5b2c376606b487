//! Medical history operations. Each history owns its supplement lines,
//! which are replaced wholesale on every save.

use rusqlite::{params, Connection, Row};
use tracing::debug;

use super::master_detail::{replace_details, DetailRow, MasterRow};
use super::repository::{
    execute, like_pattern, query_count, query_list, query_optional, ClientScoped, MatchStyle,
    Repository,
};
use super::{Database, DbResult};
use crate::models::{MedHx, MedHxSupplement};

const SELECT_MED_HX: &str = r#"
    SELECT m.Med_HxID, m.ClientID, c.Name, m.Assessment_Date,
           m.Blood_Test_Results, m.Medication, m.Supplements,
           m.Accidents_Previous_Illness, m.Menstrual_Notes, m.Vaccinations,
           m.Med_Hx, m.Family_Med_Hx
    FROM Med_Hx m
    JOIN Client c ON c.ClientID = m.ClientID
"#;

const MED_HX_ORDER: &str = "ORDER BY m.Assessment_Date DESC, m.Med_HxID DESC";

fn med_hx_from_row(row: &Row<'_>) -> rusqlite::Result<MedHx> {
    Ok(MedHx {
        med_hx_id: row.get(0)?,
        client_id: row.get(1)?,
        client_name: row.get(2)?,
        assessment_date: row.get(3)?,
        blood_test_results: row.get(4)?,
        medication: row.get(5)?,
        supplements_notes: row.get(6)?,
        accidents_previous_illness: row.get(7)?,
        menstrual_notes: row.get(8)?,
        vaccinations: row.get(9)?,
        history_notes: row.get(10)?,
        family_history: row.get(11)?,
    })
}

fn med_hx_supplement_from_row(row: &Row<'_>) -> rusqlite::Result<MedHxSupplement> {
    Ok(MedHxSupplement {
        med_hx_supplement_id: row.get(0)?,
        med_hx_id: row.get(1)?,
        supplement_id: row.get(2)?,
        supplement_name: row.get(3)?,
        dosage: row.get(4)?,
        frequency: row.get(5)?,
        notes: row.get(6)?,
    })
}

impl MasterRow for MedHx {
    const TABLE: &'static str = "Med_Hx";

    fn row_id(&self) -> Option<i64> {
        self.med_hx_id
    }

    fn insert(&self, conn: &Connection) -> rusqlite::Result<i64> {
        conn.execute(
            r#"
            INSERT INTO Med_Hx (
                ClientID, Assessment_Date, Blood_Test_Results, Medication, Supplements,
                Accidents_Previous_Illness, Menstrual_Notes, Vaccinations, Med_Hx, Family_Med_Hx
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                self.client_id,
                self.assessment_date,
                self.blood_test_results,
                self.medication,
                self.supplements_notes,
                self.accidents_previous_illness,
                self.menstrual_notes,
                self.vaccinations,
                self.history_notes,
                self.family_history,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn update(&self, conn: &Connection) -> rusqlite::Result<usize> {
        conn.execute(
            r#"
            UPDATE Med_Hx SET
                ClientID = ?2,
                Assessment_Date = ?3,
                Blood_Test_Results = ?4,
                Medication = ?5,
                Supplements = ?6,
                Accidents_Previous_Illness = ?7,
                Menstrual_Notes = ?8,
                Vaccinations = ?9,
                Med_Hx = ?10,
                Family_Med_Hx = ?11
            WHERE Med_HxID = ?1
            "#,
            params![
                self.med_hx_id,
                self.client_id,
                self.assessment_date,
                self.blood_test_results,
                self.medication,
                self.supplements_notes,
                self.accidents_previous_illness,
                self.menstrual_notes,
                self.vaccinations,
                self.history_notes,
                self.family_history,
            ],
        )
    }
}

impl DetailRow for MedHxSupplement {
    const DELETE_FOR_PARENT: &'static str = "DELETE FROM Med_Hx_Supplements WHERE Med_HxID = ?1";

    fn row_id(&self) -> Option<i64> {
        self.med_hx_supplement_id
    }

    fn insert_under(&self, conn: &Connection, parent_id: i64) -> rusqlite::Result<i64> {
        conn.execute(
            r#"
            INSERT INTO Med_Hx_Supplements (Med_HxID, SupplementID, Dosage, Frequency, Notes)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                parent_id,
                self.supplement_id,
                self.dosage,
                self.frequency,
                self.notes,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }
}

/// Medical histories, most recent first.
pub struct MedHxRepository<'a> {
    db: &'a Database,
}

impl Database {
    pub fn medical_histories(&self) -> MedHxRepository<'_> {
        MedHxRepository { db: self }
    }
}

impl MedHxRepository<'_> {
    /// Insert a history and its supplement lines atomically.
    pub fn add_with_supplements(
        &self,
        med_hx: &MedHx,
        supplements: &[MedHxSupplement],
    ) -> DbResult<i64> {
        self.db
            .add_with_details("add medical history", med_hx, |conn, med_hx_id| {
                replace_details(conn, med_hx_id, supplements).map(|_| ())
            })
    }

    /// Update a history and replace its supplement lines atomically.
    ///
    /// Lines absent from `supplements` are removed; the rest are re-created
    /// with new ids.
    pub fn update_with_supplements(
        &self,
        med_hx: &MedHx,
        supplements: &[MedHxSupplement],
    ) -> DbResult<bool> {
        self.db
            .update_with_details("update medical history", med_hx, |conn, med_hx_id| {
                replace_details(conn, med_hx_id, supplements).map(|_| ())
            })
    }

    /// Supplement lines of one history, in entry order.
    pub fn get_supplements(&self, med_hx_id: i64) -> DbResult<Vec<MedHxSupplement>> {
        query_list(
            self.db,
            r#"
            SELECT ms.Med_Hx_SupplementsID, ms.Med_HxID, ms.SupplementID, s.Name,
                   ms.Dosage, ms.Frequency, ms.Notes
            FROM Med_Hx_Supplements ms
            JOIN Supplements s ON s.SupplementID = ms.SupplementID
            WHERE ms.Med_HxID = ?1
            ORDER BY ms.Med_Hx_SupplementsID
            "#,
            [med_hx_id],
            med_hx_supplement_from_row,
        )
    }
}

impl Repository for MedHxRepository<'_> {
    type Entity = MedHx;

    fn get_all(&self) -> DbResult<Vec<MedHx>> {
        query_list(
            self.db,
            &format!("{SELECT_MED_HX} {MED_HX_ORDER}"),
            [],
            med_hx_from_row,
        )
    }

    fn get_by_id(&self, id: i64) -> DbResult<Option<MedHx>> {
        query_optional(
            self.db,
            &format!("{SELECT_MED_HX} WHERE m.Med_HxID = ?1"),
            [id],
            med_hx_from_row,
        )
    }

    /// Runs as a master-detail save, so a missing client surfaces as
    /// [`DbError::Transaction`] wrapping a constraint error. Check it with
    /// [`DbError::is_constraint`].
    ///
    /// [`DbError::Transaction`]: super::DbError::Transaction
    /// [`DbError::is_constraint`]: super::DbError::is_constraint
    fn add(&self, med_hx: &MedHx) -> DbResult<i64> {
        self.add_with_supplements(med_hx, &[])
    }

    /// Updates the history row only; supplement lines are left as they are.
    fn update(&self, med_hx: &MedHx) -> DbResult<bool> {
        let conn = self.db.connect()?;
        let rows_affected = med_hx.update(&conn)?;
        debug!(med_hx_id = ?med_hx.med_hx_id, rows_affected, "Updated medical history");
        Ok(rows_affected > 0)
    }

    fn delete(&self, id: i64) -> DbResult<bool> {
        let rows_affected = execute(self.db, "DELETE FROM Med_Hx WHERE Med_HxID = ?1", [id])?;
        debug!(med_hx_id = id, rows_affected, "Deleted medical history");
        Ok(rows_affected > 0)
    }

    fn search(&self, term: &str) -> DbResult<Vec<MedHx>> {
        let Some(pattern) = like_pattern(term, MatchStyle::Substring) else {
            return self.get_all();
        };
        query_list(
            self.db,
            &format!(
                r#"{SELECT_MED_HX}
                WHERE c.Name LIKE ?1 ESCAPE '\'
                   OR m.Medication LIKE ?1 ESCAPE '\'
                   OR m.Accidents_Previous_Illness LIKE ?1 ESCAPE '\'
                {MED_HX_ORDER}"#
            ),
            [pattern],
            med_hx_from_row,
        )
    }

    fn count(&self) -> DbResult<i64> {
        query_count(self.db, "SELECT COUNT(*) FROM Med_Hx", [])
    }
}

impl ClientScoped for MedHxRepository<'_> {
    fn get_by_client_id(&self, client_id: i64) -> DbResult<Vec<MedHx>> {
        query_list(
            self.db,
            &format!("{SELECT_MED_HX} WHERE m.ClientID = ?1 {MED_HX_ORDER}"),
            [client_id],
            med_hx_from_row,
        )
    }
}
