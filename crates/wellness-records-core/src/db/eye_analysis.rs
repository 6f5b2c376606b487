//! Eye analysis operations.
//!
//! An analysis owns two child sets saved in one transaction: the selected
//! sclera priority tags (replaced on every save) and the scan images
//! (append-only, existing scans are never rewritten or removed).

use rusqlite::{params, Connection, Row};
use tracing::debug;

use super::master_detail::{append_details, replace_details, DetailRow, MasterRow};
use super::repository::{
    execute, like_pattern, query_count, query_list, query_optional, ClientScoped, MatchStyle,
    Repository,
};
use super::{Database, DbResult};
use crate::models::{EyeAnalysis, EyeScan, ScleraPriorityType};

const SELECT_EYE_ANALYSIS: &str = r#"
    SELECT e.Eye_AnalysisID, e.ClientID, c.Name, e.Analysis_Date, e.Iris_Colour,
           e.Texture, e.Type, e.Pupil, e.Stomach, e.S_I_T, e.ANW, e.Bowel, e.Nox,
           e.Nerve_Rings, e.Scurf, e.Radii, e.Psora, e.Organs, e.Urine, e.Meridian_Scan
    FROM Eye_Analysis e
    JOIN Client c ON c.ClientID = e.ClientID
"#;

const EYE_ANALYSIS_ORDER: &str = "ORDER BY e.Analysis_Date DESC, e.Eye_AnalysisID DESC";

fn eye_analysis_from_row(row: &Row<'_>) -> rusqlite::Result<EyeAnalysis> {
    Ok(EyeAnalysis {
        eye_analysis_id: row.get(0)?,
        client_id: row.get(1)?,
        client_name: row.get(2)?,
        analysis_date: row.get(3)?,
        iris_colour: row.get(4)?,
        texture: row.get(5)?,
        iris_type: row.get(6)?,
        pupil: row.get(7)?,
        stomach: row.get(8)?,
        sit: row.get(9)?,
        anw: row.get(10)?,
        bowel: row.get(11)?,
        nox: row.get(12)?,
        nerve_rings: row.get(13)?,
        scurf: row.get(14)?,
        radii: row.get(15)?,
        psora: row.get(16)?,
        organs: row.get(17)?,
        urine: row.get(18)?,
        meridian_scan: row.get(19)?,
    })
}

fn eye_scan_from_row(row: &Row<'_>) -> rusqlite::Result<EyeScan> {
    Ok(EyeScan {
        eye_scan_id: row.get(0)?,
        eye_analysis_id: row.get(1)?,
        image: row.get(2)?,
        scan_date: row.get(3)?,
        side: row.get(4)?,
    })
}

impl MasterRow for EyeAnalysis {
    const TABLE: &'static str = "Eye_Analysis";

    fn row_id(&self) -> Option<i64> {
        self.eye_analysis_id
    }

    fn insert(&self, conn: &Connection) -> rusqlite::Result<i64> {
        conn.execute(
            r#"
            INSERT INTO Eye_Analysis (
                Analysis_Date, Iris_Colour, Texture, Type, Pupil, Stomach, S_I_T,
                ANW, Bowel, Nox, Nerve_Rings, Scurf, Radii, Psora, Organs, Urine,
                Meridian_Scan, ClientID
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9,
                ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18
            )
            "#,
            params![
                self.analysis_date,
                self.iris_colour,
                self.texture,
                self.iris_type,
                self.pupil,
                self.stomach,
                self.sit,
                self.anw,
                self.bowel,
                self.nox,
                self.nerve_rings,
                self.scurf,
                self.radii,
                self.psora,
                self.organs,
                self.urine,
                self.meridian_scan,
                self.client_id,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn update(&self, conn: &Connection) -> rusqlite::Result<usize> {
        conn.execute(
            r#"
            UPDATE Eye_Analysis SET
                Analysis_Date = ?2, Iris_Colour = ?3, Texture = ?4, Type = ?5,
                Pupil = ?6, Stomach = ?7, S_I_T = ?8, ANW = ?9, Bowel = ?10,
                Nox = ?11, Nerve_Rings = ?12, Scurf = ?13, Radii = ?14,
                Psora = ?15, Organs = ?16, Urine = ?17, Meridian_Scan = ?18,
                ClientID = ?19
            WHERE Eye_AnalysisID = ?1
            "#,
            params![
                self.eye_analysis_id,
                self.analysis_date,
                self.iris_colour,
                self.texture,
                self.iris_type,
                self.pupil,
                self.stomach,
                self.sit,
                self.anw,
                self.bowel,
                self.nox,
                self.nerve_rings,
                self.scurf,
                self.radii,
                self.psora,
                self.organs,
                self.urine,
                self.meridian_scan,
                self.client_id,
            ],
        )
    }
}

/// A selected priority tag, as a row of the junction table.
struct PriorityTag(i64);

impl DetailRow for PriorityTag {
    const DELETE_FOR_PARENT: &'static str =
        "DELETE FROM Eye_Analysis_Sclera_Priorities WHERE Eye_AnalysisID = ?1";

    fn row_id(&self) -> Option<i64> {
        None
    }

    fn insert_under(&self, conn: &Connection, parent_id: i64) -> rusqlite::Result<i64> {
        conn.execute(
            r#"
            INSERT OR IGNORE INTO Eye_Analysis_Sclera_Priorities (Eye_AnalysisID, ScleraPriorityTypeID)
            VALUES (?1, ?2)
            "#,
            params![parent_id, self.0],
        )?;
        Ok(self.0)
    }
}

impl DetailRow for EyeScan {
    const DELETE_FOR_PARENT: &'static str = "DELETE FROM Eye_Scan WHERE Eye_AnalysisID = ?1";

    fn row_id(&self) -> Option<i64> {
        self.eye_scan_id
    }

    fn insert_under(&self, conn: &Connection, parent_id: i64) -> rusqlite::Result<i64> {
        conn.execute(
            r#"
            INSERT INTO Eye_Scan (Eye_Scan, Scan_Date, Eye_Side, Eye_AnalysisID)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![self.image, self.scan_date, self.side, parent_id],
        )?;
        Ok(conn.last_insert_rowid())
    }
}

fn write_eye_details(
    conn: &Connection,
    eye_analysis_id: i64,
    priority_ids: &[i64],
    scans: &[EyeScan],
) -> DbResult<()> {
    let tags: Vec<PriorityTag> = priority_ids.iter().copied().map(PriorityTag).collect();
    replace_details(conn, eye_analysis_id, &tags)?;
    append_details(conn, eye_analysis_id, scans)?;
    Ok(())
}

/// Eye analyses, most recent first.
pub struct EyeAnalysisRepository<'a> {
    db: &'a Database,
}

impl Database {
    pub fn eye_analyses(&self) -> EyeAnalysisRepository<'_> {
        EyeAnalysisRepository { db: self }
    }

    pub fn sclera_priorities(&self) -> ScleraPriorityRepository<'_> {
        ScleraPriorityRepository { db: self }
    }
}

impl EyeAnalysisRepository<'_> {
    /// Insert an analysis with its selected priority tags and scans.
    pub fn add_with_details(
        &self,
        analysis: &EyeAnalysis,
        priority_ids: &[i64],
        scans: &[EyeScan],
    ) -> DbResult<i64> {
        self.db
            .add_with_details("add eye analysis", analysis, |conn, eye_analysis_id| {
                write_eye_details(conn, eye_analysis_id, priority_ids, scans)
            })
    }

    /// Update an analysis, replace its tags with `priority_ids` and append
    /// the scans that have no id yet.
    pub fn update_with_details(
        &self,
        analysis: &EyeAnalysis,
        priority_ids: &[i64],
        scans: &[EyeScan],
    ) -> DbResult<bool> {
        self.db
            .update_with_details("update eye analysis", analysis, |conn, eye_analysis_id| {
                write_eye_details(conn, eye_analysis_id, priority_ids, scans)
            })
    }

    pub fn get_selected_priority_ids(&self, eye_analysis_id: i64) -> DbResult<Vec<i64>> {
        query_list(
            self.db,
            r#"
            SELECT ScleraPriorityTypeID
            FROM Eye_Analysis_Sclera_Priorities
            WHERE Eye_AnalysisID = ?1
            ORDER BY ScleraPriorityTypeID
            "#,
            [eye_analysis_id],
            |row| row.get(0),
        )
    }

    /// Selected tags resolved against the catalog, by name.
    pub fn get_selected_priorities(&self, eye_analysis_id: i64) -> DbResult<Vec<ScleraPriorityType>> {
        query_list(
            self.db,
            r#"
            SELECT t.ScleraPriorityTypeID, t.Priority_Name, t.Description
            FROM Sclera_Priority_Types t
            JOIN Eye_Analysis_Sclera_Priorities j ON j.ScleraPriorityTypeID = t.ScleraPriorityTypeID
            WHERE j.Eye_AnalysisID = ?1
            ORDER BY t.Priority_Name COLLATE NOCASE
            "#,
            [eye_analysis_id],
            sclera_priority_from_row,
        )
    }

    /// Scans of one analysis in upload order.
    pub fn get_scans(&self, eye_analysis_id: i64) -> DbResult<Vec<EyeScan>> {
        query_list(
            self.db,
            r#"
            SELECT Eye_ScanID, Eye_AnalysisID, Eye_Scan, Scan_Date, Eye_Side
            FROM Eye_Scan
            WHERE Eye_AnalysisID = ?1
            ORDER BY Eye_ScanID
            "#,
            [eye_analysis_id],
            eye_scan_from_row,
        )
    }
}

impl Repository for EyeAnalysisRepository<'_> {
    type Entity = EyeAnalysis;

    fn get_all(&self) -> DbResult<Vec<EyeAnalysis>> {
        query_list(
            self.db,
            &format!("{SELECT_EYE_ANALYSIS} {EYE_ANALYSIS_ORDER}"),
            [],
            eye_analysis_from_row,
        )
    }

    fn get_by_id(&self, id: i64) -> DbResult<Option<EyeAnalysis>> {
        query_optional(
            self.db,
            &format!("{SELECT_EYE_ANALYSIS} WHERE e.Eye_AnalysisID = ?1"),
            [id],
            eye_analysis_from_row,
        )
    }

    /// Runs as a master-detail save, so a missing client surfaces as
    /// [`DbError::Transaction`] wrapping a constraint error. Check it with
    /// [`DbError::is_constraint`].
    ///
    /// [`DbError::Transaction`]: super::DbError::Transaction
    /// [`DbError::is_constraint`]: super::DbError::is_constraint
    fn add(&self, analysis: &EyeAnalysis) -> DbResult<i64> {
        self.add_with_details(analysis, &[], &[])
    }

    /// Updates the analysis row only; tags and scans are left as they are.
    fn update(&self, analysis: &EyeAnalysis) -> DbResult<bool> {
        let conn = self.db.connect()?;
        let rows_affected = analysis.update(&conn)?;
        debug!(eye_analysis_id = ?analysis.eye_analysis_id, rows_affected, "Updated eye analysis");
        Ok(rows_affected > 0)
    }

    fn delete(&self, id: i64) -> DbResult<bool> {
        let rows_affected = execute(
            self.db,
            "DELETE FROM Eye_Analysis WHERE Eye_AnalysisID = ?1",
            [id],
        )?;
        debug!(eye_analysis_id = id, rows_affected, "Deleted eye analysis");
        Ok(rows_affected > 0)
    }

    fn search(&self, term: &str) -> DbResult<Vec<EyeAnalysis>> {
        let Some(pattern) = like_pattern(term, MatchStyle::Substring) else {
            return self.get_all();
        };
        query_list(
            self.db,
            &format!(
                r#"{SELECT_EYE_ANALYSIS}
                WHERE c.Name LIKE ?1 ESCAPE '\'
                   OR e.Iris_Colour LIKE ?1 ESCAPE '\'
                {EYE_ANALYSIS_ORDER}"#
            ),
            [pattern],
            eye_analysis_from_row,
        )
    }

    fn count(&self) -> DbResult<i64> {
        query_count(self.db, "SELECT COUNT(*) FROM Eye_Analysis", [])
    }
}

impl ClientScoped for EyeAnalysisRepository<'_> {
    fn get_by_client_id(&self, client_id: i64) -> DbResult<Vec<EyeAnalysis>> {
        query_list(
            self.db,
            &format!("{SELECT_EYE_ANALYSIS} WHERE e.ClientID = ?1 {EYE_ANALYSIS_ORDER}"),
            [client_id],
            eye_analysis_from_row,
        )
    }
}

// ============================================================================
// Sclera priority catalog
// ============================================================================

const SELECT_SCLERA_PRIORITY: &str = r#"
    SELECT ScleraPriorityTypeID, Priority_Name, Description
    FROM Sclera_Priority_Types
"#;

fn sclera_priority_from_row(row: &Row<'_>) -> rusqlite::Result<ScleraPriorityType> {
    Ok(ScleraPriorityType {
        sclera_priority_type_id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
    })
}

/// Sclera priority tags, ordered by name.
pub struct ScleraPriorityRepository<'a> {
    db: &'a Database,
}

impl Repository for ScleraPriorityRepository<'_> {
    type Entity = ScleraPriorityType;

    fn get_all(&self) -> DbResult<Vec<ScleraPriorityType>> {
        query_list(
            self.db,
            &format!("{SELECT_SCLERA_PRIORITY} ORDER BY Priority_Name COLLATE NOCASE, ScleraPriorityTypeID"),
            [],
            sclera_priority_from_row,
        )
    }

    fn get_by_id(&self, id: i64) -> DbResult<Option<ScleraPriorityType>> {
        query_optional(
            self.db,
            &format!("{SELECT_SCLERA_PRIORITY} WHERE ScleraPriorityTypeID = ?1"),
            [id],
            sclera_priority_from_row,
        )
    }

    fn add(&self, priority: &ScleraPriorityType) -> DbResult<i64> {
        let conn = self.db.connect()?;
        conn.execute(
            "INSERT INTO Sclera_Priority_Types (Priority_Name, Description) VALUES (?1, ?2)",
            params![priority.name, priority.description],
        )?;
        let id = conn.last_insert_rowid();
        debug!(sclera_priority_type_id = id, "Inserted sclera priority");
        Ok(id)
    }

    fn update(&self, priority: &ScleraPriorityType) -> DbResult<bool> {
        let Some(id) = priority.sclera_priority_type_id else {
            return Ok(false);
        };
        let rows_affected = execute(
            self.db,
            r#"
            UPDATE Sclera_Priority_Types SET Priority_Name = ?2, Description = ?3
            WHERE ScleraPriorityTypeID = ?1
            "#,
            params![id, priority.name, priority.description],
        )?;
        debug!(sclera_priority_type_id = id, rows_affected, "Updated sclera priority");
        Ok(rows_affected > 0)
    }

    /// Also unselects the tag from every analysis.
    fn delete(&self, id: i64) -> DbResult<bool> {
        let rows_affected = execute(
            self.db,
            "DELETE FROM Sclera_Priority_Types WHERE ScleraPriorityTypeID = ?1",
            [id],
        )?;
        debug!(sclera_priority_type_id = id, rows_affected, "Deleted sclera priority");
        Ok(rows_affected > 0)
    }

    fn search(&self, term: &str) -> DbResult<Vec<ScleraPriorityType>> {
        let Some(pattern) = like_pattern(term, MatchStyle::Prefix) else {
            return self.get_all();
        };
        query_list(
            self.db,
            &format!(
                r#"{SELECT_SCLERA_PRIORITY}
                WHERE Priority_Name LIKE ?1 ESCAPE '\'
                ORDER BY Priority_Name COLLATE NOCASE, ScleraPriorityTypeID"#
            ),
            [pattern],
            sclera_priority_from_row,
        )
    }

    fn count(&self) -> DbResult<i64> {
        query_count(self.db, "SELECT COUNT(*) FROM Sclera_Priority_Types", [])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Client, EyeSide};

    fn setup_db() -> (Database, i64) {
        let db = Database::open_in_memory().unwrap();
        let client_id = db.clients().add(&Client::new("Jane Doe")).unwrap();
        (db, client_id)
    }

    fn priority_id(db: &Database, name: &str) -> i64 {
        db.sclera_priorities()
            .search(name)
            .unwrap()
            .into_iter()
            .find(|p| p.name == name)
            .and_then(|p| p.sclera_priority_type_id)
            .unwrap()
    }

    #[test]
    fn test_seeded_priorities() {
        let (db, _) = setup_db();
        assert_eq!(db.sclera_priorities().count().unwrap(), 14);
        assert_eq!(db.sclera_priorities().search("l").unwrap().len(), 2);
    }

    #[test]
    fn test_add_with_tags_and_scans() {
        let (db, client_id) = setup_db();
        let candida = priority_id(&db, "Candida");
        let liver = priority_id(&db, "Liver Stress");

        let mut analysis = EyeAnalysis::new(client_id);
        analysis.iris_colour = Some("Blue".into());
        let id = db
            .eye_analyses()
            .add_with_details(
                &analysis,
                &[liver, candida, candida],
                &[EyeScan::new(vec![0xFF, 0xD8], EyeSide::Left)],
            )
            .unwrap();

        let mut selected = vec![candida, liver];
        selected.sort();
        assert_eq!(db.eye_analyses().get_selected_priority_ids(id).unwrap(), selected);

        let names: Vec<String> = db
            .eye_analyses()
            .get_selected_priorities(id)
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Candida", "Liver Stress"]);

        let scans = db.eye_analyses().get_scans(id).unwrap();
        assert_eq!(scans.len(), 1);
        assert_eq!(scans[0].side, Some(EyeSide::Left));
        assert_eq!(scans[0].image, vec![0xFF, 0xD8]);
    }

    #[test]
    fn test_update_replaces_tags() {
        let (db, client_id) = setup_db();
        let candida = priority_id(&db, "Candida");
        let parasites = priority_id(&db, "Parasites");

        let id = db
            .eye_analyses()
            .add_with_details(&EyeAnalysis::new(client_id), &[candida], &[])
            .unwrap();
        let analysis = db.eye_analyses().get_by_id(id).unwrap().unwrap();

        assert!(db
            .eye_analyses()
            .update_with_details(&analysis, &[parasites], &[])
            .unwrap());
        assert_eq!(db.eye_analyses().get_selected_priority_ids(id).unwrap(), vec![parasites]);
    }

    #[test]
    fn test_deleting_priority_unselects_it() {
        let (db, client_id) = setup_db();
        let candida = priority_id(&db, "Candida");
        let id = db
            .eye_analyses()
            .add_with_details(&EyeAnalysis::new(client_id), &[candida], &[])
            .unwrap();

        assert!(db.sclera_priorities().delete(candida).unwrap());
        assert!(db.eye_analyses().get_selected_priority_ids(id).unwrap().is_empty());
    }

    #[test]
    fn test_search_iris_colour() {
        let (db, client_id) = setup_db();
        let mut analysis = EyeAnalysis::new(client_id);
        analysis.iris_colour = Some("Hazel".into());
        db.eye_analyses().add(&analysis).unwrap();

        assert_eq!(db.eye_analyses().search("haz").unwrap().len(), 1);
        assert_eq!(db.eye_analyses().search("jane").unwrap().len(), 1);
        assert!(db.eye_analyses().search("brown").unwrap().is_empty());
    }
}
