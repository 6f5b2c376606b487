//! Supplement and distributor catalog operations.

use rusqlite::{params, Row};
use tracing::debug;

use super::repository::{
    execute, like_pattern, query_count, query_list, query_optional, MatchStyle, Repository,
};
use super::{Database, DbResult};
use crate::models::{Distributor, Supplement};

// ============================================================================
// Supplements
// ============================================================================

const SELECT_SUPPLEMENT: &str = r#"
    SELECT s.SupplementID, s.Name, s.Type, s.Description, s.Usage,
           s.DistributorID, d.Name
    FROM Supplements s
    LEFT JOIN Distributor d ON d.DistributorID = s.DistributorID
"#;

fn supplement_from_row(row: &Row<'_>) -> rusqlite::Result<Supplement> {
    Ok(Supplement {
        supplement_id: row.get(0)?,
        name: row.get(1)?,
        kind: row.get(2)?,
        description: row.get(3)?,
        usage: row.get(4)?,
        distributor_id: row.get(5)?,
        distributor_name: row.get(6)?,
    })
}

/// Supplement catalog, ordered by name.
pub struct SupplementRepository<'a> {
    db: &'a Database,
}

impl Database {
    pub fn supplements(&self) -> SupplementRepository<'_> {
        SupplementRepository { db: self }
    }

    pub fn distributors(&self) -> DistributorRepository<'_> {
        DistributorRepository { db: self }
    }
}

impl SupplementRepository<'_> {
    /// Supplements sold by one distributor.
    pub fn get_by_distributor(&self, distributor_id: i64) -> DbResult<Vec<Supplement>> {
        query_list(
            self.db,
            &format!("{SELECT_SUPPLEMENT} WHERE s.DistributorID = ?1 ORDER BY s.Name COLLATE NOCASE"),
            [distributor_id],
            supplement_from_row,
        )
    }
}

impl Repository for SupplementRepository<'_> {
    type Entity = Supplement;

    fn get_all(&self) -> DbResult<Vec<Supplement>> {
        query_list(
            self.db,
            &format!("{SELECT_SUPPLEMENT} ORDER BY s.Name COLLATE NOCASE, s.SupplementID"),
            [],
            supplement_from_row,
        )
    }

    fn get_by_id(&self, id: i64) -> DbResult<Option<Supplement>> {
        query_optional(
            self.db,
            &format!("{SELECT_SUPPLEMENT} WHERE s.SupplementID = ?1"),
            [id],
            supplement_from_row,
        )
    }

    fn add(&self, supplement: &Supplement) -> DbResult<i64> {
        let conn = self.db.connect()?;
        conn.execute(
            r#"
            INSERT INTO Supplements (Name, Type, Description, Usage, DistributorID)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                supplement.name,
                supplement.kind,
                supplement.description,
                supplement.usage,
                supplement.distributor_id,
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!(supplement_id = id, "Inserted supplement");
        Ok(id)
    }

    fn update(&self, supplement: &Supplement) -> DbResult<bool> {
        let Some(id) = supplement.supplement_id else {
            return Ok(false);
        };
        let rows_affected = execute(
            self.db,
            r#"
            UPDATE Supplements SET
                Name = ?2,
                Type = ?3,
                Description = ?4,
                Usage = ?5,
                DistributorID = ?6
            WHERE SupplementID = ?1
            "#,
            params![
                id,
                supplement.name,
                supplement.kind,
                supplement.description,
                supplement.usage,
                supplement.distributor_id,
            ],
        )?;
        debug!(supplement_id = id, rows_affected, "Updated supplement");
        Ok(rows_affected > 0)
    }

    /// Fails with a constraint error while any history or prescription line
    /// still references the supplement.
    fn delete(&self, id: i64) -> DbResult<bool> {
        let rows_affected = execute(
            self.db,
            "DELETE FROM Supplements WHERE SupplementID = ?1",
            [id],
        )?;
        debug!(supplement_id = id, rows_affected, "Deleted supplement");
        Ok(rows_affected > 0)
    }

    fn search(&self, term: &str) -> DbResult<Vec<Supplement>> {
        let Some(pattern) = like_pattern(term, MatchStyle::Prefix) else {
            return self.get_all();
        };
        query_list(
            self.db,
            &format!(
                r#"{SELECT_SUPPLEMENT}
                WHERE s.Name LIKE ?1 ESCAPE '\'
                ORDER BY s.Name COLLATE NOCASE, s.SupplementID"#
            ),
            [pattern],
            supplement_from_row,
        )
    }

    fn count(&self) -> DbResult<i64> {
        query_count(self.db, "SELECT COUNT(*) FROM Supplements", [])
    }
}

// ============================================================================
// Distributors
// ============================================================================

const SELECT_DISTRIBUTOR: &str = r#"
    SELECT DistributorID, Name, Address, Work_Phone, Mobile, Email, Website
    FROM Distributor
"#;

fn distributor_from_row(row: &Row<'_>) -> rusqlite::Result<Distributor> {
    Ok(Distributor {
        distributor_id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        work_phone: row.get(3)?,
        mobile: row.get(4)?,
        email: row.get(5)?,
        website: row.get(6)?,
    })
}

/// Distributors, ordered by name.
pub struct DistributorRepository<'a> {
    db: &'a Database,
}

impl Repository for DistributorRepository<'_> {
    type Entity = Distributor;

    fn get_all(&self) -> DbResult<Vec<Distributor>> {
        query_list(
            self.db,
            &format!("{SELECT_DISTRIBUTOR} ORDER BY Name COLLATE NOCASE, DistributorID"),
            [],
            distributor_from_row,
        )
    }

    fn get_by_id(&self, id: i64) -> DbResult<Option<Distributor>> {
        query_optional(
            self.db,
            &format!("{SELECT_DISTRIBUTOR} WHERE DistributorID = ?1"),
            [id],
            distributor_from_row,
        )
    }

    fn add(&self, distributor: &Distributor) -> DbResult<i64> {
        let conn = self.db.connect()?;
        conn.execute(
            r#"
            INSERT INTO Distributor (Name, Address, Work_Phone, Mobile, Email, Website)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                distributor.name,
                distributor.address,
                distributor.work_phone,
                distributor.mobile,
                distributor.email,
                distributor.website,
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!(distributor_id = id, "Inserted distributor");
        Ok(id)
    }

    fn update(&self, distributor: &Distributor) -> DbResult<bool> {
        let Some(id) = distributor.distributor_id else {
            return Ok(false);
        };
        let rows_affected = execute(
            self.db,
            r#"
            UPDATE Distributor SET
                Name = ?2,
                Address = ?3,
                Work_Phone = ?4,
                Mobile = ?5,
                Email = ?6,
                Website = ?7
            WHERE DistributorID = ?1
            "#,
            params![
                id,
                distributor.name,
                distributor.address,
                distributor.work_phone,
                distributor.mobile,
                distributor.email,
                distributor.website,
            ],
        )?;
        debug!(distributor_id = id, rows_affected, "Updated distributor");
        Ok(rows_affected > 0)
    }

    /// Supplements of the distributor are kept with no distributor.
    fn delete(&self, id: i64) -> DbResult<bool> {
        let rows_affected = execute(
            self.db,
            "DELETE FROM Distributor WHERE DistributorID = ?1",
            [id],
        )?;
        debug!(distributor_id = id, rows_affected, "Deleted distributor");
        Ok(rows_affected > 0)
    }

    fn search(&self, term: &str) -> DbResult<Vec<Distributor>> {
        let Some(pattern) = like_pattern(term, MatchStyle::Substring) else {
            return self.get_all();
        };
        query_list(
            self.db,
            &format!(
                r#"{SELECT_DISTRIBUTOR}
                WHERE Name LIKE ?1 ESCAPE '\'
                   OR Email LIKE ?1 ESCAPE '\'
                   OR Work_Phone LIKE ?1 ESCAPE '\'
                   OR Mobile LIKE ?1 ESCAPE '\'
                   OR Website LIKE ?1 ESCAPE '\'
                ORDER BY Name COLLATE NOCASE, DistributorID"#
            ),
            [pattern],
            distributor_from_row,
        )
    }

    fn count(&self) -> DbResult<i64> {
        query_count(self.db, "SELECT COUNT(*) FROM Distributor", [])
    }
}
