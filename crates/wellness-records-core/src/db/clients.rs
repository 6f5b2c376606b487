//! Client database operations.

use rusqlite::{params, Row};
use tracing::debug;

use super::repository::{
    execute, like_pattern, query_count, query_list, query_optional, MatchStyle, Repository,
};
use super::{Database, DbResult};
use crate::models::Client;

const SELECT_CLIENT: &str = r#"
    SELECT ClientID, Name, Address, DOB, Mobile, Email, Occupation,
           Date_First_Consultation, Date_Last_Consultation, Marital_Status,
           Children, Ref, Alt_Contact, Gender
    FROM Client
"#;

fn client_from_row(row: &Row<'_>) -> rusqlite::Result<Client> {
    Ok(Client {
        client_id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        dob: row.get(3)?,
        mobile: row.get(4)?,
        email: row.get(5)?,
        occupation: row.get(6)?,
        date_first_consultation: row.get(7)?,
        date_last_consultation: row.get(8)?,
        marital_status: row.get(9)?,
        children: row.get(10)?,
        referral: row.get(11)?,
        alt_contact: row.get(12)?,
        gender: row.get(13)?,
    })
}

/// Clients, ordered by name.
pub struct ClientRepository<'a> {
    db: &'a Database,
}

impl Database {
    pub fn clients(&self) -> ClientRepository<'_> {
        ClientRepository { db: self }
    }
}

impl Repository for ClientRepository<'_> {
    type Entity = Client;

    fn get_all(&self) -> DbResult<Vec<Client>> {
        query_list(
            self.db,
            &format!("{SELECT_CLIENT} ORDER BY Name COLLATE NOCASE, ClientID"),
            [],
            client_from_row,
        )
    }

    fn get_by_id(&self, id: i64) -> DbResult<Option<Client>> {
        query_optional(
            self.db,
            &format!("{SELECT_CLIENT} WHERE ClientID = ?1"),
            [id],
            client_from_row,
        )
    }

    fn add(&self, client: &Client) -> DbResult<i64> {
        let conn = self.db.connect()?;
        conn.execute(
            r#"
            INSERT INTO Client (
                Name, Address, DOB, Mobile, Email, Occupation,
                Date_First_Consultation, Date_Last_Consultation,
                Marital_Status, Children, Ref, Alt_Contact, Gender
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
            params![
                client.name,
                client.address,
                client.dob,
                client.mobile,
                client.email,
                client.occupation,
                client.date_first_consultation,
                client.date_last_consultation,
                client.marital_status,
                client.children,
                client.referral,
                client.alt_contact,
                client.gender,
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!(client_id = id, "Inserted client");
        Ok(id)
    }

    fn update(&self, client: &Client) -> DbResult<bool> {
        let Some(id) = client.client_id else {
            return Ok(false);
        };
        let rows_affected = execute(
            self.db,
            r#"
            UPDATE Client SET
                Name = ?2,
                Address = ?3,
                DOB = ?4,
                Mobile = ?5,
                Email = ?6,
                Occupation = ?7,
                Date_First_Consultation = ?8,
                Date_Last_Consultation = ?9,
                Marital_Status = ?10,
                Children = ?11,
                Ref = ?12,
                Alt_Contact = ?13,
                Gender = ?14
            WHERE ClientID = ?1
            "#,
            params![
                id,
                client.name,
                client.address,
                client.dob,
                client.mobile,
                client.email,
                client.occupation,
                client.date_first_consultation,
                client.date_last_consultation,
                client.marital_status,
                client.children,
                client.referral,
                client.alt_contact,
                client.gender,
            ],
        )?;
        debug!(client_id = id, rows_affected, "Updated client");
        Ok(rows_affected > 0)
    }

    /// Dependent records go with the client through `ON DELETE CASCADE`.
    fn delete(&self, id: i64) -> DbResult<bool> {
        let rows_affected = execute(self.db, "DELETE FROM Client WHERE ClientID = ?1", [id])?;
        debug!(client_id = id, rows_affected, "Deleted client");
        Ok(rows_affected > 0)
    }

    fn search(&self, term: &str) -> DbResult<Vec<Client>> {
        let Some(pattern) = like_pattern(term, MatchStyle::Substring) else {
            return self.get_all();
        };
        query_list(
            self.db,
            &format!(
                r#"{SELECT_CLIENT}
                WHERE Name LIKE ?1 ESCAPE '\'
                   OR Email LIKE ?1 ESCAPE '\'
                   OR Mobile LIKE ?1 ESCAPE '\'
                ORDER BY Name COLLATE NOCASE, ClientID"#
            ),
            [pattern],
            client_from_row,
        )
    }

    fn count(&self) -> DbResult<i64> {
        query_count(self.db, "SELECT COUNT(*) FROM Client", [])
    }
}
