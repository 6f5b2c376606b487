//! Transactional save of a master row together with its child rows.
//!
//! The parent is always written first so children can reference its id.
//! Children are then either replaced wholesale ([`replace_details`]) or
//! appended when they have no id yet ([`append_details`]). Both run on the
//! transaction handed out by [`Database::in_transaction`], so a failure at
//! any step leaves storage exactly as it was.

use rusqlite::Connection;
use tracing::{debug, info};

use super::{Database, DbResult};

/// A parent row that owns child rows.
pub trait MasterRow {
    /// Table name, for logs.
    const TABLE: &'static str;

    fn row_id(&self) -> Option<i64>;

    /// Insert the row and return its generated id.
    fn insert(&self, conn: &Connection) -> rusqlite::Result<i64>;

    /// Update the row in place. Returns rows affected.
    fn update(&self, conn: &Connection) -> rusqlite::Result<usize>;
}

/// A child row stored under a parent id.
pub trait DetailRow {
    /// Deletes every child of the parent bound to `?1`.
    const DELETE_FOR_PARENT: &'static str;

    fn row_id(&self) -> Option<i64>;

    /// Insert the row under `parent_id`, ignoring any parent id it carries.
    fn insert_under(&self, conn: &Connection, parent_id: i64) -> rusqlite::Result<i64>;
}

/// Delete all children of `parent_id` and insert `details` in order.
pub fn replace_details<D: DetailRow>(
    conn: &Connection,
    parent_id: i64,
    details: &[D],
) -> DbResult<usize> {
    let removed = conn.execute(D::DELETE_FOR_PARENT, [parent_id])?;
    for detail in details {
        detail.insert_under(conn, parent_id)?;
    }
    debug!(parent_id, removed, inserted = details.len(), "Replaced detail rows");
    Ok(details.len())
}

/// Insert only the children that have not been persisted yet.
pub fn append_details<D: DetailRow>(
    conn: &Connection,
    parent_id: i64,
    details: &[D],
) -> DbResult<usize> {
    let mut inserted = 0;
    for detail in details.iter().filter(|d| d.row_id().is_none()) {
        detail.insert_under(conn, parent_id)?;
        inserted += 1;
    }
    debug!(parent_id, inserted, "Appended detail rows");
    Ok(inserted)
}

impl Database {
    /// Insert `parent`, then run `write_details` with the new id, atomically.
    pub fn add_with_details<M, F>(
        &self,
        operation: &'static str,
        parent: &M,
        write_details: F,
    ) -> DbResult<i64>
    where
        M: MasterRow,
        F: FnOnce(&Connection, i64) -> DbResult<()>,
    {
        let parent_id = self.in_transaction(operation, |tx| {
            let parent_id = parent.insert(tx)?;
            write_details(tx, parent_id)?;
            Ok(parent_id)
        })?;

        info!(table = M::TABLE, parent_id, "Added record with details");
        Ok(parent_id)
    }

    /// Update `parent`, then run `write_details` with its id, atomically.
    ///
    /// Returns `Ok(false)` without touching any child when the parent has no
    /// id or no longer exists.
    pub fn update_with_details<M, F>(
        &self,
        operation: &'static str,
        parent: &M,
        write_details: F,
    ) -> DbResult<bool>
    where
        M: MasterRow,
        F: FnOnce(&Connection, i64) -> DbResult<()>,
    {
        let Some(parent_id) = parent.row_id() else {
            return Ok(false);
        };

        let updated = self.in_transaction(operation, |tx| {
            if parent.update(tx)? == 0 {
                return Ok(false);
            }
            write_details(tx, parent_id)?;
            Ok(true)
        })?;

        if updated {
            info!(table = M::TABLE, parent_id, "Updated record with details");
        } else {
            debug!(table = M::TABLE, parent_id, "Update skipped, record not found");
        }
        Ok(updated)
    }
}
