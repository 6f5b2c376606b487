//! Persistence gateway for wellness-records.
//!
//! [`Database`] does not hold a live connection for callers. Every operation
//! opens its own connection (foreign keys on, busy timeout applied), does one
//! round trip or one transaction, and drops it.

mod assessments;
mod catalog;
mod clients;
mod eye_analysis;
pub mod master_detail;
mod medical_history;
mod prescriptions;
pub mod repository;
mod scanned_notes;
mod schema;
mod types;

pub use assessments::*;
pub use catalog::*;
pub use clients::*;
pub use eye_analysis::*;
pub use master_detail::{DetailRow, MasterRow};
pub use medical_history::*;
pub use prescriptions::*;
pub use repository::{ClientScoped, MatchStyle, Repository};
pub use scanned_notes::*;
pub use schema::*;

use rusqlite::{Connection, ErrorCode, OpenFlags, Transaction};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::StoreConfig;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    /// The store could not be opened: missing, locked or not a database.
    #[error("Connection error: {0}")]
    Connection(#[source] rusqlite::Error),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// A master-detail save failed and was rolled back.
    #[error("Transaction '{operation}' failed: {source}")]
    Transaction {
        operation: &'static str,
        #[source]
        source: Box<DbError>,
    },

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Migration {version} failed: {source}")]
    Migration {
        version: i64,
        #[source]
        source: rusqlite::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[source] rusqlite::Error),
}

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(code, message)
                if code.code == ErrorCode::ConstraintViolation =>
            {
                DbError::Constraint(message.unwrap_or_else(|| code.to_string()))
            }
            other => DbError::Sqlite(other),
        }
    }
}

impl DbError {
    /// The innermost error, looking through transaction wrappers.
    pub fn root_cause(&self) -> &DbError {
        match self {
            DbError::Transaction { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub fn is_constraint(&self) -> bool {
        matches!(self.root_cause(), DbError::Constraint(_))
    }
}

pub type DbResult<T> = Result<T, DbError>;

/// Store path that selects an in-memory database.
pub const MEMORY_PATH: &str = ":memory:";

/// Handle on the store. Cheap to share by reference; holds no open
/// connection except the anchor that keeps an in-memory store alive.
pub struct Database {
    config: StoreConfig,
    memory_uri: Option<String>,
    _anchor: Option<Connection>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("config", &self.config)
            .field("memory_uri", &self.memory_uri)
            .finish()
    }
}

impl Database {
    /// Open the store described by `config`, creating the file and running
    /// pending migrations.
    ///
    /// A path of `:memory:` opens an isolated in-memory store, as
    /// [`Database::open_in_memory`] does.
    pub fn open(config: StoreConfig) -> DbResult<Self> {
        if config.db_path.as_os_str() == MEMORY_PATH {
            return Self::open_in_memory().map(|db| db.with_busy_timeout(config.busy_timeout));
        }

        if let Some(parent) = config.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut conn = Connection::open(&config.db_path).map_err(DbError::Connection)?;
        conn.busy_timeout(config.busy_timeout)
            .map_err(DbError::Connection)?;
        migrate(&mut conn)?;

        info!(path = %config.db_path.display(), "Opened store");
        Ok(Self {
            config,
            memory_uri: None,
            _anchor: None,
        })
    }

    /// Create an isolated in-memory store (for testing).
    ///
    /// Each call gets a uniquely named shared-cache database, so per-call
    /// connections see the same data while separate stores never do.
    pub fn open_in_memory() -> DbResult<Self> {
        let uri = format!(
            "file:wellness-{}?mode=memory&cache=shared",
            uuid::Uuid::new_v4().simple()
        );
        let mut anchor = Connection::open_with_flags(&uri, memory_flags())
            .map_err(DbError::Connection)?;
        migrate(&mut anchor)?;

        Ok(Self {
            config: StoreConfig::new(MEMORY_PATH),
            memory_uri: Some(uri),
            _anchor: Some(anchor),
        })
    }

    fn with_busy_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config.busy_timeout = timeout;
        self
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Open a fresh connection for one unit of work.
    ///
    /// Never creates the file: a store deleted after `open` is reported as
    /// [`DbError::Connection`], as is a file that is not a database.
    pub fn connect(&self) -> DbResult<Connection> {
        let conn = match &self.memory_uri {
            Some(uri) => Connection::open_with_flags(uri, memory_flags()),
            None => Connection::open_with_flags(
                &self.config.db_path,
                OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            ),
        }
        .map_err(DbError::Connection)?;

        conn.busy_timeout(self.config.busy_timeout)
            .map_err(DbError::Connection)?;
        conn.pragma_update(None, "foreign_keys", true)
            .map_err(DbError::Connection)?;
        // Touch the header so a corrupt file fails here rather than mid-query
        conn.query_row("SELECT count(*) FROM sqlite_master", [], |row| {
            row.get::<_, i64>(0)
        })
        .map_err(DbError::Connection)?;

        Ok(conn)
    }

    /// Run `work` inside one transaction on a fresh connection.
    ///
    /// Commits when `work` returns `Ok`. On any error the transaction is
    /// rolled back and the cause is wrapped in [`DbError::Transaction`].
    pub fn in_transaction<T, F>(&self, operation: &'static str, work: F) -> DbResult<T>
    where
        F: FnOnce(&Transaction<'_>) -> DbResult<T>,
    {
        let mut conn = self.connect()?;
        let wrap = |source: DbError| DbError::Transaction {
            operation,
            source: Box::new(source),
        };

        let tx = conn.transaction().map_err(|e| wrap(e.into()))?;
        match work(&tx) {
            Ok(value) => {
                tx.commit().map_err(|e| wrap(e.into()))?;
                debug!(operation, "Committed transaction");
                Ok(value)
            }
            Err(err) => {
                warn!(operation, error = %err, "Rolling back transaction");
                if let Err(rollback_err) = tx.rollback() {
                    error!(operation, error = %rollback_err, "Rollback failed");
                }
                Err(wrap(err))
            }
        }
    }

    /// Schema version recorded in the store.
    pub fn schema_version(&self) -> DbResult<i64> {
        let conn = self.connect()?;
        Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
    }
}

fn memory_flags() -> OpenFlags {
    OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_NO_MUTEX
}

/// Apply every migration newer than the store's `user_version`.
///
/// The initial schema is mandatory. A later additive step that fails is
/// logged and left pending; the store stays usable at the last good version.
fn migrate(conn: &mut Connection) -> DbResult<()> {
    let current: i64 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(DbError::Connection)?;

    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        match apply_migration(conn, migration) {
            Ok(()) => {
                info!(
                    version = migration.version,
                    description = migration.description,
                    "Applied migration"
                );
            }
            Err(source) if migration.version == 1 => {
                return Err(DbError::Migration {
                    version: migration.version,
                    source,
                });
            }
            Err(err) => {
                warn!(
                    version = migration.version,
                    description = migration.description,
                    error = %err,
                    "Migration failed, continuing at previous schema version"
                );
                break;
            }
        }
    }
    Ok(())
}

fn apply_migration(conn: &mut Connection, migration: &Migration) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(migration.sql)?;
    tx.pragma_update(None, "user_version", migration.version)?;
    tx.commit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn test_schema_initialized() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.connect().unwrap();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        for table in [
            "Client",
            "Anthropometrics",
            "Diet",
            "Treatment",
            "Body_Systems_Overview",
            "Med_Hx",
            "Med_Hx_Supplements",
            "Prescription",
            "Prescription_Supplements",
            "Eye_Analysis",
            "Eye_Analysis_Sclera_Priorities",
            "Eye_Scan",
            "Sclera_Priority_Types",
            "Supplements",
            "Distributor",
            "Scanned_Notes",
        ] {
            assert!(tables.contains(&table.to_string()), "missing table {table}");
        }
        assert_eq!(db.schema_version().unwrap(), latest_version());
    }

    #[test]
    fn test_in_memory_stores_are_isolated() {
        let a = Database::open_in_memory().unwrap();
        let b = Database::open_in_memory().unwrap();

        a.connect()
            .unwrap()
            .execute("INSERT INTO Client (Name) VALUES ('Only in A')", [])
            .unwrap();

        let count = |db: &Database| -> i64 {
            db.connect()
                .unwrap()
                .query_row("SELECT COUNT(*) FROM Client", [], |row| row.get(0))
                .unwrap()
        };
        assert_eq!(count(&a), 1);
        assert_eq!(count(&b), 0);
    }

    #[test]
    fn test_foreign_keys_enforced_per_connection() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.connect().unwrap();
        let err: DbError = conn
            .execute("INSERT INTO Diet (ClientID) VALUES (999)", [])
            .unwrap_err()
            .into();
        assert!(matches!(err, DbError::Constraint(_)));
    }

    #[test]
    fn test_in_transaction_rolls_back_and_wraps() {
        let db = Database::open_in_memory().unwrap();

        let result: DbResult<()> = db.in_transaction("test op", |tx| {
            tx.execute("INSERT INTO Client (Name) VALUES ('Ghost')", [])?;
            Err(DbError::NotFound("forced".into()))
        });

        let err = result.unwrap_err();
        assert!(matches!(err, DbError::Transaction { operation: "test op", .. }));
        assert!(matches!(err.root_cause(), DbError::NotFound(_)));

        let count: i64 = db
            .connect()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM Client", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_open_memory_path_gives_usable_store() {
        let db = Database::open(StoreConfig::new(MEMORY_PATH)).unwrap();
        db.connect()
            .unwrap()
            .execute("INSERT INTO Client (Name) VALUES ('Jane Doe')", [])
            .unwrap();

        let count: i64 = db
            .connect()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM Client", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(db.config().db_path.as_os_str(), MEMORY_PATH);
    }

    #[test]
    fn test_unversioned_store_keeps_its_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::in_dir(dir.path());

        let db = Database::open(config.clone()).unwrap();
        // Stores created before versioning report user_version 0
        db.connect()
            .unwrap()
            .pragma_update(None, "user_version", 0)
            .unwrap();
        drop(db);

        let db = Database::open(config).unwrap();
        let count: i64 = db
            .connect()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM Sclera_Priority_Types", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, DEFAULT_SCLERA_PRIORITIES.len() as i64);
    }

    #[test]
    fn test_reopen_does_not_reseed() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::in_dir(dir.path());

        Database::open(config.clone()).unwrap();
        let db = Database::open(config).unwrap();

        let count: i64 = db
            .connect()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM Sclera_Priority_Types", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, DEFAULT_SCLERA_PRIORITIES.len() as i64);
    }
}
