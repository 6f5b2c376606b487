//! Uniform repository contract and the query helpers every repository
//! shares.

use rusqlite::{OptionalExtension, Params, Row};

use super::{Database, DbResult};

/// CRUD + search over one entity family.
///
/// Absence is never an error here: `get_by_id` yields `None`, and
/// `update`/`delete` yield `false` when the id does not exist.
pub trait Repository {
    type Entity;

    fn get_all(&self) -> DbResult<Vec<Self::Entity>>;

    fn get_by_id(&self, id: i64) -> DbResult<Option<Self::Entity>>;

    /// Insert and return the generated id.
    fn add(&self, entity: &Self::Entity) -> DbResult<i64>;

    fn update(&self, entity: &Self::Entity) -> DbResult<bool>;

    fn delete(&self, id: i64) -> DbResult<bool>;

    /// Case-insensitive match. A blank term returns [`Repository::get_all`].
    fn search(&self, term: &str) -> DbResult<Vec<Self::Entity>>;

    fn count(&self) -> DbResult<i64>;
}

/// Repositories whose rows belong to a client.
pub trait ClientScoped: Repository {
    /// Same ordering as `get_all`.
    fn get_by_client_id(&self, client_id: i64) -> DbResult<Vec<Self::Entity>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStyle {
    /// Field starts with the term
    Prefix,
    /// Field contains the term
    Substring,
}

/// Build a `LIKE ... ESCAPE '\'` pattern, or `None` for a blank term.
pub fn like_pattern(term: &str, style: MatchStyle) -> Option<String> {
    let term = term.trim();
    if term.is_empty() {
        return None;
    }

    let mut escaped = String::with_capacity(term.len() + 2);
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    Some(match style {
        MatchStyle::Prefix => format!("{}%", escaped),
        MatchStyle::Substring => format!("%{}%", escaped),
    })
}

pub(crate) type RowMapper<T> = fn(&Row<'_>) -> rusqlite::Result<T>;

pub(crate) fn query_list<T, P: Params>(
    db: &Database,
    sql: &str,
    params: P,
    map: RowMapper<T>,
) -> DbResult<Vec<T>> {
    let conn = db.connect()?;
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, map)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

pub(crate) fn query_optional<T, P: Params>(
    db: &Database,
    sql: &str,
    params: P,
    map: RowMapper<T>,
) -> DbResult<Option<T>> {
    let conn = db.connect()?;
    conn.query_row(sql, params, map)
        .optional()
        .map_err(Into::into)
}

pub(crate) fn query_count<P: Params>(db: &Database, sql: &str, params: P) -> DbResult<i64> {
    let conn = db.connect()?;
    Ok(conn.query_row(sql, params, |row| row.get(0))?)
}

pub(crate) fn execute<P: Params>(db: &Database, sql: &str, params: P) -> DbResult<usize> {
    let conn = db.connect()?;
    Ok(conn.execute(sql, params)?)
}
