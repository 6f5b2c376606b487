//! Column conversions for model enums.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

use crate::models::{EyeSide, Gender};

impl ToSql for Gender {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.code()))
    }
}

impl FromSql for Gender {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let code = value.as_i64()?;
        Gender::from_code(code).ok_or(FromSqlError::OutOfRange(code))
    }
}

impl ToSql for EyeSide {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for EyeSide {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        EyeSide::parse(text)
            .ok_or_else(|| FromSqlError::Other(format!("unknown eye side '{}'", text).into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_gender_column_round_trip() {
        let conn = Connection::open_in_memory().unwrap();
        let back: Gender = conn
            .query_row("SELECT ?1", [Gender::Male], |row| row.get(0))
            .unwrap();
        assert_eq!(back, Gender::Male);

        let raw: i64 = conn
            .query_row("SELECT ?1", [Gender::Female], |row| row.get(0))
            .unwrap();
        assert_eq!(raw, 0);
    }

    #[test]
    fn test_unknown_codes_are_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        let gender: rusqlite::Result<Gender> = conn.query_row("SELECT 5", [], |row| row.get(0));
        assert!(gender.is_err());

        let side: rusqlite::Result<EyeSide> =
            conn.query_row("SELECT 'Middle'", [], |row| row.get(0));
        assert!(side.is_err());
    }
}
