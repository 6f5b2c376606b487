//! Domain models for the wellness-records system.
//!
//! Every persisted entity carries an `Option<i64>` surrogate id that stays
//! `None` until the first successful insert. Values derived from stored
//! columns (BMI, age, display labels) are computed on read and never stored.

mod catalog;
mod client;
mod document;
mod eye;
mod history;
mod prescription;
mod visit;

pub use catalog::*;
pub use client::*;
pub use document::*;
pub use eye::*;
pub use history::*;
pub use prescription::*;
pub use visit::*;

/// Storage format for calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Storage format for visit timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time in [`TIMESTAMP_FORMAT`].
pub fn now_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Today's local date in [`DATE_FORMAT`].
pub fn today() -> String {
    chrono::Local::now().format(DATE_FORMAT).to_string()
}

/// Parse the date part of a stored date or timestamp.
pub fn parse_date(value: &str) -> Option<chrono::NaiveDate> {
    let date_part = value.get(..10).unwrap_or(value);
    chrono::NaiveDate::parse_from_str(date_part, DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_accepts_timestamps() {
        let date = parse_date("2024-03-09 14:30:00").unwrap();
        assert_eq!(date.to_string(), "2024-03-09");
        assert_eq!(parse_date("2024-03-09").unwrap(), date);
        assert!(parse_date("not a date").is_none());
    }

    #[test]
    fn test_now_timestamp_round_trips_through_parse() {
        let now = now_timestamp();
        assert_eq!(now.len(), 19);
        assert!(parse_date(&now).is_some());
    }
}
