//! Client (root) models.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::parse_date;

/// Client gender, stored as a nullable integer column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, uniffi::Enum)]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    /// Integer code used by the `Client.Gender` column.
    pub fn code(self) -> i64 {
        match self {
            Gender::Female => 0,
            Gender::Male => 1,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Gender::Female),
            1 => Some(Gender::Male),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Gender::Female => "Female",
            Gender::Male => "Male",
        }
    }
}

/// A client of the practice. Root of every visit-scoped record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, uniffi::Record)]
pub struct Client {
    /// Surrogate id - `None` until first insert
    pub client_id: Option<i64>,
    /// Full name (required)
    pub name: String,
    pub address: Option<String>,
    /// Date of birth, `YYYY-MM-DD`
    pub dob: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub occupation: Option<String>,
    pub date_first_consultation: Option<String>,
    pub date_last_consultation: Option<String>,
    pub marital_status: Option<String>,
    pub children: Option<i64>,
    /// Who referred the client
    pub referral: Option<String>,
    pub alt_contact: Option<String>,
    pub gender: Option<Gender>,
}

impl Client {
    /// Create a new, unsaved client.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            client_id: None,
            name: name.into(),
            address: None,
            dob: None,
            mobile: None,
            email: None,
            occupation: None,
            date_first_consultation: None,
            date_last_consultation: None,
            marital_status: None,
            children: None,
            referral: None,
            alt_contact: None,
            gender: None,
        }
    }

    /// Name combined with the mobile number, for pickers.
    pub fn display_name(&self) -> String {
        format!(
            "{} ({})",
            self.name,
            self.mobile.as_deref().unwrap_or("No phone")
        )
    }

    /// Whole years between the stored date of birth and `on`.
    pub fn age_on(&self, on: NaiveDate) -> Option<i32> {
        let dob = parse_date(self.dob.as_deref()?)?;
        let mut age = on.year() - dob.year();
        if (on.month(), on.day()) < (dob.month(), dob.day()) {
            age -= 1;
        }
        Some(age)
    }

    /// Age as of today.
    pub fn age(&self) -> Option<i32> {
        self.age_on(chrono::Local::now().date_naive())
    }

    pub fn gender_label(&self) -> &'static str {
        self.gender.map(Gender::label).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_client_is_unsaved() {
        let client = Client::new("Jane Doe");
        assert_eq!(client.name, "Jane Doe");
        assert!(client.client_id.is_none());
        assert!(client.gender.is_none());
    }

    #[test]
    fn test_display_name() {
        let mut client = Client::new("Jane Doe");
        assert_eq!(client.display_name(), "Jane Doe (No phone)");

        client.mobile = Some("0412 345 678".into());
        assert_eq!(client.display_name(), "Jane Doe (0412 345 678)");
    }

    #[test]
    fn test_age_respects_birthday() {
        let mut client = Client::new("Jane Doe");
        client.dob = Some("1990-06-15".into());

        let before = NaiveDate::from_ymd_opt(2024, 6, 14).unwrap();
        let on = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(client.age_on(before), Some(33));
        assert_eq!(client.age_on(on), Some(34));
    }

    #[test]
    fn test_age_without_dob() {
        let client = Client::new("Jane Doe");
        assert_eq!(client.age(), None);
    }

    #[test]
    fn test_gender_codes() {
        assert_eq!(Gender::from_code(Gender::Male.code()), Some(Gender::Male));
        assert_eq!(Gender::from_code(Gender::Female.code()), Some(Gender::Female));
        assert_eq!(Gender::from_code(7), None);
    }
}
