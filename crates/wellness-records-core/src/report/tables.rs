//! Tabular reports: the contact list and the two catalogs.
//!
//! The caller filters the rows and picks the columns; these types only lay
//! the chosen data out as a table.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{ReportError, ReportResult};
use crate::models::{now_timestamp, Client, Distributor, Gender, Supplement};

/// Anything a spreadsheet-style generator can write row by row.
pub trait Tabular {
    fn title(&self) -> &'static str;

    fn headers(&self) -> Vec<String>;

    fn rows(&self) -> Vec<Vec<String>>;
}

/// Selectable contact list columns.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, uniffi::Enum)]
pub enum ContactColumn {
    Name,
    Mobile,
    Email,
    Address,
    Dob,
    Gender,
    Occupation,
    Referral,
}

impl ContactColumn {
    pub const ALL: [ContactColumn; 8] = [
        ContactColumn::Name,
        ContactColumn::Mobile,
        ContactColumn::Email,
        ContactColumn::Address,
        ContactColumn::Dob,
        ContactColumn::Gender,
        ContactColumn::Occupation,
        ContactColumn::Referral,
    ];

    pub fn header(self) -> &'static str {
        match self {
            ContactColumn::Name => "Name",
            ContactColumn::Mobile => "Mobile",
            ContactColumn::Email => "Email",
            ContactColumn::Address => "Address",
            ContactColumn::Dob => "DOB",
            ContactColumn::Gender => "Gender",
            ContactColumn::Occupation => "Occupation",
            ContactColumn::Referral => "Ref",
        }
    }

    pub fn value(self, client: &Client) -> String {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        match self {
            ContactColumn::Name => client.name.clone(),
            ContactColumn::Mobile => text(&client.mobile),
            ContactColumn::Email => text(&client.email),
            ContactColumn::Address => text(&client.address),
            ContactColumn::Dob => text(&client.dob),
            ContactColumn::Gender => client.gender_label().to_string(),
            ContactColumn::Occupation => text(&client.occupation),
            ContactColumn::Referral => text(&client.referral),
        }
    }
}

/// Gender and age bounds for picking contact list rows.
///
/// With an age bound set, clients without a date of birth are excluded.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, uniffi::Record)]
pub struct ContactFilter {
    pub gender: Option<Gender>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
}

impl ContactFilter {
    pub fn matches_on(&self, client: &Client, today: NaiveDate) -> bool {
        if let Some(gender) = self.gender {
            if client.gender != Some(gender) {
                return false;
            }
        }
        if self.min_age.is_none() && self.max_age.is_none() {
            return true;
        }
        let Some(age) = client.age_on(today) else {
            return false;
        };
        self.min_age.map_or(true, |min| age >= min) && self.max_age.map_or(true, |max| age <= max)
    }

    /// Clients matching the filter as of today, in input order.
    pub fn apply(&self, clients: &[Client]) -> Vec<Client> {
        let today = chrono::Local::now().date_naive();
        clients
            .iter()
            .filter(|client| self.matches_on(client, today))
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ContactListReport {
    pub generated_at: String,
    pub columns: Vec<ContactColumn>,
    pub rows: Vec<Vec<String>>,
}

impl ContactListReport {
    /// Lay out `clients` with the chosen columns, in the given order.
    pub fn build(clients: &[Client], columns: &[ContactColumn]) -> ReportResult<Self> {
        if columns.is_empty() {
            return Err(ReportError::NoColumns);
        }
        let rows = clients
            .iter()
            .map(|client| columns.iter().map(|column| column.value(client)).collect())
            .collect();

        Ok(Self {
            generated_at: now_timestamp(),
            columns: columns.to_vec(),
            rows,
        })
    }
}

impl Tabular for ContactListReport {
    fn title(&self) -> &'static str {
        "Contact List"
    }

    fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.header().to_string()).collect()
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.rows.clone()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SupplementCatalogReport {
    pub generated_at: String,
    pub supplements: Vec<Supplement>,
}

impl SupplementCatalogReport {
    pub fn build(supplements: &[Supplement]) -> Self {
        Self {
            generated_at: now_timestamp(),
            supplements: supplements.to_vec(),
        }
    }
}

impl Tabular for SupplementCatalogReport {
    fn title(&self) -> &'static str {
        "Supplements Inventory"
    }

    fn headers(&self) -> Vec<String> {
        ["Name", "Type", "Distributor", "Description", "Usage"]
            .map(String::from)
            .to_vec()
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.supplements
            .iter()
            .map(|s| {
                vec![
                    s.name.clone(),
                    s.kind.clone().unwrap_or_default(),
                    s.distributor_name.clone().unwrap_or_default(),
                    s.description.clone().unwrap_or_default(),
                    s.usage.clone().unwrap_or_default(),
                ]
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DistributorCatalogReport {
    pub generated_at: String,
    pub distributors: Vec<Distributor>,
}

impl DistributorCatalogReport {
    pub fn build(distributors: &[Distributor]) -> Self {
        Self {
            generated_at: now_timestamp(),
            distributors: distributors.to_vec(),
        }
    }
}

impl Tabular for DistributorCatalogReport {
    fn title(&self) -> &'static str {
        "Distributors"
    }

    fn headers(&self) -> Vec<String> {
        ["Name", "Address", "Work Phone", "Mobile", "Email", "Website"]
            .map(String::from)
            .to_vec()
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.distributors
            .iter()
            .map(|d| {
                vec![
                    d.name.clone(),
                    d.address.clone().unwrap_or_default(),
                    d.work_phone.clone().unwrap_or_default(),
                    d.mobile.clone().unwrap_or_default(),
                    d.email.clone().unwrap_or_default(),
                    d.website.clone().unwrap_or_default(),
                ]
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(name: &str, dob: Option<&str>, gender: Option<Gender>) -> Client {
        let mut client = Client::new(name);
        client.dob = dob.map(String::from);
        client.gender = gender;
        client.mobile = Some("0400 000 000".into());
        client
    }

    #[test]
    fn test_build_rejects_no_columns() {
        let result = ContactListReport::build(&[client("A", None, None)], &[]);
        assert!(matches!(result, Err(ReportError::NoColumns)));
    }

    #[test]
    fn test_build_uses_column_order() {
        let clients = [client("Jane Doe", None, Some(Gender::Female))];
        let report =
            ContactListReport::build(&clients, &[ContactColumn::Gender, ContactColumn::Name])
                .unwrap();

        assert_eq!(report.headers(), vec!["Gender", "Name"]);
        assert_eq!(report.rows, vec![vec!["Female".to_string(), "Jane Doe".to_string()]]);
    }

    #[test]
    fn test_filter_by_gender_and_age() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let filter = ContactFilter {
            gender: Some(Gender::Female),
            min_age: Some(30),
            max_age: Some(40),
        };

        assert!(filter.matches_on(&client("In", Some("1990-01-01"), Some(Gender::Female)), today));
        assert!(!filter.matches_on(&client("Young", Some("2000-01-01"), Some(Gender::Female)), today));
        assert!(!filter.matches_on(&client("Male", Some("1990-01-01"), Some(Gender::Male)), today));
        assert!(!filter.matches_on(&client("No dob", None, Some(Gender::Female)), today));
    }

    #[test]
    fn test_empty_filter_keeps_everyone() {
        let clients = vec![client("A", None, None), client("B", Some("1950-02-02"), None)];
        assert_eq!(ContactFilter::default().apply(&clients).len(), 2);
    }

    #[test]
    fn test_catalog_rows() {
        let mut supplement = Supplement::new("Vitamin C");
        supplement.distributor_name = Some("Herbal Supply Co".into());
        let report = SupplementCatalogReport::build(&[supplement]);

        assert_eq!(report.headers().len(), report.rows()[0].len());
        assert_eq!(report.rows()[0][2], "Herbal Supply Co");
    }
}
