//! Wires report assembly to a document generator.

use std::path::Path;

use chrono::NaiveDate;

use super::{
    ContactColumn, ContactListReport, DistributorCatalogReport, DocumentGenerator,
    ReportAssembler, ReportOptions, ReportResult, SupplementCatalogReport,
};
use crate::db::Database;
use crate::models::{Client, Distributor, Supplement};

/// Produces report files through a [`DocumentGenerator`].
pub struct ReportService<'a, G: DocumentGenerator> {
    db: &'a Database,
    generator: G,
}

impl<'a, G: DocumentGenerator> ReportService<'a, G> {
    pub fn new(db: &'a Database, generator: G) -> Self {
        Self { db, generator }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn generate_health_report(
        &self,
        client_id: i64,
        options: &ReportOptions,
        path: &Path,
    ) -> ReportResult<()> {
        let report = ReportAssembler::new(self.db).health_report(client_id, options)?;
        self.generator.health_report(&report, path)
    }

    pub fn generate_prescription_report(&self, client_id: i64, path: &Path) -> ReportResult<()> {
        let report = ReportAssembler::new(self.db).prescription_report(client_id)?;
        self.generator.prescription_report(&report, path)
    }

    /// `clients` are written as given; filter them first.
    pub fn generate_contact_list(
        &self,
        clients: &[Client],
        columns: &[ContactColumn],
        path: &Path,
    ) -> ReportResult<()> {
        let report = ContactListReport::build(clients, columns)?;
        self.generator.contact_list(&report, path)
    }

    pub fn generate_supplement_catalog(
        &self,
        supplements: &[Supplement],
        path: &Path,
    ) -> ReportResult<()> {
        let report = SupplementCatalogReport::build(supplements);
        self.generator.supplement_catalog(&report, path)
    }

    pub fn generate_distributor_catalog(
        &self,
        distributors: &[Distributor],
        path: &Path,
    ) -> ReportResult<()> {
        let report = DistributorCatalogReport::build(distributors);
        self.generator.distributor_catalog(&report, path)
    }

    /// `Report_<Name>_<yyyymmdd>.<ext>`
    pub fn health_report_file_name(&self, client: &Client, on: NaiveDate) -> String {
        format!(
            "Report_{}_{}.{}",
            file_safe_name(&client.name),
            on.format("%Y%m%d"),
            self.generator.extension()
        )
    }

    /// `Prescription_<Name>_<yyyymmdd>.<ext>`
    pub fn prescription_report_file_name(&self, client: &Client, on: NaiveDate) -> String {
        format!(
            "Prescription_{}_{}.{}",
            file_safe_name(&client.name),
            on.format("%Y%m%d"),
            self.generator.extension()
        )
    }

    pub fn contact_list_file_name(&self, on: NaiveDate) -> String {
        format!("ContactList_{}.{}", on.format("%Y%m%d"), self.generator.extension())
    }

    pub fn supplement_catalog_file_name(&self, on: NaiveDate) -> String {
        format!("Supplements_{}.{}", on.format("%Y%m%d"), self.generator.extension())
    }

    pub fn distributor_catalog_file_name(&self, on: NaiveDate) -> String {
        format!("Distributors_{}.{}", on.format("%Y%m%d"), self.generator.extension())
    }
}

fn file_safe_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            ' ' => '_',
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            other => other,
        })
        .collect()
}
