//! Document generators: the collaborator that turns assembled report data
//! into a file.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use super::{
    ContactListReport, DistributorCatalogReport, HealthReport, PrescriptionReport, ReportError,
    ReportResult, SupplementCatalogReport, Tabular,
};

/// Formats already-assembled report data and writes it to `path`.
///
/// Implementations do layout only. A PDF or XLSX engine plugs in here.
pub trait DocumentGenerator {
    /// Short name, for logs and errors.
    fn name(&self) -> &'static str;

    /// File extension of the produced documents, without the dot.
    fn extension(&self) -> &'static str;

    fn health_report(&self, report: &HealthReport, path: &Path) -> ReportResult<()>;

    fn prescription_report(&self, report: &PrescriptionReport, path: &Path) -> ReportResult<()>;

    fn contact_list(&self, report: &ContactListReport, path: &Path) -> ReportResult<()>;

    fn supplement_catalog(&self, report: &SupplementCatalogReport, path: &Path)
        -> ReportResult<()>;

    fn distributor_catalog(
        &self,
        report: &DistributorCatalogReport,
        path: &Path,
    ) -> ReportResult<()>;
}

impl<G: DocumentGenerator + ?Sized> DocumentGenerator for Box<G> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn extension(&self) -> &'static str {
        (**self).extension()
    }

    fn health_report(&self, report: &HealthReport, path: &Path) -> ReportResult<()> {
        (**self).health_report(report, path)
    }

    fn prescription_report(&self, report: &PrescriptionReport, path: &Path) -> ReportResult<()> {
        (**self).prescription_report(report, path)
    }

    fn contact_list(&self, report: &ContactListReport, path: &Path) -> ReportResult<()> {
        (**self).contact_list(report, path)
    }

    fn supplement_catalog(
        &self,
        report: &SupplementCatalogReport,
        path: &Path,
    ) -> ReportResult<()> {
        (**self).supplement_catalog(report, path)
    }

    fn distributor_catalog(
        &self,
        report: &DistributorCatalogReport,
        path: &Path,
    ) -> ReportResult<()> {
        (**self).distributor_catalog(report, path)
    }
}

/// Output formats shipped with the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum DocumentFormat {
    Json,
    Csv,
}

impl DocumentFormat {
    pub fn generator(self) -> Box<dyn DocumentGenerator + Send + Sync> {
        match self {
            DocumentFormat::Json => Box::new(JsonDocumentGenerator),
            DocumentFormat::Csv => Box::new(CsvSpreadsheetGenerator),
        }
    }
}

/// Writes every document as pretty-printed JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDocumentGenerator;

impl JsonDocumentGenerator {
    fn write<T: Serialize>(&self, document: &T, path: &Path) -> ReportResult<()> {
        let json = serde_json::to_string_pretty(document)?;
        std::fs::write(path, json)?;
        info!(path = %path.display(), "Wrote JSON document");
        Ok(())
    }
}

impl DocumentGenerator for JsonDocumentGenerator {
    fn name(&self) -> &'static str {
        "JSON"
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn health_report(&self, report: &HealthReport, path: &Path) -> ReportResult<()> {
        self.write(report, path)
    }

    fn prescription_report(&self, report: &PrescriptionReport, path: &Path) -> ReportResult<()> {
        self.write(report, path)
    }

    fn contact_list(&self, report: &ContactListReport, path: &Path) -> ReportResult<()> {
        self.write(report, path)
    }

    fn supplement_catalog(
        &self,
        report: &SupplementCatalogReport,
        path: &Path,
    ) -> ReportResult<()> {
        self.write(report, path)
    }

    fn distributor_catalog(
        &self,
        report: &DistributorCatalogReport,
        path: &Path,
    ) -> ReportResult<()> {
        self.write(report, path)
    }
}

/// Writes the tabular documents as CSV. Narrative reports are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvSpreadsheetGenerator;

impl CsvSpreadsheetGenerator {
    /// Render a table as CSV text, header first.
    pub fn to_csv<T: Tabular>(table: &T) -> String {
        let mut csv = String::new();
        push_csv_line(&mut csv, &table.headers());
        for row in table.rows() {
            push_csv_line(&mut csv, &row);
        }
        csv
    }

    fn write<T: Tabular>(&self, table: &T, path: &Path) -> ReportResult<()> {
        std::fs::write(path, Self::to_csv(table))?;
        info!(path = %path.display(), title = table.title(), "Wrote CSV document");
        Ok(())
    }

    fn unsupported(&self, document: &'static str) -> ReportError {
        ReportError::Unsupported {
            generator: self.name(),
            document,
        }
    }
}

impl DocumentGenerator for CsvSpreadsheetGenerator {
    fn name(&self) -> &'static str {
        "CSV"
    }

    fn extension(&self) -> &'static str {
        "csv"
    }

    fn health_report(&self, _report: &HealthReport, _path: &Path) -> ReportResult<()> {
        Err(self.unsupported("health report"))
    }

    fn prescription_report(&self, _report: &PrescriptionReport, _path: &Path) -> ReportResult<()> {
        Err(self.unsupported("prescription report"))
    }

    fn contact_list(&self, report: &ContactListReport, path: &Path) -> ReportResult<()> {
        self.write(report, path)
    }

    fn supplement_catalog(
        &self,
        report: &SupplementCatalogReport,
        path: &Path,
    ) -> ReportResult<()> {
        self.write(report, path)
    }

    fn distributor_catalog(
        &self,
        report: &DistributorCatalogReport,
        path: &Path,
    ) -> ReportResult<()> {
        self.write(report, path)
    }
}

fn push_csv_line(csv: &mut String, fields: &[String]) {
    let line: Vec<String> = fields.iter().map(|f| escape_csv(f)).collect();
    csv.push_str(&line.join(","));
    csv.push_str("\r\n");
}

/// Quote a CSV field when it contains a delimiter, quote or line break.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Client, Distributor};
    use crate::report::ContactColumn;

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_csv("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_contact_list_csv() {
        let mut client = Client::new("Doe, Jane");
        client.email = Some("jane@example.com".into());
        let report =
            ContactListReport::build(&[client], &[ContactColumn::Name, ContactColumn::Email])
                .unwrap();

        assert_eq!(
            CsvSpreadsheetGenerator::to_csv(&report),
            "Name,Email\r\n\"Doe, Jane\",jane@example.com\r\n"
        );
    }

    #[test]
    fn test_json_generator_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("distributors.json");
        let report = DistributorCatalogReport::build(&[Distributor::new("Herbal Supply Co")]);

        JsonDocumentGenerator.distributor_catalog(&report, &path).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["distributors"][0]["name"], "Herbal Supply Co");
    }
}
