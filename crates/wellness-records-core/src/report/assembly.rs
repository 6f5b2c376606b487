//! Section-driven fan-out over the repositories for one client.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::db::{ClientScoped, Database, DbError, DbResult, Repository};
use crate::models::{
    now_timestamp, Anthropometrics, BodySystemsOverview, Client, Diet, EyeAnalysis, MedHx,
    Prescription, PrescriptionSupplement, Treatment,
};

/// Which sections a health report includes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, uniffi::Record)]
pub struct ReportOptions {
    pub include_medical_history: bool,
    pub include_anthropometrics: bool,
    pub include_diet: bool,
    pub include_treatment: bool,
    pub include_eye_analysis: bool,
    pub include_body_systems: bool,
    pub include_prescriptions: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            include_medical_history: true,
            include_anthropometrics: true,
            include_diet: true,
            include_treatment: true,
            include_eye_analysis: true,
            include_body_systems: true,
            include_prescriptions: true,
        }
    }
}

/// A measurement row with its derived BMI.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MeasurementEntry {
    #[serde(flatten)]
    pub record: Anthropometrics,
    pub bmi: Option<f64>,
}

/// A prescription with its resolved supplement lines.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PrescriptionDetail {
    pub prescription: Prescription,
    pub supplements: Vec<PrescriptionSupplement>,
}

/// Everything a health report shows for one client. Sections that were
/// not selected are empty.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HealthReport {
    pub generated_at: String,
    pub client: Client,
    pub age: Option<i32>,
    pub options: ReportOptions,
    pub medical_history: Vec<MedHx>,
    pub anthropometrics: Vec<MeasurementEntry>,
    pub diets: Vec<Diet>,
    pub treatments: Vec<Treatment>,
    pub eye_analyses: Vec<EyeAnalysis>,
    pub body_systems: Vec<BodySystemsOverview>,
    pub prescriptions: Vec<PrescriptionDetail>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PrescriptionReport {
    pub generated_at: String,
    pub client: Client,
    pub prescriptions: Vec<PrescriptionDetail>,
}

/// Gathers report data for one client.
pub struct ReportAssembler<'a> {
    db: &'a Database,
}

impl<'a> ReportAssembler<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Fetch the full history of every selected section.
    pub fn health_report(&self, client_id: i64, options: &ReportOptions) -> DbResult<HealthReport> {
        let client = self.client(client_id)?;

        let medical_history = if options.include_medical_history {
            self.db.medical_histories().get_by_client_id(client_id)?
        } else {
            Vec::new()
        };
        let anthropometrics = if options.include_anthropometrics {
            self.db
                .anthropometrics()
                .get_by_client_id(client_id)?
                .into_iter()
                .map(|record| MeasurementEntry {
                    bmi: record.bmi(),
                    record,
                })
                .collect()
        } else {
            Vec::new()
        };
        let diets = if options.include_diet {
            self.db.diets().get_by_client_id(client_id)?
        } else {
            Vec::new()
        };
        let treatments = if options.include_treatment {
            self.db.treatments().get_by_client_id(client_id)?
        } else {
            Vec::new()
        };
        let eye_analyses = if options.include_eye_analysis {
            self.db.eye_analyses().get_by_client_id(client_id)?
        } else {
            Vec::new()
        };
        let body_systems = if options.include_body_systems {
            self.db.body_systems().get_by_client_id(client_id)?
        } else {
            Vec::new()
        };
        let prescriptions = if options.include_prescriptions {
            self.prescription_details(client_id)?
        } else {
            Vec::new()
        };

        debug!(client_id, "Assembled health report");
        Ok(HealthReport {
            generated_at: now_timestamp(),
            age: client.age(),
            client,
            options: *options,
            medical_history,
            anthropometrics,
            diets,
            treatments,
            eye_analyses,
            body_systems,
            prescriptions,
        })
    }

    pub fn prescription_report(&self, client_id: i64) -> DbResult<PrescriptionReport> {
        let client = self.client(client_id)?;
        let prescriptions = self.prescription_details(client_id)?;

        debug!(client_id, count = prescriptions.len(), "Assembled prescription report");
        Ok(PrescriptionReport {
            generated_at: now_timestamp(),
            client,
            prescriptions,
        })
    }

    fn client(&self, client_id: i64) -> DbResult<Client> {
        self.db
            .clients()
            .get_by_id(client_id)?
            .ok_or_else(|| DbError::NotFound(format!("client {}", client_id)))
    }

    // One query for the prescriptions, then one per prescription for its lines
    fn prescription_details(&self, client_id: i64) -> DbResult<Vec<PrescriptionDetail>> {
        let repo = self.db.prescriptions();
        let mut details = Vec::new();
        for prescription in repo.get_by_client_id(client_id)? {
            let Some(id) = prescription.prescription_id else {
                continue;
            };
            details.push(PrescriptionDetail {
                supplements: repo.get_supplements(id)?,
                prescription,
            });
        }
        Ok(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Supplement;

    fn setup_db() -> (Database, i64) {
        let db = Database::open_in_memory().unwrap();
        let mut client = Client::new("Jane Doe");
        client.dob = Some("1990-01-01".into());
        let client_id = db.clients().add(&client).unwrap();
        (db, client_id)
    }

    #[test]
    fn test_options_default_to_everything() {
        let options = ReportOptions::default();
        assert!(options.include_medical_history && options.include_prescriptions);
    }

    #[test]
    fn test_missing_client_is_not_found() {
        let db = Database::open_in_memory().unwrap();
        let result = ReportAssembler::new(&db).health_report(5, &ReportOptions::default());
        assert!(matches!(result, Err(DbError::NotFound(_))));
    }

    #[test]
    fn test_unselected_sections_are_empty() {
        let (db, client_id) = setup_db();
        db.diets().add(&Diet::new(client_id)).unwrap();
        db.treatments().add(&Treatment::new(client_id)).unwrap();

        let options = ReportOptions {
            include_diet: false,
            ..ReportOptions::default()
        };
        let report = ReportAssembler::new(&db).health_report(client_id, &options).unwrap();

        assert!(report.diets.is_empty());
        assert_eq!(report.treatments.len(), 1);
        assert!(report.age.is_some());
    }

    #[test]
    fn test_measurements_carry_bmi() {
        let (db, client_id) = setup_db();
        let mut record = Anthropometrics::new(client_id);
        record.weight = Some(80.0);
        record.height = Some(180.0);
        db.anthropometrics().add(&record).unwrap();

        let report = ReportAssembler::new(&db)
            .health_report(client_id, &ReportOptions::default())
            .unwrap();
        assert_eq!(report.anthropometrics[0].bmi, Some(24.7));
    }

    #[test]
    fn test_prescription_report_resolves_lines() {
        let (db, client_id) = setup_db();
        let supplement_id = db.supplements().add(&Supplement::new("Iron")).unwrap();
        let mut line = PrescriptionSupplement::new(supplement_id);
        line.breakfast = Some("1 tab".into());

        db.prescriptions()
            .add_with_supplements(&Prescription::new(client_id), &[line])
            .unwrap();
        db.prescriptions().add(&Prescription::new(client_id)).unwrap();

        let report = ReportAssembler::new(&db).prescription_report(client_id).unwrap();
        assert_eq!(report.prescriptions.len(), 2);
        let total_lines: usize = report.prescriptions.iter().map(|p| p.supplements.len()).sum();
        assert_eq!(total_lines, 1);
    }
}
