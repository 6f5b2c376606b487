//! Wellness Records Core Library
//!
//! Client records for a single-practitioner wellness clinic: demographics,
//! visit records, medical history, iridology, prescriptions of supplements,
//! scanned documents and report generation, on an embedded SQLite store.
//!
//! # Architecture
//!
//! ```text
//! Presentation layer (native shell)
//!          │  uniffi
//!          ▼
//!   WellnessRecordsCore ──────────────► ReportService ──► DocumentGenerator
//!          │                                 │                 (JSON, CSV, ...)
//!          ▼                                 ▼
//!    Repositories  ◄──────────────────  ReportAssembler
//!          │
//!          ▼
//!   Database (one connection per call, master-detail transactions)
//! ```
//!
//! # Modules
//!
//! - [`config`]: Store location and busy timeout
//! - [`logging`]: Rolling-file tracing setup
//! - [`db`]: Persistence gateway, migrations and repositories
//! - [`models`]: Domain types (Client, Prescription, EyeAnalysis, etc.)
//! - [`report`]: Report assembly and document generators

pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod report;

// Re-export commonly used types
pub use config::StoreConfig;
pub use db::{ClientScoped, Database, DbError, DbResult, Repository};
pub use models::{
    Anthropometrics, BodySystemsOverview, Client, Diet, Distributor, EyeAnalysis, EyeScan,
    EyeSide, Gender, MedHx, MedHxSupplement, Prescription, PrescriptionSupplement, ScannedNote,
    ScleraPriorityType, Supplement, Treatment,
};
pub use report::{
    ContactColumn, ContactFilter, DocumentFormat, ReportError, ReportOptions, ReportService,
};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing_appender::non_blocking::WorkerGuard;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum WellnessRecordsError {
    #[error("Cannot open store: {0}")]
    ConnectionError(String),

    #[error("Constraint violation: {0}")]
    ConstraintError(String),

    #[error("Save failed and was rolled back: {0}")]
    TransactionFailure(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Report error: {0}")]
    ReportError(String),
}

impl From<DbError> for WellnessRecordsError {
    fn from(e: DbError) -> Self {
        match &e {
            DbError::Connection(_) => WellnessRecordsError::ConnectionError(e.to_string()),
            DbError::Constraint(msg) => WellnessRecordsError::ConstraintError(msg.clone()),
            DbError::Transaction { .. } => WellnessRecordsError::TransactionFailure(e.to_string()),
            DbError::NotFound(what) => WellnessRecordsError::NotFound(what.clone()),
            DbError::Migration { .. } | DbError::Io(_) | DbError::Sqlite(_) => {
                WellnessRecordsError::StorageError(e.to_string())
            }
        }
    }
}

impl From<ReportError> for WellnessRecordsError {
    fn from(e: ReportError) -> Self {
        match e {
            ReportError::Database(db) => db.into(),
            ReportError::NoColumns | ReportError::Unsupported { .. } => {
                WellnessRecordsError::InvalidInput(e.to_string())
            }
            ReportError::Io(_) | ReportError::Json(_) => {
                WellnessRecordsError::ReportError(e.to_string())
            }
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for WellnessRecordsError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        WellnessRecordsError::StorageError(format!("Lock poisoned: {}", e))
    }
}

type FfiResult<T> = Result<T, WellnessRecordsError>;

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

static LOG_GUARD: Mutex<Option<WorkerGuard>> = Mutex::new(None);

/// Send tracing output to daily log files in `log_dir`.
#[uniffi::export]
pub fn start_logging(log_dir: String) -> FfiResult<()> {
    let guard = logging::init_logging(&log_dir)
        .map_err(|e| WellnessRecordsError::InvalidInput(format!("{:#}", e)))?;
    *LOG_GUARD.lock()? = Some(guard);
    Ok(())
}

/// Open or create the store at the given path.
#[uniffi::export]
pub fn open_store(path: String) -> FfiResult<Arc<WellnessRecordsCore>> {
    WellnessRecordsCore::open(StoreConfig::new(path))
}

/// Open or create the store in the default data directory.
#[uniffi::export]
pub fn open_default_store() -> FfiResult<Arc<WellnessRecordsCore>> {
    WellnessRecordsCore::open(StoreConfig::from_env())
}

/// Create an in-memory store (for testing).
#[uniffi::export]
pub fn open_store_in_memory() -> FfiResult<Arc<WellnessRecordsCore>> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(WellnessRecordsCore {
        db: Arc::new(Mutex::new(db)),
    }))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe store handle for FFI.
///
/// Every call is synchronous; the host runs calls off its UI thread.
#[derive(uniffi::Object)]
pub struct WellnessRecordsCore {
    db: Arc<Mutex<Database>>,
}

impl WellnessRecordsCore {
    fn open(config: StoreConfig) -> FfiResult<Arc<Self>> {
        let db = Database::open(config)?;
        Ok(Arc::new(Self {
            db: Arc::new(Mutex::new(db)),
        }))
    }
}

#[uniffi::export]
impl WellnessRecordsCore {
    /// Location of the store file (`:memory:` for in-memory stores).
    pub fn store_path(&self) -> FfiResult<String> {
        let db = self.db.lock()?;
        Ok(db.config().db_path.display().to_string())
    }

    // =========================================================================
    // Clients
    // =========================================================================

    pub fn list_clients(&self) -> FfiResult<Vec<Client>> {
        let db = self.db.lock()?;
        Ok(db.clients().get_all()?)
    }

    pub fn get_client(&self, client_id: i64) -> FfiResult<Option<Client>> {
        let db = self.db.lock()?;
        Ok(db.clients().get_by_id(client_id)?)
    }

    /// Insert a client and return its new id.
    pub fn add_client(&self, client: Client) -> FfiResult<i64> {
        let db = self.db.lock()?;
        Ok(db.clients().add(&client)?)
    }

    pub fn update_client(&self, client: Client) -> FfiResult<bool> {
        let db = self.db.lock()?;
        Ok(db.clients().update(&client)?)
    }

    /// Delete a client and every record that belongs to it.
    pub fn delete_client(&self, client_id: i64) -> FfiResult<bool> {
        let db = self.db.lock()?;
        Ok(db.clients().delete(client_id)?)
    }

    pub fn search_clients(&self, term: String) -> FfiResult<Vec<Client>> {
        let db = self.db.lock()?;
        Ok(db.clients().search(&term)?)
    }

    pub fn count_clients(&self) -> FfiResult<i64> {
        let db = self.db.lock()?;
        Ok(db.clients().count()?)
    }

    /// All clients matching a gender/age filter, by name.
    pub fn filter_clients(&self, filter: ContactFilter) -> FfiResult<Vec<Client>> {
        let db = self.db.lock()?;
        Ok(filter.apply(&db.clients().get_all()?))
    }

    // =========================================================================
    // Anthropometrics
    // =========================================================================

    pub fn list_anthropometrics(&self) -> FfiResult<Vec<Anthropometrics>> {
        let db = self.db.lock()?;
        Ok(db.anthropometrics().get_all()?)
    }

    pub fn get_anthropometrics(&self, id: i64) -> FfiResult<Option<Anthropometrics>> {
        let db = self.db.lock()?;
        Ok(db.anthropometrics().get_by_id(id)?)
    }

    pub fn get_client_anthropometrics(&self, client_id: i64) -> FfiResult<Vec<Anthropometrics>> {
        let db = self.db.lock()?;
        Ok(db.anthropometrics().get_by_client_id(client_id)?)
    }

    pub fn add_anthropometrics(&self, record: Anthropometrics) -> FfiResult<i64> {
        let db = self.db.lock()?;
        Ok(db.anthropometrics().add(&record)?)
    }

    pub fn update_anthropometrics(&self, record: Anthropometrics) -> FfiResult<bool> {
        let db = self.db.lock()?;
        Ok(db.anthropometrics().update(&record)?)
    }

    pub fn delete_anthropometrics(&self, id: i64) -> FfiResult<bool> {
        let db = self.db.lock()?;
        Ok(db.anthropometrics().delete(id)?)
    }

    pub fn search_anthropometrics(&self, term: String) -> FfiResult<Vec<Anthropometrics>> {
        let db = self.db.lock()?;
        Ok(db.anthropometrics().search(&term)?)
    }

    pub fn count_anthropometrics(&self) -> FfiResult<i64> {
        let db = self.db.lock()?;
        Ok(db.anthropometrics().count()?)
    }

    /// BMI for a measurement row, rounded to one decimal.
    pub fn anthropometrics_bmi(&self, record: Anthropometrics) -> Option<f64> {
        record.bmi()
    }

    // =========================================================================
    // Diet
    // =========================================================================

    pub fn list_diets(&self) -> FfiResult<Vec<Diet>> {
        let db = self.db.lock()?;
        Ok(db.diets().get_all()?)
    }

    pub fn get_diet(&self, id: i64) -> FfiResult<Option<Diet>> {
        let db = self.db.lock()?;
        Ok(db.diets().get_by_id(id)?)
    }

    pub fn get_client_diets(&self, client_id: i64) -> FfiResult<Vec<Diet>> {
        let db = self.db.lock()?;
        Ok(db.diets().get_by_client_id(client_id)?)
    }

    pub fn add_diet(&self, diet: Diet) -> FfiResult<i64> {
        let db = self.db.lock()?;
        Ok(db.diets().add(&diet)?)
    }

    pub fn update_diet(&self, diet: Diet) -> FfiResult<bool> {
        let db = self.db.lock()?;
        Ok(db.diets().update(&diet)?)
    }

    pub fn delete_diet(&self, id: i64) -> FfiResult<bool> {
        let db = self.db.lock()?;
        Ok(db.diets().delete(id)?)
    }

    pub fn search_diets(&self, term: String) -> FfiResult<Vec<Diet>> {
        let db = self.db.lock()?;
        Ok(db.diets().search(&term)?)
    }

    pub fn count_diets(&self) -> FfiResult<i64> {
        let db = self.db.lock()?;
        Ok(db.diets().count()?)
    }

    // =========================================================================
    // Treatment
    // =========================================================================

    pub fn list_treatments(&self) -> FfiResult<Vec<Treatment>> {
        let db = self.db.lock()?;
        Ok(db.treatments().get_all()?)
    }

    pub fn get_treatment(&self, id: i64) -> FfiResult<Option<Treatment>> {
        let db = self.db.lock()?;
        Ok(db.treatments().get_by_id(id)?)
    }

    pub fn get_client_treatments(&self, client_id: i64) -> FfiResult<Vec<Treatment>> {
        let db = self.db.lock()?;
        Ok(db.treatments().get_by_client_id(client_id)?)
    }

    pub fn add_treatment(&self, treatment: Treatment) -> FfiResult<i64> {
        let db = self.db.lock()?;
        Ok(db.treatments().add(&treatment)?)
    }

    pub fn update_treatment(&self, treatment: Treatment) -> FfiResult<bool> {
        let db = self.db.lock()?;
        Ok(db.treatments().update(&treatment)?)
    }

    pub fn delete_treatment(&self, id: i64) -> FfiResult<bool> {
        let db = self.db.lock()?;
        Ok(db.treatments().delete(id)?)
    }

    pub fn search_treatments(&self, term: String) -> FfiResult<Vec<Treatment>> {
        let db = self.db.lock()?;
        Ok(db.treatments().search(&term)?)
    }

    pub fn count_treatments(&self) -> FfiResult<i64> {
        let db = self.db.lock()?;
        Ok(db.treatments().count()?)
    }

    // =========================================================================
    // Body Systems Overview
    // =========================================================================

    pub fn list_body_systems(&self) -> FfiResult<Vec<BodySystemsOverview>> {
        let db = self.db.lock()?;
        Ok(db.body_systems().get_all()?)
    }

    pub fn get_body_systems(&self, id: i64) -> FfiResult<Option<BodySystemsOverview>> {
        let db = self.db.lock()?;
        Ok(db.body_systems().get_by_id(id)?)
    }

    pub fn get_client_body_systems(&self, client_id: i64) -> FfiResult<Vec<BodySystemsOverview>> {
        let db = self.db.lock()?;
        Ok(db.body_systems().get_by_client_id(client_id)?)
    }

    pub fn add_body_systems(&self, review: BodySystemsOverview) -> FfiResult<i64> {
        let db = self.db.lock()?;
        Ok(db.body_systems().add(&review)?)
    }

    pub fn update_body_systems(&self, review: BodySystemsOverview) -> FfiResult<bool> {
        let db = self.db.lock()?;
        Ok(db.body_systems().update(&review)?)
    }

    pub fn delete_body_systems(&self, id: i64) -> FfiResult<bool> {
        let db = self.db.lock()?;
        Ok(db.body_systems().delete(id)?)
    }

    pub fn search_body_systems(&self, term: String) -> FfiResult<Vec<BodySystemsOverview>> {
        let db = self.db.lock()?;
        Ok(db.body_systems().search(&term)?)
    }

    pub fn count_body_systems(&self) -> FfiResult<i64> {
        let db = self.db.lock()?;
        Ok(db.body_systems().count()?)
    }

    // =========================================================================
    // Medical History
    // =========================================================================

    pub fn list_medical_histories(&self) -> FfiResult<Vec<MedHx>> {
        let db = self.db.lock()?;
        Ok(db.medical_histories().get_all()?)
    }

    pub fn get_medical_history(&self, id: i64) -> FfiResult<Option<MedHx>> {
        let db = self.db.lock()?;
        Ok(db.medical_histories().get_by_id(id)?)
    }

    pub fn get_client_medical_histories(&self, client_id: i64) -> FfiResult<Vec<MedHx>> {
        let db = self.db.lock()?;
        Ok(db.medical_histories().get_by_client_id(client_id)?)
    }

    pub fn get_medical_history_supplements(&self, med_hx_id: i64) -> FfiResult<Vec<MedHxSupplement>> {
        let db = self.db.lock()?;
        Ok(db.medical_histories().get_supplements(med_hx_id)?)
    }

    /// Insert a history and its supplement lines in one transaction.
    pub fn add_medical_history(
        &self,
        med_hx: MedHx,
        supplements: Vec<MedHxSupplement>,
    ) -> FfiResult<i64> {
        let db = self.db.lock()?;
        Ok(db.medical_histories().add_with_supplements(&med_hx, &supplements)?)
    }

    /// Update a history; its stored lines become exactly `supplements`.
    pub fn update_medical_history(
        &self,
        med_hx: MedHx,
        supplements: Vec<MedHxSupplement>,
    ) -> FfiResult<bool> {
        let db = self.db.lock()?;
        Ok(db.medical_histories().update_with_supplements(&med_hx, &supplements)?)
    }

    pub fn delete_medical_history(&self, id: i64) -> FfiResult<bool> {
        let db = self.db.lock()?;
        Ok(db.medical_histories().delete(id)?)
    }

    pub fn search_medical_histories(&self, term: String) -> FfiResult<Vec<MedHx>> {
        let db = self.db.lock()?;
        Ok(db.medical_histories().search(&term)?)
    }

    pub fn count_medical_histories(&self) -> FfiResult<i64> {
        let db = self.db.lock()?;
        Ok(db.medical_histories().count()?)
    }

    // =========================================================================
    // Prescriptions
    // =========================================================================

    pub fn list_prescriptions(&self) -> FfiResult<Vec<Prescription>> {
        let db = self.db.lock()?;
        Ok(db.prescriptions().get_all()?)
    }

    pub fn get_prescription(&self, id: i64) -> FfiResult<Option<Prescription>> {
        let db = self.db.lock()?;
        Ok(db.prescriptions().get_by_id(id)?)
    }

    pub fn get_client_prescriptions(&self, client_id: i64) -> FfiResult<Vec<Prescription>> {
        let db = self.db.lock()?;
        Ok(db.prescriptions().get_by_client_id(client_id)?)
    }

    pub fn get_prescription_supplements(
        &self,
        prescription_id: i64,
    ) -> FfiResult<Vec<PrescriptionSupplement>> {
        let db = self.db.lock()?;
        Ok(db.prescriptions().get_supplements(prescription_id)?)
    }

    /// Insert a prescription and its supplement lines in one transaction.
    pub fn add_prescription(
        &self,
        prescription: Prescription,
        supplements: Vec<PrescriptionSupplement>,
    ) -> FfiResult<i64> {
        let db = self.db.lock()?;
        Ok(db.prescriptions().add_with_supplements(&prescription, &supplements)?)
    }

    /// Update a prescription; its stored lines become exactly `supplements`.
    pub fn update_prescription(
        &self,
        prescription: Prescription,
        supplements: Vec<PrescriptionSupplement>,
    ) -> FfiResult<bool> {
        let db = self.db.lock()?;
        Ok(db.prescriptions().update_with_supplements(&prescription, &supplements)?)
    }

    pub fn delete_prescription(&self, id: i64) -> FfiResult<bool> {
        let db = self.db.lock()?;
        Ok(db.prescriptions().delete(id)?)
    }

    pub fn search_prescriptions(&self, term: String) -> FfiResult<Vec<Prescription>> {
        let db = self.db.lock()?;
        Ok(db.prescriptions().search(&term)?)
    }

    pub fn count_prescriptions(&self) -> FfiResult<i64> {
        let db = self.db.lock()?;
        Ok(db.prescriptions().count()?)
    }

    // =========================================================================
    // Eye Analysis
    // =========================================================================

    pub fn list_eye_analyses(&self) -> FfiResult<Vec<EyeAnalysis>> {
        let db = self.db.lock()?;
        Ok(db.eye_analyses().get_all()?)
    }

    pub fn get_eye_analysis(&self, id: i64) -> FfiResult<Option<EyeAnalysis>> {
        let db = self.db.lock()?;
        Ok(db.eye_analyses().get_by_id(id)?)
    }

    pub fn get_client_eye_analyses(&self, client_id: i64) -> FfiResult<Vec<EyeAnalysis>> {
        let db = self.db.lock()?;
        Ok(db.eye_analyses().get_by_client_id(client_id)?)
    }

    pub fn get_eye_analysis_priority_ids(&self, eye_analysis_id: i64) -> FfiResult<Vec<i64>> {
        let db = self.db.lock()?;
        Ok(db.eye_analyses().get_selected_priority_ids(eye_analysis_id)?)
    }

    pub fn get_eye_scans(&self, eye_analysis_id: i64) -> FfiResult<Vec<EyeScan>> {
        let db = self.db.lock()?;
        Ok(db.eye_analyses().get_scans(eye_analysis_id)?)
    }

    /// Insert an analysis with its selected tags and scans in one transaction.
    pub fn add_eye_analysis(
        &self,
        analysis: EyeAnalysis,
        priority_ids: Vec<i64>,
        scans: Vec<EyeScan>,
    ) -> FfiResult<i64> {
        let db = self.db.lock()?;
        Ok(db.eye_analyses().add_with_details(&analysis, &priority_ids, &scans)?)
    }

    /// Update an analysis: tags are replaced, scans without an id are added.
    pub fn update_eye_analysis(
        &self,
        analysis: EyeAnalysis,
        priority_ids: Vec<i64>,
        scans: Vec<EyeScan>,
    ) -> FfiResult<bool> {
        let db = self.db.lock()?;
        Ok(db.eye_analyses().update_with_details(&analysis, &priority_ids, &scans)?)
    }

    pub fn delete_eye_analysis(&self, id: i64) -> FfiResult<bool> {
        let db = self.db.lock()?;
        Ok(db.eye_analyses().delete(id)?)
    }

    pub fn search_eye_analyses(&self, term: String) -> FfiResult<Vec<EyeAnalysis>> {
        let db = self.db.lock()?;
        Ok(db.eye_analyses().search(&term)?)
    }

    pub fn count_eye_analyses(&self) -> FfiResult<i64> {
        let db = self.db.lock()?;
        Ok(db.eye_analyses().count()?)
    }

    // =========================================================================
    // Sclera Priority Catalog
    // =========================================================================

    pub fn list_sclera_priorities(&self) -> FfiResult<Vec<ScleraPriorityType>> {
        let db = self.db.lock()?;
        Ok(db.sclera_priorities().get_all()?)
    }

    pub fn get_sclera_priority(&self, id: i64) -> FfiResult<Option<ScleraPriorityType>> {
        let db = self.db.lock()?;
        Ok(db.sclera_priorities().get_by_id(id)?)
    }

    pub fn add_sclera_priority(&self, priority: ScleraPriorityType) -> FfiResult<i64> {
        let db = self.db.lock()?;
        Ok(db.sclera_priorities().add(&priority)?)
    }

    pub fn update_sclera_priority(&self, priority: ScleraPriorityType) -> FfiResult<bool> {
        let db = self.db.lock()?;
        Ok(db.sclera_priorities().update(&priority)?)
    }

    pub fn delete_sclera_priority(&self, id: i64) -> FfiResult<bool> {
        let db = self.db.lock()?;
        Ok(db.sclera_priorities().delete(id)?)
    }

    pub fn search_sclera_priorities(&self, term: String) -> FfiResult<Vec<ScleraPriorityType>> {
        let db = self.db.lock()?;
        Ok(db.sclera_priorities().search(&term)?)
    }

    pub fn count_sclera_priorities(&self) -> FfiResult<i64> {
        let db = self.db.lock()?;
        Ok(db.sclera_priorities().count()?)
    }

    // =========================================================================
    // Supplements
    // =========================================================================

    pub fn list_supplements(&self) -> FfiResult<Vec<Supplement>> {
        let db = self.db.lock()?;
        Ok(db.supplements().get_all()?)
    }

    pub fn get_supplement(&self, id: i64) -> FfiResult<Option<Supplement>> {
        let db = self.db.lock()?;
        Ok(db.supplements().get_by_id(id)?)
    }

    pub fn add_supplement(&self, supplement: Supplement) -> FfiResult<i64> {
        let db = self.db.lock()?;
        Ok(db.supplements().add(&supplement)?)
    }

    pub fn update_supplement(&self, supplement: Supplement) -> FfiResult<bool> {
        let db = self.db.lock()?;
        Ok(db.supplements().update(&supplement)?)
    }

    /// Fails with a constraint error while the supplement is in use.
    pub fn delete_supplement(&self, id: i64) -> FfiResult<bool> {
        let db = self.db.lock()?;
        Ok(db.supplements().delete(id)?)
    }

    pub fn search_supplements(&self, term: String) -> FfiResult<Vec<Supplement>> {
        let db = self.db.lock()?;
        Ok(db.supplements().search(&term)?)
    }

    pub fn count_supplements(&self) -> FfiResult<i64> {
        let db = self.db.lock()?;
        Ok(db.supplements().count()?)
    }

    // =========================================================================
    // Distributors
    // =========================================================================

    pub fn list_distributors(&self) -> FfiResult<Vec<Distributor>> {
        let db = self.db.lock()?;
        Ok(db.distributors().get_all()?)
    }

    pub fn get_distributor(&self, id: i64) -> FfiResult<Option<Distributor>> {
        let db = self.db.lock()?;
        Ok(db.distributors().get_by_id(id)?)
    }

    pub fn add_distributor(&self, distributor: Distributor) -> FfiResult<i64> {
        let db = self.db.lock()?;
        Ok(db.distributors().add(&distributor)?)
    }

    pub fn update_distributor(&self, distributor: Distributor) -> FfiResult<bool> {
        let db = self.db.lock()?;
        Ok(db.distributors().update(&distributor)?)
    }

    pub fn delete_distributor(&self, id: i64) -> FfiResult<bool> {
        let db = self.db.lock()?;
        Ok(db.distributors().delete(id)?)
    }

    pub fn search_distributors(&self, term: String) -> FfiResult<Vec<Distributor>> {
        let db = self.db.lock()?;
        Ok(db.distributors().search(&term)?)
    }

    pub fn count_distributors(&self) -> FfiResult<i64> {
        let db = self.db.lock()?;
        Ok(db.distributors().count()?)
    }

    // =========================================================================
    // Scanned Notes
    // =========================================================================

    pub fn list_scanned_notes(&self) -> FfiResult<Vec<ScannedNote>> {
        let db = self.db.lock()?;
        Ok(db.scanned_notes().get_all()?)
    }

    pub fn get_scanned_note(&self, id: i64) -> FfiResult<Option<ScannedNote>> {
        let db = self.db.lock()?;
        Ok(db.scanned_notes().get_by_id(id)?)
    }

    pub fn get_client_scanned_notes(&self, client_id: i64) -> FfiResult<Vec<ScannedNote>> {
        let db = self.db.lock()?;
        Ok(db.scanned_notes().get_by_client_id(client_id)?)
    }

    pub fn add_scanned_note(&self, note: ScannedNote) -> FfiResult<i64> {
        let db = self.db.lock()?;
        Ok(db.scanned_notes().add(&note)?)
    }

    pub fn update_scanned_note(&self, note: ScannedNote) -> FfiResult<bool> {
        let db = self.db.lock()?;
        Ok(db.scanned_notes().update(&note)?)
    }

    pub fn delete_scanned_note(&self, id: i64) -> FfiResult<bool> {
        let db = self.db.lock()?;
        Ok(db.scanned_notes().delete(id)?)
    }

    pub fn search_scanned_notes(&self, term: String) -> FfiResult<Vec<ScannedNote>> {
        let db = self.db.lock()?;
        Ok(db.scanned_notes().search(&term)?)
    }

    pub fn search_client_scanned_notes(
        &self,
        client_id: i64,
        term: String,
    ) -> FfiResult<Vec<ScannedNote>> {
        let db = self.db.lock()?;
        Ok(db.scanned_notes().search_by_client(client_id, &term)?)
    }

    pub fn count_scanned_notes(&self) -> FfiResult<i64> {
        let db = self.db.lock()?;
        Ok(db.scanned_notes().count()?)
    }

    pub fn count_client_scanned_notes(&self, client_id: i64) -> FfiResult<i64> {
        let db = self.db.lock()?;
        Ok(db.scanned_notes().count_by_client(client_id)?)
    }

    // =========================================================================
    // Reports
    // =========================================================================

    /// Every contact list column, in display order.
    pub fn contact_columns(&self) -> Vec<ContactColumn> {
        ContactColumn::ALL.to_vec()
    }

    /// Write a health report with the selected sections to `path`.
    pub fn generate_health_report(
        &self,
        client_id: i64,
        options: ReportOptions,
        format: DocumentFormat,
        path: String,
    ) -> FfiResult<()> {
        let db = self.db.lock()?;
        ReportService::new(&db, format.generator()).generate_health_report(
            client_id,
            &options,
            Path::new(&path),
        )?;
        Ok(())
    }

    pub fn generate_prescription_report(
        &self,
        client_id: i64,
        format: DocumentFormat,
        path: String,
    ) -> FfiResult<()> {
        let db = self.db.lock()?;
        ReportService::new(&db, format.generator())
            .generate_prescription_report(client_id, Path::new(&path))?;
        Ok(())
    }

    /// Write `clients` (already filtered) with the chosen columns.
    pub fn generate_contact_list(
        &self,
        clients: Vec<Client>,
        columns: Vec<ContactColumn>,
        format: DocumentFormat,
        path: String,
    ) -> FfiResult<()> {
        let db = self.db.lock()?;
        ReportService::new(&db, format.generator()).generate_contact_list(
            &clients,
            &columns,
            Path::new(&path),
        )?;
        Ok(())
    }

    pub fn generate_supplement_catalog(
        &self,
        supplements: Vec<Supplement>,
        format: DocumentFormat,
        path: String,
    ) -> FfiResult<()> {
        let db = self.db.lock()?;
        ReportService::new(&db, format.generator())
            .generate_supplement_catalog(&supplements, Path::new(&path))?;
        Ok(())
    }

    pub fn generate_distributor_catalog(
        &self,
        distributors: Vec<Distributor>,
        format: DocumentFormat,
        path: String,
    ) -> FfiResult<()> {
        let db = self.db.lock()?;
        ReportService::new(&db, format.generator())
            .generate_distributor_catalog(&distributors, Path::new(&path))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facade_round_trip() {
        let core = open_store_in_memory().unwrap();
        let client_id = core.add_client(Client::new("Jane Doe")).unwrap();

        assert_eq!(core.count_clients().unwrap(), 1);
        assert_eq!(core.get_client(client_id).unwrap().unwrap().name, "Jane Doe");
        assert_eq!(core.search_clients("   ".into()).unwrap().len(), 1);
        assert!(core.get_client(client_id + 1).unwrap().is_none());
    }

    #[test]
    fn test_transaction_failure_maps_to_ffi_error() {
        let core = open_store_in_memory().unwrap();
        let client_id = core.add_client(Client::new("Jane Doe")).unwrap();

        let result = core.add_prescription(
            Prescription::new(client_id),
            vec![PrescriptionSupplement::new(999)],
        );
        assert!(matches!(result, Err(WellnessRecordsError::TransactionFailure(_))));
        assert_eq!(core.count_prescriptions().unwrap(), 0);
    }

    #[test]
    fn test_contact_list_without_columns_is_invalid_input() {
        let core = open_store_in_memory().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contacts.csv").to_string_lossy().into_owned();

        let result = core.generate_contact_list(vec![], vec![], DocumentFormat::Csv, path);
        assert!(matches!(result, Err(WellnessRecordsError::InvalidInput(_))));
    }

    #[test]
    fn test_open_store_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("HealthManagement.db");
        let core = open_store(path.to_string_lossy().into_owned()).unwrap();
        assert_eq!(core.count_sclera_priorities().unwrap(), 14);
        assert!(core.store_path().unwrap().ends_with("HealthManagement.db"));
    }

    #[test]
    fn test_store_path_of_memory_store_reopens() {
        let core = open_store_in_memory().unwrap();
        let reopened = open_store(core.store_path().unwrap()).unwrap();

        reopened.add_client(Client::new("Jane Doe")).unwrap();
        assert_eq!(reopened.count_clients().unwrap(), 1);
        assert_eq!(core.count_clients().unwrap(), 0);
    }

    #[test]
    fn test_filter_clients_by_gender() {
        let core = open_store_in_memory().unwrap();
        let mut jane = Client::new("Jane Doe");
        jane.gender = Some(Gender::Female);
        core.add_client(jane).unwrap();
        core.add_client(Client::new("Sam Lee")).unwrap();

        let filter = ContactFilter {
            gender: Some(Gender::Female),
            ..ContactFilter::default()
        };
        let names: Vec<String> = core
            .filter_clients(filter)
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Jane Doe"]);
        assert_eq!(core.contact_columns().len(), 8);
    }
}
