//! SQLite schema and versioned migrations.
//!
//! The applied version lives in `PRAGMA user_version`. Each migration runs
//! once, in its own transaction, when the store is opened.

/// A single schema step.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub version: i64,
    pub description: &'static str,
    pub sql: &'static str,
}

/// All migrations in application order.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "initial schema",
        sql: SCHEMA_V1,
    },
    Migration {
        version: 2,
        description: "client gender",
        sql: "ALTER TABLE Client ADD COLUMN Gender INTEGER NULL;",
    },
];

/// Sclera priority tags every new store starts with.
pub const DEFAULT_SCLERA_PRIORITIES: &[&str] = &[
    "Adrenal Fatigue",
    "Bowel Toxicity",
    "Candida",
    "Heavy Metals",
    "Kidney Stress",
    "Liver Stress",
    "Lymphatic Congestion",
    "Nerve Rings (Stress)",
    "Parasites",
    "Sinus Congestion",
    "Skin Issues",
    "Sugar Sensitivity",
    "Thyroid Stress",
    "Venous Congestion",
];

/// Latest schema version known to this build.
pub fn latest_version() -> i64 {
    MIGRATIONS.last().map(|m| m.version).unwrap_or(0)
}

const SCHEMA_V1: &str = r#"
-- ============================================================================
-- Clients
-- ============================================================================

CREATE TABLE IF NOT EXISTS Client (
    ClientID INTEGER PRIMARY KEY AUTOINCREMENT,
    Name TEXT NOT NULL,
    Address TEXT,
    DOB TEXT,
    Mobile TEXT,
    Email TEXT,
    Occupation TEXT,
    Date_First_Consultation TEXT,
    Date_Last_Consultation TEXT,
    Marital_Status TEXT,
    Children INTEGER,
    Ref TEXT,
    Alt_Contact TEXT
);

CREATE INDEX IF NOT EXISTS idx_client_name ON Client(Name);

-- ============================================================================
-- Catalogs
-- ============================================================================

CREATE TABLE IF NOT EXISTS Distributor (
    DistributorID INTEGER PRIMARY KEY AUTOINCREMENT,
    Name TEXT NOT NULL,
    Address TEXT,
    Work_Phone TEXT,
    Mobile TEXT,
    Email TEXT,
    Website TEXT
);

CREATE TABLE IF NOT EXISTS Supplements (
    SupplementID INTEGER PRIMARY KEY AUTOINCREMENT,
    Name TEXT NOT NULL,
    Type TEXT,
    Description TEXT,
    Usage TEXT,
    DistributorID INTEGER REFERENCES Distributor(DistributorID) ON DELETE SET NULL
);

CREATE TABLE IF NOT EXISTS Sclera_Priority_Types (
    ScleraPriorityTypeID INTEGER PRIMARY KEY AUTOINCREMENT,
    Priority_Name TEXT NOT NULL,
    Description TEXT
);

-- ============================================================================
-- Visit records
-- ============================================================================

CREATE TABLE IF NOT EXISTS Anthropometrics (
    AnthropometricsID INTEGER PRIMARY KEY AUTOINCREMENT,
    Assessment_Date TEXT,
    BP TEXT,
    Pulse INTEGER,
    SpO2_Percent INTEGER,
    PWA TEXT,
    Temp REAL,
    Weight REAL,
    Height REAL,
    Zinc_Status TEXT,
    NOX_Status TEXT,
    ClientID INTEGER NOT NULL REFERENCES Client(ClientID) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS Diet (
    DietID INTEGER PRIMARY KEY AUTOINCREMENT,
    Diet_Date TEXT,
    Breakfast TEXT,
    Lunch TEXT,
    Dinner TEXT,
    Snacks TEXT,
    ClientID INTEGER NOT NULL REFERENCES Client(ClientID) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS Treatment (
    TreatmentID INTEGER PRIMARY KEY AUTOINCREMENT,
    Treatment_Date TEXT,
    Expectations_of_Treatment TEXT,
    Impression TEXT,
    Presenting_Symptoms TEXT,
    Rx TEXT,
    ClientID INTEGER NOT NULL REFERENCES Client(ClientID) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS Body_Systems_Overview (
    Body_Systems_OverviewID INTEGER PRIMARY KEY AUTOINCREMENT,
    Assessment_Date TEXT,
    Immune TEXT,
    Allergy TEXT,
    Sleep TEXT,
    Snore TEXT,
    Smoke_Alc TEXT,
    Exercise TEXT,
    Tongue TEXT,
    Cravings TEXT,
    Beverages TEXT,
    Digestion TEXT,
    Bowels TEXT,
    Urination TEXT,
    Head TEXT,
    ENT TEXT,
    Skin_Hair TEXT,
    Nails TEXT,
    Mind_Emotional TEXT,
    Thyroid TEXT,
    Backache TEXT,
    Joint_Pain TEXT,
    ClientID INTEGER NOT NULL REFERENCES Client(ClientID) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_anthropometrics_client ON Anthropometrics(ClientID);
CREATE INDEX IF NOT EXISTS idx_diet_client ON Diet(ClientID);
CREATE INDEX IF NOT EXISTS idx_treatment_client ON Treatment(ClientID);
CREATE INDEX IF NOT EXISTS idx_body_systems_client ON Body_Systems_Overview(ClientID);

-- ============================================================================
-- Medical history (master-detail)
-- ============================================================================

CREATE TABLE IF NOT EXISTS Med_Hx (
    Med_HxID INTEGER PRIMARY KEY AUTOINCREMENT,
    ClientID INTEGER NOT NULL REFERENCES Client(ClientID) ON DELETE CASCADE,
    Assessment_Date TEXT,
    Blood_Test_Results TEXT,
    Medication TEXT,
    Supplements TEXT,
    Accidents_Previous_Illness TEXT,
    Menstrual_Notes TEXT,
    Vaccinations TEXT,
    Med_Hx TEXT,
    Family_Med_Hx TEXT
);

CREATE TABLE IF NOT EXISTS Med_Hx_Supplements (
    Med_Hx_SupplementsID INTEGER PRIMARY KEY AUTOINCREMENT,
    Med_HxID INTEGER NOT NULL REFERENCES Med_Hx(Med_HxID) ON DELETE CASCADE,
    SupplementID INTEGER NOT NULL REFERENCES Supplements(SupplementID),
    Dosage TEXT,
    Frequency TEXT,
    Notes TEXT
);

CREATE INDEX IF NOT EXISTS idx_med_hx_client ON Med_Hx(ClientID);
CREATE INDEX IF NOT EXISTS idx_med_hx_supplements_parent ON Med_Hx_Supplements(Med_HxID);

-- ============================================================================
-- Prescriptions (master-detail)
-- ============================================================================

CREATE TABLE IF NOT EXISTS Prescription (
    PrescriptionID INTEGER PRIMARY KEY AUTOINCREMENT,
    Prescription_Date TEXT,
    Next_Appointment_Date TEXT,
    Recommendations TEXT,
    ClientID INTEGER NOT NULL REFERENCES Client(ClientID) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS Prescription_Supplements (
    Prescription_SupplementsID INTEGER PRIMARY KEY AUTOINCREMENT,
    Breakfast TEXT,
    Lunch TEXT,
    Dinner TEXT,
    Bedtime TEXT,
    PrescriptionID INTEGER NOT NULL REFERENCES Prescription(PrescriptionID) ON DELETE CASCADE,
    SupplementID INTEGER NOT NULL REFERENCES Supplements(SupplementID)
);

CREATE INDEX IF NOT EXISTS idx_prescription_client ON Prescription(ClientID);
CREATE INDEX IF NOT EXISTS idx_prescription_supplements_parent ON Prescription_Supplements(PrescriptionID);

-- ============================================================================
-- Eye analysis (master with tag junction and append-only scans)
-- ============================================================================

CREATE TABLE IF NOT EXISTS Eye_Analysis (
    Eye_AnalysisID INTEGER PRIMARY KEY AUTOINCREMENT,
    Analysis_Date TEXT,
    Iris_Colour TEXT,
    Texture TEXT,
    Type TEXT,
    Pupil TEXT,
    Stomach TEXT,
    S_I_T TEXT,
    ANW TEXT,
    Bowel TEXT,
    Nox TEXT,
    Nerve_Rings TEXT,
    Scurf TEXT,
    Radii TEXT,
    Psora TEXT,
    Organs TEXT,
    Urine TEXT,
    Meridian_Scan TEXT,
    ClientID INTEGER NOT NULL REFERENCES Client(ClientID) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS Eye_Analysis_Sclera_Priorities (
    Eye_AnalysisID INTEGER NOT NULL REFERENCES Eye_Analysis(Eye_AnalysisID) ON DELETE CASCADE,
    ScleraPriorityTypeID INTEGER NOT NULL
        REFERENCES Sclera_Priority_Types(ScleraPriorityTypeID) ON DELETE CASCADE,
    PRIMARY KEY (Eye_AnalysisID, ScleraPriorityTypeID)
);

CREATE TABLE IF NOT EXISTS Eye_Scan (
    Eye_ScanID INTEGER PRIMARY KEY AUTOINCREMENT,
    Eye_Scan BLOB NOT NULL,
    Scan_Date TEXT,
    Eye_Side TEXT CHECK (Eye_Side IN ('Left', 'Right')),
    Eye_AnalysisID INTEGER NOT NULL REFERENCES Eye_Analysis(Eye_AnalysisID) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_eye_analysis_client ON Eye_Analysis(ClientID);
CREATE INDEX IF NOT EXISTS idx_eye_scan_parent ON Eye_Scan(Eye_AnalysisID);

-- ============================================================================
-- Scanned documents
-- ============================================================================

CREATE TABLE IF NOT EXISTS Scanned_Notes (
    ScannedNotesID INTEGER PRIMARY KEY AUTOINCREMENT,
    Document_Name TEXT,
    Document_Date TEXT,
    Document_Type TEXT,
    Description TEXT,
    Scanned_Document BLOB,
    ClientID INTEGER NOT NULL REFERENCES Client(ClientID) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_scanned_notes_client ON Scanned_Notes(ClientID);

-- ============================================================================
-- Seed data
-- ============================================================================

-- Only into an empty catalog: stores created before versioning already
-- carry their own tags.
INSERT INTO Sclera_Priority_Types (Priority_Name)
SELECT column1 FROM (VALUES
    ('Adrenal Fatigue'),
    ('Bowel Toxicity'),
    ('Candida'),
    ('Heavy Metals'),
    ('Kidney Stress'),
    ('Liver Stress'),
    ('Lymphatic Congestion'),
    ('Nerve Rings (Stress)'),
    ('Parasites'),
    ('Sinus Congestion'),
    ('Skin Issues'),
    ('Sugar Sensitivity'),
    ('Thyroid Stress'),
    ('Venous Congestion')
)
WHERE NOT EXISTS (SELECT 1 FROM Sclera_Priority_Types);
"#;
