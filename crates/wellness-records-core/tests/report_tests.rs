//! Report generation integration tests.

use wellness_records_core::db::{Database, DbError, Repository};
use wellness_records_core::models::{
    Anthropometrics, Client, Diet, Distributor, Gender, Prescription, PrescriptionSupplement,
    Supplement,
};
use wellness_records_core::report::{
    ContactColumn, ContactFilter, CsvSpreadsheetGenerator, JsonDocumentGenerator, ReportError,
    ReportOptions, ReportService,
};

fn setup_db() -> (Database, i64) {
    let db = Database::open_in_memory().unwrap();

    let mut client = Client::new("Jane Doe");
    client.gender = Some(Gender::Female);
    client.dob = Some("1980-04-02".into());
    let client_id = db.clients().add(&client).unwrap();

    let mut measurement = Anthropometrics::new(client_id);
    measurement.weight = Some(70.0);
    measurement.height = Some(175.0);
    db.anthropometrics().add(&measurement).unwrap();

    let mut diet = Diet::new(client_id);
    diet.breakfast = Some("Oats".into());
    db.diets().add(&diet).unwrap();

    let supplement_id = db.supplements().add(&Supplement::new("Magnesium")).unwrap();
    let mut line = PrescriptionSupplement::new(supplement_id);
    line.bedtime = Some("2 caps".into());
    db.prescriptions()
        .add_with_supplements(&Prescription::new(client_id), &[line])
        .unwrap();

    (db, client_id)
}

fn read_json(path: &std::path::Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_health_report_json_honours_section_toggles() {
    let (db, client_id) = setup_db();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");

    let options = ReportOptions {
        include_diet: false,
        ..ReportOptions::default()
    };
    ReportService::new(&db, JsonDocumentGenerator)
        .generate_health_report(client_id, &options, &path)
        .unwrap();

    let json = read_json(&path);
    assert_eq!(json["client"]["name"], "Jane Doe");
    assert_eq!(json["diets"].as_array().unwrap().len(), 0);
    assert_eq!(json["anthropometrics"][0]["bmi"], 22.9);
    assert_eq!(json["anthropometrics"][0]["weight"], 70.0);
    let prescription = &json["prescriptions"][0];
    assert_eq!(prescription["supplements"][0]["supplement_name"], "Magnesium");
    assert_eq!(prescription["supplements"][0]["bedtime"], "2 caps");
}

#[test]
fn test_prescription_report_json() {
    let (db, client_id) = setup_db();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prescriptions.json");

    ReportService::new(&db, JsonDocumentGenerator)
        .generate_prescription_report(client_id, &path)
        .unwrap();

    let json = read_json(&path);
    assert_eq!(json["prescriptions"].as_array().unwrap().len(), 1);
    assert!(json.get("diets").is_none());
}

#[test]
fn test_report_for_missing_client_writes_nothing() {
    let (db, _) = setup_db();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.json");

    let err = ReportService::new(&db, JsonDocumentGenerator)
        .generate_health_report(404, &ReportOptions::default(), &path)
        .unwrap_err();

    assert!(matches!(err, ReportError::Database(DbError::NotFound(_))));
    assert!(!path.exists());
}

#[test]
fn test_filtered_contact_list_csv() {
    let (db, _) = setup_db();
    let mut other = Client::new("John Smith");
    other.gender = Some(Gender::Male);
    other.mobile = Some("0411 111 111".into());
    db.clients().add(&other).unwrap();

    let filter = ContactFilter {
        gender: Some(Gender::Male),
        ..ContactFilter::default()
    };
    let clients = filter.apply(&db.clients().get_all().unwrap());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.csv");
    ReportService::new(&db, CsvSpreadsheetGenerator)
        .generate_contact_list(
            &clients,
            &[ContactColumn::Name, ContactColumn::Mobile, ContactColumn::Gender],
            &path,
        )
        .unwrap();

    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "Name,Mobile,Gender\r\nJohn Smith,0411 111 111,Male\r\n"
    );
}

#[test]
fn test_catalog_csv_uses_joined_distributor() {
    let db = Database::open_in_memory().unwrap();
    let distributor_id = db.distributors().add(&Distributor::new("Herbal Co")).unwrap();
    let mut supplement = Supplement::new("Zinc");
    supplement.distributor_id = Some(distributor_id);
    supplement.usage = Some("Daily, with food".into());
    db.supplements().add(&supplement).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("supplements.csv");
    ReportService::new(&db, CsvSpreadsheetGenerator)
        .generate_supplement_catalog(&db.supplements().get_all().unwrap(), &path)
        .unwrap();

    let csv = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = csv.split("\r\n").collect();
    assert_eq!(lines[0], "Name,Type,Distributor,Description,Usage");
    assert_eq!(lines[1], "Zinc,,Herbal Co,,\"Daily, with food\"");
}

#[test]
fn test_csv_rejects_narrative_reports() {
    let (db, client_id) = setup_db();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");

    let err = ReportService::new(&db, CsvSpreadsheetGenerator)
        .generate_health_report(client_id, &ReportOptions::default(), &path)
        .unwrap_err();

    assert!(matches!(err, ReportError::Unsupported { .. }));
    assert!(!path.exists());
}
