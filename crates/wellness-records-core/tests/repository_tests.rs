//! Repository contract integration tests.

use std::fmt::Debug;

use wellness_records_core::config::StoreConfig;
use wellness_records_core::db::{Database, DbError, Repository};
use wellness_records_core::models::{
    Anthropometrics, BodySystemsOverview, Client, Diet, Distributor, EyeAnalysis, EyeScan,
    EyeSide, MedHx, MedHxSupplement, Prescription, PrescriptionSupplement, ScannedNote,
    ScleraPriorityType, Supplement, Treatment,
};

/// A client with one row in every dependent table.
fn populated_db() -> (Database, i64) {
    let db = Database::open_in_memory().unwrap();

    let distributor_id = db.distributors().add(&Distributor::new("Herbal Co")).unwrap();
    let mut supplement = Supplement::new("Zinc");
    supplement.distributor_id = Some(distributor_id);
    let supplement_id = db.supplements().add(&supplement).unwrap();

    let mut client = Client::new("Jane Doe");
    client.mobile = Some("0400 000 000".into());
    let client_id = db.clients().add(&client).unwrap();

    db.anthropometrics().add(&Anthropometrics::new(client_id)).unwrap();
    db.diets().add(&Diet::new(client_id)).unwrap();
    db.treatments().add(&Treatment::new(client_id)).unwrap();
    db.body_systems().add(&BodySystemsOverview::new(client_id)).unwrap();
    db.medical_histories()
        .add_with_supplements(&MedHx::new(client_id), &[MedHxSupplement::new(supplement_id)])
        .unwrap();
    db.prescriptions()
        .add_with_supplements(
            &Prescription::new(client_id),
            &[PrescriptionSupplement::new(supplement_id)],
        )
        .unwrap();
    let priority_id = db.sclera_priorities().get_all().unwrap()[0]
        .sclera_priority_type_id
        .unwrap();
    db.eye_analyses()
        .add_with_details(
            &EyeAnalysis::new(client_id),
            &[priority_id],
            &[EyeScan::new(vec![1, 2, 3], EyeSide::Left)],
        )
        .unwrap();
    db.scanned_notes()
        .add(&ScannedNote::new(client_id, b"%PDF-1.4".to_vec()))
        .unwrap();

    (db, client_id)
}

fn table_count(db: &Database, table: &str) -> i64 {
    db.connect()
        .unwrap()
        .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
        .unwrap()
}

#[test]
fn test_client_delete_cascades_to_every_dependent() {
    let (db, client_id) = populated_db();
    let dependents = [
        "Anthropometrics",
        "Diet",
        "Treatment",
        "Med_Hx",
        "Med_Hx_Supplements",
        "Prescription",
        "Prescription_Supplements",
        "Eye_Analysis",
        "Eye_Analysis_Sclera_Priorities",
        "Eye_Scan",
        "Body_Systems_Overview",
        "Scanned_Notes",
    ];
    for table in dependents {
        assert_eq!(table_count(&db, table), 1, "{table} should be populated");
    }

    assert!(db.clients().delete(client_id).unwrap());

    for table in dependents {
        assert_eq!(table_count(&db, table), 0, "{table} should be empty");
    }
    // Catalogs are not owned by the client
    assert_eq!(db.supplements().count().unwrap(), 1);
    assert_eq!(db.distributors().count().unwrap(), 1);
    assert_eq!(db.sclera_priorities().count().unwrap(), 14);
}

fn assert_blank_search_is_get_all<R>(repo: R)
where
    R: Repository,
    R::Entity: PartialEq + Debug,
{
    let all = repo.get_all().unwrap();
    assert!(!all.is_empty());
    assert_eq!(repo.search("").unwrap(), all);
    assert_eq!(repo.search("   ").unwrap(), all);
    assert_eq!(repo.search("\t\n").unwrap(), all);
}

#[test]
fn test_blank_search_returns_everything() {
    let (db, _) = populated_db();

    assert_blank_search_is_get_all(db.clients());
    assert_blank_search_is_get_all(db.anthropometrics());
    assert_blank_search_is_get_all(db.diets());
    assert_blank_search_is_get_all(db.treatments());
    assert_blank_search_is_get_all(db.body_systems());
    assert_blank_search_is_get_all(db.medical_histories());
    assert_blank_search_is_get_all(db.prescriptions());
    assert_blank_search_is_get_all(db.eye_analyses());
    assert_blank_search_is_get_all(db.sclera_priorities());
    assert_blank_search_is_get_all(db.supplements());
    assert_blank_search_is_get_all(db.distributors());
    assert_blank_search_is_get_all(db.scanned_notes());
}

fn assert_missing_id_is_not_an_error<R: Repository>(repo: R) {
    let missing = 987_654;
    assert!(repo.get_by_id(missing).unwrap().is_none());
    assert!(!repo.delete(missing).unwrap());
}

#[test]
fn test_missing_ids_are_not_errors() {
    let (db, client_id) = populated_db();

    assert_missing_id_is_not_an_error(db.clients());
    assert_missing_id_is_not_an_error(db.anthropometrics());
    assert_missing_id_is_not_an_error(db.diets());
    assert_missing_id_is_not_an_error(db.treatments());
    assert_missing_id_is_not_an_error(db.body_systems());
    assert_missing_id_is_not_an_error(db.medical_histories());
    assert_missing_id_is_not_an_error(db.prescriptions());
    assert_missing_id_is_not_an_error(db.eye_analyses());
    assert_missing_id_is_not_an_error(db.sclera_priorities());
    assert_missing_id_is_not_an_error(db.supplements());
    assert_missing_id_is_not_an_error(db.distributors());
    assert_missing_id_is_not_an_error(db.scanned_notes());

    let mut ghost = Client::new("Nobody");
    ghost.client_id = Some(987_654);
    assert!(!db.clients().update(&ghost).unwrap());

    let mut diet = Diet::new(client_id);
    diet.diet_id = Some(987_654);
    assert!(!db.diets().update(&diet).unwrap());

    let mut priority = ScleraPriorityType::new("Ghost");
    priority.sclera_priority_type_id = Some(987_654);
    assert!(!db.sclera_priorities().update(&priority).unwrap());
}

#[test]
fn test_record_for_unknown_client_is_constraint_error() {
    let db = Database::open_in_memory().unwrap();

    let err = db.treatments().add(&Treatment::new(42)).unwrap_err();
    assert!(matches!(err, DbError::Constraint(_)));

    let err = db
        .prescriptions()
        .add_with_supplements(&Prescription::new(42), &[])
        .unwrap_err();
    assert!(err.is_constraint());

    // Plain adds on master-detail repositories go through the same transaction
    let errors = [
        db.prescriptions().add(&Prescription::new(42)).unwrap_err(),
        db.medical_histories().add(&MedHx::new(42)).unwrap_err(),
        db.eye_analyses().add(&EyeAnalysis::new(42)).unwrap_err(),
    ];
    for err in errors {
        assert!(matches!(err, DbError::Transaction { .. }));
        assert!(err.is_constraint());
    }
}

#[test]
fn test_distributor_delete_detaches_supplements() {
    let (db, _) = populated_db();
    let supplement = db.supplements().get_all().unwrap().remove(0);
    let distributor_id = supplement.distributor_id.unwrap();
    assert_eq!(supplement.distributor_name.as_deref(), Some("Herbal Co"));

    assert!(db.distributors().delete(distributor_id).unwrap());

    let supplement = db.supplements().get_all().unwrap().remove(0);
    assert_eq!(supplement.distributor_id, None);
    assert_eq!(supplement.distributor_name, None);
}

#[test]
fn test_search_styles_per_entity() {
    let (db, client_id) = populated_db();
    db.supplements().add(&Supplement::new("Vitamin Zinc Complex")).unwrap();

    // Catalog names match by prefix
    let names: Vec<String> = db
        .supplements()
        .search("zin")
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["Zinc"]);

    // Contact fields match anywhere
    assert_eq!(db.clients().search("doe").unwrap().len(), 1);
    assert_eq!(db.clients().search("000 000").unwrap().len(), 1);

    // Wildcards in user text are literal
    assert!(db.clients().search("%").unwrap().is_empty());
    assert!(db.clients().search("_").unwrap().is_empty());

    let mut treatment = Treatment::new(client_id);
    treatment.presenting_symptoms = Some("Chronic fatigue".into());
    db.treatments().add(&treatment).unwrap();
    assert_eq!(db.treatments().search("FATIGUE").unwrap().len(), 1);
}

#[test]
fn test_file_store_persists_between_opens() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::in_dir(dir.path());

    let client_id = {
        let db = Database::open(config.clone()).unwrap();
        db.clients().add(&Client::new("Jane Doe")).unwrap()
    };

    let db = Database::open(config).unwrap();
    let client = db.clients().get_by_id(client_id).unwrap().unwrap();
    assert_eq!(client.name, "Jane Doe");
    assert_eq!(db.sclera_priorities().count().unwrap(), 14);
}

#[test]
fn test_store_removed_after_open_is_connection_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::in_dir(dir.path());
    let db = Database::open(config.clone()).unwrap();

    std::fs::remove_file(&config.db_path).unwrap();

    let err = db.clients().get_all().unwrap_err();
    assert!(matches!(err, DbError::Connection(_)));
    assert!(!config.db_path.exists());
}

#[test]
fn test_corrupt_store_is_connection_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::in_dir(dir.path());
    std::fs::write(&config.db_path, vec![0x42; 4096]).unwrap();

    let err = Database::open(config).unwrap_err();
    assert!(matches!(err, DbError::Connection(_)));
}
