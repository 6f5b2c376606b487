//! Single-table visit records: anthropometrics, diet, treatment and
//! body-systems reviews.
//!
//! Every query joins the owning client's name and returns the most recent
//! record first.

use rusqlite::{params, Row};
use tracing::debug;

use super::repository::{
    execute, like_pattern, query_count, query_list, query_optional, ClientScoped, MatchStyle,
    Repository,
};
use super::{Database, DbResult};
use crate::models::{Anthropometrics, BodySystemsOverview, Diet, Treatment};

impl Database {
    pub fn anthropometrics(&self) -> AnthropometricsRepository<'_> {
        AnthropometricsRepository { db: self }
    }

    pub fn diets(&self) -> DietRepository<'_> {
        DietRepository { db: self }
    }

    pub fn treatments(&self) -> TreatmentRepository<'_> {
        TreatmentRepository { db: self }
    }

    pub fn body_systems(&self) -> BodySystemsRepository<'_> {
        BodySystemsRepository { db: self }
    }
}

// ============================================================================
// Anthropometrics
// ============================================================================

const SELECT_ANTHROPOMETRICS: &str = r#"
    SELECT a.AnthropometricsID, a.ClientID, c.Name, a.Assessment_Date, a.BP,
           a.Pulse, a.SpO2_Percent, a.PWA, a.Temp, a.Weight, a.Height,
           a.Zinc_Status, a.NOX_Status
    FROM Anthropometrics a
    JOIN Client c ON c.ClientID = a.ClientID
"#;

const ANTHROPOMETRICS_ORDER: &str = "ORDER BY a.Assessment_Date DESC, a.AnthropometricsID DESC";

fn anthropometrics_from_row(row: &Row<'_>) -> rusqlite::Result<Anthropometrics> {
    Ok(Anthropometrics {
        anthropometrics_id: row.get(0)?,
        client_id: row.get(1)?,
        client_name: row.get(2)?,
        assessment_date: row.get(3)?,
        bp: row.get(4)?,
        pulse: row.get(5)?,
        spo2_percent: row.get(6)?,
        pwa: row.get(7)?,
        temp: row.get(8)?,
        weight: row.get(9)?,
        height: row.get(10)?,
        zinc_status: row.get(11)?,
        nox_status: row.get(12)?,
    })
}

pub struct AnthropometricsRepository<'a> {
    db: &'a Database,
}

impl Repository for AnthropometricsRepository<'_> {
    type Entity = Anthropometrics;

    fn get_all(&self) -> DbResult<Vec<Anthropometrics>> {
        query_list(
            self.db,
            &format!("{SELECT_ANTHROPOMETRICS} {ANTHROPOMETRICS_ORDER}"),
            [],
            anthropometrics_from_row,
        )
    }

    fn get_by_id(&self, id: i64) -> DbResult<Option<Anthropometrics>> {
        query_optional(
            self.db,
            &format!("{SELECT_ANTHROPOMETRICS} WHERE a.AnthropometricsID = ?1"),
            [id],
            anthropometrics_from_row,
        )
    }

    fn add(&self, record: &Anthropometrics) -> DbResult<i64> {
        let conn = self.db.connect()?;
        conn.execute(
            r#"
            INSERT INTO Anthropometrics (
                Assessment_Date, BP, Pulse, SpO2_Percent, PWA,
                Temp, Weight, Height, Zinc_Status, NOX_Status, ClientID
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                record.assessment_date,
                record.bp,
                record.pulse,
                record.spo2_percent,
                record.pwa,
                record.temp,
                record.weight,
                record.height,
                record.zinc_status,
                record.nox_status,
                record.client_id,
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!(anthropometrics_id = id, client_id = record.client_id, "Inserted anthropometrics");
        Ok(id)
    }

    fn update(&self, record: &Anthropometrics) -> DbResult<bool> {
        let Some(id) = record.anthropometrics_id else {
            return Ok(false);
        };
        let rows_affected = execute(
            self.db,
            r#"
            UPDATE Anthropometrics SET
                Assessment_Date = ?2,
                BP = ?3,
                Pulse = ?4,
                SpO2_Percent = ?5,
                PWA = ?6,
                Temp = ?7,
                Weight = ?8,
                Height = ?9,
                Zinc_Status = ?10,
                NOX_Status = ?11,
                ClientID = ?12
            WHERE AnthropometricsID = ?1
            "#,
            params![
                id,
                record.assessment_date,
                record.bp,
                record.pulse,
                record.spo2_percent,
                record.pwa,
                record.temp,
                record.weight,
                record.height,
                record.zinc_status,
                record.nox_status,
                record.client_id,
            ],
        )?;
        debug!(anthropometrics_id = id, rows_affected, "Updated anthropometrics");
        Ok(rows_affected > 0)
    }

    fn delete(&self, id: i64) -> DbResult<bool> {
        let rows_affected = execute(
            self.db,
            "DELETE FROM Anthropometrics WHERE AnthropometricsID = ?1",
            [id],
        )?;
        debug!(anthropometrics_id = id, rows_affected, "Deleted anthropometrics");
        Ok(rows_affected > 0)
    }

    /// Prefix match on the client's name.
    fn search(&self, term: &str) -> DbResult<Vec<Anthropometrics>> {
        let Some(pattern) = like_pattern(term, MatchStyle::Prefix) else {
            return self.get_all();
        };
        query_list(
            self.db,
            &format!(
                r#"{SELECT_ANTHROPOMETRICS}
                WHERE c.Name LIKE ?1 ESCAPE '\'
                {ANTHROPOMETRICS_ORDER}"#
            ),
            [pattern],
            anthropometrics_from_row,
        )
    }

    fn count(&self) -> DbResult<i64> {
        query_count(self.db, "SELECT COUNT(*) FROM Anthropometrics", [])
    }
}

impl ClientScoped for AnthropometricsRepository<'_> {
    fn get_by_client_id(&self, client_id: i64) -> DbResult<Vec<Anthropometrics>> {
        query_list(
            self.db,
            &format!("{SELECT_ANTHROPOMETRICS} WHERE a.ClientID = ?1 {ANTHROPOMETRICS_ORDER}"),
            [client_id],
            anthropometrics_from_row,
        )
    }
}

// ============================================================================
// Diet
// ============================================================================

const SELECT_DIET: &str = r#"
    SELECT d.DietID, d.ClientID, c.Name, d.Diet_Date, d.Breakfast, d.Lunch,
           d.Dinner, d.Snacks
    FROM Diet d
    JOIN Client c ON c.ClientID = d.ClientID
"#;

const DIET_ORDER: &str = "ORDER BY d.Diet_Date DESC, d.DietID DESC";

fn diet_from_row(row: &Row<'_>) -> rusqlite::Result<Diet> {
    Ok(Diet {
        diet_id: row.get(0)?,
        client_id: row.get(1)?,
        client_name: row.get(2)?,
        diet_date: row.get(3)?,
        breakfast: row.get(4)?,
        lunch: row.get(5)?,
        dinner: row.get(6)?,
        snacks: row.get(7)?,
    })
}

pub struct DietRepository<'a> {
    db: &'a Database,
}

impl Repository for DietRepository<'_> {
    type Entity = Diet;

    fn get_all(&self) -> DbResult<Vec<Diet>> {
        query_list(self.db, &format!("{SELECT_DIET} {DIET_ORDER}"), [], diet_from_row)
    }

    fn get_by_id(&self, id: i64) -> DbResult<Option<Diet>> {
        query_optional(
            self.db,
            &format!("{SELECT_DIET} WHERE d.DietID = ?1"),
            [id],
            diet_from_row,
        )
    }

    fn add(&self, diet: &Diet) -> DbResult<i64> {
        let conn = self.db.connect()?;
        conn.execute(
            r#"
            INSERT INTO Diet (Diet_Date, Breakfast, Lunch, Dinner, Snacks, ClientID)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                diet.diet_date,
                diet.breakfast,
                diet.lunch,
                diet.dinner,
                diet.snacks,
                diet.client_id,
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!(diet_id = id, client_id = diet.client_id, "Inserted diet");
        Ok(id)
    }

    fn update(&self, diet: &Diet) -> DbResult<bool> {
        let Some(id) = diet.diet_id else {
            return Ok(false);
        };
        let rows_affected = execute(
            self.db,
            r#"
            UPDATE Diet SET
                Diet_Date = ?2,
                Breakfast = ?3,
                Lunch = ?4,
                Dinner = ?5,
                Snacks = ?6,
                ClientID = ?7
            WHERE DietID = ?1
            "#,
            params![
                id,
                diet.diet_date,
                diet.breakfast,
                diet.lunch,
                diet.dinner,
                diet.snacks,
                diet.client_id,
            ],
        )?;
        debug!(diet_id = id, rows_affected, "Updated diet");
        Ok(rows_affected > 0)
    }

    fn delete(&self, id: i64) -> DbResult<bool> {
        let rows_affected = execute(self.db, "DELETE FROM Diet WHERE DietID = ?1", [id])?;
        debug!(diet_id = id, rows_affected, "Deleted diet");
        Ok(rows_affected > 0)
    }

    fn search(&self, term: &str) -> DbResult<Vec<Diet>> {
        let Some(pattern) = like_pattern(term, MatchStyle::Substring) else {
            return self.get_all();
        };
        query_list(
            self.db,
            &format!(
                r#"{SELECT_DIET}
                WHERE c.Name LIKE ?1 ESCAPE '\'
                   OR d.Breakfast LIKE ?1 ESCAPE '\'
                   OR d.Lunch LIKE ?1 ESCAPE '\'
                   OR d.Dinner LIKE ?1 ESCAPE '\'
                {DIET_ORDER}"#
            ),
            [pattern],
            diet_from_row,
        )
    }

    fn count(&self) -> DbResult<i64> {
        query_count(self.db, "SELECT COUNT(*) FROM Diet", [])
    }
}

impl ClientScoped for DietRepository<'_> {
    fn get_by_client_id(&self, client_id: i64) -> DbResult<Vec<Diet>> {
        query_list(
            self.db,
            &format!("{SELECT_DIET} WHERE d.ClientID = ?1 {DIET_ORDER}"),
            [client_id],
            diet_from_row,
        )
    }
}

// ============================================================================
// Treatment
// ============================================================================

const SELECT_TREATMENT: &str = r#"
    SELECT t.TreatmentID, t.ClientID, c.Name, t.Treatment_Date,
           t.Expectations_of_Treatment, t.Impression, t.Presenting_Symptoms, t.Rx
    FROM Treatment t
    JOIN Client c ON c.ClientID = t.ClientID
"#;

const TREATMENT_ORDER: &str = "ORDER BY t.Treatment_Date DESC, t.TreatmentID DESC";

fn treatment_from_row(row: &Row<'_>) -> rusqlite::Result<Treatment> {
    Ok(Treatment {
        treatment_id: row.get(0)?,
        client_id: row.get(1)?,
        client_name: row.get(2)?,
        treatment_date: row.get(3)?,
        expectations: row.get(4)?,
        impression: row.get(5)?,
        presenting_symptoms: row.get(6)?,
        rx: row.get(7)?,
    })
}

pub struct TreatmentRepository<'a> {
    db: &'a Database,
}

impl Repository for TreatmentRepository<'_> {
    type Entity = Treatment;

    fn get_all(&self) -> DbResult<Vec<Treatment>> {
        query_list(
            self.db,
            &format!("{SELECT_TREATMENT} {TREATMENT_ORDER}"),
            [],
            treatment_from_row,
        )
    }

    fn get_by_id(&self, id: i64) -> DbResult<Option<Treatment>> {
        query_optional(
            self.db,
            &format!("{SELECT_TREATMENT} WHERE t.TreatmentID = ?1"),
            [id],
            treatment_from_row,
        )
    }

    fn add(&self, treatment: &Treatment) -> DbResult<i64> {
        let conn = self.db.connect()?;
        conn.execute(
            r#"
            INSERT INTO Treatment (
                Treatment_Date, Expectations_of_Treatment, Impression,
                Presenting_Symptoms, Rx, ClientID
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                treatment.treatment_date,
                treatment.expectations,
                treatment.impression,
                treatment.presenting_symptoms,
                treatment.rx,
                treatment.client_id,
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!(treatment_id = id, client_id = treatment.client_id, "Inserted treatment");
        Ok(id)
    }

    fn update(&self, treatment: &Treatment) -> DbResult<bool> {
        let Some(id) = treatment.treatment_id else {
            return Ok(false);
        };
        let rows_affected = execute(
            self.db,
            r#"
            UPDATE Treatment SET
                Treatment_Date = ?2,
                Expectations_of_Treatment = ?3,
                Impression = ?4,
                Presenting_Symptoms = ?5,
                Rx = ?6,
                ClientID = ?7
            WHERE TreatmentID = ?1
            "#,
            params![
                id,
                treatment.treatment_date,
                treatment.expectations,
                treatment.impression,
                treatment.presenting_symptoms,
                treatment.rx,
                treatment.client_id,
            ],
        )?;
        debug!(treatment_id = id, rows_affected, "Updated treatment");
        Ok(rows_affected > 0)
    }

    fn delete(&self, id: i64) -> DbResult<bool> {
        let rows_affected =
            execute(self.db, "DELETE FROM Treatment WHERE TreatmentID = ?1", [id])?;
        debug!(treatment_id = id, rows_affected, "Deleted treatment");
        Ok(rows_affected > 0)
    }

    fn search(&self, term: &str) -> DbResult<Vec<Treatment>> {
        let Some(pattern) = like_pattern(term, MatchStyle::Substring) else {
            return self.get_all();
        };
        query_list(
            self.db,
            &format!(
                r#"{SELECT_TREATMENT}
                WHERE c.Name LIKE ?1 ESCAPE '\'
                   OR t.Presenting_Symptoms LIKE ?1 ESCAPE '\'
                   OR t.Impression LIKE ?1 ESCAPE '\'
                {TREATMENT_ORDER}"#
            ),
            [pattern],
            treatment_from_row,
        )
    }

    fn count(&self) -> DbResult<i64> {
        query_count(self.db, "SELECT COUNT(*) FROM Treatment", [])
    }
}

impl ClientScoped for TreatmentRepository<'_> {
    fn get_by_client_id(&self, client_id: i64) -> DbResult<Vec<Treatment>> {
        query_list(
            self.db,
            &format!("{SELECT_TREATMENT} WHERE t.ClientID = ?1 {TREATMENT_ORDER}"),
            [client_id],
            treatment_from_row,
        )
    }
}

// ============================================================================
// Body systems overview
// ============================================================================

const SELECT_BODY_SYSTEMS: &str = r#"
    SELECT b.Body_Systems_OverviewID, b.ClientID, c.Name, b.Assessment_Date,
           b.Immune, b.Allergy, b.Sleep, b.Snore, b.Smoke_Alc, b.Exercise,
           b.Tongue, b.Cravings, b.Beverages, b.Digestion, b.Bowels,
           b.Urination, b.Head, b.ENT, b.Skin_Hair, b.Nails, b.Mind_Emotional,
           b.Thyroid, b.Backache, b.Joint_Pain
    FROM Body_Systems_Overview b
    JOIN Client c ON c.ClientID = b.ClientID
"#;

const BODY_SYSTEMS_ORDER: &str = "ORDER BY b.Assessment_Date DESC, b.Body_Systems_OverviewID DESC";

fn body_systems_from_row(row: &Row<'_>) -> rusqlite::Result<BodySystemsOverview> {
    Ok(BodySystemsOverview {
        body_systems_overview_id: row.get(0)?,
        client_id: row.get(1)?,
        client_name: row.get(2)?,
        assessment_date: row.get(3)?,
        immune: row.get(4)?,
        allergy: row.get(5)?,
        sleep: row.get(6)?,
        snore: row.get(7)?,
        smoke_alc: row.get(8)?,
        exercise: row.get(9)?,
        tongue: row.get(10)?,
        cravings: row.get(11)?,
        beverages: row.get(12)?,
        digestion: row.get(13)?,
        bowels: row.get(14)?,
        urination: row.get(15)?,
        head: row.get(16)?,
        ent: row.get(17)?,
        skin_hair: row.get(18)?,
        nails: row.get(19)?,
        mind_emotional: row.get(20)?,
        thyroid: row.get(21)?,
        backache: row.get(22)?,
        joint_pain: row.get(23)?,
    })
}

pub struct BodySystemsRepository<'a> {
    db: &'a Database,
}

impl Repository for BodySystemsRepository<'_> {
    type Entity = BodySystemsOverview;

    fn get_all(&self) -> DbResult<Vec<BodySystemsOverview>> {
        query_list(
            self.db,
            &format!("{SELECT_BODY_SYSTEMS} {BODY_SYSTEMS_ORDER}"),
            [],
            body_systems_from_row,
        )
    }

    fn get_by_id(&self, id: i64) -> DbResult<Option<BodySystemsOverview>> {
        query_optional(
            self.db,
            &format!("{SELECT_BODY_SYSTEMS} WHERE b.Body_Systems_OverviewID = ?1"),
            [id],
            body_systems_from_row,
        )
    }

    fn add(&self, review: &BodySystemsOverview) -> DbResult<i64> {
        let conn = self.db.connect()?;
        conn.execute(
            r#"
            INSERT INTO Body_Systems_Overview (
                Assessment_Date, Immune, Allergy, Sleep, Snore, Smoke_Alc,
                Exercise, Tongue, Cravings, Beverages, Digestion, Bowels,
                Urination, Head, ENT, Skin_Hair, Nails, Mind_Emotional,
                Thyroid, Backache, Joint_Pain, ClientID
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11,
                ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22
            )
            "#,
            params![
                review.assessment_date,
                review.immune,
                review.allergy,
                review.sleep,
                review.snore,
                review.smoke_alc,
                review.exercise,
                review.tongue,
                review.cravings,
                review.beverages,
                review.digestion,
                review.bowels,
                review.urination,
                review.head,
                review.ent,
                review.skin_hair,
                review.nails,
                review.mind_emotional,
                review.thyroid,
                review.backache,
                review.joint_pain,
                review.client_id,
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!(body_systems_overview_id = id, client_id = review.client_id, "Inserted body systems overview");
        Ok(id)
    }

    fn update(&self, review: &BodySystemsOverview) -> DbResult<bool> {
        let Some(id) = review.body_systems_overview_id else {
            return Ok(false);
        };
        let rows_affected = execute(
            self.db,
            r#"
            UPDATE Body_Systems_Overview SET
                Assessment_Date = ?2, Immune = ?3, Allergy = ?4, Sleep = ?5,
                Snore = ?6, Smoke_Alc = ?7, Exercise = ?8, Tongue = ?9,
                Cravings = ?10, Beverages = ?11, Digestion = ?12, Bowels = ?13,
                Urination = ?14, Head = ?15, ENT = ?16, Skin_Hair = ?17,
                Nails = ?18, Mind_Emotional = ?19, Thyroid = ?20,
                Backache = ?21, Joint_Pain = ?22, ClientID = ?23
            WHERE Body_Systems_OverviewID = ?1
            "#,
            params![
                id,
                review.assessment_date,
                review.immune,
                review.allergy,
                review.sleep,
                review.snore,
                review.smoke_alc,
                review.exercise,
                review.tongue,
                review.cravings,
                review.beverages,
                review.digestion,
                review.bowels,
                review.urination,
                review.head,
                review.ent,
                review.skin_hair,
                review.nails,
                review.mind_emotional,
                review.thyroid,
                review.backache,
                review.joint_pain,
                review.client_id,
            ],
        )?;
        debug!(body_systems_overview_id = id, rows_affected, "Updated body systems overview");
        Ok(rows_affected > 0)
    }

    fn delete(&self, id: i64) -> DbResult<bool> {
        let rows_affected = execute(
            self.db,
            "DELETE FROM Body_Systems_Overview WHERE Body_Systems_OverviewID = ?1",
            [id],
        )?;
        debug!(body_systems_overview_id = id, rows_affected, "Deleted body systems overview");
        Ok(rows_affected > 0)
    }

    /// Prefix match on the client's name.
    fn search(&self, term: &str) -> DbResult<Vec<BodySystemsOverview>> {
        let Some(pattern) = like_pattern(term, MatchStyle::Prefix) else {
            return self.get_all();
        };
        query_list(
            self.db,
            &format!(
                r#"{SELECT_BODY_SYSTEMS}
                WHERE c.Name LIKE ?1 ESCAPE '\'
                {BODY_SYSTEMS_ORDER}"#
            ),
            [pattern],
            body_systems_from_row,
        )
    }

    fn count(&self) -> DbResult<i64> {
        query_count(self.db, "SELECT COUNT(*) FROM Body_Systems_Overview", [])
    }
}

impl ClientScoped for BodySystemsRepository<'_> {
    fn get_by_client_id(&self, client_id: i64) -> DbResult<Vec<BodySystemsOverview>> {
        query_list(
            self.db,
            &format!("{SELECT_BODY_SYSTEMS} WHERE b.ClientID = ?1 {BODY_SYSTEMS_ORDER}"),
            [client_id],
            body_systems_from_row,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Client;

    fn setup_db() -> (Database, i64) {
        let db = Database::open_in_memory().unwrap();
        let client_id = db.clients().add(&Client::new("Jane Doe")).unwrap();
        (db, client_id)
    }

    #[test]
    fn test_anthropometrics_insert_and_get() {
        let (db, client_id) = setup_db();
        let mut record = Anthropometrics::new(client_id);
        record.weight = Some(64.5);
        record.height = Some(168.0);
        record.pulse = Some(72);

        let id = db.anthropometrics().add(&record).unwrap();
        let fetched = db.anthropometrics().get_by_id(id).unwrap().unwrap();

        assert_eq!(fetched.client_name.as_deref(), Some("Jane Doe"));
        assert_eq!(fetched.pulse, Some(72));
        assert_eq!(fetched.bmi(), Some(22.9));
    }

    #[test]
    fn test_visit_without_client_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        let err = db.diets().add(&Diet::new(77)).unwrap_err();
        assert!(err.is_constraint());
    }

    #[test]
    fn test_most_recent_first() {
        let (db, client_id) = setup_db();
        for date in ["2024-01-10 09:00:00", "2024-03-02 09:00:00", "2023-12-25 09:00:00"] {
            let mut diet = Diet::new(client_id);
            diet.diet_date = Some(date.into());
            db.diets().add(&diet).unwrap();
        }

        let dates: Vec<String> = db
            .diets()
            .get_by_client_id(client_id)
            .unwrap()
            .into_iter()
            .filter_map(|d| d.diet_date)
            .collect();
        assert_eq!(
            dates,
            vec!["2024-03-02 09:00:00", "2024-01-10 09:00:00", "2023-12-25 09:00:00"]
        );
    }

    #[test]
    fn test_diet_search_covers_meals() {
        let (db, client_id) = setup_db();
        let mut diet = Diet::new(client_id);
        diet.lunch = Some("Quinoa salad".into());
        db.diets().add(&diet).unwrap();

        assert_eq!(db.diets().search("QUINOA").unwrap().len(), 1);
        assert_eq!(db.diets().search("doe").unwrap().len(), 1);
        assert!(db.diets().search("steak").unwrap().is_empty());
    }

    #[test]
    fn test_treatment_update_and_delete() {
        let (db, client_id) = setup_db();
        let id = db.treatments().add(&Treatment::new(client_id)).unwrap();

        let mut treatment = db.treatments().get_by_id(id).unwrap().unwrap();
        treatment.presenting_symptoms = Some("Fatigue, poor sleep".into());
        assert!(db.treatments().update(&treatment).unwrap());
        assert_eq!(db.treatments().search("sleep").unwrap().len(), 1);

        assert!(db.treatments().delete(id).unwrap());
        assert!(!db.treatments().delete(id).unwrap());
        assert_eq!(db.treatments().count().unwrap(), 0);
    }

    #[test]
    fn test_body_systems_search_is_name_prefix() {
        let (db, client_id) = setup_db();
        let mut review = BodySystemsOverview::new(client_id);
        review.digestion = Some("Bloating after meals".into());
        let id = db.body_systems().add(&review).unwrap();

        let fetched = db.body_systems().get_by_id(id).unwrap().unwrap();
        assert_eq!(fetched.digestion.as_deref(), Some("Bloating after meals"));

        assert_eq!(db.body_systems().search("jan").unwrap().len(), 1);
        assert!(db.body_systems().search("doe").unwrap().is_empty());
    }
}
