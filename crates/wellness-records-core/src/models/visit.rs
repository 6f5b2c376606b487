//! Single-table visit records: measurements, diet plans, treatment notes
//! and body-systems reviews.

use serde::{Deserialize, Serialize};

use super::now_timestamp;

/// Physical measurements taken at a visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, uniffi::Record)]
pub struct Anthropometrics {
    pub anthropometrics_id: Option<i64>,
    pub client_id: i64,
    /// Owning client's name, filled on read
    pub client_name: Option<String>,
    pub assessment_date: Option<String>,
    /// Blood pressure, free text ("120/80")
    pub bp: Option<String>,
    pub pulse: Option<i64>,
    pub spo2_percent: Option<i64>,
    /// Pulse wave analysis
    pub pwa: Option<String>,
    pub temp: Option<f64>,
    /// Kilograms
    pub weight: Option<f64>,
    /// Centimetres
    pub height: Option<f64>,
    pub zinc_status: Option<String>,
    pub nox_status: Option<String>,
}

impl Anthropometrics {
    pub fn new(client_id: i64) -> Self {
        Self {
            anthropometrics_id: None,
            client_id,
            client_name: None,
            assessment_date: Some(now_timestamp()),
            bp: None,
            pulse: None,
            spo2_percent: None,
            pwa: None,
            temp: None,
            weight: None,
            height: None,
            zinc_status: None,
            nox_status: None,
        }
    }

    /// Body mass index rounded to one decimal place.
    pub fn bmi(&self) -> Option<f64> {
        let weight = self.weight?;
        let height = self.height?;
        if height <= 0.0 {
            return None;
        }
        let metres = height / 100.0;
        Some((weight / (metres * metres) * 10.0).round() / 10.0)
    }
}

/// A diet plan recorded at a visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, uniffi::Record)]
pub struct Diet {
    pub diet_id: Option<i64>,
    pub client_id: i64,
    pub client_name: Option<String>,
    pub diet_date: Option<String>,
    pub breakfast: Option<String>,
    pub lunch: Option<String>,
    pub dinner: Option<String>,
    pub snacks: Option<String>,
}

impl Diet {
    pub fn new(client_id: i64) -> Self {
        Self {
            diet_id: None,
            client_id,
            client_name: None,
            diet_date: Some(now_timestamp()),
            breakfast: None,
            lunch: None,
            dinner: None,
            snacks: None,
        }
    }
}

/// Treatment notes for a visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, uniffi::Record)]
pub struct Treatment {
    pub treatment_id: Option<i64>,
    pub client_id: i64,
    pub client_name: Option<String>,
    pub treatment_date: Option<String>,
    /// What the client expects from treatment
    pub expectations: Option<String>,
    pub impression: Option<String>,
    pub presenting_symptoms: Option<String>,
    /// Summary of the recommended course
    pub rx: Option<String>,
}

impl Treatment {
    pub fn new(client_id: i64) -> Self {
        Self {
            treatment_id: None,
            client_id,
            client_name: None,
            treatment_date: Some(now_timestamp()),
            expectations: None,
            impression: None,
            presenting_symptoms: None,
            rx: None,
        }
    }
}

/// Free-text review of each body system.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, uniffi::Record)]
pub struct BodySystemsOverview {
    pub body_systems_overview_id: Option<i64>,
    pub client_id: i64,
    pub client_name: Option<String>,
    pub assessment_date: Option<String>,
    pub immune: Option<String>,
    pub allergy: Option<String>,
    pub sleep: Option<String>,
    pub snore: Option<String>,
    pub smoke_alc: Option<String>,
    pub exercise: Option<String>,
    pub tongue: Option<String>,
    pub cravings: Option<String>,
    pub beverages: Option<String>,
    pub digestion: Option<String>,
    pub bowels: Option<String>,
    pub urination: Option<String>,
    pub head: Option<String>,
    pub ent: Option<String>,
    pub skin_hair: Option<String>,
    pub nails: Option<String>,
    pub mind_emotional: Option<String>,
    pub thyroid: Option<String>,
    pub backache: Option<String>,
    pub joint_pain: Option<String>,
}

impl BodySystemsOverview {
    pub fn new(client_id: i64) -> Self {
        Self {
            client_id,
            assessment_date: Some(now_timestamp()),
            ..Default::default()
        }
    }

    /// Labelled system notes in display order, skipping empty ones.
    pub fn systems(&self) -> Vec<(&'static str, &str)> {
        [
            ("Immune", &self.immune),
            ("Allergy", &self.allergy),
            ("Sleep", &self.sleep),
            ("Snore", &self.snore),
            ("Smoke/Alcohol", &self.smoke_alc),
            ("Exercise", &self.exercise),
            ("Tongue", &self.tongue),
            ("Cravings", &self.cravings),
            ("Beverages", &self.beverages),
            ("Digestion", &self.digestion),
            ("Bowels", &self.bowels),
            ("Urination", &self.urination),
            ("Head", &self.head),
            ("ENT", &self.ent),
            ("Skin/Hair", &self.skin_hair),
            ("Nails", &self.nails),
            ("Mind/Emotional", &self.mind_emotional),
            ("Thyroid", &self.thyroid),
            ("Backache", &self.backache),
            ("Joint Pain", &self.joint_pain),
        ]
        .into_iter()
        .filter_map(|(label, value)| {
            value
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .map(|v| (label, v))
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmi_rounds_to_one_decimal() {
        let mut a = Anthropometrics::new(1);
        a.weight = Some(70.0);
        a.height = Some(175.0);
        assert_eq!(a.bmi(), Some(22.9));
    }

    #[test]
    fn test_bmi_requires_both_measurements() {
        let mut a = Anthropometrics::new(1);
        a.weight = Some(70.0);
        assert_eq!(a.bmi(), None);

        a.height = Some(0.0);
        assert_eq!(a.bmi(), None);
    }

    #[test]
    fn test_new_records_are_timestamped() {
        assert!(Diet::new(3).diet_date.is_some());
        assert!(Treatment::new(3).treatment_date.is_some());
        assert_eq!(BodySystemsOverview::new(3).client_id, 3);
    }

    #[test]
    fn test_systems_skips_blank_entries() {
        let mut review = BodySystemsOverview::new(1);
        review.sleep = Some("Wakes at 3am".into());
        review.ent = Some("   ".into());

        assert_eq!(review.systems(), vec![("Sleep", "Wakes at 3am")]);
    }
}
