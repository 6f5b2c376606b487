//! Medical history and the supplements a client already takes.

use serde::{Deserialize, Serialize};

use super::now_timestamp;

/// Medical history taken at a visit. Owns a list of [`MedHxSupplement`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, uniffi::Record)]
pub struct MedHx {
    pub med_hx_id: Option<i64>,
    pub client_id: i64,
    pub client_name: Option<String>,
    pub assessment_date: Option<String>,
    pub blood_test_results: Option<String>,
    pub medication: Option<String>,
    /// Free-text supplement notes, separate from the structured lines
    pub supplements_notes: Option<String>,
    pub accidents_previous_illness: Option<String>,
    pub menstrual_notes: Option<String>,
    pub vaccinations: Option<String>,
    pub history_notes: Option<String>,
    pub family_history: Option<String>,
}

impl MedHx {
    pub fn new(client_id: i64) -> Self {
        Self {
            client_id,
            assessment_date: Some(now_timestamp()),
            ..Default::default()
        }
    }
}

/// One supplement line of a medical history.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, uniffi::Record)]
pub struct MedHxSupplement {
    /// Regenerated on every save of the owning history
    pub med_hx_supplement_id: Option<i64>,
    pub med_hx_id: Option<i64>,
    pub supplement_id: i64,
    /// Catalog name, filled on read
    pub supplement_name: Option<String>,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub notes: Option<String>,
}

impl MedHxSupplement {
    pub fn new(supplement_id: i64) -> Self {
        Self {
            supplement_id,
            ..Default::default()
        }
    }
}
