//! Prescriptions and their per-meal supplement lines.

use serde::{Deserialize, Serialize};

use super::now_timestamp;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, uniffi::Record)]
pub struct Prescription {
    pub prescription_id: Option<i64>,
    pub client_id: i64,
    pub client_name: Option<String>,
    pub prescription_date: Option<String>,
    pub next_appointment_date: Option<String>,
    pub recommendations: Option<String>,
}

impl Prescription {
    pub fn new(client_id: i64) -> Self {
        Self {
            client_id,
            prescription_date: Some(now_timestamp()),
            ..Default::default()
        }
    }
}

/// Dosing instructions for one supplement, split by meal.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, uniffi::Record)]
pub struct PrescriptionSupplement {
    pub prescription_supplement_id: Option<i64>,
    pub prescription_id: Option<i64>,
    pub supplement_id: i64,
    pub supplement_name: Option<String>,
    pub breakfast: Option<String>,
    pub lunch: Option<String>,
    pub dinner: Option<String>,
    pub bedtime: Option<String>,
}

impl PrescriptionSupplement {
    pub fn new(supplement_id: i64) -> Self {
        Self {
            supplement_id,
            ..Default::default()
        }
    }
}
