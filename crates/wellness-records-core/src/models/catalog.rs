//! Catalog entities selected by other records.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, uniffi::Record)]
pub struct Supplement {
    pub supplement_id: Option<i64>,
    pub name: String,
    /// Product form or category ("Capsule", "Tincture")
    pub kind: Option<String>,
    pub description: Option<String>,
    pub usage: Option<String>,
    pub distributor_id: Option<i64>,
    /// Filled on read
    pub distributor_name: Option<String>,
}

impl Supplement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            supplement_id: None,
            name: name.into(),
            kind: None,
            description: None,
            usage: None,
            distributor_id: None,
            distributor_name: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, uniffi::Record)]
pub struct Distributor {
    pub distributor_id: Option<i64>,
    pub name: String,
    pub address: Option<String>,
    pub work_phone: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
}

impl Distributor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            distributor_id: None,
            name: name.into(),
            address: None,
            work_phone: None,
            mobile: None,
            email: None,
            website: None,
        }
    }
}
