//! Iridology records: the analysis itself, the sclera priority catalog
//! and the scan images attached to an analysis.

use serde::{Deserialize, Serialize};

use super::now_timestamp;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, uniffi::Record)]
pub struct EyeAnalysis {
    pub eye_analysis_id: Option<i64>,
    pub client_id: i64,
    pub client_name: Option<String>,
    pub analysis_date: Option<String>,
    pub iris_colour: Option<String>,
    pub texture: Option<String>,
    /// Constitutional type
    pub iris_type: Option<String>,
    pub pupil: Option<String>,
    pub stomach: Option<String>,
    /// Stomach/intestine transition
    pub sit: Option<String>,
    /// Autonomic nerve wreath
    pub anw: Option<String>,
    pub bowel: Option<String>,
    pub nox: Option<String>,
    pub nerve_rings: Option<String>,
    pub scurf: Option<String>,
    pub radii: Option<String>,
    pub psora: Option<String>,
    pub organs: Option<String>,
    pub urine: Option<String>,
    pub meridian_scan: Option<String>,
}

impl EyeAnalysis {
    pub fn new(client_id: i64) -> Self {
        Self {
            client_id,
            analysis_date: Some(now_timestamp()),
            ..Default::default()
        }
    }
}

/// A tag from the sclera priority catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, uniffi::Record)]
pub struct ScleraPriorityType {
    pub sclera_priority_type_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
}

impl ScleraPriorityType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            sclera_priority_type_id: None,
            name: name.into(),
            description: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, uniffi::Enum)]
pub enum EyeSide {
    Left,
    Right,
}

impl EyeSide {
    pub fn as_str(self) -> &'static str {
        match self {
            EyeSide::Left => "Left",
            EyeSide::Right => "Right",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Left" => Some(EyeSide::Left),
            "Right" => Some(EyeSide::Right),
            _ => None,
        }
    }
}

/// An uploaded eye image. Opaque bytes; never decoded here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, uniffi::Record)]
pub struct EyeScan {
    /// `None` until the owning analysis is saved
    pub eye_scan_id: Option<i64>,
    pub eye_analysis_id: Option<i64>,
    pub image: Vec<u8>,
    pub scan_date: Option<String>,
    pub side: Option<EyeSide>,
}

impl EyeScan {
    pub fn new(image: Vec<u8>, side: EyeSide) -> Self {
        Self {
            eye_scan_id: None,
            eye_analysis_id: None,
            image,
            scan_date: Some(now_timestamp()),
            side: Some(side),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eye_side_labels() {
        assert_eq!(EyeSide::parse(EyeSide::Left.as_str()), Some(EyeSide::Left));
        assert_eq!(EyeSide::parse("Right"), Some(EyeSide::Right));
        assert_eq!(EyeSide::parse("right"), None);
    }

    #[test]
    fn test_new_scan_is_unsaved() {
        let scan = EyeScan::new(vec![1, 2, 3], EyeSide::Left);
        assert!(scan.eye_scan_id.is_none());
        assert_eq!(scan.image, vec![1, 2, 3]);
    }
}
