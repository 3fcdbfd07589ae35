//! Elaboration catalog models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::MeasurementUnit;

/// A prepared food item produced in bulk and portioned across events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Elaboration {
    pub id: Uuid,
    pub name: String,
    /// Unit the production workflow reports quantities in
    pub production_unit: MeasurementUnit,
    /// Storage class that decides which container pool the item ships in
    pub expedition_type: ExpeditionType,
}

/// Expedition storage class of an elaboration and its containers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExpeditionType {
    Refrigerated,
    Frozen,
    Dry,
}

impl ExpeditionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpeditionType::Refrigerated => "refrigerated",
            ExpeditionType::Frozen => "frozen",
            ExpeditionType::Dry => "dry",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "refrigerated" => Some(ExpeditionType::Refrigerated),
            "frozen" => Some(ExpeditionType::Frozen),
            "dry" => Some(ExpeditionType::Dry),
            _ => None,
        }
    }
}

impl std::fmt::Display for ExpeditionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpeditionType::Refrigerated => write!(f, "Refrigerated"),
            ExpeditionType::Frozen => write!(f, "Frozen"),
            ExpeditionType::Dry => write!(f, "Dry"),
        }
    }
}
