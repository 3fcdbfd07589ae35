//! Production lot models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::MeasurementUnit;

/// One production run's output of an elaboration ("orden de fabricación")
///
/// Owned by the production workflow; the picking engine only reads it and
/// derives a remaining-available quantity from the allocation ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionLot {
    pub id: Uuid,
    pub elaboration_id: Uuid,
    pub elaboration_name: String,
    /// Actual output of the run, not the planned amount
    pub produced_quantity: Decimal,
    pub unit: MeasurementUnit,
    pub state: LotState,
    pub creation_date: DateTime<Utc>,
    pub completion_date: Option<DateTime<Utc>>,
}

impl ProductionLot {
    /// FEFO ordering key: completion date, falling back to creation date
    pub fn expiry_key(&self) -> DateTime<Utc> {
        self.completion_date.unwrap_or(self.creation_date)
    }

    /// Only accepted lots are visible to the picking engine
    pub fn is_eligible(&self) -> bool {
        self.state == LotState::Accepted
    }
}

/// State of a production lot in the production workflow
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LotState {
    Pending,
    InProgress,
    Accepted,
    Discarded,
}

impl LotState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LotState::Pending => "pending",
            LotState::InProgress => "in_progress",
            LotState::Accepted => "accepted",
            LotState::Discarded => "discarded",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(LotState::Pending),
            "in_progress" => Some(LotState::InProgress),
            "accepted" => Some(LotState::Accepted),
            "discarded" => Some(LotState::Discarded),
            _ => None,
        }
    }
}

impl std::fmt::Display for LotState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LotState::Pending => write!(f, "Pending"),
            LotState::InProgress => write!(f, "In Progress"),
            LotState::Accepted => write!(f, "Accepted"),
            LotState::Discarded => write!(f, "Discarded"),
        }
    }
}
