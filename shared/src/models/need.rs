//! Derived picking views: needs and lot availability

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ExpeditionType, ProductionLot};
use crate::types::MeasurementUnit;
use crate::validation::stock_epsilon;

/// Demand for one elaboration at one milestone, net of assignments
///
/// Derived on every read; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Need {
    pub elaboration_id: Uuid,
    pub elaboration_name: String,
    pub milestone_id: Uuid,
    pub expedition_type: ExpeditionType,
    pub unit: MeasurementUnit,
    pub required_quantity: Decimal,
    pub assigned_quantity: Decimal,
}

impl Need {
    /// Quantity still to allocate, clamped at zero for display
    pub fn pending_quantity(&self) -> Decimal {
        (self.required_quantity - self.assigned_quantity).max(Decimal::ZERO)
    }

    /// Raw required minus assigned; negative under over-allocation
    pub fn outstanding(&self) -> Decimal {
        self.required_quantity - self.assigned_quantity
    }

    pub fn is_satisfied(&self) -> bool {
        self.outstanding() <= stock_epsilon()
    }
}

/// An eligible lot together with its remaining cross-event availability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableLot {
    pub lot: ProductionLot,
    pub remaining_quantity: Decimal,
}
