//! Allocation planner: batch construction checks for one need

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::LotAllocationEntry;

/// Clamp a per-lot input to what the lot can still provide
pub fn clamp_entry(requested: Decimal, remaining: Decimal) -> Decimal {
    requested.max(Decimal::ZERO).min(remaining.max(Decimal::ZERO))
}

/// Outcome of reviewing a batch allocation before commit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AllocationReview {
    /// Blocking validation failure; nothing may be committed
    Rejected { reason: RejectionReason },
    /// More than the pending need: allowed, but only after the operator
    /// explicitly confirms the excess
    ExcessConfirmationRequired {
        requested: Decimal,
        pending: Decimal,
        excess: Decimal,
    },
    Ready { total: Decimal },
}

/// Why a batch allocation was rejected outright
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    NoContainer,
    NoQuantity,
}

impl RejectionReason {
    pub fn field(&self) -> &'static str {
        match self {
            RejectionReason::NoContainer => "container",
            RejectionReason::NoQuantity => "quantity",
        }
    }

    pub fn message_en(&self) -> &'static str {
        match self {
            RejectionReason::NoContainer => "Select a container",
            RejectionReason::NoQuantity => "Enter a quantity greater than zero",
        }
    }

    pub fn message_es(&self) -> &'static str {
        match self {
            RejectionReason::NoContainer => "Selecciona un contenedor",
            RejectionReason::NoQuantity => "Introduce una cantidad mayor que cero",
        }
    }
}

/// Apply the planner validation sequence to a batch of entries
///
/// Order matters: missing container, then non-positive total, then excess
/// over the pending need. Entries are expected to be already clamped to
/// each lot's remaining availability.
pub fn review_allocation(
    entries: &[LotAllocationEntry],
    pending_quantity: Decimal,
    container_selected: bool,
) -> AllocationReview {
    if !container_selected {
        return AllocationReview::Rejected {
            reason: RejectionReason::NoContainer,
        };
    }

    let total: Decimal = entries.iter().map(|e| e.quantity).sum();
    if total <= Decimal::ZERO {
        return AllocationReview::Rejected {
            reason: RejectionReason::NoQuantity,
        };
    }

    if total > pending_quantity {
        return AllocationReview::ExcessConfirmationRequired {
            requested: total,
            pending: pending_quantity,
            excess: total - pending_quantity,
        };
    }

    AllocationReview::Ready { total }
}

/// Drop zero-quantity rows before handing the batch to the ledger
pub fn prepare_entries(entries: &[LotAllocationEntry]) -> Vec<LotAllocationEntry> {
    entries
        .iter()
        .filter(|e| e.quantity > Decimal::ZERO)
        .cloned()
        .collect()
}
