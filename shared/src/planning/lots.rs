//! Lot ledger: cross-event remaining availability and FEFO ordering

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{Allocation, AvailableLot, ProductionLot};
use crate::validation::stock_epsilon;

/// Total quantity drawn from a lot, summed across every event in the system
pub fn allocated_quantity(lot_id: Uuid, allocations: &[Allocation]) -> Decimal {
    allocations
        .iter()
        .filter(|a| a.lot_id == lot_id)
        .map(|a| a.quantity)
        .sum()
}

/// Produced quantity minus everything already allocated, cross-event
///
/// Lot stock is a shared pool; the subtraction can go negative under
/// confirmed over-allocation.
pub fn remaining_quantity(lot: &ProductionLot, allocations: &[Allocation]) -> Decimal {
    lot.produced_quantity - allocated_quantity(lot.id, allocations)
}

/// Eligible lots for an elaboration, earliest expiry first (FEFO)
///
/// Only accepted lots with remaining stock above the epsilon are returned.
/// Ties on the expiry key fall back to creation date, then lot id, so the
/// ordering is deterministic across reads.
pub fn available_lots(
    elaboration_id: Uuid,
    lots: &[ProductionLot],
    allocations: &[Allocation],
) -> Vec<AvailableLot> {
    let mut available: Vec<AvailableLot> = lots
        .iter()
        .filter(|l| l.elaboration_id == elaboration_id && l.is_eligible())
        .map(|l| AvailableLot {
            lot: l.clone(),
            remaining_quantity: remaining_quantity(l, allocations),
        })
        .filter(|a| a.remaining_quantity > stock_epsilon())
        .collect();

    available.sort_by(|a, b| {
        a.lot
            .expiry_key()
            .cmp(&b.lot.expiry_key())
            .then_with(|| a.lot.creation_date.cmp(&b.lot.creation_date))
            .then_with(|| a.lot.id.cmp(&b.lot.id))
    });
    available
}

/// Allocation ids whose lot no longer resolves against the current lot set
///
/// Deleting a lot does not cascade into existing allocations; such entries
/// are skipped by the aggregation and reported for reconciliation.
pub fn orphaned_allocations(allocations: &[Allocation], lots: &[ProductionLot]) -> Vec<Uuid> {
    allocations
        .iter()
        .filter(|a| !lots.iter().any(|l| l.id == a.lot_id))
        .map(|a| a.id)
        .collect()
}
