//! Validation utilities for the Catering Event Management Platform
//!
//! Quantity thresholds and input checks shared by the backend services and
//! the browser bundle.

use rust_decimal::Decimal;

use crate::models::LotAllocationEntry;

// ============================================================================
// Quantity Thresholds
// ============================================================================

/// Demand contributions below this are rounding noise, not real demand
pub fn demand_threshold() -> Decimal {
    Decimal::new(1, 2) // 0.01
}

/// Tolerance for stock availability and need-satisfaction comparisons
pub fn stock_epsilon() -> Decimal {
    Decimal::new(1, 3) // 0.001
}

/// Whether a computed demand contribution should be discarded
pub fn is_demand_noise(quantity: Decimal) -> bool {
    quantity < demand_threshold()
}

// ============================================================================
// Quantity Validations
// ============================================================================

/// Validate that a quantity is strictly positive
pub fn validate_positive_quantity(quantity: Decimal) -> Result<(), &'static str> {
    if quantity <= Decimal::ZERO {
        return Err("Quantity must be greater than zero");
    }
    Ok(())
}

/// Validate a recipe elaboration ratio
pub fn validate_ratio(ratio: Decimal) -> Result<(), &'static str> {
    if ratio <= Decimal::ZERO {
        return Err("Elaboration ratio must be greater than zero");
    }
    Ok(())
}

/// Validate a batch of allocation entries: no negative quantities, and at
/// least one strictly positive entry
pub fn validate_allocation_entries(entries: &[LotAllocationEntry]) -> Result<(), &'static str> {
    if entries.iter().any(|e| e.quantity < Decimal::ZERO) {
        return Err("Allocation quantities cannot be negative");
    }
    let total: Decimal = entries.iter().map(|e| e.quantity).sum();
    if total <= Decimal::ZERO {
        return Err("Total allocated quantity must be greater than zero");
    }
    Ok(())
}
