//! WebAssembly module for the Catering Event Management Platform
//!
//! Provides client-side computation for the picking screens:
//! - Pending-quantity arithmetic
//! - Allocation batch review (container / quantity / excess checks)
//! - FEFO ordering of eligible lots
//! - Container numbering preview

use rust_decimal::Decimal;
use uuid::Uuid;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::planning::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn dec(value: f64) -> Decimal {
    Decimal::try_from(value).unwrap_or(Decimal::ZERO)
}

fn parse_id(s: &str) -> Result<Uuid, JsValue> {
    Uuid::parse_str(s).map_err(|e| JsValue::from_str(&format!("Invalid id: {}", e)))
}

/// Quantity still to allocate for a need, clamped at zero
#[wasm_bindgen]
pub fn pending_quantity(required: f64, assigned: f64) -> f64 {
    let pending = (dec(required) - dec(assigned)).max(Decimal::ZERO);
    pending.to_string().parse().unwrap_or(0.0)
}

/// Whether a need counts as satisfied
#[wasm_bindgen]
pub fn is_need_satisfied(required: f64, assigned: f64) -> bool {
    dec(required) - dec(assigned) <= stock_epsilon()
}

/// Clamp a per-lot input to the lot's remaining availability
#[wasm_bindgen]
pub fn clamp_allocation_entry(requested: f64, remaining: f64) -> f64 {
    clamp_entry(dec(requested), dec(remaining))
        .to_string()
        .parse()
        .unwrap_or(0.0)
}

/// Review a batch allocation before commit
///
/// `entries_json` is a JSON array of `{lot_id, quantity}`; the result is the
/// serialized review outcome (rejected / excess confirmation / ready).
#[wasm_bindgen]
pub fn review_allocation_batch(
    entries_json: &str,
    pending: f64,
    container_selected: bool,
) -> Result<String, JsValue> {
    let entries: Vec<LotAllocationEntry> = serde_json::from_str(entries_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid entries JSON: {}", e)))?;

    let review = review_allocation(&entries, dec(pending), container_selected);
    serde_json::to_string(&review).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Eligible lots for an elaboration, earliest expiry first
#[wasm_bindgen]
pub fn sort_lots_fefo(
    lots_json: &str,
    allocations_json: &str,
    elaboration_id: &str,
) -> Result<String, JsValue> {
    let lots: Vec<ProductionLot> = serde_json::from_str(lots_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid lots JSON: {}", e)))?;
    let allocations: Vec<Allocation> = serde_json::from_str(allocations_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid allocations JSON: {}", e)))?;
    let elaboration_id = parse_id(elaboration_id)?;

    let available = available_lots(elaboration_id, &lots, &allocations);
    serde_json::to_string(&available).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Derive per-milestone needs from milestones, orders, recipes and the
/// event's allocations; returns a map keyed by milestone id
#[allow(clippy::too_many_arguments)]
#[wasm_bindgen]
pub fn compute_event_needs(
    milestones_json: &str,
    orders_json: &str,
    recipes_json: &str,
    elaborations_json: &str,
    lots_json: &str,
    allocations_json: &str,
) -> Result<String, JsValue> {
    let milestones: Vec<EventMilestone> = serde_json::from_str(milestones_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid milestones JSON: {}", e)))?;
    let orders: Vec<GastronomicOrder> = serde_json::from_str(orders_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid orders JSON: {}", e)))?;
    let recipes: Vec<Recipe> = serde_json::from_str(recipes_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid recipes JSON: {}", e)))?;
    let elaborations: Vec<Elaboration> = serde_json::from_str(elaborations_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid elaborations JSON: {}", e)))?;
    let lots: Vec<ProductionLot> = serde_json::from_str(lots_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid lots JSON: {}", e)))?;
    let allocations: Vec<Allocation> = serde_json::from_str(allocations_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid allocations JSON: {}", e)))?;

    let needs = compute_needs(
        &milestones,
        &orders,
        &recipes,
        &elaborations,
        &lots,
        &allocations,
    );
    serde_json::to_string(&needs).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Sequence number the next container of a scope would get
#[wasm_bindgen]
pub fn next_container_number(
    containers_json: &str,
    milestone_id: &str,
    expedition_type: &str,
) -> Result<i32, JsValue> {
    let containers: Vec<Container> = serde_json::from_str(containers_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid containers JSON: {}", e)))?;
    let milestone_id = parse_id(milestone_id)?;
    let expedition_type = ExpeditionType::from_str(expedition_type)
        .ok_or_else(|| JsValue::from_str("Invalid expedition type"))?;

    Ok(next_sequence_number(
        &containers,
        milestone_id,
        expedition_type,
    ))
}
