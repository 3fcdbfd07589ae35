//! Need aggregation across gastronomic orders and recipes

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{
    Allocation, Elaboration, EventMilestone, GastronomicOrder, Need, ProductionLot, Recipe,
};
use crate::validation::is_demand_noise;

/// Derive the needs of an event, one list per catering milestone
///
/// Demand accumulates as `line quantity × elaboration ratio` over every item
/// line of every gastronomic order of the milestone. Needs merge by
/// elaboration id — two recipes sharing an elaboration sum into one need.
/// Contributions and accumulated needs below the demand threshold are
/// dropped as rounding noise. `event_allocations` is this event's ledger;
/// entries whose lot or referenced elaboration no longer resolves are
/// skipped rather than raised.
pub fn compute_needs(
    milestones: &[EventMilestone],
    orders: &[GastronomicOrder],
    recipes: &[Recipe],
    elaborations: &[Elaboration],
    lots: &[ProductionLot],
    event_allocations: &[Allocation],
) -> BTreeMap<Uuid, Vec<Need>> {
    let recipes_by_id: HashMap<Uuid, &Recipe> = recipes.iter().map(|r| (r.id, r)).collect();
    let elaborations_by_id: HashMap<Uuid, &Elaboration> =
        elaborations.iter().map(|e| (e.id, e)).collect();
    let lot_elaboration: HashMap<Uuid, Uuid> =
        lots.iter().map(|l| (l.id, l.elaboration_id)).collect();

    let mut needs_by_milestone = BTreeMap::new();

    for milestone in milestones.iter().filter(|m| m.requires_catering) {
        let mut required: HashMap<Uuid, Decimal> = HashMap::new();

        for order in orders.iter().filter(|o| o.milestone_id == milestone.id) {
            for line in &order.lines {
                let Some(recipe_id) = line.demand_recipe() else {
                    continue;
                };
                let Some(recipe) = recipes_by_id.get(&recipe_id) else {
                    continue;
                };
                for component in &recipe.elaborations {
                    let contribution = line.quantity * component.ratio;
                    if is_demand_noise(contribution) {
                        continue;
                    }
                    *required.entry(component.elaboration_id).or_default() += contribution;
                }
            }
        }

        let mut assigned: HashMap<Uuid, Decimal> = HashMap::new();
        for allocation in event_allocations
            .iter()
            .filter(|a| a.milestone_id == milestone.id)
        {
            if let Some(elaboration_id) = lot_elaboration.get(&allocation.lot_id) {
                *assigned.entry(*elaboration_id).or_default() += allocation.quantity;
            }
        }

        let mut needs: Vec<Need> = required
            .into_iter()
            .filter(|(_, quantity)| !is_demand_noise(*quantity))
            .filter_map(|(elaboration_id, required_quantity)| {
                let elaboration = elaborations_by_id.get(&elaboration_id)?;
                Some(Need {
                    elaboration_id,
                    elaboration_name: elaboration.name.clone(),
                    milestone_id: milestone.id,
                    expedition_type: elaboration.expedition_type,
                    unit: elaboration.production_unit,
                    required_quantity,
                    assigned_quantity: assigned
                        .get(&elaboration_id)
                        .copied()
                        .unwrap_or(Decimal::ZERO),
                })
            })
            .collect();

        needs.sort_by(|a, b| {
            a.elaboration_name
                .cmp(&b.elaboration_name)
                .then_with(|| a.elaboration_id.cmp(&b.elaboration_id))
        });

        // A milestone with no accumulated demand contributes no entry
        if !needs.is_empty() {
            needs_by_milestone.insert(milestone.id, needs);
        }
    }

    needs_by_milestone
}

/// The operator-facing list: needs still waiting for stock
///
/// Satisfied needs (required minus assigned within the epsilon) never
/// appear, so a displayed pending quantity is always positive.
pub fn pending_needs(needs_by_milestone: &BTreeMap<Uuid, Vec<Need>>) -> BTreeMap<Uuid, Vec<Need>> {
    needs_by_milestone
        .iter()
        .filter_map(|(milestone_id, needs)| {
            let pending: Vec<Need> = needs
                .iter()
                .filter(|n| !n.is_satisfied())
                .cloned()
                .collect();
            if pending.is_empty() {
                None
            } else {
                Some((*milestone_id, pending))
            }
        })
        .collect()
}
