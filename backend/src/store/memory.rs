//! In-memory picking store for tests and offline fixtures

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use shared::{
    Allocation, Elaboration, EventMilestone, GastronomicOrder, PickingState, ProductionLot, Recipe,
};

use crate::error::AppResult;

use super::PickingStore;

/// Picking store backed by process memory; same semantics as the SQL store
#[derive(Clone, Default)]
pub struct MemoryPickingStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    picking_states: HashMap<Uuid, PickingState>,
    lots: Vec<ProductionLot>,
    elaborations: Vec<Elaboration>,
    recipes: Vec<Recipe>,
    milestones: Vec<EventMilestone>,
    orders: Vec<GastronomicOrder>,
}

impl MemoryPickingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_lot(&self, lot: ProductionLot) {
        self.inner.write().await.lots.push(lot);
    }

    /// Simulates the production workflow deleting a lot out from under the
    /// picking engine (orphaned-allocation scenario)
    pub async fn remove_lot(&self, lot_id: Uuid) {
        self.inner.write().await.lots.retain(|l| l.id != lot_id);
    }

    pub async fn add_elaboration(&self, elaboration: Elaboration) {
        self.inner.write().await.elaborations.push(elaboration);
    }

    pub async fn add_recipe(&self, recipe: Recipe) {
        self.inner.write().await.recipes.push(recipe);
    }

    pub async fn add_milestone(&self, milestone: EventMilestone) {
        self.inner.write().await.milestones.push(milestone);
    }

    pub async fn add_order(&self, order: GastronomicOrder) {
        self.inner.write().await.orders.push(order);
    }
}

impl PickingStore for MemoryPickingStore {
    async fn get_picking_state(&self, event_id: Uuid) -> AppResult<Option<PickingState>> {
        Ok(self.inner.read().await.picking_states.get(&event_id).cloned())
    }

    async fn save_picking_state(&self, state: &PickingState) -> AppResult<()> {
        self.inner
            .write()
            .await
            .picking_states
            .insert(state.event_id, state.clone());
        Ok(())
    }

    async fn get_lots(&self) -> AppResult<Vec<ProductionLot>> {
        Ok(self.inner.read().await.lots.clone())
    }

    async fn get_elaborations(&self) -> AppResult<Vec<Elaboration>> {
        Ok(self.inner.read().await.elaborations.clone())
    }

    async fn get_recipes(&self) -> AppResult<Vec<Recipe>> {
        Ok(self.inner.read().await.recipes.clone())
    }

    async fn get_event_milestones(&self, event_id: Uuid) -> AppResult<Vec<EventMilestone>> {
        let mut milestones: Vec<EventMilestone> = self
            .inner
            .read()
            .await
            .milestones
            .iter()
            .filter(|m| m.event_id == event_id)
            .cloned()
            .collect();
        milestones.sort_by_key(|m| m.date);
        Ok(milestones)
    }

    async fn get_orders_for_milestones(
        &self,
        milestone_ids: &[Uuid],
    ) -> AppResult<Vec<GastronomicOrder>> {
        Ok(self
            .inner
            .read()
            .await
            .orders
            .iter()
            .filter(|o| milestone_ids.contains(&o.milestone_id))
            .cloned()
            .collect())
    }

    async fn get_allocations_across_events(&self) -> AppResult<Vec<Allocation>> {
        Ok(self
            .inner
            .read()
            .await
            .picking_states
            .values()
            .flat_map(|state| state.allocations.iter().cloned())
            .collect())
    }
}
