//! Persistence abstraction for picking state and source records
//!
//! The picking algorithms are pure functions over explicit inputs; this
//! trait is the only place the backend touches durable storage. Source
//! records (lots, recipes, orders, milestones) are owned by the wider
//! platform and read-only here.

mod memory;
mod postgres;

pub use memory::MemoryPickingStore;
pub use postgres::PgPickingStore;

use uuid::Uuid;

use shared::{
    Allocation, Elaboration, EventMilestone, GastronomicOrder, PickingState, ProductionLot, Recipe,
};

use crate::error::AppResult;

/// Repository interface for the picking subsystem
#[allow(async_fn_in_trait)]
pub trait PickingStore {
    /// The persisted aggregate for one event, if picking has started
    async fn get_picking_state(&self, event_id: Uuid) -> AppResult<Option<PickingState>>;

    /// Write the whole aggregate back in one shot (last write wins)
    async fn save_picking_state(&self, state: &PickingState) -> AppResult<()>;

    /// All production lots in the system, regardless of state
    async fn get_lots(&self) -> AppResult<Vec<ProductionLot>>;

    async fn get_elaborations(&self) -> AppResult<Vec<Elaboration>>;

    async fn get_recipes(&self) -> AppResult<Vec<Recipe>>;

    /// Milestones of one event, in date order
    async fn get_event_milestones(&self, event_id: Uuid) -> AppResult<Vec<EventMilestone>>;

    async fn get_orders_for_milestones(
        &self,
        milestone_ids: &[Uuid],
    ) -> AppResult<Vec<GastronomicOrder>>;

    /// Every allocation of every event — the shared-pool view used to
    /// compute remaining lot stock
    async fn get_allocations_across_events(&self) -> AppResult<Vec<Allocation>>;
}
