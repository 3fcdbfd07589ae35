//! Picking service: needs board, batch allocation, containers, status
//!
//! Every operation is one read-snapshot → compute → write-back cycle over
//! the event's picking aggregate. There is no locking; the aggregate write
//! is last-write-wins, and cross-event lot stock is a shared pool guarded
//! only by the excess-confirmation step.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use shared::planning::{
    available_lots, clamp_entry, compute_needs, is_complete, orphaned_allocations, pending_needs,
    prepare_entries, remaining_quantity, review_allocation, AllocationReview, RejectionReason,
};
use shared::{
    Allocation, AvailableLot, Container, Elaboration, EventMilestone, ExpeditionType,
    GastronomicOrder, LotAllocationEntry, Need, PickingState, PickingStatus, ProductionLot, Recipe,
};

use crate::error::{AppError, AppResult};
use crate::store::PickingStore;

/// Picking service for one backing store
#[derive(Clone)]
pub struct PickingService<S: PickingStore> {
    store: S,
}

/// Everything one operation needs, read in one go
struct Snapshot {
    state: PickingState,
    lots: Vec<ProductionLot>,
    elaborations: Vec<Elaboration>,
    recipes: Vec<Recipe>,
    milestones: Vec<EventMilestone>,
    orders: Vec<GastronomicOrder>,
    /// Allocations of every event, for the shared-pool remaining view
    all_allocations: Vec<Allocation>,
}

impl Snapshot {
    fn needs(&self) -> BTreeMap<Uuid, Vec<Need>> {
        compute_needs(
            &self.milestones,
            &self.orders,
            &self.recipes,
            &self.elaborations,
            &self.lots,
            &self.state.allocations,
        )
    }
}

/// Operator-facing view of an event's picking
#[derive(Debug, Clone, Serialize)]
pub struct PickingBoard {
    pub event_id: Uuid,
    pub status: PickingStatus,
    pub is_complete: bool,
    pub milestones: Vec<MilestoneBoard>,
    /// Allocations whose lot was deleted upstream; kept for reconciliation
    pub orphaned_allocations: Vec<Uuid>,
}

/// One catering milestone: pending needs and its container pool
#[derive(Debug, Clone, Serialize)]
pub struct MilestoneBoard {
    pub milestone: EventMilestone,
    pub needs: Vec<NeedLine>,
    pub containers: Vec<Container>,
}

/// A pending need with its FEFO-ordered eligible lots
#[derive(Debug, Clone, Serialize)]
pub struct NeedLine {
    #[serde(flatten)]
    pub need: Need,
    pub pending_quantity: Decimal,
    pub eligible_lots: Vec<AvailableLot>,
}

/// Target container of a batch allocation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContainerTarget {
    Existing { container_id: Uuid },
    New { expedition_type: ExpeditionType },
}

/// Per-lot quantity entered by the operator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotQuantityInput {
    pub lot_id: Uuid,
    pub quantity: Decimal,
}

/// Input for committing a batch allocation against one need
#[derive(Debug, Deserialize, Validate)]
pub struct CommitAllocationInput {
    pub milestone_id: Uuid,
    pub elaboration_id: Uuid,
    pub container: ContainerTarget,
    #[validate(length(min = 1, message = "At least one lot entry is required"))]
    pub entries: Vec<LotQuantityInput>,
    /// Operator's explicit approval of an allocation beyond the pending need
    #[serde(default)]
    pub confirm_excess: bool,
}

/// Result of a commit attempt
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CommitOutcome {
    Committed { allocations: Vec<Allocation> },
    /// More than the pending need was requested and the operator has not
    /// confirmed yet; nothing was committed
    ExcessConfirmationRequired {
        requested: Decimal,
        pending: Decimal,
        excess: Decimal,
    },
}

impl<S: PickingStore> PickingService<S> {
    /// Create a new PickingService instance
    pub fn new(store: S) -> Self {
        Self { store }
    }

    async fn load_snapshot(&self, event_id: Uuid) -> AppResult<Snapshot> {
        let state = self
            .store
            .get_picking_state(event_id)
            .await?
            .unwrap_or_else(|| PickingState::new(event_id));
        let milestones = self.store.get_event_milestones(event_id).await?;
        let milestone_ids: Vec<Uuid> = milestones.iter().map(|m| m.id).collect();
        let orders = self.store.get_orders_for_milestones(&milestone_ids).await?;

        Ok(Snapshot {
            state,
            lots: self.store.get_lots().await?,
            elaborations: self.store.get_elaborations().await?,
            recipes: self.store.get_recipes().await?,
            milestones,
            orders,
            all_allocations: self.store.get_allocations_across_events().await?,
        })
    }

    /// The operator-facing board: per catering milestone, the pending needs
    /// (each with its eligible lots) and the container pool
    pub async fn get_board(&self, event_id: Uuid) -> AppResult<PickingBoard> {
        let snapshot = self.load_snapshot(event_id).await?;
        let needs = snapshot.needs();
        let pending = pending_needs(&needs);

        let orphaned = orphaned_allocations(&snapshot.state.allocations, &snapshot.lots);
        if !orphaned.is_empty() {
            tracing::warn!(
                event_id = %event_id,
                count = orphaned.len(),
                "picking state references lots that no longer exist"
            );
        }

        let milestones = snapshot
            .milestones
            .iter()
            .filter(|m| m.requires_catering)
            .map(|milestone| {
                let needs = pending
                    .get(&milestone.id)
                    .map(|needs| {
                        needs
                            .iter()
                            .map(|need| NeedLine {
                                pending_quantity: need.pending_quantity(),
                                eligible_lots: available_lots(
                                    need.elaboration_id,
                                    &snapshot.lots,
                                    &snapshot.all_allocations,
                                ),
                                need: need.clone(),
                            })
                            .collect()
                    })
                    .unwrap_or_default();

                let mut containers: Vec<Container> = snapshot
                    .state
                    .containers
                    .iter()
                    .filter(|c| c.milestone_id == milestone.id)
                    .cloned()
                    .collect();
                containers
                    .sort_by_key(|c| (c.expedition_type.as_str(), c.sequence_number));

                MilestoneBoard {
                    milestone: milestone.clone(),
                    needs,
                    containers,
                }
            })
            .collect();

        Ok(PickingBoard {
            event_id,
            status: snapshot.state.status,
            is_complete: is_complete(&needs),
            milestones,
            orphaned_allocations: orphaned,
        })
    }

    /// Validate and commit a batch allocation for one need
    ///
    /// Validation order: container, then total quantity, then excess over
    /// the pending need. An unconfirmed excess commits nothing and reports
    /// the amounts back; a declined excess is simply never re-submitted.
    pub async fn commit_allocation(
        &self,
        event_id: Uuid,
        input: CommitAllocationInput,
    ) -> AppResult<CommitOutcome> {
        input.validate().map_err(|e| AppError::Validation {
            field: "entries".to_string(),
            message: e.to_string(),
            message_es: "Los datos de la asignación no son válidos".to_string(),
        })?;

        let mut snapshot = self.load_snapshot(event_id).await?;

        if !snapshot
            .milestones
            .iter()
            .any(|m| m.id == input.milestone_id)
        {
            return Err(AppError::NotFound("Milestone".to_string()));
        }

        // Validation step 1: the target container must resolve
        if let ContainerTarget::Existing { container_id } = input.container {
            let container = snapshot.state.container(container_id).ok_or_else(|| {
                AppError::Validation {
                    field: RejectionReason::NoContainer.field().to_string(),
                    message: RejectionReason::NoContainer.message_en().to_string(),
                    message_es: RejectionReason::NoContainer.message_es().to_string(),
                }
            })?;
            // Containers are scoped to one milestone
            if container.milestone_id != input.milestone_id {
                return Err(AppError::Validation {
                    field: "container".to_string(),
                    message: "Container belongs to another milestone".to_string(),
                    message_es: "El contenedor pertenece a otro hito".to_string(),
                });
            }
        }

        // Clamp each entry to its lot's remaining cross-event availability
        let mut entries = Vec::with_capacity(input.entries.len());
        for entry in &input.entries {
            let lot = snapshot
                .lots
                .iter()
                .find(|l| l.id == entry.lot_id)
                .ok_or_else(|| AppError::NotFound("Production lot".to_string()))?;
            let remaining = remaining_quantity(lot, &snapshot.all_allocations);
            entries.push(LotAllocationEntry {
                lot_id: entry.lot_id,
                quantity: clamp_entry(entry.quantity, remaining),
            });
        }

        let pending = snapshot
            .needs()
            .get(&input.milestone_id)
            .and_then(|needs| {
                needs
                    .iter()
                    .find(|n| n.elaboration_id == input.elaboration_id)
                    .map(|n| n.pending_quantity())
            })
            .unwrap_or(Decimal::ZERO);

        match review_allocation(&entries, pending, true) {
            AllocationReview::Rejected { reason } => Err(AppError::Validation {
                field: reason.field().to_string(),
                message: reason.message_en().to_string(),
                message_es: reason.message_es().to_string(),
            }),
            AllocationReview::ExcessConfirmationRequired {
                requested,
                pending,
                excess,
            } if !input.confirm_excess => Ok(CommitOutcome::ExcessConfirmationRequired {
                requested,
                pending,
                excess,
            }),
            review => {
                if let AllocationReview::ExcessConfirmationRequired { excess, .. } = &review {
                    tracing::warn!(
                        event_id = %event_id,
                        elaboration_id = %input.elaboration_id,
                        %excess,
                        "operator confirmed an allocation beyond the pending need"
                    );
                }

                let container_id = match input.container {
                    ContainerTarget::Existing { container_id } => container_id,
                    ContainerTarget::New { expedition_type } => {
                        snapshot
                            .state
                            .add_container(input.milestone_id, expedition_type)
                            .id
                    }
                };

                let allocations = snapshot.state.allocate(
                    &prepare_entries(&entries),
                    container_id,
                    input.milestone_id,
                )?;

                self.store.save_picking_state(&snapshot.state).await?;
                tracing::info!(
                    event_id = %event_id,
                    container_id = %container_id,
                    rows = allocations.len(),
                    "allocation committed"
                );
                Ok(CommitOutcome::Committed { allocations })
            }
        }
    }

    /// Remove one allocation and restore the lot's availability
    pub async fn deallocate(&self, event_id: Uuid, allocation_id: Uuid) -> AppResult<Allocation> {
        let mut state = self
            .store
            .get_picking_state(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Allocation".to_string()))?;

        let removed = state.deallocate(allocation_id)?;
        self.store.save_picking_state(&state).await?;
        Ok(removed)
    }

    /// Add an empty container to a milestone's pool
    pub async fn add_container(
        &self,
        event_id: Uuid,
        milestone_id: Uuid,
        expedition_type: ExpeditionType,
    ) -> AppResult<Container> {
        let milestones = self.store.get_event_milestones(event_id).await?;
        if !milestones.iter().any(|m| m.id == milestone_id) {
            return Err(AppError::NotFound("Milestone".to_string()));
        }

        let mut state = self
            .store
            .get_picking_state(event_id)
            .await?
            .unwrap_or_else(|| PickingState::new(event_id));
        let container = state.add_container(milestone_id, expedition_type);
        self.store.save_picking_state(&state).await?;
        Ok(container)
    }

    /// Remove a container and every allocation packed into it
    pub async fn remove_container(&self, event_id: Uuid, container_id: Uuid) -> AppResult<()> {
        let mut state = self
            .store
            .get_picking_state(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Container".to_string()))?;

        let removed_allocations = state.remove_container(container_id)?;
        self.store.save_picking_state(&state).await?;
        tracing::info!(
            event_id = %event_id,
            container_id = %container_id,
            removed_allocations,
            "container removed"
        );
        Ok(())
    }

    /// Restart picking: clear containers and allocations; idempotent
    pub async fn reset(&self, event_id: Uuid) -> AppResult<()> {
        let mut state = self
            .store
            .get_picking_state(event_id)
            .await?
            .unwrap_or_else(|| PickingState::new(event_id));
        state.reset();
        self.store.save_picking_state(&state).await?;
        tracing::info!(event_id = %event_id, "picking restarted");
        Ok(())
    }

    /// Change the expedition status; anything past `Pending` requires every
    /// need to be satisfied
    pub async fn set_status(&self, event_id: Uuid, status: PickingStatus) -> AppResult<()> {
        let mut snapshot = self.load_snapshot(event_id).await?;

        if status.requires_completion() {
            let needs = snapshot.needs();
            if !is_complete(&needs) {
                let pending = pending_needs(&needs);
                return Err(AppError::IncompletePicking {
                    pending_needs: pending.values().map(Vec::len).sum(),
                });
            }
        }

        snapshot.state.status = status;
        self.store.save_picking_state(&snapshot.state).await?;
        tracing::info!(event_id = %event_id, status = %status, "picking status updated");
        Ok(())
    }

    /// Whether every need across every catering milestone is satisfied
    pub async fn is_complete(&self, event_id: Uuid) -> AppResult<bool> {
        let snapshot = self.load_snapshot(event_id).await?;
        Ok(is_complete(&snapshot.needs()))
    }
}
