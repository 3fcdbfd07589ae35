//! Picking state: the per-event allocation ledger and container registry

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::ExpeditionType;

/// Expedition status of an event's picking
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PickingStatus {
    Pending,
    Prepared,
    Shipped,
    Delivered,
    Returned,
}

impl PickingStatus {
    /// Position in the forward expedition flow
    pub fn rank(&self) -> u8 {
        match self {
            PickingStatus::Pending => 0,
            PickingStatus::Prepared => 1,
            PickingStatus::Shipped => 2,
            PickingStatus::Delivered => 3,
            PickingStatus::Returned => 4,
        }
    }

    /// Every status except `Pending` requires all needs to be satisfied
    pub fn requires_completion(&self) -> bool {
        !matches!(self, PickingStatus::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PickingStatus::Pending => "pending",
            PickingStatus::Prepared => "prepared",
            PickingStatus::Shipped => "shipped",
            PickingStatus::Delivered => "delivered",
            PickingStatus::Returned => "returned",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(PickingStatus::Pending),
            "prepared" => Some(PickingStatus::Prepared),
            "shipped" => Some(PickingStatus::Shipped),
            "delivered" => Some(PickingStatus::Delivered),
            "returned" => Some(PickingStatus::Returned),
            _ => None,
        }
    }
}

impl std::fmt::Display for PickingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PickingStatus::Pending => write!(f, "Pending"),
            PickingStatus::Prepared => write!(f, "Prepared"),
            PickingStatus::Shipped => write!(f, "Shipped"),
            PickingStatus::Delivered => write!(f, "Delivered"),
            PickingStatus::Returned => write!(f, "Returned"),
        }
    }
}

/// A physical expedition unit scoped to one milestone and storage class
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Container {
    pub id: Uuid,
    pub milestone_id: Uuid,
    pub expedition_type: ExpeditionType,
    /// 1-based, unique within `(milestone_id, expedition_type)`
    pub sequence_number: i32,
}

/// Quantity assigned from one lot into one container for one milestone
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Allocation {
    pub id: Uuid,
    pub lot_id: Uuid,
    pub container_id: Uuid,
    pub milestone_id: Uuid,
    pub quantity: Decimal,
}

/// One (lot, quantity) pair of a batch allocation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LotAllocationEntry {
    pub lot_id: Uuid,
    pub quantity: Decimal,
}

/// Ledger operation failures; none of them leave partial state behind
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("container {0} not found in picking state")]
    ContainerNotFound(Uuid),

    #[error("allocation {0} not found in picking state")]
    AllocationNotFound(Uuid),

    #[error("total allocated quantity must be greater than zero")]
    EmptyAllocation,
}

/// Next container number for a `(milestone, expedition type)` scope
///
/// Monotonic: numbers freed by deletion are never handed out again.
pub fn next_sequence_number(
    containers: &[Container],
    milestone_id: Uuid,
    expedition_type: ExpeditionType,
) -> i32 {
    containers
        .iter()
        .filter(|c| c.milestone_id == milestone_id && c.expedition_type == expedition_type)
        .map(|c| c.sequence_number)
        .max()
        .unwrap_or(0)
        + 1
}

/// Per-event picking aggregate, persisted as one document keyed by event id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickingState {
    pub event_id: Uuid,
    pub status: PickingStatus,
    pub containers: Vec<Container>,
    pub allocations: Vec<Allocation>,
}

impl PickingState {
    /// Fresh state for an event that has not started picking
    pub fn new(event_id: Uuid) -> Self {
        Self {
            event_id,
            status: PickingStatus::Pending,
            containers: Vec::new(),
            allocations: Vec::new(),
        }
    }

    pub fn container(&self, container_id: Uuid) -> Option<&Container> {
        self.containers.iter().find(|c| c.id == container_id)
    }

    /// Containers of one milestone and storage class, in sequence order
    pub fn containers_for(
        &self,
        milestone_id: Uuid,
        expedition_type: ExpeditionType,
    ) -> Vec<&Container> {
        let mut containers: Vec<&Container> = self
            .containers
            .iter()
            .filter(|c| c.milestone_id == milestone_id && c.expedition_type == expedition_type)
            .collect();
        containers.sort_by_key(|c| c.sequence_number);
        containers
    }

    pub fn allocations_for_milestone(&self, milestone_id: Uuid) -> Vec<&Allocation> {
        self.allocations
            .iter()
            .filter(|a| a.milestone_id == milestone_id)
            .collect()
    }

    /// Create a container; numbering is monotonic per scope and never reuses
    /// a number freed by deletion
    pub fn add_container(
        &mut self,
        milestone_id: Uuid,
        expedition_type: ExpeditionType,
    ) -> Container {
        let container = Container {
            id: Uuid::new_v4(),
            milestone_id,
            expedition_type,
            sequence_number: next_sequence_number(&self.containers, milestone_id, expedition_type),
        };
        self.containers.push(container.clone());
        container
    }

    /// Remove a container and every allocation packed into it; returns the
    /// number of allocations that were cascade-deleted
    pub fn remove_container(&mut self, container_id: Uuid) -> Result<usize, LedgerError> {
        if self.container(container_id).is_none() {
            return Err(LedgerError::ContainerNotFound(container_id));
        }
        self.containers.retain(|c| c.id != container_id);
        let before = self.allocations.len();
        self.allocations.retain(|a| a.container_id != container_id);
        Ok(before - self.allocations.len())
    }

    /// Append one allocation per entry with positive quantity
    ///
    /// The ledger does not cap quantities against remaining stock; clamping
    /// happens at planner input time. It does refuse a batch whose total is
    /// not positive or whose target container does not exist.
    pub fn allocate(
        &mut self,
        entries: &[LotAllocationEntry],
        container_id: Uuid,
        milestone_id: Uuid,
    ) -> Result<Vec<Allocation>, LedgerError> {
        if self.container(container_id).is_none() {
            return Err(LedgerError::ContainerNotFound(container_id));
        }
        let total: Decimal = entries.iter().map(|e| e.quantity).sum();
        if total <= Decimal::ZERO {
            return Err(LedgerError::EmptyAllocation);
        }

        let created: Vec<Allocation> = entries
            .iter()
            .filter(|e| e.quantity > Decimal::ZERO)
            .map(|e| Allocation {
                id: Uuid::new_v4(),
                lot_id: e.lot_id,
                container_id,
                milestone_id,
                quantity: e.quantity,
            })
            .collect();

        self.allocations.extend(created.iter().cloned());
        Ok(created)
    }

    /// Remove exactly one allocation
    pub fn deallocate(&mut self, allocation_id: Uuid) -> Result<Allocation, LedgerError> {
        let index = self
            .allocations
            .iter()
            .position(|a| a.id == allocation_id)
            .ok_or(LedgerError::AllocationNotFound(allocation_id))?;
        Ok(self.allocations.remove(index))
    }

    /// Clear containers and allocations ("restart picking"); idempotent
    pub fn reset(&mut self) {
        self.containers.clear();
        self.allocations.clear();
        self.status = PickingStatus::Pending;
    }
}
