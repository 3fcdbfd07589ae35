//! Event and gastronomic order models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::TimeWindow;

/// A delivery/service moment within an event ("hito")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMilestone {
    pub id: Uuid,
    pub event_id: Uuid,
    pub date: NaiveDate,
    pub time_window: Option<TimeWindow>,
    /// Milestones without catering carry no picking needs
    pub requires_catering: bool,
    pub location: Option<String>,
}

/// The ordered menu for one milestone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GastronomicOrder {
    pub id: Uuid,
    pub milestone_id: Uuid,
    pub lines: Vec<OrderLine>,
}

/// One line of a gastronomic order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub kind: OrderLineKind,
    pub recipe_id: Option<Uuid>,
    pub quantity: Decimal,
}

impl OrderLine {
    /// Only item lines with a recipe reference contribute demand
    pub fn demand_recipe(&self) -> Option<Uuid> {
        match self.kind {
            OrderLineKind::Item => self.recipe_id,
            _ => None,
        }
    }
}

/// Kind of order line; headings and comments structure the menu only
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderLineKind {
    Item,
    Heading,
    Comment,
}
