//! Recipe composition models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A dish offered on gastronomic orders, composed of elaborations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Uuid,
    pub name: String,
    pub elaborations: Vec<RecipeElaboration>,
}

/// One elaboration's share in a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeElaboration {
    pub elaboration_id: Uuid,
    /// Quantity of the elaboration consumed per ordered unit of the recipe
    pub ratio: Decimal,
}
