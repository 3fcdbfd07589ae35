//! Completion evaluation: is every need of the event satisfied?

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::models::Need;

/// True iff every need of every catering milestone is satisfied
///
/// An event with no catering milestones (empty map) is vacuously complete.
/// Gates every picking status transition out of `Pending`.
pub fn is_complete(needs_by_milestone: &BTreeMap<Uuid, Vec<Need>>) -> bool {
    needs_by_milestone
        .values()
        .flatten()
        .all(|need| need.is_satisfied())
}
