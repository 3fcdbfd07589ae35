//! Lot ledger tests
//!
//! Tests for cross-event lot availability including:
//! - Property 2: FEFO Ordering of Eligible Lots
//! - Remaining quantity = produced - sum of allocations (all events)
//! - Eligibility filtering (state, exhausted stock)

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use shared::planning::{allocated_quantity, available_lots, orphaned_allocations, remaining_quantity};
use shared::{Allocation, LotState, MeasurementUnit, ProductionLot};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, d, 12, 0, 0).unwrap()
}

fn lot(
    elaboration_id: Uuid,
    produced: &str,
    creation: DateTime<Utc>,
    completion: Option<DateTime<Utc>>,
) -> ProductionLot {
    ProductionLot {
        id: Uuid::new_v4(),
        elaboration_id,
        elaboration_name: "Crema de calabaza".to_string(),
        produced_quantity: dec(produced),
        unit: MeasurementUnit::Kilograms,
        state: LotState::Accepted,
        creation_date: creation,
        completion_date: completion,
    }
}

fn allocation(lot_id: Uuid, quantity: &str) -> Allocation {
    Allocation {
        id: Uuid::new_v4(),
        lot_id,
        container_id: Uuid::new_v4(),
        milestone_id: Uuid::new_v4(),
        quantity: dec(quantity),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_remaining_without_allocations() {
        let elaboration_id = Uuid::new_v4();
        let lot = lot(elaboration_id, "25.0", day(1), None);

        assert_eq!(remaining_quantity(&lot, &[]), dec("25.0"));
    }

    #[test]
    fn test_remaining_subtracts_allocations_across_events() {
        let elaboration_id = Uuid::new_v4();
        let lot = lot(elaboration_id, "25.0", day(1), None);

        // Two different events draw from the same lot
        let allocations = vec![allocation(lot.id, "10.0"), allocation(lot.id, "5.5")];

        assert_eq!(remaining_quantity(&lot, &allocations), dec("9.5"));
        assert_eq!(allocated_quantity(lot.id, &allocations), dec("15.5"));
    }

    #[test]
    fn test_remaining_ignores_other_lots() {
        let elaboration_id = Uuid::new_v4();
        let lot_a = lot(elaboration_id, "10.0", day(1), None);
        let lot_b = lot(elaboration_id, "10.0", day(1), None);

        let allocations = vec![allocation(lot_b.id, "4.0")];

        assert_eq!(remaining_quantity(&lot_a, &allocations), dec("10.0"));
    }

    #[test]
    fn test_only_accepted_lots_are_eligible() {
        let elaboration_id = Uuid::new_v4();
        let mut pending = lot(elaboration_id, "10.0", day(1), None);
        pending.state = LotState::Pending;
        let mut in_progress = lot(elaboration_id, "10.0", day(1), None);
        in_progress.state = LotState::InProgress;
        let mut discarded = lot(elaboration_id, "10.0", day(1), None);
        discarded.state = LotState::Discarded;
        let accepted = lot(elaboration_id, "10.0", day(1), None);

        let lots = vec![pending, in_progress, discarded, accepted.clone()];
        let available = available_lots(elaboration_id, &lots, &[]);

        assert_eq!(available.len(), 1);
        assert_eq!(available[0].lot.id, accepted.id);
    }

    #[test]
    fn test_exhausted_lot_disappears() {
        let elaboration_id = Uuid::new_v4();
        let lot = lot(elaboration_id, "10.0", day(1), None);
        let allocations = vec![allocation(lot.id, "10.0")];

        let available = available_lots(elaboration_id, &[lot], &allocations);
        assert!(available.is_empty());
    }

    #[test]
    fn test_availability_epsilon() {
        let elaboration_id = Uuid::new_v4();
        let lot_at_epsilon = lot(elaboration_id, "10.001", day(1), None);
        let lot_above_epsilon = lot(elaboration_id, "10.002", day(2), None);
        let allocations = vec![
            allocation(lot_at_epsilon.id, "10.0"),
            allocation(lot_above_epsilon.id, "10.0"),
        ];

        // remaining 0.001 is not available, 0.002 is
        let available = available_lots(
            elaboration_id,
            &[lot_at_epsilon, lot_above_epsilon.clone()],
            &allocations,
        );
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].lot.id, lot_above_epsilon.id);
        assert_eq!(available[0].remaining_quantity, dec("0.002"));
    }

    #[test]
    fn test_fefo_orders_by_completion_date() {
        let elaboration_id = Uuid::new_v4();
        let late = lot(elaboration_id, "5.0", day(1), Some(day(9)));
        let early = lot(elaboration_id, "5.0", day(2), Some(day(3)));
        let middle = lot(elaboration_id, "5.0", day(1), Some(day(6)));

        let available = available_lots(
            elaboration_id,
            &[late.clone(), early.clone(), middle.clone()],
            &[],
        );

        let ids: Vec<Uuid> = available.iter().map(|a| a.lot.id).collect();
        assert_eq!(ids, vec![early.id, middle.id, late.id]);
    }

    #[test]
    fn test_fefo_falls_back_to_creation_date() {
        let elaboration_id = Uuid::new_v4();
        // No completion date: sorts by creation date instead
        let open_lot = lot(elaboration_id, "5.0", day(2), None);
        let completed_early = lot(elaboration_id, "5.0", day(5), Some(day(1)));
        let completed_late = lot(elaboration_id, "5.0", day(1), Some(day(8)));

        let available = available_lots(
            elaboration_id,
            &[open_lot.clone(), completed_early.clone(), completed_late.clone()],
            &[],
        );

        let ids: Vec<Uuid> = available.iter().map(|a| a.lot.id).collect();
        assert_eq!(ids, vec![completed_early.id, open_lot.id, completed_late.id]);
    }

    #[test]
    fn test_other_elaborations_excluded() {
        let elaboration_id = Uuid::new_v4();
        let other_elaboration = Uuid::new_v4();
        let mine = lot(elaboration_id, "5.0", day(1), None);
        let other = lot(other_elaboration, "5.0", day(1), None);

        let available = available_lots(elaboration_id, &[mine.clone(), other], &[]);
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].lot.id, mine.id);
    }

    #[test]
    fn test_orphaned_allocations_detection() {
        let elaboration_id = Uuid::new_v4();
        let live = lot(elaboration_id, "5.0", day(1), None);
        let kept = allocation(live.id, "2.0");
        let orphan = allocation(Uuid::new_v4(), "3.0");

        let orphans = orphaned_allocations(&[kept, orphan.clone()], &[live]);
        assert_eq!(orphans, vec![orphan.id]);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for generating valid quantities (positive decimals)
    fn quantity_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=10000i64).prop_map(|n| Decimal::new(n, 1)) // 0.1 to 1000.0
    }

    /// Strategy for generating a day-of-month
    fn day_strategy() -> impl Strategy<Value = u32> {
        1u32..=28
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property 2: eligible lots are sorted non-decreasingly by
        /// completion date ?? creation date
        #[test]
        fn prop_fefo_ordering(
            days in prop::collection::vec((day_strategy(), prop::option::of(day_strategy())), 1..15)
        ) {
            let elaboration_id = Uuid::new_v4();
            let lots: Vec<ProductionLot> = days
                .iter()
                .map(|(creation, completion)| {
                    lot(elaboration_id, "10.0", day(*creation), completion.map(day))
                })
                .collect();

            let available = available_lots(elaboration_id, &lots, &[]);

            prop_assert_eq!(available.len(), lots.len());
            for pair in available.windows(2) {
                prop_assert!(pair[0].lot.expiry_key() <= pair[1].lot.expiry_key());
            }
        }

        /// Remaining is exactly produced minus the sum of allocations
        #[test]
        fn prop_remaining_conservation(
            produced in quantity_strategy(),
            drawn in prop::collection::vec(quantity_strategy(), 0..10)
        ) {
            let elaboration_id = Uuid::new_v4();
            let lot = lot(elaboration_id, &produced.to_string(), day(1), None);
            let allocations: Vec<Allocation> =
                drawn.iter().map(|q| allocation(lot.id, &q.to_string())).collect();

            let total_drawn: Decimal = drawn.iter().sum();
            prop_assert_eq!(remaining_quantity(&lot, &allocations), produced - total_drawn);
        }

        /// Every returned lot has remaining stock above the epsilon
        #[test]
        fn prop_available_lots_above_epsilon(
            produced in prop::collection::vec(quantity_strategy(), 1..10),
            drawn in quantity_strategy()
        ) {
            let elaboration_id = Uuid::new_v4();
            let lots: Vec<ProductionLot> = produced
                .iter()
                .map(|p| lot(elaboration_id, &p.to_string(), day(1), None))
                .collect();
            let allocations: Vec<Allocation> =
                vec![allocation(lots[0].id, &drawn.to_string())];

            for available in available_lots(elaboration_id, &lots, &allocations) {
                prop_assert!(available.remaining_quantity > Decimal::new(1, 3));
            }
        }
    }
}
