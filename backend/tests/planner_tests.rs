//! Allocation planner tests
//!
//! Tests for the interactive batch construction including:
//! - Validation sequence: container, then quantity, then excess
//! - Input clamping to each lot's remaining availability
//! - Excess allocation requires explicit confirmation
//! - The two-lot worked scenario (lot A 10 + lot B 5 against a need of 12)

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use shared::planning::{
    available_lots, clamp_entry, prepare_entries, remaining_quantity, review_allocation,
    AllocationReview, RejectionReason,
};
use shared::{
    ExpeditionType, LotAllocationEntry, LotState, MeasurementUnit, PickingState, ProductionLot,
};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, d, 12, 0, 0).unwrap()
}

fn lot(elaboration_id: Uuid, produced: &str, completion: DateTime<Utc>) -> ProductionLot {
    ProductionLot {
        id: Uuid::new_v4(),
        elaboration_id,
        elaboration_name: "Crema de calabaza".to_string(),
        produced_quantity: dec(produced),
        unit: MeasurementUnit::Kilograms,
        state: LotState::Accepted,
        creation_date: day(1),
        completion_date: Some(completion),
    }
}

fn entry(lot_id: Uuid, quantity: &str) -> LotAllocationEntry {
    LotAllocationEntry {
        lot_id,
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
    fn test_missing_container_rejected_first() {
        // Even with no quantity entered, the container check comes first
        let review = review_allocation(&[], dec("10"), false);
        assert_eq!(
            review,
            AllocationReview::Rejected {
                reason: RejectionReason::NoContainer
            }
        );
    }

    #[test]
    fn test_zero_total_rejected() {
        let entries = vec![entry(Uuid::new_v4(), "0"), entry(Uuid::new_v4(), "0")];
        let review = review_allocation(&entries, dec("10"), true);
        assert_eq!(
            review,
            AllocationReview::Rejected {
                reason: RejectionReason::NoQuantity
            }
        );
    }

    #[test]
    fn test_within_pending_is_ready() {
        let entries = vec![entry(Uuid::new_v4(), "4"), entry(Uuid::new_v4(), "6")];
        let review = review_allocation(&entries, dec("12"), true);
        assert_eq!(review, AllocationReview::Ready { total: dec("10") });
    }

    #[test]
    fn test_exact_pending_is_ready() {
        let entries = vec![entry(Uuid::new_v4(), "12")];
        let review = review_allocation(&entries, dec("12"), true);
        assert_eq!(review, AllocationReview::Ready { total: dec("12") });
    }

    #[test]
    fn test_excess_requires_confirmation() {
        let entries = vec![entry(Uuid::new_v4(), "15")];
        let review = review_allocation(&entries, dec("12"), true);
        assert_eq!(
            review,
            AllocationReview::ExcessConfirmationRequired {
                requested: dec("15"),
                pending: dec("12"),
                excess: dec("3"),
            }
        );
    }

    #[test]
    fn test_anything_over_zero_pending_is_excess() {
        let entries = vec![entry(Uuid::new_v4(), "1")];
        let review = review_allocation(&entries, Decimal::ZERO, true);
        assert_eq!(
            review,
            AllocationReview::ExcessConfirmationRequired {
                requested: dec("1"),
                pending: Decimal::ZERO,
                excess: dec("1"),
            }
        );
    }

    #[test]
    fn test_clamp_entry_bounds() {
        assert_eq!(clamp_entry(dec("15"), dec("10")), dec("10"));
        assert_eq!(clamp_entry(dec("5"), dec("10")), dec("5"));
        assert_eq!(clamp_entry(dec("-2"), dec("10")), Decimal::ZERO);
        // A lot already over-drawn clamps to zero, not negative
        assert_eq!(clamp_entry(dec("5"), dec("-1")), Decimal::ZERO);
    }

    #[test]
    fn test_prepare_entries_drops_zero_rows() {
        let keep = entry(Uuid::new_v4(), "4");
        let entries = vec![entry(Uuid::new_v4(), "0"), keep.clone()];
        assert_eq!(prepare_entries(&entries), vec![keep]);
    }

    #[test]
    fn test_rejection_messages_are_bilingual() {
        assert_eq!(RejectionReason::NoContainer.message_en(), "Select a container");
        assert_eq!(
            RejectionReason::NoContainer.message_es(),
            "Selecciona un contenedor"
        );
        assert_eq!(
            RejectionReason::NoQuantity.message_en(),
            "Enter a quantity greater than zero"
        );
        assert_eq!(
            RejectionReason::NoQuantity.message_es(),
            "Introduce una cantidad mayor que cero"
        );
        assert_eq!(RejectionReason::NoContainer.field(), "container");
        assert_eq!(RejectionReason::NoQuantity.field(), "quantity");
    }

    /// The worked scenario: lot A (10, completes day 1) and lot B (5,
    /// completes day 2) against a milestone needing 12 units
    #[test]
    fn test_two_lot_scenario() {
        let elaboration_id = Uuid::new_v4();
        let lot_a = lot(elaboration_id, "10", day(1));
        let lot_b = lot(elaboration_id, "5", day(2));
        let lots = vec![lot_b.clone(), lot_a.clone()];

        // Eligible lots come back A first (earlier completion)
        let available = available_lots(elaboration_id, &lots, &[]);
        assert_eq!(available[0].lot.id, lot_a.id);
        assert_eq!(available[0].remaining_quantity, dec("10"));
        assert_eq!(available[1].lot.id, lot_b.id);
        assert_eq!(available[1].remaining_quantity, dec("5"));

        // Operator takes 10 from A and 2 from B into a new container
        let entries = vec![entry(lot_a.id, "10"), entry(lot_b.id, "2")];
        assert_eq!(
            review_allocation(&entries, dec("12"), true),
            AllocationReview::Ready { total: dec("12") }
        );

        let mut state = PickingState::new(Uuid::new_v4());
        let milestone_id = Uuid::new_v4();
        let container = state.add_container(milestone_id, ExpeditionType::Refrigerated);
        assert_eq!(container.sequence_number, 1);
        let container_id = container.id;
        state
            .allocate(&prepare_entries(&entries), container_id, milestone_id)
            .unwrap();

        assert_eq!(remaining_quantity(&lot_a, &state.allocations), Decimal::ZERO);
        assert_eq!(remaining_quantity(&lot_b, &state.allocations), dec("3"));

        // A exhausted: only B remains eligible
        let available = available_lots(elaboration_id, &lots, &state.allocations);
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].lot.id, lot_b.id);

        // One more unit against a satisfied need is an excess allocation
        let extra = vec![entry(lot_b.id, "1")];
        assert!(matches!(
            review_allocation(&extra, Decimal::ZERO, true),
            AllocationReview::ExcessConfirmationRequired { .. }
        ));
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

    /// Strategy for generating possibly-negative inputs
    fn signed_strategy() -> impl Strategy<Value = Decimal> {
        (-10000i64..=10000i64).prop_map(|n| Decimal::new(n, 1))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Review is never `Ready` when the total exceeds pending
        #[test]
        fn prop_excess_never_ready(
            quantities in prop::collection::vec(quantity_strategy(), 1..8),
            pending in quantity_strategy()
        ) {
            let entries: Vec<LotAllocationEntry> = quantities
                .iter()
                .map(|q| entry(Uuid::new_v4(), &q.to_string()))
                .collect();
            let total: Decimal = quantities.iter().sum();

            match review_allocation(&entries, pending, true) {
                AllocationReview::Ready { total: reviewed } => {
                    prop_assert!(total <= pending);
                    prop_assert_eq!(reviewed, total);
                }
                AllocationReview::ExcessConfirmationRequired { requested, excess, .. } => {
                    prop_assert!(total > pending);
                    prop_assert_eq!(requested, total);
                    prop_assert_eq!(excess, total - pending);
                }
                AllocationReview::Rejected { .. } => {
                    // Positive quantities with a container never reject
                    prop_assert!(false, "unexpected rejection");
                }
            }
        }

        /// Clamped entries always land in [0, max(0, remaining)]
        #[test]
        fn prop_clamp_within_bounds(
            requested in signed_strategy(),
            remaining in signed_strategy()
        ) {
            let clamped = clamp_entry(requested, remaining);
            prop_assert!(clamped >= Decimal::ZERO);
            prop_assert!(clamped <= remaining.max(Decimal::ZERO));
        }

        /// Prepared entries carry exactly the positive rows, order kept
        #[test]
        fn prop_prepare_keeps_positive_rows(
            quantities in prop::collection::vec(signed_strategy(), 0..10)
        ) {
            let entries: Vec<LotAllocationEntry> = quantities
                .iter()
                .map(|q| entry(Uuid::new_v4(), &q.to_string()))
                .collect();

            let prepared = prepare_entries(&entries);
            let expected: Vec<LotAllocationEntry> = entries
                .iter()
                .filter(|e| e.quantity > Decimal::ZERO)
                .cloned()
                .collect();
            prop_assert_eq!(prepared, expected);
        }
    }
}
