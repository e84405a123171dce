// Budget ledger: bid edits against the credit ceiling and the
// highest-to-lowest ordering of draft slots.

use super::order::reorder;
use super::MutationError;

/// Credits each manager can commit across the whole draft.
pub const DEFAULT_TOTAL_BUDGET: u32 = 600;

/// Bid curve used when no plan exists yet. Sums to exactly
/// [`DEFAULT_TOTAL_BUDGET`].
pub const DEFAULT_BIDS: [u32; 23] = [
    100, 80, 50, 40, 30, 30, 20, 20, 20, 20, 20, 20, 20, 20, 20, 20, 20, 20, 20, 5, 3, 1, 1,
];

/// Stepper increments offered next to each bid.
pub const DEFAULT_BID_STEPS: [u32; 2] = [1, 10];

/// Enforces the credit ceiling and bid ordering rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetLedger {
    total_budget: u32,
}

impl Default for BudgetLedger {
    fn default() -> Self {
        Self::new(DEFAULT_TOTAL_BUDGET)
    }
}

impl BudgetLedger {
    pub fn new(total_budget: u32) -> Self {
        Self { total_budget }
    }

    pub fn total_budget(&self) -> u32 {
        self.total_budget
    }

    /// Sum of all bids.
    pub fn total(bids: &[u32]) -> i64 {
        bids.iter().map(|&b| i64::from(b)).sum()
    }

    /// Credits left after every planned bid. Negative when an imported plan
    /// overspends; the ledger reports it but never corrects it.
    pub fn remaining(&self, bids: &[u32]) -> i64 {
        i64::from(self.total_budget) - Self::total(bids)
    }

    /// Whether the bids run from highest to lowest.
    pub fn is_monotonic(bids: &[u32]) -> bool {
        bids.windows(2).all(|pair| pair[0] >= pair[1])
    }

    /// Replace the bid at `index` with `new_value`.
    ///
    /// Refused when the value is negative, when the new total would exceed
    /// the ceiling, or when the value would rise above the previous slot or
    /// drop below the next one. Other slots are never adjusted to make room.
    pub fn set_bid(
        &self,
        bids: &[u32],
        index: usize,
        new_value: i64,
    ) -> Result<Vec<u32>, MutationError> {
        let Some(&current) = bids.get(index) else {
            return Err(MutationError::IndexOutOfRange {
                index,
                len: bids.len(),
            });
        };

        if new_value < 0 {
            return Err(MutationError::NegativeBid { value: new_value });
        }

        // Overflow can only come from a value far above any ceiling.
        let total = Self::total(bids)
            .checked_sub(i64::from(current))
            .and_then(|rest| rest.checked_add(new_value))
            .unwrap_or(i64::MAX);
        if total > i64::from(self.total_budget) {
            return Err(self.over_budget(total));
        }

        let value = u32::try_from(new_value).map_err(|_| self.over_budget(total))?;
        let upper = if index > 0 {
            bids[index - 1]
        } else {
            self.total_budget
        };
        let lower = bids.get(index + 1).copied().unwrap_or(0);
        let breaks_above = index > 0 && value > upper;
        let breaks_below = index + 1 < bids.len() && value < lower;
        if breaks_above || breaks_below {
            return Err(MutationError::OrderingViolation {
                index,
                value,
                lower,
                upper,
            });
        }

        let mut updated = bids.to_vec();
        updated[index] = value;
        Ok(updated)
    }

    /// Stepper edit: add `delta` (negative to decrement) to the bid at `index`.
    pub fn step_bid(
        &self,
        bids: &[u32],
        index: usize,
        delta: i64,
    ) -> Result<Vec<u32>, MutationError> {
        let current = bids.get(index).copied().ok_or(MutationError::IndexOutOfRange {
            index,
            len: bids.len(),
        })?;
        let target = match i64::from(current).checked_add(delta) {
            Some(target) => target,
            None if delta > 0 => return Err(self.over_budget(i64::MAX)),
            None => return Err(MutationError::NegativeBid { value: i64::MIN }),
        };
        self.set_bid(bids, index, target)
    }

    fn over_budget(&self, total: i64) -> MutationError {
        MutationError::BudgetExceeded {
            total,
            budget: self.total_budget,
        }
    }

    /// Whether the stepper control for `delta` at `index` should be enabled.
    pub fn can_step(&self, bids: &[u32], index: usize, delta: i64) -> bool {
        self.step_bid(bids, index, delta).is_ok()
    }
}

/// Drag reorder of the bid list. The result is not checked for ordering; a
/// manual sort is taken as the user's intent.
pub fn reorder_bids(bids: &[u32], from: usize, to: usize) -> Result<Vec<u32>, MutationError> {
    reorder(bids, from, to)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> BudgetLedger {
        BudgetLedger::default()
    }

    #[test]
    fn default_curve_spends_whole_budget() {
        assert_eq!(DEFAULT_BIDS.len(), 23);
        assert_eq!(BudgetLedger::total(&DEFAULT_BIDS), 600);
        assert_eq!(ledger().remaining(&DEFAULT_BIDS), 0);
        assert!(BudgetLedger::is_monotonic(&DEFAULT_BIDS));
    }

    #[test]
    fn raising_first_bid_over_budget_is_rejected() {
        let err = ledger().set_bid(&DEFAULT_BIDS, 0, 150).unwrap_err();
        assert_eq!(
            err,
            MutationError::BudgetExceeded {
                total: 650,
                budget: 600
            }
        );
    }

    #[test]
    fn lowering_a_bid_frees_credits() {
        let bids = ledger().set_bid(&DEFAULT_BIDS, 0, 90).unwrap();
        assert_eq!(bids[0], 90);
        assert_eq!(ledger().remaining(&bids), 10);
        // Input untouched.
        assert_eq!(DEFAULT_BIDS[0], 100);
    }

    #[test]
    fn huge_values_are_refused_without_overflow() {
        let err = ledger().set_bid(&DEFAULT_BIDS, 0, i64::MAX).unwrap_err();
        assert!(matches!(err, MutationError::BudgetExceeded { budget: 600, .. }));

        let err = ledger().step_bid(&DEFAULT_BIDS, 0, i64::MAX).unwrap_err();
        assert!(matches!(err, MutationError::BudgetExceeded { budget: 600, .. }));
        assert!(!ledger().can_step(&DEFAULT_BIDS, 0, i64::MAX));

        let err = ledger().step_bid(&DEFAULT_BIDS, 0, i64::MIN).unwrap_err();
        assert!(matches!(err, MutationError::NegativeBid { .. }));

        // Just past u32 on an otherwise empty plan.
        let err = BudgetLedger::new(u32::MAX)
            .set_bid(&[0], 0, i64::from(u32::MAX) + 1)
            .unwrap_err();
        assert!(matches!(err, MutationError::BudgetExceeded { .. }));
    }

    #[test]
    fn negative_bid_is_rejected() {
        assert_eq!(
            ledger().set_bid(&DEFAULT_BIDS, 22, -1),
            Err(MutationError::NegativeBid { value: -1 })
        );
    }

    #[test]
    fn bid_cannot_rise_above_previous_slot() {
        let bids = vec![60, 50, 40];
        let err = ledger().set_bid(&bids, 1, 70).unwrap_err();
        assert_eq!(
            err,
            MutationError::OrderingViolation {
                index: 1,
                value: 70,
                lower: 40,
                upper: 60
            }
        );
        assert_eq!(ledger().set_bid(&bids, 1, 60).unwrap(), vec![60, 60, 40]);
    }

    #[test]
    fn bid_cannot_drop_below_next_slot() {
        let err = ledger().set_bid(&DEFAULT_BIDS, 2, 39).unwrap_err();
        assert!(matches!(err, MutationError::OrderingViolation { index: 2, .. }));
        assert!(ledger().set_bid(&DEFAULT_BIDS, 2, 40).is_ok());
    }

    #[test]
    fn last_slot_can_reach_zero() {
        let bids = ledger().set_bid(&DEFAULT_BIDS, 22, 0).unwrap();
        assert_eq!(bids[22], 0);
        assert_eq!(ledger().remaining(&bids), 1);
    }

    #[test]
    fn first_slot_is_bounded_only_by_budget() {
        let bids = vec![10, 5];
        let raised = BudgetLedger::new(100).set_bid(&bids, 0, 95).unwrap();
        assert_eq!(raised, vec![95, 5]);
        assert!(BudgetLedger::new(100).set_bid(&bids, 0, 96).is_err());
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        assert_eq!(
            ledger().set_bid(&DEFAULT_BIDS, 23, 1),
            Err(MutationError::IndexOutOfRange { index: 23, len: 23 })
        );
        assert!(ledger().step_bid(&[], 0, 1).is_err());
    }

    #[test]
    fn stepper_needs_remaining_credits_to_increment() {
        // Full budget spent: no increment anywhere.
        for index in 0..DEFAULT_BIDS.len() {
            assert!(!ledger().can_step(&DEFAULT_BIDS, index, 1));
        }
        let bids = ledger().step_bid(&DEFAULT_BIDS, 0, -10).unwrap();
        assert_eq!(ledger().remaining(&bids), 10);
        assert!(ledger().can_step(&bids, 0, 10));
        assert!(!ledger().can_step(&bids, 0, 11));
    }

    #[test]
    fn stepper_decrement_stops_at_zero() {
        assert!(ledger().can_step(&DEFAULT_BIDS, 22, -1));
        let bids = ledger().step_bid(&DEFAULT_BIDS, 22, -1).unwrap();
        assert!(!ledger().can_step(&bids, 22, -1));
        assert_eq!(
            ledger().step_bid(&bids, 22, -10),
            Err(MutationError::NegativeBid { value: -10 })
        );
    }

    #[test]
    fn accepted_edits_keep_sequence_monotonic_and_within_budget() {
        let ledger = ledger();
        let mut bids = DEFAULT_BIDS.to_vec();
        // Deterministic sweep of edits across every slot and a range of values.
        for round in 0..5i64 {
            for index in 0..bids.len() {
                for candidate in [-5, 0, 1, 7, 19, 20, 33, 64, 101, 640] {
                    let value = candidate + round;
                    if let Ok(next) = ledger.set_bid(&bids, index, value) {
                        assert!(BudgetLedger::total(&next) <= 600);
                        assert!(BudgetLedger::is_monotonic(&next));
                        bids = next;
                    }
                }
            }
        }
    }

    #[test]
    fn over_budget_import_reports_negative_remaining() {
        let mut bids = DEFAULT_BIDS.to_vec();
        bids[0] = 150;
        assert_eq!(ledger().remaining(&bids), -50);
    }

    #[test]
    fn reorder_does_not_revalidate_ordering() {
        let moved = reorder_bids(&DEFAULT_BIDS, 22, 0).unwrap();
        assert_eq!(moved[0], 1);
        assert_eq!(moved[1], 100);
        assert!(!BudgetLedger::is_monotonic(&moved));
        assert_eq!(BudgetLedger::total(&moved), 600);
    }
}
