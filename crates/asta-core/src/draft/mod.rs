// Draft plan state model: ordered bids, role order and preference lists.

pub mod ledger;
pub mod order;
pub mod preferences;
pub mod roles;
pub mod selection;

use thiserror::Error;

use roles::Role;

/// Why a mutation of the draft plan was refused.
///
/// A rejected mutation never touches the current snapshot; callers keep the
/// previous state as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    #[error("index {index} is out of range for a list of {len} entries")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("bid cannot be negative (got {value})")]
    NegativeBid { value: i64 },

    #[error("total bids would be {total}, above the budget of {budget}")]
    BudgetExceeded { total: i64, budget: u32 },

    #[error("bid {value} at slot {index} must stay between {lower} and {upper}")]
    OrderingViolation {
        index: usize,
        value: u32,
        lower: u32,
        upper: u32,
    },

    #[error("'{candidate}' is already in the {held_by} list")]
    AlreadySelected { candidate: String, held_by: Role },
}
