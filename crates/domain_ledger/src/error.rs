//! Ledger domain errors

use core_kernel::Money;
use thiserror::Error;

/// Errors raised when a record breaks a write-time invariant
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Amount is zero, negative, or otherwise unusable
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// The same member appears twice in one expense's splits
    #[error("Duplicate split for member: {0}")]
    DuplicateSplit(String),

    /// Splits do not add up to the expense total
    #[error("Split total {actual} does not match expense amount {expected}")]
    SplitMismatch {
        expected: Money,
        actual: Money,
    },

    /// A member tried to settle with themselves
    #[error("Settlement from a member to themselves: {0}")]
    SelfSettlement(String),

    /// A referenced member does not belong to the group
    #[error("Member {user} is not part of group {group}")]
    NotAMember {
        group: String,
        user: String,
    },
}
