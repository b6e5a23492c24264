//! Balance engine errors

use core_kernel::PortError;
use thiserror::Error;

/// Errors that can occur while computing balances
///
/// The engine itself cannot fail on well-formed records; every error comes
/// from reading the ledger and is passed through unchanged.
#[derive(Debug, Error)]
pub enum BalanceError {
    /// Reading from the ledger entry source failed
    #[error("Ledger error: {0}")]
    Port(#[from] PortError),
}

impl BalanceError {
    /// Returns true if the underlying record was not found
    pub fn is_not_found(&self) -> bool {
        match self {
            BalanceError::Port(e) => e.is_not_found(),
        }
    }

    /// Returns true if retrying later may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            BalanceError::Port(e) => e.is_transient(),
        }
    }
}
