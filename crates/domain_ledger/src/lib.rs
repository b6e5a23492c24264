//! Ledger Domain
//!
//! The recorded facts of expense-sharing groups and the port through which
//! they are read:
//! - Profiles, groups and memberships
//! - Expenses with per-member splits
//! - Settlements between members
//! - `LedgerPort`, implemented by the Postgres adapter and an in-memory mock

pub mod error;
pub mod expense;
pub mod group;
pub mod ports;
pub mod settlement;

pub use error::LedgerError;
pub use expense::{Expense, ExpenseCategory, ExpenseSplit};
pub use group::{roster, Group, GroupMember, MemberRole, Profile};
pub use ports::LedgerPort;
pub use settlement::{PaymentMethod, Settlement};

#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockLedgerPort;
