//! Repository implementations for ledger entities
//!
//! Repositories encapsulate SQL queries and map database rows to plain row
//! types. Adapters convert those rows into domain records.

pub mod ledger;

pub use ledger::LedgerRepository;
