//! Domain Adapters
//!
//! Adapter implementations for domain ports, connecting them to the
//! PostgreSQL database layer.

pub mod ledger;

pub use ledger::PostgresLedgerAdapter;
