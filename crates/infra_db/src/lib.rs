//! Infrastructure Database Layer
//!
//! PostgreSQL persistence for the expense-sharing ledger using SQLx:
//! connection pooling, embedded migrations, the `LedgerRepository` and the
//! `PostgresLedgerAdapter` implementing `LedgerPort`.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, DatabaseConfig, PostgresLedgerAdapter};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/opensplit")).await?;
//! let adapter = PostgresLedgerAdapter::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{create_pool, create_pool_from_url, run_migrations, DatabaseConfig, DatabasePool, DEFAULT_DATABASE_URL};
pub use error::DatabaseError;
pub use repositories::LedgerRepository;
pub use adapters::PostgresLedgerAdapter;
