//! Core Kernel - Foundational types and utilities for the expense-splitting system
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money type with precise decimal arithmetic and the one-cent tolerance
//! - Strongly-typed identifiers with a canonical total order
//! - Port errors and health-check types shared by adapters

pub mod money;
pub mod identifiers;
pub mod ports;

pub use money::{Money, MoneyError, TOLERANCE};
pub use identifiers::{UserId, GroupId, ExpenseId, SettlementId};
pub use ports::{PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth};
