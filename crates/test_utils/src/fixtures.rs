//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for common entities. User ids are fixed
//! so their canonical order is known: `alice < bob < carol < dave`.

use chrono::{DateTime, TimeZone, Utc};
use core_kernel::{GroupId, Money, UserId};
use domain_ledger::Profile;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// Builds money from a decimal
    pub fn amount(value: Decimal) -> Money {
        Money::new(value)
    }

    /// A standard 100.00 expense
    pub fn hundred() -> Money {
        Money::from_minor(10_000)
    }

    /// Half of `hundred`
    pub fn fifty() -> Money {
        Money::from_minor(5_000)
    }
}

/// Fixture for users with a known canonical order
pub struct UserFixtures;

impl UserFixtures {
    pub fn alice() -> UserId {
        UserId::from_uuid(Uuid::from_u128(0x0000_0001))
    }

    pub fn bob() -> UserId {
        UserId::from_uuid(Uuid::from_u128(0x0000_0002))
    }

    pub fn carol() -> UserId {
        UserId::from_uuid(Uuid::from_u128(0x0000_0003))
    }

    pub fn dave() -> UserId {
        UserId::from_uuid(Uuid::from_u128(0x0000_0004))
    }

    /// Profile with a derived email address
    pub fn profile(id: UserId, name: &str) -> Profile {
        Profile::new(id, name, format!("{}@example.com", name.to_lowercase()))
    }
}

/// Fixture for group identifiers
pub struct GroupFixtures;

impl GroupFixtures {
    pub fn trip() -> GroupId {
        GroupId::from_uuid(Uuid::from_u128(0x0000_0100))
    }

    pub fn flat() -> GroupId {
        GroupId::from_uuid(Uuid::from_u128(0x0000_0200))
    }
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// A fixed reference instant (Mar 1, 2024 12:00 UTC)
    pub fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }

    /// The reference instant shifted by whole days
    pub fn days_after(days: i64) -> DateTime<Utc> {
        Self::reference() + chrono::Duration::days(days)
    }
}
