//! Strongly-typed identifiers for domain entities
//!
//! Using newtype wrappers around UUIDs provides type safety and prevents
//! accidental mixing of different identifier types.
//!
//! # Canonical order
//!
//! Every identifier is totally ordered by the bytes of its UUID. That order
//! is the same as comparing the lowercase hyphenated string forms
//! lexicographically, and it is the order used to key member pairs when
//! netting debts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates a new time-ordered identifier (v7)
            pub fn new_v7() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates from an existing UUID
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Returns the identifier prefix for display
            pub fn prefix() -> &'static str {
                $prefix
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                // Strip prefix if present
                let uuid_str = s.strip_prefix(concat!($prefix, "-")).unwrap_or(s);
                Ok(Self(Uuid::parse_str(uuid_str)?))
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Uuid {
                id.0
            }
        }
    };
}

define_id!(UserId, "USR");
define_id!(GroupId, "GRP");
define_id!(ExpenseId, "EXP");
define_id!(SettlementId, "STL");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_display() {
        let id = UserId::new();
        assert!(id.to_string().starts_with("USR-"));
    }

    #[test]
    fn test_id_parsing() {
        let original = GroupId::new();
        let parsed: GroupId = original.to_string().parse().unwrap();
        assert_eq!(original, parsed);

        let bare: GroupId = original.as_uuid().to_string().parse().unwrap();
        assert_eq!(original, bare);
    }

    #[test]
    fn test_order_matches_string_order() {
        let a = UserId::from_uuid(Uuid::parse_str("0a000000-0000-0000-0000-000000000000").unwrap());
        let b = UserId::from_uuid(Uuid::parse_str("a0000000-0000-0000-0000-000000000000").unwrap());
        assert!(a < b);
        assert!(a.as_uuid().to_string() < b.as_uuid().to_string());
    }
}
