//! Unit tests for the Identifiers module
//!
//! Tests cover creation, parsing, conversion, display formatting and the
//! canonical order used to key member pairs.

use core_kernel::{UserId, GroupId, ExpenseId, SettlementId};
use uuid::Uuid;

mod user_id_tests {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        let id1 = UserId::new();
        let id2 = UserId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_new_v7_generates_time_ordered_ids() {
        let id1 = UserId::new_v7();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = UserId::new_v7();
        assert!(id1 < id2);
    }

    #[test]
    fn test_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = UserId::from_uuid(uuid);
        assert_eq!(*id.as_uuid(), uuid);
    }

    #[test]
    fn test_prefix() {
        assert_eq!(UserId::prefix(), "USR");
    }

    #[test]
    fn test_from_str_with_prefix() {
        let original = UserId::new();
        let parsed: UserId = original.to_string().parse().unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_from_str_without_prefix() {
        let uuid = Uuid::new_v4();
        let parsed: UserId = uuid.to_string().parse().unwrap();
        assert_eq!(*parsed.as_uuid(), uuid);
    }

    #[test]
    fn test_from_str_invalid() {
        assert!("USR-nope".parse::<UserId>().is_err());
    }

    #[test]
    fn test_serde_is_transparent() {
        let uuid = Uuid::new_v4();
        let id = UserId::from_uuid(uuid);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", uuid));
    }
}

mod canonical_order {
    use super::*;

    fn user(s: &str) -> UserId {
        UserId::from_uuid(Uuid::parse_str(s).unwrap())
    }

    #[test]
    fn test_order_is_total_and_consistent_with_strings() {
        let ids = [
            user("ffffffff-0000-0000-0000-000000000000"),
            user("00000000-0000-0000-0000-000000000001"),
            user("0000000a-0000-0000-0000-000000000000"),
            user("00000000-0000-0000-0000-00000000000b"),
        ];

        let mut by_id = ids.to_vec();
        by_id.sort();

        let mut by_string = ids.to_vec();
        by_string.sort_by_key(|id| id.as_uuid().to_string());

        assert_eq!(by_id, by_string);
    }

    #[test]
    fn test_equal_ids_compare_equal() {
        let a = user("12345678-1234-1234-1234-123456789abc");
        let b = user("12345678-1234-1234-1234-123456789abc");
        assert_eq!(a.cmp(&b), std::cmp::Ordering::Equal);
    }
}

mod other_ids {
    use super::*;

    #[test]
    fn test_prefixes() {
        assert_eq!(GroupId::prefix(), "GRP");
        assert_eq!(ExpenseId::prefix(), "EXP");
        assert_eq!(SettlementId::prefix(), "STL");
    }

    #[test]
    fn test_uuid_roundtrip() {
        let uuid = Uuid::new_v4();
        let id = SettlementId::from(uuid);
        let back: Uuid = id.into();
        assert_eq!(uuid, back);
    }

    #[test]
    fn test_default_is_random() {
        assert_ne!(ExpenseId::default(), ExpenseId::default());
    }
}
