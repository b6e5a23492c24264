//! Integration tests for domain_ledger

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{GroupId, Money, UserId};

use domain_ledger::expense::{Expense, ExpenseCategory};
use domain_ledger::group::{roster, Group, GroupMember, MemberRole, Profile};
use domain_ledger::settlement::{PaymentMethod, Settlement};
use domain_ledger::{LedgerError, LedgerPort, MockLedgerPort};

// ============================================================================
// Record Tests
// ============================================================================

mod record_tests {
    use super::*;

    #[test]
    fn test_expense_defaults() {
        let payer = UserId::new();
        let expense = Expense::new(GroupId::new(), "Groceries", Money::new(dec!(42.50)), payer);

        assert_eq!(expense.category, ExpenseCategory::Other);
        assert!(expense.splits.is_empty());
        assert!(expense.involves(payer));
    }

    #[test]
    fn test_expense_builder() {
        let payer = UserId::new();
        let friend = UserId::new();
        let date = Utc::now() - Duration::days(3);
        let expense = Expense::new(GroupId::new(), "Cinema", Money::new(dec!(24)), payer)
            .with_category(ExpenseCategory::Entertainment)
            .with_date(date)
            .with_split(payer, Money::new(dec!(12)))
            .with_split(friend, Money::new(dec!(12)));

        assert_eq!(expense.date, date);
        assert_eq!(expense.split_for(friend).map(|s| s.amount), Some(Money::new(dec!(12))));
        assert_eq!(expense.split_total(), Money::new(dec!(24)));
    }

    #[test]
    fn test_zero_amount_expense_rejected() {
        let expense = Expense::new(GroupId::new(), "Nothing", Money::zero(), UserId::new());
        assert!(matches!(expense.validate(), Err(LedgerError::InvalidAmount(_))));
    }

    #[test]
    fn test_sub_cent_split_difference_accepted() {
        let a = UserId::new();
        let b = UserId::new();
        let c = UserId::new();
        let third = Money::new(dec!(33.33));
        let expense = Expense::new(GroupId::new(), "Taxi", Money::new(dec!(100)), a)
            .with_split(a, third)
            .with_split(b, third)
            .with_split(c, Money::new(dec!(33.34)));

        assert!(expense.validate().is_ok());
    }

    #[test]
    fn test_settlement_builder() {
        let settlement = Settlement::new(GroupId::new(), UserId::new(), UserId::new(), Money::new(dec!(5)))
            .with_method(PaymentMethod::Venmo)
            .with_reference("tx-77");

        assert_eq!(settlement.payment_method, PaymentMethod::Venmo);
        assert_eq!(settlement.reference.as_deref(), Some("tx-77"));
        assert!(settlement.validate().is_ok());
    }

    #[test]
    fn test_roster_keeps_member_order() {
        let group_id = GroupId::new();
        let first = UserId::new();
        let second = UserId::new();
        let members = vec![GroupMember::admin(group_id, first), GroupMember::new(group_id, second)];

        assert_eq!(members[0].role, MemberRole::Admin);
        assert_eq!(roster(&members), vec![first, second]);
    }
}

// ============================================================================
// Mock Port Tests
// ============================================================================

mod mock_port_tests {
    use super::*;

    #[tokio::test]
    async fn test_members_and_group_ids() {
        let port = MockLedgerPort::new();
        let alice = UserId::new();
        let bob = UserId::new();
        let trip = Group::new("Trip", alice);
        let flat = Group::new("Flat", bob);
        let (trip_id, flat_id) = (trip.id, flat.id);

        port.add_group(trip).await;
        port.add_group(flat).await;
        port.add_member(GroupMember::new(trip_id, bob)).await;
        port.add_member(GroupMember::new(trip_id, bob)).await;

        assert_eq!(port.group_members(trip_id).await.unwrap().len(), 2);
        assert_eq!(port.user_group_ids(bob).await.unwrap(), vec![flat_id, trip_id]);

        port.remove_member(trip_id, bob).await;
        assert_eq!(port.user_group_ids(bob).await.unwrap(), vec![flat_id]);
    }

    #[tokio::test]
    async fn test_records_are_scoped_to_group() {
        let port = MockLedgerPort::new();
        let alice = UserId::new();
        let bob = UserId::new();
        let group_id = GroupId::new();
        let other_group = GroupId::new();

        port.record_expense(Expense::new(group_id, "Dinner", Money::new(dec!(80)), alice)).await;
        port.record_expense(Expense::new(other_group, "Fuel", Money::new(dec!(60)), bob)).await;
        port.record_settlement(Settlement::new(group_id, bob, alice, Money::new(dec!(40)))).await;

        let expenses = port.group_expenses(group_id).await.unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].amount.amount(), Decimal::from(80));
        assert_eq!(port.group_settlements(group_id).await.unwrap().len(), 1);
        assert!(port.group_settlements(other_group).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_profiles_skip_unknown_ids() {
        let port = MockLedgerPort::new();
        let alice = UserId::new();
        port.add_profile(Profile::new(alice, "Alice", "alice@example.com")).await;

        let profiles = port.get_profiles(vec![alice, UserId::new()]).await.unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].name, "Alice");
    }

    #[tokio::test]
    async fn test_health_check() {
        use core_kernel::HealthCheckable;

        let port = MockLedgerPort::new();
        assert!(port.health_check().await.is_operational());
    }
}

// ============================================================================
// Property Tests
// ============================================================================

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn even_splits_always_validate(cents in 1i64..1_000_000i64, people in 1usize..8) {
            let payer = UserId::new();
            let total = Money::from_minor(cents);
            let share_cents = cents / people as i64;
            let share = Money::from_minor(share_cents);
            let remainder = Money::from_minor(cents - share_cents * people as i64);

            let mut expense = Expense::new(GroupId::new(), "Shared", total, payer);
            for i in 0..people {
                let amount = if i == 0 { share + remainder } else { share };
                expense = expense.with_split(UserId::new(), amount);
            }

            prop_assert!(expense.validate().is_ok());
        }
    }
}
