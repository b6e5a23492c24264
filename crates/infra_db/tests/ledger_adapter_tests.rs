//! Integration tests for the PostgreSQL ledger adapter
//!
//! These start a PostgreSQL container and are ignored by default:
//! `cargo test -p infra_db -- --ignored`

use rust_decimal_macros::dec;

use core_kernel::{GroupId, HealthCheckable, Money};
use domain_balance::net_debts;
use domain_ledger::{Group, GroupMember, LedgerPort, PaymentMethod};
use infra_db::PostgresLedgerAdapter;
use test_utils::{
    assert_debt, create_isolated_test_database, ExpenseBuilder, LedgerSeeder, SettlementBuilder,
    UserFixtures,
};

mod adapter_tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_reads_seeded_ledger() {
        let db = create_isolated_test_database().await.unwrap();
        let seeder = LedgerSeeder::new(db.repository());
        let adapter = PostgresLedgerAdapter::new(db.pool().clone());

        let (a, b) = (UserFixtures::alice(), UserFixtures::bob());
        seeder.profile(&UserFixtures::profile(a, "Alice")).await.unwrap();
        seeder.profile(&UserFixtures::profile(b, "Bob")).await.unwrap();

        let group = Group::new("Trip", a);
        let group_id = group.id;
        seeder.group(&group).await.unwrap();
        seeder.member(&GroupMember::new(group_id, b)).await.unwrap();

        let dinner = ExpenseBuilder::new(group_id, a, Money::new(dec!(100)))
            .split(a, Money::new(dec!(50)))
            .split(b, Money::new(dec!(50)))
            .build();
        seeder.expense(&dinner).await.unwrap();

        let deleted = ExpenseBuilder::new(group_id, b, Money::new(dec!(70)))
            .split(a, Money::new(dec!(70)))
            .build();
        seeder.expense(&deleted).await.unwrap();
        db.repository().soft_delete_expense(deleted.id.into()).await.unwrap();

        seeder
            .settlement(
                &SettlementBuilder::new(group_id, b, a, Money::new(dec!(30)))
                    .with_method(PaymentMethod::BankTransfer)
                    .build(),
            )
            .await
            .unwrap();

        assert_eq!(adapter.get_group(group_id).await.unwrap().name, "Trip");
        assert_eq!(adapter.group_members(group_id).await.unwrap().len(), 2);
        assert_eq!(adapter.user_group_ids(b).await.unwrap(), vec![group_id]);

        let expenses = adapter.group_expenses(group_id).await.unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].splits.len(), 2);

        let settlements = adapter.group_settlements(group_id).await.unwrap();
        assert_eq!(settlements[0].payment_method, PaymentMethod::BankTransfer);

        let debts = net_debts(&expenses, &settlements);
        assert_debt(&debts, b, a, Money::new(dec!(20)));

        let profiles = adapter.get_profiles(vec![a, b]).await.unwrap();
        assert_eq!(profiles.len(), 2);
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_unknown_group_is_not_found() {
        let db = create_isolated_test_database().await.unwrap();
        let adapter = PostgresLedgerAdapter::new(db.pool().clone());

        let err = adapter.get_group(GroupId::new()).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(adapter.health_check().await.is_operational());
    }
}
