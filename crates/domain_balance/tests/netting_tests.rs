//! Integration tests for the netting engine and balance aggregator

use rust_decimal_macros::dec;

use core_kernel::{GroupId, Money};
use domain_balance::{member_balances, net_debts, net_position, Debt};
use domain_ledger::{Expense, Settlement};
use test_utils::{
    assert_debt, assert_debts_well_formed, assert_money_approx_eq, assert_settled,
    assert_zero_sum, ledger_strategy, ExpenseBuilder, GroupFixtures, SettlementBuilder,
    UserFixtures,
};

fn money(value: rust_decimal::Decimal) -> Money {
    Money::new(value)
}

// ============================================================================
// Reference Scenarios
// ============================================================================

mod scenario_tests {
    use super::*;

    fn dinner(group_id: GroupId) -> Expense {
        let (a, b) = (UserFixtures::alice(), UserFixtures::bob());
        ExpenseBuilder::new(group_id, a, money(dec!(100)))
            .split(a, money(dec!(50)))
            .split(b, money(dec!(50)))
            .build()
    }

    #[test]
    fn test_single_expense_split_evenly() {
        let group_id = GroupFixtures::trip();
        let debts = net_debts(&[dinner(group_id)], &[]);

        assert_eq!(debts.len(), 1);
        assert_debt(&debts, UserFixtures::bob(), UserFixtures::alice(), money(dec!(50)));
    }

    #[test]
    fn test_partial_settlement_reduces_debt() {
        let group_id = GroupFixtures::trip();
        let (a, b) = (UserFixtures::alice(), UserFixtures::bob());
        let settlement = SettlementBuilder::new(group_id, b, a, money(dec!(30))).build();

        let debts = net_debts(&[dinner(group_id)], &[settlement]);
        assert_eq!(debts.len(), 1);
        assert_debt(&debts, b, a, money(dec!(20)));
    }

    #[test]
    fn test_exact_settlement_clears_debt() {
        let group_id = GroupFixtures::trip();
        let (a, b) = (UserFixtures::alice(), UserFixtures::bob());
        let settlement = SettlementBuilder::new(group_id, b, a, money(dec!(50))).build();

        let debts = net_debts(&[dinner(group_id)], &[settlement]);
        assert!(debts.is_empty());
    }

    #[test]
    fn test_cross_expenses_net_out() {
        let group_id = GroupFixtures::trip();
        let (a, b) = (UserFixtures::alice(), UserFixtures::bob());
        let taxi = ExpenseBuilder::new(group_id, b, money(dec!(80)))
            .split(a, money(dec!(40)))
            .split(b, money(dec!(40)))
            .build();

        let debts = net_debts(&[dinner(group_id), taxi], &[]);
        assert_eq!(debts, vec![Debt { from: b, to: a, amount: money(dec!(10)) }]);
    }

    #[test]
    fn test_two_cross_expenses_leave_one_debt() {
        let group_id = GroupFixtures::trip();
        let (a, b) = (UserFixtures::alice(), UserFixtures::bob());
        let groceries = ExpenseBuilder::new(group_id, a, money(dec!(60)))
            .split(a, money(dec!(30)))
            .split(b, money(dec!(30)))
            .build();
        let fuel = ExpenseBuilder::new(group_id, b, money(dec!(40)))
            .split(a, money(dec!(20)))
            .split(b, money(dec!(20)))
            .build();

        let debts = net_debts(&[groceries, fuel], &[]);
        assert_eq!(debts, vec![Debt { from: b, to: a, amount: money(dec!(10)) }]);
    }

    #[test]
    fn test_three_members_member_balances() {
        let group_id = GroupFixtures::trip();
        let (a, b, c) = (UserFixtures::alice(), UserFixtures::bob(), UserFixtures::carol());
        let groceries = ExpenseBuilder::new(group_id, a, money(dec!(90)))
            .split_equally(&[a, b, c])
            .build();

        let debts = net_debts(&[groceries], &[]);
        assert_eq!(debts.len(), 2);
        assert_debt(&debts, b, a, money(dec!(30)));
        assert_debt(&debts, c, a, money(dec!(30)));

        let balances = member_balances(&debts, &[a, b, c]);
        assert_eq!(balances[0].net_balance, money(dec!(60)));
        assert_eq!(balances[1].net_balance, money(dec!(-30)));
        assert_eq!(balances[2].net_balance, money(dec!(-30)));
        assert_zero_sum(&balances);
    }

    #[test]
    fn test_sub_cent_residual_is_dropped() {
        let group_id = GroupFixtures::trip();
        let (a, b) = (UserFixtures::alice(), UserFixtures::bob());
        let settlement = SettlementBuilder::new(group_id, b, a, money(dec!(49.995))).build();

        let debts = net_debts(&[dinner(group_id)], &[settlement]);
        assert!(debts.is_empty());
    }
}

// ============================================================================
// Edge Case Tests
// ============================================================================

mod edge_case_tests {
    use super::*;

    #[test]
    fn test_one_cent_residual_is_reported() {
        let group_id = GroupFixtures::trip();
        let (a, b) = (UserFixtures::alice(), UserFixtures::bob());
        let lunch = ExpenseBuilder::new(group_id, a, money(dec!(10)))
            .split(b, money(dec!(10)))
            .build();
        let settlement = SettlementBuilder::new(group_id, b, a, money(dec!(9.99))).build();

        let debts = net_debts(&[lunch], &[settlement]);
        assert_debt(&debts, b, a, money(dec!(0.01)));
    }

    #[test]
    fn test_self_split_is_no_op() {
        let group_id = GroupFixtures::trip();
        let a = UserFixtures::alice();
        let solo = ExpenseBuilder::new(group_id, a, money(dec!(25)))
            .split(a, money(dec!(25)))
            .build();

        assert!(net_debts(&[solo], &[]).is_empty());
    }

    #[test]
    fn test_split_for_non_member_is_netted() {
        let group_id = GroupFixtures::trip();
        let (a, b, outsider) = (UserFixtures::alice(), UserFixtures::bob(), UserFixtures::dave());
        let expense = ExpenseBuilder::new(group_id, a, money(dec!(30)))
            .split(b, money(dec!(15)))
            .split(outsider, money(dec!(15)))
            .build();

        let debts = net_debts(&[expense], &[]);
        assert_debt(&debts, outsider, a, money(dec!(15)));

        let balances = member_balances(&debts, &[a, b]);
        assert_eq!(balances.len(), 2);
        assert_eq!(balances[0].net_balance, money(dec!(30)));
    }

    #[test]
    fn test_splits_need_not_match_total() {
        let group_id = GroupFixtures::trip();
        let (a, b) = (UserFixtures::alice(), UserFixtures::bob());
        let expense = ExpenseBuilder::new(group_id, a, money(dec!(100)))
            .split(b, money(dec!(10)))
            .build();

        let debts = net_debts(&[expense], &[]);
        assert_debt(&debts, b, a, money(dec!(10)));
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let group_id = GroupFixtures::trip();
        let (a, b, c) = (UserFixtures::alice(), UserFixtures::bob(), UserFixtures::carol());
        let expenses = vec![
            ExpenseBuilder::new(group_id, c, money(dec!(45.30))).split_equally(&[a, b, c]).build(),
            ExpenseBuilder::new(group_id, b, money(dec!(12))).split_equally(&[a, c]).build(),
        ];
        let settlements = vec![SettlementBuilder::new(group_id, a, c, money(dec!(5))).build()];

        let first = net_debts(&expenses, &settlements);
        let second = net_debts(&expenses, &settlements);
        assert_eq!(first, second);
        assert_debts_well_formed(&first);
    }

    #[test]
    fn test_settled_pair_has_no_debt_either_way() {
        let group_id = GroupFixtures::trip();
        let (a, b) = (UserFixtures::alice(), UserFixtures::bob());
        let expense = ExpenseBuilder::new(group_id, a, money(dec!(20))).split(b, money(dec!(20))).build();
        let settlement = Settlement::new(group_id, b, a, money(dec!(20)));

        assert_settled(&net_debts(&[expense], &[settlement]), a, b);
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
        fn member_balances_sum_to_zero(ledger in ledger_strategy()) {
            let debts = net_debts(&ledger.expenses, &ledger.settlements);
            let balances = member_balances(&debts, &ledger.roster);
            let total: Money = balances.iter().map(|b| b.net_balance).sum();
            prop_assert!(total.is_negligible());
        }

        #[test]
        fn debts_are_well_formed(ledger in ledger_strategy()) {
            let debts = net_debts(&ledger.expenses, &ledger.settlements);
            for debt in &debts {
                prop_assert_ne!(debt.from, debt.to);
                prop_assert!(!debt.amount.is_negligible());
                prop_assert!(debt.amount.is_positive());
            }
            assert_debts_well_formed(&debts);
        }

        #[test]
        fn input_order_does_not_change_debts(ledger in ledger_strategy()) {
            let forward = net_debts(&ledger.expenses, &ledger.settlements);

            let mut expenses = ledger.expenses.clone();
            let mut settlements = ledger.settlements.clone();
            expenses.reverse();
            settlements.reverse();
            let reversed = net_debts(&expenses, &settlements);

            prop_assert_eq!(forward, reversed);
        }

        #[test]
        fn net_position_matches_member_rows(ledger in ledger_strategy()) {
            let debts = net_debts(&ledger.expenses, &ledger.settlements);
            for row in member_balances(&debts, &ledger.roster) {
                assert_money_approx_eq(&row.net_balance, &net_position(&debts, row.user_id));
            }
        }
    }
}
