//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain types that give
//! more meaningful error messages than standard assertions.

use std::collections::HashSet;

use core_kernel::{Money, UserId, TOLERANCE};
use domain_balance::{Debt, MemberBalance, PairKey};

/// Asserts that two Money values differ by less than one cent
pub fn assert_money_approx_eq(actual: &Money, expected: &Money) {
    assert!(
        actual.approx_eq(expected),
        "Money amounts differ by one cent or more: actual={}, expected={}",
        actual,
        expected
    );
}

/// Asserts that a Money value is within one cent of zero
pub fn assert_money_negligible(money: &Money) {
    assert!(money.is_negligible(), "Expected a negligible amount, got {}", money);
}

/// Asserts that member balances sum to zero within tolerance
pub fn assert_zero_sum(balances: &[MemberBalance]) {
    let total: Money = balances.iter().map(|b| b.net_balance).sum();
    assert!(
        total.is_negligible(),
        "Member balances should sum to zero, got {} across {} members",
        total,
        balances.len()
    );
}

/// Asserts that exactly one debt runs from `from` to `to` with the given amount
pub fn assert_debt(debts: &[Debt], from: UserId, to: UserId, amount: Money) {
    let found = debts
        .iter()
        .find(|d| d.from == from && d.to == to)
        .unwrap_or_else(|| panic!("No debt from {} to {} in {:?}", from, to, debts));
    assert_money_approx_eq(&found.amount, &amount);
}

/// Asserts that two members have no debt in either direction
pub fn assert_settled(debts: &[Debt], a: UserId, b: UserId) {
    assert!(
        !debts.iter().any(|d| d.is_between(a, b)),
        "Expected {} and {} to be settled, found {:?}",
        a,
        b,
        debts
    );
}

/// Asserts the structural invariants of a netting result
///
/// Every amount is at least one cent, nobody owes themselves, and each
/// pair of members appears at most once.
pub fn assert_debts_well_formed(debts: &[Debt]) {
    let mut pairs = HashSet::new();
    for debt in debts {
        assert_ne!(debt.from, debt.to, "Self debt for {}", debt.from);
        assert!(
            debt.amount.amount() >= TOLERANCE,
            "Debt below tolerance: {:?}",
            debt
        );
        assert!(
            pairs.insert(PairKey::new(debt.from, debt.to)),
            "Pair reported twice: {} / {}",
            debt.from,
            debt.to
        );
    }
}
