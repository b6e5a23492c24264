//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random group ledgers whose
//! records only reference members of the generated roster.

use core_kernel::{GroupId, Money, UserId};
use domain_ledger::{Expense, Settlement};
use proptest::prelude::*;
use uuid::Uuid;

/// A randomly generated group history
#[derive(Debug, Clone)]
pub struct GeneratedLedger {
    pub group_id: GroupId,
    pub roster: Vec<UserId>,
    pub expenses: Vec<Expense>,
    pub settlements: Vec<Settlement>,
}

/// Strategy for generating valid positive amounts in minor units
pub fn positive_amount_minor_strategy() -> impl Strategy<Value = i64> {
    1i64..10_000_000i64
}

/// Strategy for generating positive Money values
pub fn positive_money_strategy() -> impl Strategy<Value = Money> {
    positive_amount_minor_strategy().prop_map(Money::from_minor)
}

/// Strategy for generating distinct user ids
pub fn roster_strategy(max_members: usize) -> impl Strategy<Value = Vec<UserId>> {
    proptest::collection::hash_set(any::<u128>(), 2..=max_members.max(2)).prop_map(|ids| {
        ids.into_iter()
            .map(|raw| UserId::from_uuid(Uuid::from_u128(raw)))
            .collect()
    })
}

/// Strategy for generating a whole group ledger
///
/// Splits are drawn as (member index, cents) pairs and deduplicated per
/// expense, so split users are distinct as in recorded data.
pub fn ledger_strategy() -> impl Strategy<Value = GeneratedLedger> {
    roster_strategy(6).prop_flat_map(|roster| {
        let n = roster.len();
        let split = (0..n, positive_amount_minor_strategy());
        let expense = (0..n, proptest::collection::vec(split, 1..=n));
        let settlement = (0..n, 0..n, positive_amount_minor_strategy());

        (
            Just(roster),
            proptest::collection::vec(expense, 0..12),
            proptest::collection::vec(settlement, 0..6),
        )
            .prop_map(|(roster, raw_expenses, raw_settlements)| {
                let group_id = GroupId::new();

                let expenses = raw_expenses
                    .into_iter()
                    .map(|(payer, splits)| {
                        let mut seen = std::collections::HashSet::new();
                        let splits: Vec<(UserId, Money)> = splits
                            .into_iter()
                            .filter(|(idx, _)| seen.insert(*idx))
                            .map(|(idx, cents)| (roster[idx], Money::from_minor(cents)))
                            .collect();
                        let total: Money = splits.iter().map(|(_, m)| *m).sum();

                        splits.into_iter().fold(
                            Expense::new(group_id, "Generated", total, roster[payer]),
                            |e, (user_id, amount)| e.with_split(user_id, amount),
                        )
                    })
                    .collect();

                let settlements = raw_settlements
                    .into_iter()
                    .map(|(from, to, cents)| {
                        Settlement::new(group_id, roster[from], roster[to], Money::from_minor(cents))
                    })
                    .collect();

                GeneratedLedger {
                    group_id,
                    roster,
                    expenses,
                    settlements,
                }
            })
    })
}
