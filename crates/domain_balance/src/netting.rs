//! Pairwise Netting Engine
//!
//! Reduces a group's expenses and settlements to at most one debt per pair
//! of members.
//!
//! # Algorithm
//!
//! 1. Every pair of members is keyed by `PairKey`, which stores the two ids
//!    in canonical (`Ord`) order.
//! 2. A signed net flow is accumulated per key. Positive means the first
//!    member of the key owes the second.
//! 3. Each split adds its amount from the split member to the payer. Each
//!    settlement subtracts its amount from payer to payee.
//! 4. Flows whose magnitude is below `TOLERANCE` are dropped. The rest
//!    become `Debt`s pointing from the net debtor to the net creditor.
//!
//! The accumulator lives for one call only, so repeated calls over the same
//! records always return the same debts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use core_kernel::{Money, UserId};
use domain_ledger::{Expense, Settlement};

/// Unordered pair of members in canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey {
    low: UserId,
    high: UserId,
}

impl PairKey {
    /// Builds the key for two members, whichever order they are given in
    pub fn new(a: UserId, b: UserId) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    /// The member that sorts first
    pub fn low(&self) -> UserId {
        self.low
    }

    /// The member that sorts second
    pub fn high(&self) -> UserId {
        self.high
    }

    /// Sign applied to a flow from `debtor` to `creditor` under this key
    fn orient(&self, debtor: UserId, amount: Decimal) -> Decimal {
        if debtor == self.low {
            amount
        } else {
            -amount
        }
    }
}

/// A net amount one member owes another within a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debt {
    /// Member who owes
    pub from: UserId,
    /// Member who is owed
    pub to: UserId,
    /// Amount owed, always at least one cent
    pub amount: Money,
}

impl Debt {
    /// Returns true if the member is either side of the debt
    pub fn involves(&self, user_id: UserId) -> bool {
        self.from == user_id || self.to == user_id
    }

    /// Returns true if the debt is between exactly these two members
    pub fn is_between(&self, a: UserId, b: UserId) -> bool {
        PairKey::new(self.from, self.to) == PairKey::new(a, b)
    }
}

#[derive(Debug, Default)]
struct PairLedger {
    flows: HashMap<PairKey, Decimal>,
}

impl PairLedger {
    fn add_flow(&mut self, debtor: UserId, creditor: UserId, amount: Decimal) {
        if debtor == creditor {
            return;
        }
        let key = PairKey::new(debtor, creditor);
        *self.flows.entry(key).or_default() += key.orient(debtor, amount);
    }

    fn into_debts(self) -> Vec<Debt> {
        let mut debts: Vec<Debt> = self
            .flows
            .into_iter()
            .filter_map(|(key, net)| {
                let net = Money::new(net);
                if net.is_negligible() {
                    None
                } else if net.is_positive() {
                    Some(Debt { from: key.low(), to: key.high(), amount: net })
                } else {
                    Some(Debt { from: key.high(), to: key.low(), amount: net.abs() })
                }
            })
            .collect();

        debts.sort_by(|a, b| (a.from, a.to).cmp(&(b.from, b.to)));
        debts
    }
}

/// Computes the net debts of one group
///
/// Self-splits and self-settlements are ignored. Split totals are not
/// reconciled against expense totals, and split members outside the group
/// roster are netted like anyone else.
///
/// # Returns
///
/// Debts sorted by (from, to), each above the tolerance, at most one per pair
pub fn net_debts(expenses: &[Expense], settlements: &[Settlement]) -> Vec<Debt> {
    let mut ledger = PairLedger::default();

    for expense in expenses {
        for split in &expense.splits {
            ledger.add_flow(split.user_id, expense.paid_by, split.amount.amount());
        }
    }

    for settlement in settlements {
        ledger.add_flow(settlement.to_user, settlement.from_user, settlement.amount.amount());
    }

    ledger.into_debts()
}

/// Finds the debt between two members, if any
pub fn debt_between(debts: &[Debt], a: UserId, b: UserId) -> Option<&Debt> {
    debts.iter().find(|d| d.is_between(a, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::GroupId;
    use rust_decimal_macros::dec;

    fn money(d: Decimal) -> Money {
        Money::new(d)
    }

    #[test]
    fn test_pair_key_is_order_independent() {
        let a = UserId::new();
        let b = UserId::new();
        assert_eq!(PairKey::new(a, b), PairKey::new(b, a));
        assert!(PairKey::new(a, b).low() <= PairKey::new(a, b).high());
    }

    #[test]
    fn test_empty_input() {
        assert!(net_debts(&[], &[]).is_empty());
    }

    #[test]
    fn test_self_paid_unsplit_expense() {
        let a = UserId::new();
        let expense = Expense::new(GroupId::new(), "Solo", money(dec!(40)), a)
            .with_split(a, money(dec!(40)));
        assert!(net_debts(&[expense], &[]).is_empty());
    }

    #[test]
    fn test_split_creates_debt_to_payer() {
        let a = UserId::new();
        let b = UserId::new();
        let expense = Expense::new(GroupId::new(), "Dinner", money(dec!(100)), a)
            .with_split(a, money(dec!(50)))
            .with_split(b, money(dec!(50)));

        let debts = net_debts(&[expense], &[]);
        assert_eq!(debts, vec![Debt { from: b, to: a, amount: money(dec!(50)) }]);
    }

    #[test]
    fn test_self_settlement_ignored() {
        let a = UserId::new();
        let settlement = Settlement::new(GroupId::new(), a, a, money(dec!(10)));
        assert!(net_debts(&[], &[settlement]).is_empty());
    }

    #[test]
    fn test_overpaid_settlement_reverses_debt() {
        let a = UserId::new();
        let b = UserId::new();
        let group_id = GroupId::new();
        let expense = Expense::new(group_id, "Dinner", money(dec!(20)), a)
            .with_split(b, money(dec!(20)));
        let settlement = Settlement::new(group_id, b, a, money(dec!(25)));

        let debts = net_debts(&[expense], &[settlement]);
        assert_eq!(debts, vec![Debt { from: a, to: b, amount: money(dec!(5)) }]);
    }

    #[test]
    fn test_debt_amount_serializes_with_two_digits() {
        let debt = Debt { from: UserId::new(), to: UserId::new(), amount: money(dec!(50)) };
        let json = serde_json::to_value(&debt).unwrap();
        assert_eq!(json["amount"], "50.00");
    }

    #[test]
    fn test_debt_between_finds_either_direction() {
        let a = UserId::new();
        let b = UserId::new();
        let debts = vec![Debt { from: b, to: a, amount: money(dec!(1)) }];

        assert!(debt_between(&debts, a, b).is_some());
        assert!(debt_between(&debts, b, a).is_some());
        assert!(debt_between(&debts, a, UserId::new()).is_none());
    }
}
