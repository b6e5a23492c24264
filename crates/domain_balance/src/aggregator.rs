//! Balance Aggregator
//!
//! Folds a group's debts into one net balance per member. Positive means
//! the member is owed money overall.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use core_kernel::{Money, UserId};

use crate::netting::Debt;

/// Net balance of one group member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberBalance {
    pub user_id: UserId,
    pub net_balance: Money,
}

/// Computes a balance row for every roster member, in roster order
///
/// Debts naming someone outside the roster still move the balance of the
/// roster member on the other side, but the outsider gets no row.
pub fn member_balances(debts: &[Debt], roster: &[UserId]) -> Vec<MemberBalance> {
    let mut totals: HashMap<UserId, Money> = roster.iter().map(|id| (*id, Money::zero())).collect();

    for debt in debts {
        if let Some(balance) = totals.get_mut(&debt.to) {
            *balance += debt.amount;
        }
        if let Some(balance) = totals.get_mut(&debt.from) {
            *balance -= debt.amount;
        }
    }

    roster
        .iter()
        .map(|id| MemberBalance {
            user_id: *id,
            net_balance: totals.get(id).copied().unwrap_or_default(),
        })
        .collect()
}

/// Net balance of a single member: what they are owed minus what they owe
pub fn net_position(debts: &[Debt], user_id: UserId) -> Money {
    debts.iter().fold(Money::zero(), |acc, debt| {
        if debt.to == user_id {
            acc + debt.amount
        } else if debt.from == user_id {
            acc - debt.amount
        } else {
            acc
        }
    })
}
