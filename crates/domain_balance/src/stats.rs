//! Group Statistics Facade
//!
//! Summary figures built on top of the netting engine: per-group totals,
//! the outstanding-balance checks used before a member leaves or a group
//! is deleted, and the cross-group dashboard summary.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use core_kernel::{Money, UserId};
use domain_ledger::{Expense, Profile};

use crate::aggregator::net_position;
use crate::netting::Debt;

/// Name used when a user's profile cannot be found
pub const UNKNOWN_USER_NAME: &str = "Unknown";

/// Headline figures of a group for one member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupStats {
    /// Sum of all live expense amounts
    pub total_expenses: Money,
    /// Net balance of the requesting member
    pub user_balance: Money,
}

/// Computes group statistics for one member
pub fn group_stats(expenses: &[Expense], debts: &[Debt], user_id: UserId) -> GroupStats {
    GroupStats {
        total_expenses: expenses.iter().map(|e| e.amount).sum(),
        user_balance: net_position(debts, user_id),
    }
}

/// Whether a member still has unsettled debts in a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutstandingBalance {
    pub has_balance: bool,
    pub balance: Money,
    pub debts: Vec<Debt>,
}

/// Collects the debts involving `user_id`
///
/// A member whose debts cancel out overall still has an outstanding
/// balance as long as any pairwise debt remains.
pub fn outstanding_balance(debts: &[Debt], user_id: UserId) -> OutstandingBalance {
    let involved: Vec<Debt> = debts.iter().filter(|d| d.involves(user_id)).cloned().collect();

    OutstandingBalance {
        has_balance: !involved.is_empty(),
        balance: net_position(debts, user_id),
        debts: involved,
    }
}

/// Running total owed to or by one counterparty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterpartyTotal {
    pub user_id: UserId,
    pub name: String,
    pub amount: Money,
}

/// Cross-group summary for a user's dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub you_owe: Money,
    pub youre_owed: Money,
    pub active_groups: usize,
    pub you_owe_details: Vec<CounterpartyTotal>,
    pub youre_owed_details: Vec<CounterpartyTotal>,
}

/// Totals a user's debts across every group they belong to
///
/// `group_debts` holds one debt list per group. Counterparty totals are kept
/// per direction, so someone the user owes in one group and is owed by in
/// another shows up in both lists.
pub fn dashboard_summary(
    user_id: UserId,
    group_debts: &[Vec<Debt>],
    profiles: &[Profile],
) -> DashboardSummary {
    let mut owe: HashMap<UserId, Money> = HashMap::new();
    let mut owed: HashMap<UserId, Money> = HashMap::new();

    for debt in group_debts.iter().flatten() {
        if debt.from == user_id {
            *owe.entry(debt.to).or_default() += debt.amount;
        } else if debt.to == user_id {
            *owed.entry(debt.from).or_default() += debt.amount;
        }
    }

    let you_owe_details = counterparty_totals(owe, profiles);
    let youre_owed_details = counterparty_totals(owed, profiles);

    DashboardSummary {
        you_owe: you_owe_details.iter().map(|c| c.amount).sum(),
        youre_owed: youre_owed_details.iter().map(|c| c.amount).sum(),
        active_groups: group_debts.len(),
        you_owe_details,
        youre_owed_details,
    }
}

fn counterparty_totals(totals: HashMap<UserId, Money>, profiles: &[Profile]) -> Vec<CounterpartyTotal> {
    let mut details: Vec<CounterpartyTotal> = totals
        .into_iter()
        .map(|(user_id, amount)| CounterpartyTotal {
            user_id,
            name: display_name(profiles, user_id),
            amount,
        })
        .collect();

    details.sort_by(|a, b| b.amount.cmp(&a.amount).then(a.user_id.cmp(&b.user_id)));
    details
}

/// Profile name for a user, or `"Unknown"`
pub fn display_name(profiles: &[Profile], user_id: UserId) -> String {
    profiles
        .iter()
        .find(|p| p.id == user_id)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| UNKNOWN_USER_NAME.to_string())
}
