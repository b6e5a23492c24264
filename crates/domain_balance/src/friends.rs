//! Friend / Cross-Group Aggregator
//!
//! Views of the relationship between two users across every group they
//! share. All amounts are from the first user's point of view: positive
//! means the friend owes the user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashSet;

use core_kernel::{ExpenseId, GroupId, Money, UserId};
use domain_ledger::{Expense, ExpenseCategory, Settlement};

use crate::netting::{debt_between, net_debts, Debt};

/// Group name used when the group record cannot be found
pub const UNKNOWN_GROUP_NAME: &str = "Unknown";

/// Default number of shared expenses per page
pub const DEFAULT_PAGE_LIMIT: usize = 20;

/// Largest accepted page size
pub const MAX_PAGE_LIMIT: usize = 100;

/// The live records of one group, as read from the ledger
#[derive(Debug, Clone)]
pub struct GroupRecords {
    pub group_id: GroupId,
    pub group_name: String,
    pub expenses: Vec<Expense>,
    pub settlements: Vec<Settlement>,
}

impl GroupRecords {
    /// Net debts of this group
    pub fn debts(&self) -> Vec<Debt> {
        net_debts(&self.expenses, &self.settlements)
    }
}

/// Net balance between two users within one shared group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupBalanceLine {
    pub group_id: GroupId,
    pub group_name: String,
    pub amount: Money,
}

/// Net balance between two users across all shared groups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendBalance {
    pub friend_id: UserId,
    pub net_balance: Money,
    /// One line per shared group where the two are not settled
    pub breakdown: Vec<GroupBalanceLine>,
}

/// An expense both users took part in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedExpense {
    pub expense_id: ExpenseId,
    pub group_id: GroupId,
    pub group_name: String,
    pub description: String,
    pub amount: Money,
    pub paid_by: UserId,
    pub category: ExpenseCategory,
    pub date: DateTime<Utc>,
    pub user_share: Option<Money>,
    pub friend_share: Option<Money>,
}

/// A user who shares at least one group with the requesting user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendSummary {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub shared_group_count: usize,
    pub net_balance: Money,
}

/// A group two users both belong to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedGroup {
    pub id: GroupId,
    pub name: String,
    pub description: Option<String>,
}

/// A friend's profile and the groups shared with them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendDetails {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub shared_groups: Vec<SharedGroup>,
}

/// Pagination window over shared history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: usize,
    pub offset: usize,
}

impl Page {
    /// Builds a page, clamping the limit into `1..=MAX_PAGE_LIMIT`
    pub fn new(limit: usize, offset: usize) -> Self {
        Self {
            limit: limit.clamp(1, MAX_PAGE_LIMIT),
            offset,
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_LIMIT, 0)
    }
}

/// Groups both users belong to, in the order of `user_groups`
pub fn shared_group_ids(user_groups: &[GroupId], friend_groups: &[GroupId]) -> Vec<GroupId> {
    let friend_set: HashSet<GroupId> = friend_groups.iter().copied().collect();
    let mut seen = HashSet::new();
    user_groups
        .iter()
        .copied()
        .filter(|id| friend_set.contains(id) && seen.insert(*id))
        .collect()
}

/// Signed balance between `user` and `friend` in one group's debts
///
/// Positive when the friend owes the user, negative when the user owes the
/// friend, zero when the pair has no debt.
pub fn pair_position(debts: &[Debt], user: UserId, friend: UserId) -> Money {
    match debt_between(debts, user, friend) {
        Some(debt) if debt.from == user => -debt.amount,
        Some(debt) => debt.amount,
        None => Money::zero(),
    }
}

/// Net balance with a friend across the given shared groups
pub fn friend_balance(user: UserId, friend: UserId, groups: &[GroupRecords]) -> FriendBalance {
    let breakdown: Vec<GroupBalanceLine> = groups
        .iter()
        .filter_map(|group| {
            let amount = pair_position(&group.debts(), user, friend);
            if amount.is_negligible() {
                return None;
            }
            Some(GroupBalanceLine {
                group_id: group.group_id,
                group_name: group.group_name.clone(),
                amount,
            })
        })
        .collect();

    FriendBalance {
        friend_id: friend,
        net_balance: breakdown.iter().map(|line| line.amount).sum(),
        breakdown,
    }
}

/// Expenses of the shared groups in which both users took part
///
/// Newest first, ties broken by expense id, then windowed by `page`.
pub fn shared_expenses(
    user: UserId,
    friend: UserId,
    groups: &[GroupRecords],
    page: Page,
) -> Vec<SharedExpense> {
    let mut shared: Vec<SharedExpense> = groups
        .iter()
        .flat_map(|group| {
            group
                .expenses
                .iter()
                .filter(|e| e.involves(user) && e.involves(friend))
                .map(move |e| SharedExpense {
                    expense_id: e.id,
                    group_id: group.group_id,
                    group_name: group.group_name.clone(),
                    description: e.description.clone(),
                    amount: e.amount,
                    paid_by: e.paid_by,
                    category: e.category,
                    date: e.date,
                    user_share: e.split_for(user).map(|s| s.amount),
                    friend_share: e.split_for(friend).map(|s| s.amount),
                })
        })
        .collect();

    shared.sort_by_key(|e| (Reverse(e.date), e.expense_id));

    shared.into_iter().skip(page.offset).take(page.limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_shared_group_ids_keeps_first_list_order() {
        let g1 = GroupId::new();
        let g2 = GroupId::new();
        let g3 = GroupId::new();

        let shared = shared_group_ids(&[g3, g1, g2, g3], &[g1, g3]);
        assert_eq!(shared, vec![g3, g1]);
    }

    #[test]
    fn test_no_shared_groups() {
        assert!(shared_group_ids(&[GroupId::new()], &[GroupId::new()]).is_empty());

        let balance = friend_balance(UserId::new(), UserId::new(), &[]);
        assert!(balance.net_balance.is_zero());
        assert!(balance.breakdown.is_empty());
    }

    #[test]
    fn test_pair_position_sign() {
        let a = UserId::new();
        let b = UserId::new();
        let debts = vec![Debt { from: b, to: a, amount: Money::new(dec!(12)) }];

        assert_eq!(pair_position(&debts, a, b), Money::new(dec!(12)));
        assert_eq!(pair_position(&debts, b, a), Money::new(dec!(-12)));
        assert!(pair_position(&debts, a, UserId::new()).is_zero());
    }

    fn records(group_id: GroupId, expenses: Vec<Expense>, settlements: Vec<Settlement>) -> GroupRecords {
        GroupRecords {
            group_id,
            group_name: "Trip".to_string(),
            expenses,
            settlements,
        }
    }

    #[test]
    fn test_settled_expense_stays_in_history() {
        let (a, b) = (UserId::new(), UserId::new());
        let group_id = GroupId::new();
        let lunch = Expense::new(group_id, "Lunch", Money::new(dec!(40)), a)
            .with_split(a, Money::new(dec!(20)))
            .with_split(b, Money::new(dec!(20)));
        let payback = Settlement::new(group_id, b, a, Money::new(dec!(20)));
        let groups = vec![records(group_id, vec![lunch], vec![payback])];

        let balance = friend_balance(a, b, &groups);
        assert!(balance.net_balance.is_zero());
        assert!(balance.breakdown.is_empty());

        let history = shared_expenses(a, b, &groups, Page::default());
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].description, "Lunch");
    }

    #[test]
    fn test_offsetting_expenses_stay_in_history() {
        let (a, b) = (UserId::new(), UserId::new());
        let group_id = GroupId::new();
        let lunch = Expense::new(group_id, "Lunch", Money::new(dec!(20)), a)
            .with_split(a, Money::new(dec!(10)))
            .with_split(b, Money::new(dec!(10)));
        let coffee = Expense::new(group_id, "Coffee", Money::new(dec!(20)), b)
            .with_split(a, Money::new(dec!(10)))
            .with_split(b, Money::new(dec!(10)));
        let groups = vec![records(group_id, vec![lunch, coffee], vec![])];

        assert!(friend_balance(a, b, &groups).net_balance.is_zero());
        assert_eq!(shared_expenses(a, b, &groups, Page::default()).len(), 2);
    }

    #[test]
    fn test_payer_outside_splits_is_involved() {
        let (a, b) = (UserId::new(), UserId::new());
        let group_id = GroupId::new();
        let gift = Expense::new(group_id, "Gift", Money::new(dec!(25)), a)
            .with_split(b, Money::new(dec!(25)));
        let groups = vec![records(group_id, vec![gift], vec![])];

        let history = shared_expenses(a, b, &groups, Page::default());
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].user_share, None);
        assert_eq!(history[0].friend_share, Some(Money::new(dec!(25))));

        let balance = friend_balance(a, b, &groups);
        assert_eq!(balance.net_balance, Money::new(dec!(25)));
        assert_eq!(balance.breakdown.len(), 1);

        let reverse = shared_expenses(b, a, &groups, Page::default());
        assert_eq!(reverse[0].user_share, Some(Money::new(dec!(25))));
        assert_eq!(reverse[0].friend_share, None);
    }

    #[test]
    fn test_page_clamps_limit() {
        assert_eq!(Page::new(0, 3).limit, 1);
        assert_eq!(Page::new(500, 0).limit, MAX_PAGE_LIMIT);
        assert_eq!(Page::default().limit, DEFAULT_PAGE_LIMIT);
    }
}
