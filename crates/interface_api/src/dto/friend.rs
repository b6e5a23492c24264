//! Friend DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{ExpenseId, GroupId, Money, UserId};
use domain_balance::friends::DEFAULT_PAGE_LIMIT;
use domain_balance::{FriendBalance, GroupBalanceLine, Page, SharedExpense};
use domain_ledger::ExpenseCategory;

use super::Names;

/// Query string of the shared-history endpoint
#[derive(Debug, Default, Deserialize, Validate)]
pub struct SharedExpensesQuery {
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl SharedExpensesQuery {
    pub fn page(&self) -> Page {
        Page::new(
            self.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
            self.offset.unwrap_or(0),
        )
    }
}

#[derive(Debug, Serialize)]
pub struct FriendBalanceResponse {
    pub friend_id: UserId,
    pub friend_name: String,
    pub net_balance: Money,
    pub breakdown: Vec<GroupBalanceLine>,
}

impl FriendBalanceResponse {
    pub fn new(balance: FriendBalance, names: &Names) -> Self {
        Self {
            friend_name: names.get(balance.friend_id),
            friend_id: balance.friend_id,
            net_balance: balance.net_balance,
            breakdown: balance.breakdown,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SharedExpenseResponse {
    pub expense_id: ExpenseId,
    pub group_id: GroupId,
    pub group_name: String,
    pub description: String,
    pub amount: Money,
    pub paid_by: UserId,
    pub paid_by_name: String,
    pub category: ExpenseCategory,
    pub date: DateTime<Utc>,
    pub user_share: Option<Money>,
    pub friend_share: Option<Money>,
}

impl SharedExpenseResponse {
    pub fn new(expense: SharedExpense, names: &Names) -> Self {
        Self {
            paid_by_name: names.get(expense.paid_by),
            expense_id: expense.expense_id,
            group_id: expense.group_id,
            group_name: expense.group_name,
            description: expense.description,
            amount: expense.amount,
            paid_by: expense.paid_by,
            category: expense.category,
            date: expense.date,
            user_share: expense.user_share,
            friend_share: expense.friend_share,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SharedExpensesResponse {
    pub friend_id: UserId,
    pub limit: usize,
    pub offset: usize,
    pub expenses: Vec<SharedExpenseResponse>,
}
