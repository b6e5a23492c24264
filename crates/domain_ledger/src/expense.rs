//! Expense records and their per-member splits
//!
//! An expense is paid by one member and split among one or more members.
//! Every split states how much its member owes the payer for this expense.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use core_kernel::{ExpenseId, GroupId, Money, UserId};
use crate::error::LedgerError;

/// Expense category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Food,
    Transport,
    Entertainment,
    Utilities,
    Shopping,
    #[default]
    Other,
}

impl ExpenseCategory {
    /// Returns the stored name of the category
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Food => "food",
            ExpenseCategory::Transport => "transport",
            ExpenseCategory::Entertainment => "entertainment",
            ExpenseCategory::Utilities => "utilities",
            ExpenseCategory::Shopping => "shopping",
            ExpenseCategory::Other => "other",
        }
    }
}

/// One member's share of an expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseSplit {
    /// Member who owes the share
    pub user_id: UserId,
    /// Amount owed to the payer
    pub amount: Money,
}

impl ExpenseSplit {
    pub fn new(user_id: UserId, amount: Money) -> Self {
        Self { user_id, amount }
    }
}

/// A recorded group expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier
    pub id: ExpenseId,
    /// Group the expense belongs to
    pub group_id: GroupId,
    /// Free-text description
    pub description: String,
    /// Total amount paid
    pub amount: Money,
    /// Member who paid
    pub paid_by: UserId,
    /// When the expense happened
    pub date: DateTime<Utc>,
    /// Category
    pub category: ExpenseCategory,
    /// Per-member shares, in entry order
    pub splits: Vec<ExpenseSplit>,
}

impl Expense {
    /// Creates an expense without splits, dated now
    pub fn new(
        group_id: GroupId,
        description: impl Into<String>,
        amount: Money,
        paid_by: UserId,
    ) -> Self {
        Self {
            id: ExpenseId::new_v7(),
            group_id,
            description: description.into(),
            amount,
            paid_by,
            date: Utc::now(),
            category: ExpenseCategory::default(),
            splits: Vec::new(),
        }
    }

    /// Adds a split
    pub fn with_split(mut self, user_id: UserId, amount: Money) -> Self {
        self.splits.push(ExpenseSplit::new(user_id, amount));
        self
    }

    /// Sets the category
    pub fn with_category(mut self, category: ExpenseCategory) -> Self {
        self.category = category;
        self
    }

    /// Sets the expense date
    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }

    /// Returns the split for a member, if they have one
    pub fn split_for(&self, user_id: UserId) -> Option<&ExpenseSplit> {
        self.splits.iter().find(|s| s.user_id == user_id)
    }

    /// Returns true if the member paid for or shares this expense
    pub fn involves(&self, user_id: UserId) -> bool {
        self.paid_by == user_id || self.split_for(user_id).is_some()
    }

    /// Sum of all split amounts
    pub fn split_total(&self) -> Money {
        self.splits.iter().map(|s| s.amount).sum()
    }

    /// Checks the write-time invariants of an expense
    ///
    /// The balance engine never calls this: it nets whatever the splits
    /// declare. Write paths use it before recording an expense.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if !self.amount.is_positive() {
            return Err(LedgerError::InvalidAmount(self.amount.to_string()));
        }

        let mut seen = HashSet::with_capacity(self.splits.len());
        for split in &self.splits {
            if !seen.insert(split.user_id) {
                return Err(LedgerError::DuplicateSplit(split.user_id.to_string()));
            }
            if split.amount.is_negative() {
                return Err(LedgerError::InvalidAmount(split.amount.to_string()));
            }
        }

        let split_total = self.split_total();
        if !self.splits.is_empty() && !split_total.approx_eq(&self.amount) {
            return Err(LedgerError::SplitMismatch {
                expected: self.amount,
                actual: split_total,
            });
        }

        Ok(())
    }
}
