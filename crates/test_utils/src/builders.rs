//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use chrono::{DateTime, Utc};
use core_kernel::{GroupId, Money, UserId};
use domain_ledger::{
    Expense, ExpenseCategory, Group, GroupMember, MockLedgerPort, PaymentMethod, Profile,
    Settlement,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::fixtures::{TemporalFixtures, UserFixtures};

/// Builder for expenses
pub struct ExpenseBuilder {
    group_id: GroupId,
    description: String,
    amount: Money,
    paid_by: UserId,
    category: ExpenseCategory,
    date: DateTime<Utc>,
    splits: Vec<(UserId, Money)>,
}

impl ExpenseBuilder {
    /// Starts an expense paid by `paid_by` in `group_id`
    pub fn new(group_id: GroupId, paid_by: UserId, amount: Money) -> Self {
        Self {
            group_id,
            description: "Test expense".to_string(),
            amount,
            paid_by,
            category: ExpenseCategory::Other,
            date: TemporalFixtures::reference(),
            splits: Vec::new(),
        }
    }

    /// Sets the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the category
    pub fn with_category(mut self, category: ExpenseCategory) -> Self {
        self.category = category;
        self
    }

    /// Sets the date
    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }

    /// Adds one split
    pub fn split(mut self, user_id: UserId, amount: Money) -> Self {
        self.splits.push((user_id, amount));
        self
    }

    /// Splits the amount equally in whole cents
    ///
    /// Leftover cents go to the first participants, one each.
    pub fn split_equally(mut self, participants: &[UserId]) -> Self {
        if participants.is_empty() {
            return self;
        }
        let total_cents = (self.amount.round_to_cents().amount() * Decimal::ONE_HUNDRED)
            .to_i64()
            .unwrap_or_default();
        let count = participants.len() as i64;
        let base = total_cents / count;
        let leftover = total_cents - base * count;

        for (i, user_id) in participants.iter().enumerate() {
            let extra = if (i as i64) < leftover { 1 } else { 0 };
            self.splits.push((*user_id, Money::from_minor(base + extra)));
        }
        self
    }

    /// Builds the expense
    pub fn build(self) -> Expense {
        let mut expense = Expense::new(self.group_id, self.description, self.amount, self.paid_by)
            .with_category(self.category)
            .with_date(self.date);
        for (user_id, amount) in self.splits {
            expense = expense.with_split(user_id, amount);
        }
        expense
    }
}

/// Builder for settlements
pub struct SettlementBuilder {
    group_id: GroupId,
    from_user: UserId,
    to_user: UserId,
    amount: Money,
    method: PaymentMethod,
    date: DateTime<Utc>,
}

impl SettlementBuilder {
    /// Starts a payment from `from_user` to `to_user`
    pub fn new(group_id: GroupId, from_user: UserId, to_user: UserId, amount: Money) -> Self {
        Self {
            group_id,
            from_user,
            to_user,
            amount,
            method: PaymentMethod::Cash,
            date: TemporalFixtures::reference(),
        }
    }

    /// Sets the payment method
    pub fn with_method(mut self, method: PaymentMethod) -> Self {
        self.method = method;
        self
    }

    /// Sets the date
    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }

    /// Builds the settlement
    pub fn build(self) -> Settlement {
        Settlement::new(self.group_id, self.from_user, self.to_user, self.amount)
            .with_method(self.method)
            .with_date(self.date)
    }
}

/// Builder for an in-memory ledger holding one group
///
/// The first member added becomes the group's creator and admin.
pub struct LedgerScenario {
    group_id: GroupId,
    group_name: String,
    members: Vec<Profile>,
    expenses: Vec<Expense>,
    settlements: Vec<Settlement>,
}

impl LedgerScenario {
    /// Starts a scenario for a new group
    pub fn new(group_name: impl Into<String>) -> Self {
        Self::with_group_id(GroupId::new_v7(), group_name)
    }

    /// Starts a scenario for a group with a known id
    pub fn with_group_id(group_id: GroupId, group_name: impl Into<String>) -> Self {
        Self {
            group_id,
            group_name: group_name.into(),
            members: Vec::new(),
            expenses: Vec::new(),
            settlements: Vec::new(),
        }
    }

    /// The group id records should use
    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    /// Adds a member with a profile
    pub fn member(mut self, user_id: UserId, name: &str) -> Self {
        self.members.push(UserFixtures::profile(user_id, name));
        self
    }

    /// Adds an expense
    pub fn expense(mut self, expense: Expense) -> Self {
        self.expenses.push(expense);
        self
    }

    /// Adds a settlement
    pub fn settlement(mut self, settlement: Settlement) -> Self {
        self.settlements.push(settlement);
        self
    }

    /// Writes the scenario into an existing mock ledger
    pub async fn seed(self, port: &MockLedgerPort) -> GroupId {
        let creator = self
            .members
            .first()
            .map(|p| p.id)
            .unwrap_or_else(UserId::new);

        let mut group = Group::new(self.group_name, creator);
        group.id = self.group_id;
        port.add_group(group).await;

        for profile in self.members {
            port.add_member(GroupMember::new(self.group_id, profile.id)).await;
            port.add_profile(profile).await;
        }
        for expense in self.expenses {
            port.record_expense(expense).await;
        }
        for settlement in self.settlements {
            port.record_settlement(settlement).await;
        }
        self.group_id
    }

    /// Writes the scenario into a fresh mock ledger
    pub async fn build(self) -> (Arc<MockLedgerPort>, GroupId) {
        let port = Arc::new(MockLedgerPort::new());
        let group_id = self.seed(&port).await;
        (port, group_id)
    }
}
