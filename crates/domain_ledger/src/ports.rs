//! Ledger Entry Source port
//!
//! The balance engine never owns ledger data. It reads a group's roster,
//! live expenses and settlements through `LedgerPort`, and adapters decide
//! where those records live:
//!
//! - **Postgres Adapter**: `infra_db::PostgresLedgerAdapter`
//! - **Mock Adapter**: in-memory, for tests and demos (feature `mock`)
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_ledger::ports::LedgerPort;
//! use std::sync::Arc;
//!
//! pub struct BalanceService {
//!     ledger: Arc<dyn LedgerPort>,
//! }
//! ```

use async_trait::async_trait;

use core_kernel::{DomainPort, GroupId, HealthCheckable, PortError, UserId};

use crate::expense::Expense;
use crate::group::{Group, GroupMember, Profile};
use crate::settlement::Settlement;

/// Read access to the recorded facts of expense-sharing groups
///
/// All methods are async and return `Result<T, PortError>` so that the
/// balance engine handles every adapter the same way.
#[async_trait]
pub trait LedgerPort: DomainPort + HealthCheckable {
    /// Retrieves a group by ID
    ///
    /// # Returns
    ///
    /// The group if found, or `PortError::NotFound`
    async fn get_group(&self, id: GroupId) -> Result<Group, PortError>;

    /// Current members of a group, in join order
    async fn group_members(&self, group_id: GroupId) -> Result<Vec<GroupMember>, PortError>;

    /// Live (not soft-deleted) expenses of a group with their splits
    async fn group_expenses(&self, group_id: GroupId) -> Result<Vec<Expense>, PortError>;

    /// Settlements recorded in a group
    async fn group_settlements(&self, group_id: GroupId) -> Result<Vec<Settlement>, PortError>;

    /// IDs of every group the user belongs to, in join order
    async fn user_group_ids(&self, user_id: UserId) -> Result<Vec<GroupId>, PortError>;

    /// Profiles for the given users
    ///
    /// Unknown ids are skipped, so the result may be shorter than the input.
    async fn get_profiles(&self, ids: Vec<UserId>) -> Result<Vec<Profile>, PortError>;
}

/// Mock implementation for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use chrono::{DateTime, Utc};
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use core_kernel::{AdapterHealth, ExpenseId, HealthCheckResult};

    #[derive(Debug, Clone)]
    struct StoredExpense {
        expense: Expense,
        deleted_at: Option<DateTime<Utc>>,
    }

    /// In-memory mock implementation of LedgerPort
    ///
    /// Also exposes the write operations the read-only port leaves out so
    /// tests can build a ledger step by step.
    #[derive(Debug, Default)]
    pub struct MockLedgerPort {
        profiles: Arc<RwLock<HashMap<UserId, Profile>>>,
        groups: Arc<RwLock<HashMap<GroupId, Group>>>,
        members: Arc<RwLock<Vec<GroupMember>>>,
        expenses: Arc<RwLock<Vec<StoredExpense>>>,
        settlements: Arc<RwLock<Vec<Settlement>>>,
    }

    impl MockLedgerPort {
        /// Creates an empty mock ledger
        pub fn new() -> Self {
            Self::default()
        }

        /// Adds or replaces a profile
        pub async fn add_profile(&self, profile: Profile) {
            self.profiles.write().await.insert(profile.id, profile);
        }

        /// Adds a group and makes its creator an admin member
        pub async fn add_group(&self, group: Group) {
            let admin = GroupMember::admin(group.id, group.created_by);
            self.groups.write().await.insert(group.id, group);
            self.add_member(admin).await;
        }

        /// Adds a membership, ignoring duplicates
        pub async fn add_member(&self, member: GroupMember) {
            let mut members = self.members.write().await;
            let exists = members
                .iter()
                .any(|m| m.group_id == member.group_id && m.user_id == member.user_id);
            if !exists {
                members.push(member);
            }
        }

        /// Removes a membership; the user's records stay in the ledger
        pub async fn remove_member(&self, group_id: GroupId, user_id: UserId) {
            self.members
                .write()
                .await
                .retain(|m| !(m.group_id == group_id && m.user_id == user_id));
        }

        /// Records an expense
        pub async fn record_expense(&self, expense: Expense) {
            self.expenses.write().await.push(StoredExpense {
                expense,
                deleted_at: None,
            });
        }

        /// Records a settlement
        pub async fn record_settlement(&self, settlement: Settlement) {
            self.settlements.write().await.push(settlement);
        }

        /// Soft-deletes an expense
        pub async fn delete_expense(&self, id: ExpenseId) -> Result<(), PortError> {
            let mut expenses = self.expenses.write().await;
            let stored = expenses
                .iter_mut()
                .find(|s| s.expense.id == id && s.deleted_at.is_none())
                .ok_or_else(|| PortError::not_found("Expense", id))?;
            stored.deleted_at = Some(Utc::now());
            Ok(())
        }
    }

    impl DomainPort for MockLedgerPort {}

    #[async_trait]
    impl HealthCheckable for MockLedgerPort {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult {
                adapter_id: "mock-ledger-port".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms: 0,
                message: Some("Mock adapter always healthy".to_string()),
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl LedgerPort for MockLedgerPort {
        async fn get_group(&self, id: GroupId) -> Result<Group, PortError> {
            self.groups
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Group", id))
        }

        async fn group_members(&self, group_id: GroupId) -> Result<Vec<GroupMember>, PortError> {
            Ok(self
                .members
                .read()
                .await
                .iter()
                .filter(|m| m.group_id == group_id)
                .cloned()
                .collect())
        }

        async fn group_expenses(&self, group_id: GroupId) -> Result<Vec<Expense>, PortError> {
            Ok(self
                .expenses
                .read()
                .await
                .iter()
                .filter(|s| s.expense.group_id == group_id && s.deleted_at.is_none())
                .map(|s| s.expense.clone())
                .collect())
        }

        async fn group_settlements(&self, group_id: GroupId) -> Result<Vec<Settlement>, PortError> {
            Ok(self
                .settlements
                .read()
                .await
                .iter()
                .filter(|s| s.group_id == group_id)
                .cloned()
                .collect())
        }

        async fn user_group_ids(&self, user_id: UserId) -> Result<Vec<GroupId>, PortError> {
            Ok(self
                .members
                .read()
                .await
                .iter()
                .filter(|m| m.user_id == user_id)
                .map(|m| m.group_id)
                .collect())
        }

        async fn get_profiles(&self, ids: Vec<UserId>) -> Result<Vec<Profile>, PortError> {
            let profiles = self.profiles.read().await;
            Ok(ids.into_iter().filter_map(|id| profiles.get(&id).cloned()).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockLedgerPort;
    use super::*;
    use core_kernel::Money;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_mock_group_creator_is_member() {
        let port = MockLedgerPort::new();
        let owner = UserId::new();
        let group = Group::new("Trip", owner);
        let group_id = group.id;
        port.add_group(group).await;

        let members = port.group_members(group_id).await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].user_id, owner);
        assert_eq!(port.user_group_ids(owner).await.unwrap(), vec![group_id]);
    }

    #[tokio::test]
    async fn test_mock_hides_deleted_expenses() {
        let port = MockLedgerPort::new();
        let payer = UserId::new();
        let group_id = GroupId::new();
        let expense = Expense::new(group_id, "Lunch", Money::new(dec!(10)), payer);
        let expense_id = expense.id;
        port.record_expense(expense).await;

        assert_eq!(port.group_expenses(group_id).await.unwrap().len(), 1);
        port.delete_expense(expense_id).await.unwrap();
        assert!(port.group_expenses(group_id).await.unwrap().is_empty());

        let again = port.delete_expense(expense_id).await;
        assert!(again.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_mock_unknown_group() {
        let port = MockLedgerPort::new();
        let result = port.get_group(GroupId::new()).await;
        assert!(result.unwrap_err().is_not_found());
    }
}
