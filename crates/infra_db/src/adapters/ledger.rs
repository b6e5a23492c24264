//! PostgreSQL Ledger Adapter
//!
//! Implements `LedgerPort` on top of the `LedgerRepository`, converting
//! database rows into ledger records and database errors into port errors.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresLedgerAdapter;
//! use domain_ledger::LedgerPort;
//! use std::sync::Arc;
//!
//! let port: Arc<dyn LedgerPort> = Arc::new(PostgresLedgerAdapter::new(pool));
//! let expenses = port.group_expenses(group_id).await?;
//! ```

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tracing::{debug, instrument};
use uuid::Uuid;

use core_kernel::{
    AdapterHealth, DomainPort, GroupId, HealthCheckResult, HealthCheckable, Money, PortError,
    UserId,
};
use domain_ledger::{
    Expense, ExpenseCategory, ExpenseSplit, Group, GroupMember, LedgerPort, MemberRole,
    PaymentMethod, Profile, Settlement,
};

use crate::error::DatabaseError;
use crate::repositories::ledger::{
    ExpenseCategory as DbExpenseCategory, ExpenseRow, ExpenseSplitRow, GroupMemberRow, GroupRow,
    LedgerRepository, MemberRole as DbMemberRole, PaymentMethod as DbPaymentMethod, ProfileRow,
    SettlementRow,
};

const ADAPTER_ID: &str = "postgres-ledger-adapter";

/// PostgreSQL-backed implementation of the LedgerPort trait
///
/// # Error Handling
///
/// Database errors are translated to `PortError` variants:
/// - `DatabaseError::NotFound` -> `PortError::NotFound`
/// - Constraint violations -> `PortError::Conflict`
/// - Connection failures and pool exhaustion -> `PortError::Connection`
/// - Other errors -> `PortError::Internal`
#[derive(Debug, Clone)]
pub struct PostgresLedgerAdapter {
    repository: LedgerRepository,
    pool: sqlx::PgPool,
}

impl PostgresLedgerAdapter {
    /// Creates a new PostgreSQL ledger adapter
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self {
            repository: LedgerRepository::new(pool.clone()),
            pool,
        }
    }

    /// Returns a reference to the underlying repository
    ///
    /// Write operations live on the repository; the port is read-only.
    pub fn repository(&self) -> &LedgerRepository {
        &self.repository
    }
}

impl DomainPort for PostgresLedgerAdapter {}

#[async_trait]
impl HealthCheckable for PostgresLedgerAdapter {
    /// Runs `SELECT 1` against the pool
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();

        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await;

        let latency_ms = start.elapsed().as_millis() as u64;

        let (status, message) = match result {
            Ok(_) => (AdapterHealth::Healthy, None),
            Err(e) => (AdapterHealth::Unhealthy, Some(format!("Database error: {}", e))),
        };

        HealthCheckResult {
            adapter_id: ADAPTER_ID.to_string(),
            status,
            latency_ms,
            message,
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl LedgerPort for PostgresLedgerAdapter {
    #[instrument(skip(self), fields(group_id = %id))]
    async fn get_group(&self, id: GroupId) -> Result<Group, PortError> {
        debug!("Fetching group");
        let row = self
            .repository
            .get_group(id.into())
            .await
            .map_err(db_to_port_error)?;
        Ok(row_to_group(row))
    }

    #[instrument(skip(self), fields(group_id = %group_id))]
    async fn group_members(&self, group_id: GroupId) -> Result<Vec<GroupMember>, PortError> {
        let rows = self
            .repository
            .group_members(group_id.into())
            .await
            .map_err(db_to_port_error)?;
        debug!(count = rows.len(), "Fetched group members");
        Ok(rows.into_iter().map(row_to_member).collect())
    }

    #[instrument(skip(self), fields(group_id = %group_id))]
    async fn group_expenses(&self, group_id: GroupId) -> Result<Vec<Expense>, PortError> {
        let rows = self
            .repository
            .group_expenses(group_id.into())
            .await
            .map_err(db_to_port_error)?;

        let expense_ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let split_rows = self
            .repository
            .splits_for_expenses(&expense_ids)
            .await
            .map_err(db_to_port_error)?;
        debug!(expenses = rows.len(), splits = split_rows.len(), "Fetched live expenses");

        let mut splits: HashMap<Uuid, Vec<ExpenseSplit>> = HashMap::new();
        for split in split_rows {
            splits.entry(split.expense_id).or_default().push(row_to_split(split));
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let expense_splits = splits.remove(&row.id).unwrap_or_default();
                row_to_expense(row, expense_splits)
            })
            .collect())
    }

    #[instrument(skip(self), fields(group_id = %group_id))]
    async fn group_settlements(&self, group_id: GroupId) -> Result<Vec<Settlement>, PortError> {
        let rows = self
            .repository
            .group_settlements(group_id.into())
            .await
            .map_err(db_to_port_error)?;
        debug!(count = rows.len(), "Fetched settlements");
        Ok(rows.into_iter().map(row_to_settlement).collect())
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn user_group_ids(&self, user_id: UserId) -> Result<Vec<GroupId>, PortError> {
        let ids = self
            .repository
            .user_group_ids(user_id.into())
            .await
            .map_err(db_to_port_error)?;
        Ok(ids.into_iter().map(GroupId::from).collect())
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn get_profiles(&self, ids: Vec<UserId>) -> Result<Vec<Profile>, PortError> {
        let uuids: Vec<Uuid> = ids.into_iter().map(Uuid::from).collect();
        let rows = self
            .repository
            .get_profiles(&uuids)
            .await
            .map_err(db_to_port_error)?;
        Ok(rows.into_iter().map(row_to_profile).collect())
    }
}

// ============================================================================
// Conversion Functions
// ============================================================================

/// Converts a database error to a port error
fn db_to_port_error(e: DatabaseError) -> PortError {
    match e {
        DatabaseError::NotFound { entity, id } => PortError::NotFound {
            entity_type: entity,
            id,
        },
        ref err if err.is_constraint_violation() => PortError::conflict(err.to_string()),
        ref err if err.is_connection_error() => PortError::Connection {
            message: err.to_string(),
            source: None,
        },
        other => PortError::Internal {
            message: other.to_string(),
            source: Some(Box::new(other)),
        },
    }
}

fn row_to_profile(row: ProfileRow) -> Profile {
    Profile::new(UserId::from(row.id), row.name, row.email)
}

fn row_to_group(row: GroupRow) -> Group {
    Group {
        id: GroupId::from(row.id),
        name: row.name,
        description: row.description,
        created_by: UserId::from(row.created_by),
        created_at: row.created_at,
    }
}

fn row_to_member(row: GroupMemberRow) -> GroupMember {
    GroupMember {
        group_id: GroupId::from(row.group_id),
        user_id: UserId::from(row.user_id),
        role: match row.role {
            DbMemberRole::Admin => MemberRole::Admin,
            DbMemberRole::Member => MemberRole::Member,
        },
        joined_at: row.joined_at,
    }
}

fn row_to_split(row: ExpenseSplitRow) -> ExpenseSplit {
    ExpenseSplit::new(UserId::from(row.user_id), Money::new(row.amount))
}

fn row_to_expense(row: ExpenseRow, splits: Vec<ExpenseSplit>) -> Expense {
    Expense {
        id: row.id.into(),
        group_id: GroupId::from(row.group_id),
        description: row.description,
        amount: Money::new(row.amount),
        paid_by: UserId::from(row.paid_by_user_id),
        date: row.date,
        category: db_to_domain_category(row.category),
        splits,
    }
}

fn row_to_settlement(row: SettlementRow) -> Settlement {
    Settlement {
        id: row.id.into(),
        group_id: GroupId::from(row.group_id),
        from_user: UserId::from(row.from_user_id),
        to_user: UserId::from(row.to_user_id),
        amount: Money::new(row.amount),
        payment_method: db_to_domain_payment_method(row.payment_method),
        reference: row.reference,
        date: row.date,
    }
}

fn db_to_domain_category(category: DbExpenseCategory) -> ExpenseCategory {
    match category {
        DbExpenseCategory::Food => ExpenseCategory::Food,
        DbExpenseCategory::Transport => ExpenseCategory::Transport,
        DbExpenseCategory::Entertainment => ExpenseCategory::Entertainment,
        DbExpenseCategory::Utilities => ExpenseCategory::Utilities,
        DbExpenseCategory::Shopping => ExpenseCategory::Shopping,
        DbExpenseCategory::Other => ExpenseCategory::Other,
    }
}

fn db_to_domain_payment_method(method: DbPaymentMethod) -> PaymentMethod {
    match method {
        DbPaymentMethod::Cash => PaymentMethod::Cash,
        DbPaymentMethod::Venmo => PaymentMethod::Venmo,
        DbPaymentMethod::Paypal => PaymentMethod::Paypal,
        DbPaymentMethod::Zelle => PaymentMethod::Zelle,
        DbPaymentMethod::BankTransfer => PaymentMethod::BankTransfer,
        DbPaymentMethod::Other => PaymentMethod::Other,
    }
}

/// Converts a domain category into its database enum
pub fn domain_to_db_category(category: ExpenseCategory) -> DbExpenseCategory {
    match category {
        ExpenseCategory::Food => DbExpenseCategory::Food,
        ExpenseCategory::Transport => DbExpenseCategory::Transport,
        ExpenseCategory::Entertainment => DbExpenseCategory::Entertainment,
        ExpenseCategory::Utilities => DbExpenseCategory::Utilities,
        ExpenseCategory::Shopping => DbExpenseCategory::Shopping,
        ExpenseCategory::Other => DbExpenseCategory::Other,
    }
}

/// Converts a domain payment method into its database enum
pub fn domain_to_db_payment_method(method: PaymentMethod) -> DbPaymentMethod {
    match method {
        PaymentMethod::Cash => DbPaymentMethod::Cash,
        PaymentMethod::Venmo => DbPaymentMethod::Venmo,
        PaymentMethod::Paypal => DbPaymentMethod::Paypal,
        PaymentMethod::Zelle => DbPaymentMethod::Zelle,
        PaymentMethod::BankTransfer => DbPaymentMethod::BankTransfer,
        PaymentMethod::Other => DbPaymentMethod::Other,
    }
}

/// Converts a domain expense into rows ready for insertion
pub fn expense_to_rows(expense: &Expense) -> (ExpenseRow, Vec<ExpenseSplitRow>) {
    let id: Uuid = expense.id.into();
    let row = ExpenseRow {
        id,
        group_id: expense.group_id.into(),
        description: expense.description.clone(),
        amount: expense.amount.round_to_cents().amount(),
        paid_by_user_id: expense.paid_by.into(),
        date: expense.date,
        category: domain_to_db_category(expense.category),
    };
    let splits = expense
        .splits
        .iter()
        .map(|s| ExpenseSplitRow {
            expense_id: id,
            user_id: s.user_id.into(),
            amount: s.amount.round_to_cents().amount(),
        })
        .collect();
    (row, splits)
}

/// Converts a domain settlement into a row ready for insertion
pub fn settlement_to_row(settlement: &Settlement) -> SettlementRow {
    SettlementRow {
        id: settlement.id.into(),
        group_id: settlement.group_id.into(),
        from_user_id: settlement.from_user.into(),
        to_user_id: settlement.to_user.into(),
        amount: settlement.amount.round_to_cents().amount(),
        payment_method: domain_to_db_payment_method(settlement.payment_method),
        reference: settlement.reference.clone(),
        date: settlement.date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_keeps_entity() {
        let port_error = db_to_port_error(DatabaseError::not_found("Group", "GRP-1"));
        match port_error {
            PortError::NotFound { entity_type, id } => {
                assert_eq!(entity_type, "Group");
                assert_eq!(id, "GRP-1");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_pool_exhaustion_is_transient() {
        assert!(db_to_port_error(DatabaseError::PoolExhausted).is_transient());
    }

    #[test]
    fn test_duplicate_is_conflict() {
        let port_error = db_to_port_error(DatabaseError::duplicate("Profile", "email", "a@b.c"));
        assert!(matches!(port_error, PortError::Conflict { .. }));
    }

    #[test]
    fn test_category_round_trip() {
        for category in [
            ExpenseCategory::Food,
            ExpenseCategory::Transport,
            ExpenseCategory::Entertainment,
            ExpenseCategory::Utilities,
            ExpenseCategory::Shopping,
            ExpenseCategory::Other,
        ] {
            assert_eq!(db_to_domain_category(domain_to_db_category(category)), category);
        }
    }
}
