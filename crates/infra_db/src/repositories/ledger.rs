//! Ledger repository implementation
//!
//! Database access for profiles, groups, memberships, expenses, splits and
//! settlements. Expenses are soft-deleted: every read filters on
//! `deleted_at IS NULL`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseError;

/// Repository for the expense-sharing ledger tables
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    pool: PgPool,
}

impl LedgerRepository {
    /// Creates a new LedgerRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Retrieves a group by its identifier
    pub async fn get_group(&self, group_id: Uuid) -> Result<GroupRow, DatabaseError> {
        sqlx::query_as::<_, GroupRow>(
            r#"
            SELECT id, name, description, created_by, created_at
            FROM groups
            WHERE id = $1
            "#,
        )
        .bind(group_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Group", group_id))
    }

    /// Lists the members of a group in join order
    pub async fn group_members(&self, group_id: Uuid) -> Result<Vec<GroupMemberRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, GroupMemberRow>(
            r#"
            SELECT group_id, user_id, role, joined_at
            FROM group_members
            WHERE group_id = $1
            ORDER BY joined_at, user_id
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Lists the live expenses of a group
    pub async fn group_expenses(&self, group_id: Uuid) -> Result<Vec<ExpenseRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, ExpenseRow>(
            r#"
            SELECT id, group_id, description, amount, paid_by_user_id, date, category
            FROM expenses
            WHERE group_id = $1 AND deleted_at IS NULL
            ORDER BY date, id
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Lists the splits of the given expenses
    pub async fn splits_for_expenses(
        &self,
        expense_ids: &[Uuid],
    ) -> Result<Vec<ExpenseSplitRow>, DatabaseError> {
        if expense_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, ExpenseSplitRow>(
            r#"
            SELECT expense_id, user_id, amount
            FROM expense_splits
            WHERE expense_id = ANY($1)
            ORDER BY expense_id, position, user_id
            "#,
        )
        .bind(expense_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Lists the settlements of a group
    pub async fn group_settlements(&self, group_id: Uuid) -> Result<Vec<SettlementRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, SettlementRow>(
            r#"
            SELECT id, group_id, from_user_id, to_user_id, amount, payment_method, reference, date
            FROM settlements
            WHERE group_id = $1
            ORDER BY date, id
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Lists the ids of every group a user belongs to, in join order
    pub async fn user_group_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, DatabaseError> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT group_id
            FROM group_members
            WHERE user_id = $1
            ORDER BY joined_at, group_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    /// Retrieves the profiles of the given users
    pub async fn get_profiles(&self, user_ids: &[Uuid]) -> Result<Vec<ProfileRow>, DatabaseError> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, name, email
            FROM profiles
            WHERE id = ANY($1)
            "#,
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // ========================================================================
    // Write operations
    // ========================================================================

    /// Inserts a profile
    pub async fn insert_profile(&self, profile: &ProfileRow) -> Result<(), DatabaseError> {
        sqlx::query("INSERT INTO profiles (id, name, email) VALUES ($1, $2, $3)")
            .bind(profile.id)
            .bind(&profile.name)
            .bind(&profile.email)
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::from(&e))?;
        Ok(())
    }

    /// Inserts a group and its creator's admin membership
    pub async fn insert_group(&self, group: &GroupRow) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO groups (id, name, description, created_by, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(group.id)
        .bind(&group.name)
        .bind(&group.description)
        .bind(group.created_by)
        .bind(group.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| DatabaseError::from(&e))?;

        sqlx::query(
            r#"
            INSERT INTO group_members (group_id, user_id, role, joined_at)
            VALUES ($1, $2, 'admin', $3)
            "#,
        )
        .bind(group.id)
        .bind(group.created_by)
        .bind(group.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| DatabaseError::from(&e))?;

        tx.commit()
            .await
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;
        Ok(())
    }

    /// Inserts a membership
    pub async fn insert_member(&self, member: &GroupMemberRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO group_members (group_id, user_id, role, joined_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(member.group_id)
        .bind(member.user_id)
        .bind(member.role)
        .bind(member.joined_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from(&e))?;
        Ok(())
    }

    /// Inserts an expense and its splits in one transaction
    pub async fn insert_expense(
        &self,
        expense: &ExpenseRow,
        splits: &[ExpenseSplitRow],
    ) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO expenses (id, group_id, description, amount, paid_by_user_id, date, category)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(expense.id)
        .bind(expense.group_id)
        .bind(&expense.description)
        .bind(expense.amount)
        .bind(expense.paid_by_user_id)
        .bind(expense.date)
        .bind(expense.category)
        .execute(&mut *tx)
        .await
        .map_err(|e| DatabaseError::from(&e))?;

        for (position, split) in splits.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO expense_splits (expense_id, user_id, amount, position)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(expense.id)
            .bind(split.user_id)
            .bind(split.amount)
            .bind(position as i32)
            .execute(&mut *tx)
            .await
            .map_err(|e| DatabaseError::from(&e))?;
        }

        tx.commit()
            .await
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;
        Ok(())
    }

    /// Inserts a settlement
    pub async fn insert_settlement(&self, settlement: &SettlementRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO settlements (id, group_id, from_user_id, to_user_id, amount, payment_method, reference, date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(settlement.id)
        .bind(settlement.group_id)
        .bind(settlement.from_user_id)
        .bind(settlement.to_user_id)
        .bind(settlement.amount)
        .bind(settlement.payment_method)
        .bind(&settlement.reference)
        .bind(settlement.date)
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from(&e))?;
        Ok(())
    }

    /// Soft-deletes an expense
    pub async fn soft_delete_expense(&self, expense_id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE expenses SET deleted_at = now() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(expense_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Expense", expense_id));
        }
        Ok(())
    }
}

/// Profile row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Group row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GroupRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Group membership row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GroupMemberRow {
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub role: MemberRole,
    pub joined_at: DateTime<Utc>,
}

/// Expense row, without splits
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExpenseRow {
    pub id: Uuid,
    pub group_id: Uuid,
    pub description: String,
    pub amount: Decimal,
    pub paid_by_user_id: Uuid,
    pub date: DateTime<Utc>,
    pub category: ExpenseCategory,
}

/// Expense split row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExpenseSplitRow {
    pub expense_id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
}

/// Settlement row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SettlementRow {
    pub id: Uuid,
    pub group_id: Uuid,
    pub from_user_id: Uuid,
    pub to_user_id: Uuid,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub reference: Option<String>,
    pub date: DateTime<Utc>,
}

/// Member role enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "member_role", rename_all = "snake_case")]
pub enum MemberRole {
    Admin,
    Member,
}

/// Expense category enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "expense_category", rename_all = "snake_case")]
pub enum ExpenseCategory {
    Food,
    Transport,
    Entertainment,
    Utilities,
    Shopping,
    Other,
}

/// Payment method enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "payment_method", rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Venmo,
    Paypal,
    Zelle,
    BankTransfer,
    Other,
}
