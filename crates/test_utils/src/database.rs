//! Database Test Utilities
//!
//! Provides a PostgreSQL test container with the ledger schema applied, plus
//! helpers for seeding it. Tests using these helpers need Docker and are
//! marked `#[ignore]`.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use testcontainers::{
    core::{IntoContainerPort, WaitFor},
    runners::AsyncRunner,
    ContainerAsync, GenericImage, ImageExt,
};
use tokio::sync::OnceCell;

use domain_ledger::{Expense, Group, GroupMember, MemberRole, Profile, Settlement};
use infra_db::adapters::ledger::{expense_to_rows, settlement_to_row};
use infra_db::repositories::ledger::{GroupMemberRow, GroupRow, MemberRole as DbMemberRole, ProfileRow};
use infra_db::{DatabaseError, LedgerRepository};

/// Default PostgreSQL image for testing
const POSTGRES_IMAGE: &str = "postgres";
const POSTGRES_TAG: &str = "16-alpine";
const POSTGRES_USER: &str = "test_user";
const POSTGRES_PASSWORD: &str = "test_password";
const POSTGRES_DB: &str = "opensplit_test";

/// Configuration for test database
#[derive(Debug, Clone)]
pub struct TestDatabaseConfig {
    pub user: String,
    pub password: String,
    pub database: String,
    pub host: String,
    pub port: u16,
}

impl Default for TestDatabaseConfig {
    fn default() -> Self {
        Self {
            user: POSTGRES_USER.to_string(),
            password: POSTGRES_PASSWORD.to_string(),
            database: POSTGRES_DB.to_string(),
            host: "localhost".to_string(),
            port: 5432,
        }
    }
}

impl TestDatabaseConfig {
    /// Creates the database connection URL
    pub fn connection_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.database
        )
    }
}

/// A wrapper around a PostgreSQL test container
pub struct TestDatabase {
    _container: ContainerAsync<GenericImage>,
    pub config: TestDatabaseConfig,
    pub pool: PgPool,
}

impl TestDatabase {
    /// Starts a new PostgreSQL container and applies the migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the container fails to start or a migration fails
    pub async fn new() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let container = GenericImage::new(POSTGRES_IMAGE, POSTGRES_TAG)
            .with_exposed_port(5432.tcp())
            .with_wait_for(WaitFor::message_on_stderr("database system is ready to accept connections"))
            .with_env_var("POSTGRES_USER", POSTGRES_USER)
            .with_env_var("POSTGRES_PASSWORD", POSTGRES_PASSWORD)
            .with_env_var("POSTGRES_DB", POSTGRES_DB)
            .start()
            .await?;

        let port = container.get_host_port_ipv4(5432).await?;
        let host = container.get_host().await?.to_string();

        let config = TestDatabaseConfig {
            host,
            port,
            ..TestDatabaseConfig::default()
        };

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&config.connection_url())
            .await?;

        infra_db::run_migrations(&pool).await?;

        Ok(Self {
            _container: container,
            config,
            pool,
        })
    }

    /// Returns a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Returns a repository over this database
    pub fn repository(&self) -> LedgerRepository {
        LedgerRepository::new(self.pool.clone())
    }

    /// Clears all data from the database while preserving the schema
    pub async fn clear_data(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query(
            "TRUNCATE TABLE expense_splits, expenses, settlements, group_members, groups, profiles CASCADE",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

/// Global test database for shared integration tests
static SHARED_TEST_DB: OnceCell<Arc<TestDatabase>> = OnceCell::const_new();

/// Gets or creates a shared test database instance
///
/// # Panics
///
/// Panics if the database fails to initialize
pub async fn get_shared_test_database() -> Arc<TestDatabase> {
    SHARED_TEST_DB
        .get_or_init(|| async {
            Arc::new(
                TestDatabase::new()
                    .await
                    .expect("Failed to create shared test database"),
            )
        })
        .await
        .clone()
}

/// Creates an isolated test database for a single test
pub async fn create_isolated_test_database() -> Result<TestDatabase, Box<dyn std::error::Error + Send + Sync>> {
    TestDatabase::new().await
}

/// Writes domain records through the repository
pub struct LedgerSeeder {
    repository: LedgerRepository,
}

impl LedgerSeeder {
    pub fn new(repository: LedgerRepository) -> Self {
        Self { repository }
    }

    pub async fn profile(&self, profile: &Profile) -> Result<(), DatabaseError> {
        self.repository
            .insert_profile(&ProfileRow {
                id: profile.id.into(),
                name: profile.name.clone(),
                email: profile.email.clone(),
            })
            .await
    }

    /// Inserts the group; its creator becomes an admin member
    pub async fn group(&self, group: &Group) -> Result<(), DatabaseError> {
        self.repository
            .insert_group(&GroupRow {
                id: group.id.into(),
                name: group.name.clone(),
                description: group.description.clone(),
                created_by: group.created_by.into(),
                created_at: group.created_at,
            })
            .await
    }

    pub async fn member(&self, member: &GroupMember) -> Result<(), DatabaseError> {
        self.repository
            .insert_member(&GroupMemberRow {
                group_id: member.group_id.into(),
                user_id: member.user_id.into(),
                role: match member.role {
                    MemberRole::Admin => DbMemberRole::Admin,
                    MemberRole::Member => DbMemberRole::Member,
                },
                joined_at: member.joined_at,
            })
            .await
    }

    pub async fn expense(&self, expense: &Expense) -> Result<(), DatabaseError> {
        let (row, splits) = expense_to_rows(expense);
        self.repository.insert_expense(&row, &splits).await
    }

    pub async fn settlement(&self, settlement: &Settlement) -> Result<(), DatabaseError> {
        self.repository.insert_settlement(&settlement_to_row(settlement)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_connection_url() {
        let config = TestDatabaseConfig::default();
        let url = config.connection_url();

        assert!(url.starts_with("postgres://"));
        assert!(url.contains(POSTGRES_USER));
        assert!(url.contains(POSTGRES_DB));
    }
}
