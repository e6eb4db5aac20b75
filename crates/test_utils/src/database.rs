//! Database Test Utilities
//!
//! Starts PostgreSQL in a testcontainer, applies the embedded migrations and
//! offers seeding helpers for integration tests. Tests using it need Docker
//! and are marked `#[ignore]`.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use testcontainers::{runners::AsyncRunner, ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;

use core_kernel::{CustomerId, PlanId};
use domain_customer::{Customer, CustomerPort, NewCustomer};
use infra_db::repositories::plan::NewPlan;
use infra_db::repositories::PlanRepository;
use infra_db::{run_migrations, PostgresCustomerAdapter};

const POSTGRES_TAG: &str = "16-alpine";
const POSTGRES_USER: &str = "test_user";
const POSTGRES_PASSWORD: &str = "test_password";
const POSTGRES_DB: &str = "insurance_test";

/// Tables truncated between tests, children first
const TABLES: [&str; 5] = [
    "beneficiaries",
    "health_declarations",
    "issued_policies",
    "insurance_plans",
    "customers",
];

pub type TestDbResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

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

/// A migrated PostgreSQL test container
pub struct TestDatabase {
    _container: ContainerAsync<Postgres>,
    pub config: TestDatabaseConfig,
    pub pool: PgPool,
}

impl TestDatabase {
    /// Starts a new PostgreSQL container and runs the migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the container fails to start or a migration fails
    pub async fn new() -> TestDbResult<Self> {
        let container = Postgres::default()
            .with_user(POSTGRES_USER)
            .with_password(POSTGRES_PASSWORD)
            .with_db_name(POSTGRES_DB)
            .with_tag(POSTGRES_TAG)
            .start()
            .await?;

        let config = TestDatabaseConfig {
            host: container.get_host().await?.to_string(),
            port: container.get_host_port_ipv4(5432).await?,
            ..TestDatabaseConfig::default()
        };

        // Concurrency tests hold one connection per purchase
        let pool = PgPoolOptions::new()
            .max_connections(16)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&config.connection_url())
            .await?;

        run_migrations(&pool).await?;

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

    /// Clears all data while preserving the schema
    pub async fn clear_data(&self) -> TestDbResult<()> {
        sqlx::query(&format!(
            "TRUNCATE TABLE {} RESTART IDENTITY CASCADE",
            TABLES.join(", ")
        ))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Onboards a customer through the PostgreSQL adapter
    pub async fn seed_customer(&self, new: NewCustomer) -> TestDbResult<Customer> {
        let customer = Customer::from_new(new);
        PostgresCustomerAdapter::new(self.pool.clone())
            .create_customer(&customer)
            .await?;
        Ok(customer)
    }

    /// Adds a plan to the catalog and returns its id
    pub async fn seed_plan(&self, plan: NewPlan) -> TestDbResult<PlanId> {
        let row = PlanRepository::new(self.pool.clone()).insert(plan).await?;
        Ok(PlanId::new(row.plan_id))
    }

    /// Counts open (pending or active) policies for a customer and plan
    pub async fn count_open_policies(&self, customer_id: CustomerId, plan_id: PlanId) -> TestDbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM issued_policies
            WHERE customer_id = $1 AND plan_id = $2 AND status IN ('pending', 'active')
            "#,
        )
        .bind(*customer_id.as_uuid())
        .bind(plan_id.value())
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}

/// Helper macro for database tests that need their own container
#[macro_export]
macro_rules! db_test {
    ($name:ident, |$db:ident| $body:block) => {
        #[tokio::test]
        #[ignore = "requires Docker"]
        async fn $name() {
            let $db = match $crate::database::TestDatabase::new().await {
                Ok(db) => db,
                Err(e) => panic!("failed to create test database: {e}"),
            };
            $body
        }
    };
}
