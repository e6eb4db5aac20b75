//! Issued policy repository implementation
//!
//! Two constraints guard `issued_policies`:
//!
//! - `issued_policies_policy_number_key`: policy numbers are unique
//! - `issued_policies_open_policy_idx`: partial unique index allowing one
//!   pending or active policy per customer and plan

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::DatabaseError;

/// Unique constraint on the policy number
pub const POLICY_NUMBER_CONSTRAINT: &str = "issued_policies_policy_number_key";

/// Partial unique index on open policies
pub const OPEN_POLICY_CONSTRAINT: &str = "issued_policies_open_policy_idx";

const POLICY_COLUMNS: &str = r#"
    policy_number, customer_id, plan_id, sum_assured, premium_amount,
    payment_frequency, payment_method, issued_at, effective_date, status
"#;

/// Repository for issued policies
#[derive(Debug, Clone)]
pub struct PolicyRepository {
    pool: PgPool,
}

impl PolicyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_number(&self, policy_number: &str) -> Result<Option<PolicyRow>, DatabaseError> {
        let row = sqlx::query_as::<_, PolicyRow>(&format!(
            "SELECT {} FROM issued_policies WHERE policy_number = $1",
            POLICY_COLUMNS
        ))
        .bind(policy_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Lists a customer's policies, oldest first
    pub async fn list_for_customer(&self, customer_id: Uuid) -> Result<Vec<PolicyRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, PolicyRow>(&format!(
            "SELECT {} FROM issued_policies WHERE customer_id = $1 ORDER BY issued_at ASC, policy_id ASC",
            POLICY_COLUMNS
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Sets a policy's status, as activation and cancellation processes do
    pub async fn update_status(&self, policy_number: &str, status: PolicyStatus) -> Result<bool, DatabaseError> {
        let result = sqlx::query("UPDATE issued_policies SET status = $2 WHERE policy_number = $1")
            .bind(policy_number)
            .bind(status)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Finds a pending or active policy for the pair within the caller's transaction
    pub async fn find_open(
        conn: &mut PgConnection,
        customer_id: Uuid,
        plan_id: i64,
    ) -> Result<Option<PolicyRow>, DatabaseError> {
        let row = sqlx::query_as::<_, PolicyRow>(&format!(
            r#"
            SELECT {}
            FROM issued_policies
            WHERE customer_id = $1
              AND plan_id = $2
              AND status IN ('pending', 'active')
            LIMIT 1
            "#,
            POLICY_COLUMNS
        ))
        .bind(customer_id)
        .bind(plan_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(row)
    }

    /// Inserts a policy within the caller's transaction
    pub async fn insert(conn: &mut PgConnection, policy: &PolicyRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO issued_policies (
                policy_number, customer_id, plan_id, sum_assured, premium_amount,
                payment_frequency, payment_method, issued_at, effective_date, status
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(&policy.policy_number)
        .bind(policy.customer_id)
        .bind(policy.plan_id)
        .bind(policy.sum_assured)
        .bind(policy.premium_amount)
        .bind(policy.payment_frequency)
        .bind(&policy.payment_method)
        .bind(policy.issued_at)
        .bind(policy.effective_date)
        .bind(policy.status)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Type definitions
// ============================================================================

/// Policy status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "policy_status", rename_all = "snake_case")]
pub enum PolicyStatus {
    Pending,
    Active,
    Lapsed,
    Cancelled,
    Expired,
}

/// Payment frequency enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "payment_frequency", rename_all = "snake_case")]
pub enum PaymentFrequency {
    Single,
    Annual,
    SemiAnnual,
    Quarterly,
    Monthly,
}

/// Issued policy database row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PolicyRow {
    pub policy_number: String,
    pub customer_id: Uuid,
    pub plan_id: i64,
    pub sum_assured: Decimal,
    pub premium_amount: Decimal,
    pub payment_frequency: PaymentFrequency,
    pub payment_method: String,
    pub issued_at: DateTime<Utc>,
    pub effective_date: DateTime<Utc>,
    pub status: PolicyStatus,
}
