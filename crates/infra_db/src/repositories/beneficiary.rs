//! Beneficiary repository implementation

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::repositories::customer::CustomerRepository;

/// Repository for beneficiary rows
#[derive(Debug, Clone)]
pub struct BeneficiaryRepository {
    pool: PgPool,
}

impl BeneficiaryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Replaces all beneficiaries of an active customer in one transaction
    ///
    /// Existing rows are hard-deleted, including ones already linked to a
    /// policy. Returns `DatabaseError::NotFound` if the customer is missing
    /// or soft-deleted.
    pub async fn replace_for_customer(
        &self,
        customer_id: Uuid,
        beneficiaries: &[BeneficiaryRow],
    ) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        if CustomerRepository::lock_active(&mut *tx, customer_id).await?.is_none() {
            return Err(DatabaseError::not_found("Customer", customer_id));
        }

        sqlx::query("DELETE FROM beneficiaries WHERE customer_id = $1")
            .bind(customer_id)
            .execute(&mut *tx)
            .await?;

        for beneficiary in beneficiaries {
            sqlx::query(
                r#"
                INSERT INTO beneficiaries (
                    beneficiary_id, customer_id, plan_id, policy_number,
                    first_name, last_name, relationship, percentage,
                    email, phone, created_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                "#,
            )
            .bind(beneficiary.beneficiary_id)
            .bind(customer_id)
            .bind(beneficiary.plan_id)
            .bind(&beneficiary.policy_number)
            .bind(&beneficiary.first_name)
            .bind(&beneficiary.last_name)
            .bind(&beneficiary.relationship)
            .bind(beneficiary.percentage)
            .bind(&beneficiary.email)
            .bind(&beneficiary.phone)
            .bind(beneficiary.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Lists a customer's beneficiaries in insertion order
    pub async fn list_for_customer(&self, customer_id: Uuid) -> Result<Vec<BeneficiaryRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, BeneficiaryRow>(
            r#"
            SELECT
                beneficiary_id, customer_id, plan_id, policy_number,
                first_name, last_name, relationship, percentage,
                email, phone, created_at
            FROM beneficiaries
            WHERE customer_id = $1
            ORDER BY created_at ASC, beneficiary_id ASC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Stamps the customer's beneficiaries for a plan with a policy number
    ///
    /// # Returns
    ///
    /// The number of beneficiaries updated
    pub async fn link_policy(
        conn: &mut PgConnection,
        customer_id: Uuid,
        plan_id: i64,
        policy_number: &str,
    ) -> Result<u64, DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE beneficiaries
            SET policy_number = $3
            WHERE customer_id = $1 AND plan_id = $2
            "#,
        )
        .bind(customer_id)
        .bind(plan_id)
        .bind(policy_number)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected())
    }
}

/// Beneficiary database row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BeneficiaryRow {
    pub beneficiary_id: Uuid,
    pub customer_id: Uuid,
    pub plan_id: Option<i64>,
    pub policy_number: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub relationship: String,
    pub percentage: Decimal,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}
