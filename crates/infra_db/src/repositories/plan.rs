//! Insurance plan repository implementation
//!
//! The plan catalog is maintained outside the issuance workflow; `insert`
//! and `soft_delete` exist for catalog seeding and maintenance.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use crate::error::DatabaseError;

const PLAN_COLUMNS: &str = r#"
    plan_id, name, description, min_age, max_age,
    sum_assured_limit, premium, status, created_at, deleted_at
"#;

/// Repository for the plan catalog
#[derive(Debug, Clone)]
pub struct PlanRepository {
    pool: PgPool,
}

impl PlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists active plans, optionally restricted by applicant age and
    /// maximum sum assured, ordered by plan id
    pub async fn list_active(
        &self,
        age: Option<i32>,
        max_sum: Option<Decimal>,
    ) -> Result<Vec<PlanRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, PlanRow>(&format!(
            r#"
            SELECT {}
            FROM insurance_plans
            WHERE deleted_at IS NULL
              AND ($1::INTEGER IS NULL OR (min_age <= $1 AND max_age >= $1))
              AND ($2::NUMERIC IS NULL OR sum_assured_limit <= $2)
            ORDER BY plan_id ASC
            "#,
            PLAN_COLUMNS
        ))
        .bind(age)
        .bind(max_sum)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Adds a plan to the catalog
    pub async fn insert(&self, plan: NewPlan) -> Result<PlanRow, DatabaseError> {
        let row = sqlx::query_as::<_, PlanRow>(&format!(
            r#"
            INSERT INTO insurance_plans (
                name, description, min_age, max_age, sum_assured_limit, premium, status
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            PLAN_COLUMNS
        ))
        .bind(&plan.name)
        .bind(&plan.description)
        .bind(plan.min_age)
        .bind(plan.max_age)
        .bind(plan.sum_assured_limit)
        .bind(plan.premium)
        .bind(&plan.status)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Withdraws a plan from the catalog
    pub async fn soft_delete(&self, plan_id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "UPDATE insurance_plans SET deleted_at = NOW() WHERE plan_id = $1 AND deleted_at IS NULL",
        )
        .bind(plan_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Retrieves an active plan within the caller's transaction
    pub async fn find_active(conn: &mut PgConnection, plan_id: i64) -> Result<Option<PlanRow>, DatabaseError> {
        let row = sqlx::query_as::<_, PlanRow>(&format!(
            "SELECT {} FROM insurance_plans WHERE plan_id = $1 AND deleted_at IS NULL",
            PLAN_COLUMNS
        ))
        .bind(plan_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(row)
    }
}

/// Insurance plan database row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlanRow {
    pub plan_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub min_age: i32,
    pub max_age: i32,
    pub sum_assured_limit: Decimal,
    pub premium: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Data for adding a plan
#[derive(Debug, Clone)]
pub struct NewPlan {
    pub name: String,
    pub description: Option<String>,
    pub min_age: i32,
    pub max_age: i32,
    pub sum_assured_limit: Decimal,
    pub premium: Decimal,
    pub status: String,
}
