//! Customer repository implementation
//!
//! Customers are soft-deleted: every read used by the services filters on
//! `deleted_at IS NULL`, while the email and phone unique constraints cover
//! soft-deleted rows too.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::DatabaseError;

const CUSTOMER_COLUMNS: &str = r#"
    customer_id, first_name, last_name, birth_date, age, gender,
    email, phone, created_at, updated_at, deleted_at
"#;

/// Repository for customer rows
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a customer row
    ///
    /// A taken email or phone surfaces as `DatabaseError::DuplicateEntry`
    /// naming `customers_email_key` or `customers_phone_key`.
    pub async fn insert(&self, customer: &CustomerRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO customers (
                customer_id, first_name, last_name, birth_date, age, gender,
                email, phone, created_at, updated_at, deleted_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(customer.customer_id)
        .bind(&customer.first_name)
        .bind(&customer.last_name)
        .bind(customer.birth_date)
        .bind(customer.age)
        .bind(customer.gender)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(customer.created_at)
        .bind(customer.updated_at)
        .bind(customer.deleted_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Retrieves a customer that has not been soft-deleted
    pub async fn find_active(&self, customer_id: Uuid) -> Result<Option<CustomerRow>, DatabaseError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {} FROM customers WHERE customer_id = $1 AND deleted_at IS NULL",
            CUSTOMER_COLUMNS
        ))
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Soft-deletes a customer
    ///
    /// # Returns
    ///
    /// `false` if there was no active customer with this id
    pub async fn soft_delete(&self, customer_id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE customers
            SET deleted_at = NOW(), updated_at = NOW()
            WHERE customer_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(customer_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Locks an active customer row for the rest of the caller's transaction
    ///
    /// Other transactions locking the same customer block until this one ends.
    pub async fn lock_active(
        conn: &mut PgConnection,
        customer_id: Uuid,
    ) -> Result<Option<CustomerRow>, DatabaseError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {} FROM customers WHERE customer_id = $1 AND deleted_at IS NULL FOR UPDATE",
            CUSTOMER_COLUMNS
        ))
        .bind(customer_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(row)
    }
}

// ============================================================================
// Type definitions
// ============================================================================

/// Gender enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "gender", rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Customer database row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CustomerRow {
    pub customer_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub age: i32,
    pub gender: Gender,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}
