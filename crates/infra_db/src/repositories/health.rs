//! Health declaration repository implementation
//!
//! One row per customer, enforced by `health_declarations_customer_id_key`.
//! Upserts rely on that constraint through `ON CONFLICT (customer_id)`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::repositories::customer::CustomerRepository;

const DECLARATION_COLUMNS: &str = r#"
    declaration_id, customer_id, height, weight, blood_group,
    has_chronic_disease, chronic_disease, has_been_hospitalized_last_year,
    smoking_status, medical_details, surgical_history, allergies,
    family_medical_history, created_at, updated_at
"#;

/// Repository for health declaration rows
#[derive(Debug, Clone)]
pub struct HealthDeclarationRepository {
    pool: PgPool,
}

impl HealthDeclarationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts the declaration, or overwrites the customer's existing one
    ///
    /// On overwrite the existing `declaration_id` and `created_at` are kept.
    /// Returns the stored row and whether it was newly inserted.
    pub async fn upsert(&self, declaration: &HealthDeclarationRow) -> Result<(HealthDeclarationRow, bool), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        if CustomerRepository::lock_active(&mut *tx, declaration.customer_id)
            .await?
            .is_none()
        {
            return Err(DatabaseError::not_found("Customer", declaration.customer_id));
        }

        // xmax is zero only for rows created by this statement
        let row = sqlx::query_as::<_, UpsertedDeclarationRow>(&format!(
            r#"
            INSERT INTO health_declarations (
                declaration_id, customer_id, height, weight, blood_group,
                has_chronic_disease, chronic_disease, has_been_hospitalized_last_year,
                smoking_status, medical_details, surgical_history, allergies,
                family_medical_history, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $14)
            ON CONFLICT (customer_id) DO UPDATE SET
                height = EXCLUDED.height,
                weight = EXCLUDED.weight,
                blood_group = EXCLUDED.blood_group,
                has_chronic_disease = EXCLUDED.has_chronic_disease,
                chronic_disease = EXCLUDED.chronic_disease,
                has_been_hospitalized_last_year = EXCLUDED.has_been_hospitalized_last_year,
                smoking_status = EXCLUDED.smoking_status,
                medical_details = EXCLUDED.medical_details,
                surgical_history = EXCLUDED.surgical_history,
                allergies = EXCLUDED.allergies,
                family_medical_history = EXCLUDED.family_medical_history,
                updated_at = EXCLUDED.updated_at
            RETURNING {}, (xmax = 0) AS inserted
            "#,
            DECLARATION_COLUMNS
        ))
        .bind(declaration.declaration_id)
        .bind(declaration.customer_id)
        .bind(declaration.height)
        .bind(declaration.weight)
        .bind(&declaration.blood_group)
        .bind(declaration.has_chronic_disease)
        .bind(&declaration.chronic_disease)
        .bind(declaration.has_been_hospitalized_last_year)
        .bind(&declaration.smoking_status)
        .bind(&declaration.medical_details)
        .bind(&declaration.surgical_history)
        .bind(&declaration.allergies)
        .bind(&declaration.family_medical_history)
        .bind(declaration.updated_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((row.declaration, row.inserted))
    }

    pub async fn find_by_customer(&self, customer_id: Uuid) -> Result<Option<HealthDeclarationRow>, DatabaseError> {
        let row = sqlx::query_as::<_, HealthDeclarationRow>(&format!(
            "SELECT {} FROM health_declarations WHERE customer_id = $1",
            DECLARATION_COLUMNS
        ))
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}

/// Health declaration database row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HealthDeclarationRow {
    pub declaration_id: Uuid,
    pub customer_id: Uuid,
    pub height: Decimal,
    pub weight: Decimal,
    pub blood_group: String,
    pub has_chronic_disease: bool,
    pub chronic_disease: Option<String>,
    pub has_been_hospitalized_last_year: bool,
    pub smoking_status: Option<String>,
    pub medical_details: Option<String>,
    pub surgical_history: Option<String>,
    pub allergies: Option<String>,
    pub family_medical_history: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct UpsertedDeclarationRow {
    #[sqlx(flatten)]
    declaration: HealthDeclarationRow,
    inserted: bool,
}
