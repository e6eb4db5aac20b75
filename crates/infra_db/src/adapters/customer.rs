//! PostgreSQL Customer Adapter
//!
//! Implements `CustomerPort` on top of the customer, beneficiary and health
//! declaration repositories.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresCustomerAdapter;
//! use domain_customer::{CustomerPort, OnboardingService};
//! use std::sync::Arc;
//!
//! let port: Arc<dyn CustomerPort> = Arc::new(PostgresCustomerAdapter::new(pool));
//! let service = OnboardingService::new(port);
//! ```

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{
    BeneficiaryId, CustomerId, DeclarationId, DomainPort, HealthCheckResult, HealthCheckable, PlanId,
    PortError,
};
use domain_customer::{
    Beneficiary, Customer, CustomerPort, Gender, HealthDeclaration, HealthDeclarationInput, UpsertOutcome,
};

use crate::adapters::{db_to_port_error, ping};
use crate::error::DatabaseError;
use crate::repositories::beneficiary::{BeneficiaryRepository, BeneficiaryRow};
use crate::repositories::customer::{CustomerRepository, CustomerRow, Gender as DbGender};
use crate::repositories::health::{HealthDeclarationRepository, HealthDeclarationRow};

/// PostgreSQL-backed implementation of the CustomerPort trait
///
/// Unique violations on `customers_email_key` and `customers_phone_key`
/// become `PortError::Conflict`; a write for a missing or soft-deleted
/// customer becomes `PortError::NotFound`.
#[derive(Debug, Clone)]
pub struct PostgresCustomerAdapter {
    customers: CustomerRepository,
    beneficiaries: BeneficiaryRepository,
    declarations: HealthDeclarationRepository,
    pool: PgPool,
}

impl PostgresCustomerAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            customers: CustomerRepository::new(pool.clone()),
            beneficiaries: BeneficiaryRepository::new(pool.clone()),
            declarations: HealthDeclarationRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresCustomerAdapter {}

#[async_trait]
impl HealthCheckable for PostgresCustomerAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        ping(&self.pool, "postgres-customer-adapter").await
    }
}

#[async_trait]
impl CustomerPort for PostgresCustomerAdapter {
    #[instrument(skip(self, customer), fields(customer_id = %customer.id))]
    async fn create_customer(&self, customer: &Customer) -> Result<(), PortError> {
        debug!("Inserting customer");

        self.customers
            .insert(&customer_to_row(customer))
            .await
            .map_err(|e| {
                if e.is_unique_violation_of("customers_email_key") {
                    PortError::conflict(format!("email {} is already registered", customer.email))
                } else if e.is_unique_violation_of("customers_phone_key") {
                    PortError::conflict(format!("phone {} is already registered", customer.phone))
                } else {
                    db_to_port_error(e)
                }
            })
    }

    #[instrument(skip(self), fields(customer_id = %id))]
    async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>, PortError> {
        let row = self
            .customers
            .find_active(id.into())
            .await
            .map_err(db_to_port_error)?;
        Ok(row.map(row_to_customer))
    }

    #[instrument(skip(self), fields(customer_id = %id))]
    async fn deactivate_customer(&self, id: CustomerId) -> Result<bool, PortError> {
        self.customers
            .soft_delete(id.into())
            .await
            .map_err(db_to_port_error)
    }

    #[instrument(skip(self, beneficiaries), fields(customer_id = %customer_id, count = beneficiaries.len()))]
    async fn replace_beneficiaries(
        &self,
        customer_id: CustomerId,
        beneficiaries: &[Beneficiary],
    ) -> Result<(), PortError> {
        let rows: Vec<BeneficiaryRow> = beneficiaries.iter().map(beneficiary_to_row).collect();
        self.beneficiaries
            .replace_for_customer(customer_id.into(), &rows)
            .await
            .map_err(|e| beneficiary_write_error(customer_id, e))
    }

    #[instrument(skip(self), fields(customer_id = %customer_id))]
    async fn list_beneficiaries(&self, customer_id: CustomerId) -> Result<Vec<Beneficiary>, PortError> {
        let rows = self
            .beneficiaries
            .list_for_customer(customer_id.into())
            .await
            .map_err(db_to_port_error)?;
        Ok(rows.into_iter().map(row_to_beneficiary).collect())
    }

    #[instrument(skip(self, details), fields(customer_id = %customer_id))]
    async fn upsert_health_declaration(
        &self,
        customer_id: CustomerId,
        details: HealthDeclarationInput,
    ) -> Result<(HealthDeclaration, UpsertOutcome), PortError> {
        let candidate = HealthDeclaration::new(customer_id, details);
        let (row, inserted) = self
            .declarations
            .upsert(&declaration_to_row(&candidate))
            .await
            .map_err(|e| match e {
                DatabaseError::NotFound(_) => PortError::not_found("Customer", customer_id),
                other => db_to_port_error(other),
            })?;

        let outcome = if inserted {
            UpsertOutcome::Created
        } else {
            UpsertOutcome::Updated
        };
        debug!(?outcome, "Health declaration stored");
        Ok((row_to_declaration(row), outcome))
    }

    #[instrument(skip(self), fields(customer_id = %customer_id))]
    async fn get_health_declaration(
        &self,
        customer_id: CustomerId,
    ) -> Result<Option<HealthDeclaration>, PortError> {
        let row = self
            .declarations
            .find_by_customer(customer_id.into())
            .await
            .map_err(db_to_port_error)?;
        Ok(row.map(row_to_declaration))
    }
}

// ============================================================================
// Row conversions
// ============================================================================

pub(crate) fn row_to_customer(row: CustomerRow) -> Customer {
    Customer {
        id: CustomerId::from(row.customer_id),
        first_name: row.first_name,
        last_name: row.last_name,
        birth_date: row.birth_date,
        age: row.age,
        gender: match row.gender {
            DbGender::Male => Gender::Male,
            DbGender::Female => Gender::Female,
            DbGender::Other => Gender::Other,
        },
        email: row.email,
        phone: row.phone,
        created_at: row.created_at,
        updated_at: row.updated_at,
        deleted_at: row.deleted_at,
    }
}

/// Maps a failed beneficiary replacement onto the port's error cases
fn beneficiary_write_error(customer_id: CustomerId, e: DatabaseError) -> PortError {
    match e {
        DatabaseError::NotFound(_) => PortError::not_found("Customer", customer_id),
        e if e.is_foreign_key_violation_of("beneficiaries_plan_id_fkey") => PortError::Validation {
            message: "beneficiary references an unknown plan".to_string(),
            field: Some("plan_id".to_string()),
        },
        e if e.is_foreign_key_violation_of("beneficiaries_customer_id_fkey") => {
            PortError::not_found("Customer", customer_id)
        }
        other => db_to_port_error(other),
    }
}

fn customer_to_row(customer: &Customer) -> CustomerRow {
    CustomerRow {
        customer_id: customer.id.into(),
        first_name: customer.first_name.clone(),
        last_name: customer.last_name.clone(),
        birth_date: customer.birth_date,
        age: customer.age,
        gender: match customer.gender {
            Gender::Male => DbGender::Male,
            Gender::Female => DbGender::Female,
            Gender::Other => DbGender::Other,
        },
        email: customer.email.clone(),
        phone: customer.phone.clone(),
        created_at: customer.created_at,
        updated_at: customer.updated_at,
        deleted_at: customer.deleted_at,
    }
}

fn beneficiary_to_row(beneficiary: &Beneficiary) -> BeneficiaryRow {
    BeneficiaryRow {
        beneficiary_id: *beneficiary.id.as_uuid(),
        customer_id: beneficiary.customer_id.into(),
        plan_id: beneficiary.plan_id.map(|id| id.value()),
        policy_number: beneficiary.policy_number.clone(),
        first_name: beneficiary.first_name.clone(),
        last_name: beneficiary.last_name.clone(),
        relationship: beneficiary.relationship.clone(),
        percentage: beneficiary.percentage,
        email: beneficiary.email.clone(),
        phone: beneficiary.phone.clone(),
        created_at: beneficiary.created_at,
    }
}

fn row_to_beneficiary(row: BeneficiaryRow) -> Beneficiary {
    Beneficiary {
        id: BeneficiaryId::from(row.beneficiary_id),
        customer_id: CustomerId::from(row.customer_id),
        plan_id: row.plan_id.map(PlanId::new),
        policy_number: row.policy_number,
        first_name: row.first_name,
        last_name: row.last_name,
        relationship: row.relationship,
        percentage: row.percentage,
        email: row.email,
        phone: row.phone,
        created_at: row.created_at,
    }
}

fn declaration_to_row(declaration: &HealthDeclaration) -> HealthDeclarationRow {
    let details = &declaration.details;
    HealthDeclarationRow {
        declaration_id: *declaration.id.as_uuid(),
        customer_id: declaration.customer_id.into(),
        height: details.height,
        weight: details.weight,
        blood_group: details.blood_group.clone(),
        has_chronic_disease: details.has_chronic_disease,
        chronic_disease: details.chronic_disease.clone(),
        has_been_hospitalized_last_year: details.has_been_hospitalized_last_year,
        smoking_status: details.smoking_status.clone(),
        medical_details: details.medical_details.clone(),
        surgical_history: details.surgical_history.clone(),
        allergies: details.allergies.clone(),
        family_medical_history: details.family_medical_history.clone(),
        created_at: declaration.created_at,
        updated_at: declaration.updated_at,
    }
}

fn row_to_declaration(row: HealthDeclarationRow) -> HealthDeclaration {
    HealthDeclaration {
        id: DeclarationId::from(row.declaration_id),
        customer_id: CustomerId::from(row.customer_id),
        details: HealthDeclarationInput {
            height: row.height,
            weight: row.weight,
            blood_group: row.blood_group,
            has_chronic_disease: row.has_chronic_disease,
            chronic_disease: row.chronic_disease,
            has_been_hospitalized_last_year: row.has_been_hospitalized_last_year,
            smoking_status: row.smoking_status,
            medical_details: row.medical_details,
            surgical_history: row.surgical_history,
            allergies: row.allergies,
            family_medical_history: row.family_medical_history,
        },
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fk_violation(constraint: &str) -> DatabaseError {
        DatabaseError::ForeignKeyViolation {
            constraint: Some(constraint.to_string()),
            message: format!(
                "insert or update on table \"beneficiaries\" violates foreign key constraint \"{}\"",
                constraint
            ),
        }
    }

    #[test]
    fn test_unknown_plan_is_a_validation_error_without_server_text() {
        let err = beneficiary_write_error(CustomerId::new(), fk_violation("beneficiaries_plan_id_fkey"));

        match err {
            PortError::Validation { message, field } => {
                assert_eq!(message, "beneficiary references an unknown plan");
                assert_eq!(field.as_deref(), Some("plan_id"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_customer_is_not_found() {
        let customer_id = CustomerId::new();

        let locked = beneficiary_write_error(customer_id, DatabaseError::not_found("Customer", customer_id));
        let raced = beneficiary_write_error(customer_id, fk_violation("beneficiaries_customer_id_fkey"));

        assert!(matches!(locked, PortError::NotFound { .. }));
        assert!(matches!(raced, PortError::NotFound { .. }));
    }
}
