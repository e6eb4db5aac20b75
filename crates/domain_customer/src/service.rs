//! Customer onboarding service
//!
//! Applies the customer-side domain rules and delegates persistence to the
//! injected [`CustomerPort`].

use std::sync::Arc;

use tracing::{info, instrument, warn};

use core_kernel::{CustomerId, DomainError, PortError};

use crate::beneficiary::{Beneficiary, NewBeneficiary};
use crate::customer::{Customer, NewCustomer};
use crate::health::{HealthDeclaration, HealthDeclarationInput, UpsertOutcome};
use crate::ports::CustomerPort;
use crate::validation::{CustomerValidator, MAX_DECIMAL_PLACES};

/// Service for customer onboarding and customer-owned records
#[derive(Clone)]
pub struct OnboardingService {
    port: Arc<dyn CustomerPort>,
}

impl OnboardingService {
    pub fn new(port: Arc<dyn CustomerPort>) -> Self {
        Self { port }
    }

    /// Onboards a new customer
    ///
    /// # Errors
    ///
    /// - `Validation` if the data is malformed or the customer is under 18
    /// - `Conflict` if the email or phone is already registered
    /// - `Internal` on storage failure
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create_customer(&self, input: NewCustomer) -> Result<Customer, DomainError> {
        CustomerValidator::validate_new_customer(&input).into_result()?;

        let customer = Customer::from_new(input);
        self.port.create_customer(&customer).await.map_err(|e| match e {
            PortError::Conflict { message } => DomainError::conflict(message),
            other => DomainError::storage("failed to insert customer", other),
        })?;

        info!(customer_id = %customer.id, "Customer onboarded");
        Ok(customer)
    }

    /// Fetches an active customer
    pub async fn get_customer(&self, id: CustomerId) -> Result<Customer, DomainError> {
        self.port
            .get_customer(id)
            .await
            .map_err(|e| DomainError::storage("failed to load customer", e))?
            .ok_or_else(|| DomainError::not_found("customer"))
    }

    /// Soft-deletes a customer
    #[instrument(skip(self), fields(customer_id = %id))]
    pub async fn deactivate_customer(&self, id: CustomerId) -> Result<(), DomainError> {
        let deactivated = self
            .port
            .deactivate_customer(id)
            .await
            .map_err(|e| DomainError::storage("failed to deactivate customer", e))?;

        if !deactivated {
            return Err(DomainError::not_found("customer"));
        }
        info!("Customer deactivated");
        Ok(())
    }

    /// Replaces the customer's beneficiary set
    ///
    /// Previous beneficiaries, including any already stamped with a policy
    /// number, are removed.
    #[instrument(skip(self, beneficiaries), fields(customer_id = %customer_id, count = beneficiaries.len()))]
    pub async fn replace_beneficiaries(
        &self,
        customer_id: CustomerId,
        beneficiaries: Vec<NewBeneficiary>,
    ) -> Result<Vec<Beneficiary>, DomainError> {
        let warnings = CustomerValidator::validate_beneficiaries(&beneficiaries).into_result()?;
        for warning in warnings {
            warn!(%warning, "Beneficiary set accepted with warning");
        }

        // Same scale the store keeps, so the response matches a later listing
        let records: Vec<Beneficiary> = beneficiaries
            .into_iter()
            .map(|mut b| {
                b.percentage.rescale(MAX_DECIMAL_PLACES);
                Beneficiary::from_new(customer_id, b)
            })
            .collect();

        self.port
            .replace_beneficiaries(customer_id, &records)
            .await
            .map_err(|e| match e {
                PortError::NotFound { .. } => DomainError::not_found("customer"),
                PortError::Validation { message, .. } => DomainError::validation(message),
                other => DomainError::storage("failed to replace beneficiaries", other),
            })?;

        info!("Beneficiaries replaced");
        Ok(records)
    }

    pub async fn list_beneficiaries(&self, customer_id: CustomerId) -> Result<Vec<Beneficiary>, DomainError> {
        self.get_customer(customer_id).await?;
        self.port
            .list_beneficiaries(customer_id)
            .await
            .map_err(|e| DomainError::storage("failed to list beneficiaries", e))
    }

    /// Creates or overwrites the customer's health declaration
    #[instrument(skip(self, details), fields(customer_id = %customer_id))]
    pub async fn upsert_health_declaration(
        &self,
        customer_id: CustomerId,
        details: HealthDeclarationInput,
    ) -> Result<(HealthDeclaration, UpsertOutcome), DomainError> {
        CustomerValidator::validate_health(&details).into_result()?;

        let (declaration, outcome) = self
            .port
            .upsert_health_declaration(customer_id, details)
            .await
            .map_err(|e| match e {
                PortError::NotFound { .. } => DomainError::not_found("customer"),
                other => DomainError::storage("failed to save health declaration", other),
            })?;

        info!(declaration_id = %declaration.id, ?outcome, "Health declaration saved");
        Ok((declaration, outcome))
    }

    pub async fn get_health_declaration(&self, customer_id: CustomerId) -> Result<HealthDeclaration, DomainError> {
        self.get_customer(customer_id).await?;
        self.port
            .get_health_declaration(customer_id)
            .await
            .map_err(|e| DomainError::storage("failed to load health declaration", e))?
            .ok_or_else(|| DomainError::not_found("health declaration"))
    }
}
