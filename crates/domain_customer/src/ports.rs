//! Customer Domain Ports
//!
//! The `CustomerPort` trait lists everything the customer domain needs from
//! the record store. Implementations:
//!
//! - **PostgreSQL adapter** in `infra_db`
//! - **Mock adapter** in this module, for tests without a database
//!
//! ```rust,ignore
//! let port: Arc<dyn CustomerPort> = Arc::new(PostgresCustomerAdapter::new(pool));
//! let service = OnboardingService::new(port);
//! ```

use async_trait::async_trait;

use core_kernel::{CustomerId, DomainPort, HealthCheckable, PortError};

use crate::beneficiary::Beneficiary;
use crate::customer::Customer;
use crate::health::{HealthDeclaration, HealthDeclarationInput, UpsertOutcome};

/// Store operations for customers, beneficiaries and health declarations
///
/// Lookups return `Ok(None)` for absent rows; `PortError::NotFound` is reserved
/// for writes whose owning customer does not exist or is soft-deleted.
#[async_trait]
pub trait CustomerPort: DomainPort + HealthCheckable {
    /// Inserts a new customer
    ///
    /// Returns `PortError::Conflict` when the email or phone is already taken.
    async fn create_customer(&self, customer: &Customer) -> Result<(), PortError>;

    /// Fetches an active (not soft-deleted) customer
    async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>, PortError>;

    /// Soft-deletes a customer, returning false if there was no active customer
    async fn deactivate_customer(&self, id: CustomerId) -> Result<bool, PortError>;

    /// Atomically replaces all beneficiaries of a customer
    async fn replace_beneficiaries(
        &self,
        customer_id: CustomerId,
        beneficiaries: &[Beneficiary],
    ) -> Result<(), PortError>;

    /// Lists a customer's beneficiaries in insertion order
    async fn list_beneficiaries(&self, customer_id: CustomerId) -> Result<Vec<Beneficiary>, PortError>;

    /// Creates the customer's declaration or overwrites the existing one in place
    async fn upsert_health_declaration(
        &self,
        customer_id: CustomerId,
        details: HealthDeclarationInput,
    ) -> Result<(HealthDeclaration, UpsertOutcome), PortError>;

    async fn get_health_declaration(
        &self,
        customer_id: CustomerId,
    ) -> Result<Option<HealthDeclaration>, PortError>;
}

/// Mock implementation of CustomerPort for testing
///
/// Keeps all records in memory and enforces the same uniqueness rules as the
/// database schema.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use chrono::Utc;
    use core_kernel::{AdapterHealth, HealthCheckResult};
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    #[derive(Debug, Default)]
    struct State {
        customers: HashMap<CustomerId, Customer>,
        beneficiaries: Vec<Beneficiary>,
        declarations: HashMap<CustomerId, HealthDeclaration>,
    }

    impl State {
        fn is_active(&self, id: CustomerId) -> bool {
            self.customers.get(&id).map_or(false, Customer::is_active)
        }
    }

    /// In-memory mock implementation of CustomerPort
    #[derive(Debug, Default, Clone)]
    pub struct MockCustomerPort {
        state: Arc<RwLock<State>>,
    }

    impl MockCustomerPort {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with customers for testing
        pub async fn with_customers(customers: Vec<Customer>) -> Self {
            let port = Self::new();
            {
                let mut state = port.state.write().await;
                for customer in customers {
                    state.customers.insert(customer.id, customer);
                }
            }
            port
        }

        /// Returns every stored customer, soft-deleted ones included
        pub async fn all_customers(&self) -> Vec<Customer> {
            self.state.read().await.customers.values().cloned().collect()
        }
    }

    impl DomainPort for MockCustomerPort {}

    #[async_trait]
    impl HealthCheckable for MockCustomerPort {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult {
                adapter_id: "mock-customer-port".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms: 0,
                message: Some("Mock adapter always healthy".to_string()),
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl CustomerPort for MockCustomerPort {
        async fn create_customer(&self, customer: &Customer) -> Result<(), PortError> {
            let mut state = self.state.write().await;
            if state.customers.values().any(|c| c.email == customer.email) {
                return Err(PortError::conflict(format!("email {} is already registered", customer.email)));
            }
            if state.customers.values().any(|c| c.phone == customer.phone) {
                return Err(PortError::conflict(format!("phone {} is already registered", customer.phone)));
            }
            state.customers.insert(customer.id, customer.clone());
            Ok(())
        }

        async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>, PortError> {
            Ok(self
                .state
                .read()
                .await
                .customers
                .get(&id)
                .filter(|c| c.is_active())
                .cloned())
        }

        async fn deactivate_customer(&self, id: CustomerId) -> Result<bool, PortError> {
            let mut state = self.state.write().await;
            match state.customers.get_mut(&id) {
                Some(customer) if customer.is_active() => {
                    let now = Utc::now();
                    customer.deleted_at = Some(now);
                    customer.updated_at = now;
                    Ok(true)
                }
                _ => Ok(false),
            }
        }

        async fn replace_beneficiaries(
            &self,
            customer_id: CustomerId,
            beneficiaries: &[Beneficiary],
        ) -> Result<(), PortError> {
            let mut state = self.state.write().await;
            if !state.is_active(customer_id) {
                return Err(PortError::not_found("Customer", customer_id));
            }
            state.beneficiaries.retain(|b| b.customer_id != customer_id);
            state.beneficiaries.extend(beneficiaries.iter().cloned());
            Ok(())
        }

        async fn list_beneficiaries(&self, customer_id: CustomerId) -> Result<Vec<Beneficiary>, PortError> {
            Ok(self
                .state
                .read()
                .await
                .beneficiaries
                .iter()
                .filter(|b| b.customer_id == customer_id)
                .cloned()
                .collect())
        }

        async fn upsert_health_declaration(
            &self,
            customer_id: CustomerId,
            details: HealthDeclarationInput,
        ) -> Result<(HealthDeclaration, UpsertOutcome), PortError> {
            let mut state = self.state.write().await;
            if !state.is_active(customer_id) {
                return Err(PortError::not_found("Customer", customer_id));
            }
            match state.declarations.get_mut(&customer_id) {
                Some(existing) => {
                    existing.overwrite(details);
                    Ok((existing.clone(), UpsertOutcome::Updated))
                }
                None => {
                    let declaration = HealthDeclaration::new(customer_id, details);
                    state.declarations.insert(customer_id, declaration.clone());
                    Ok((declaration, UpsertOutcome::Created))
                }
            }
        }

        async fn get_health_declaration(
            &self,
            customer_id: CustomerId,
        ) -> Result<Option<HealthDeclaration>, PortError> {
            Ok(self.state.read().await.declarations.get(&customer_id).cloned())
        }
    }
}
