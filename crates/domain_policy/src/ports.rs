//! Policy Domain Ports
//!
//! The issuance workflow needs more from the record store than single calls:
//! every step of a purchase has to run inside one transaction. The store is
//! therefore split in two traits:
//!
//! - [`PolicyStore`] is the long-lived handle services hold. It serves plan
//!   listings and opens transactions.
//! - [`IssuanceTransaction`] is one unit of work. It is committed explicitly;
//!   dropping it without a commit discards everything it wrote.
//!
//! ```rust,ignore
//! let store: Arc<dyn PolicyStore> = Arc::new(PostgresPolicyStore::new(pool));
//! let service = PolicyIssuanceService::new(store);
//! ```

use async_trait::async_trait;

use core_kernel::{CustomerId, DomainPort, HealthCheckable, PlanId, PortError};
use domain_customer::Customer;

use crate::eligibility::PlanFilter;
use crate::plan::InsurancePlan;
use crate::policy::IssuedPolicy;
use crate::policy_number::PolicyNumber;

/// Result of attempting to insert a policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// Another policy already uses this number; the transaction is still usable
    PolicyNumberTaken,
}

/// Record store handle for the policy domain
#[async_trait]
pub trait PolicyStore: DomainPort + HealthCheckable {
    /// Lists active plans matching `filter`, ordered by plan id
    async fn list_plans(&self, filter: &PlanFilter) -> Result<Vec<InsurancePlan>, PortError>;

    /// Opens a transaction for one purchase
    async fn begin(&self) -> Result<Box<dyn IssuanceTransaction>, PortError>;
}

/// One purchase's unit of work
#[async_trait]
pub trait IssuanceTransaction: Send {
    /// Loads an active customer and holds it for the rest of the transaction
    ///
    /// Concurrent purchases by the same customer wait here until this
    /// transaction ends.
    async fn lock_active_customer(&mut self, id: CustomerId) -> Result<Option<Customer>, PortError>;

    /// Loads a plan that is not soft-deleted
    async fn find_active_plan(&mut self, id: PlanId) -> Result<Option<InsurancePlan>, PortError>;

    /// Finds a pending or active policy for the pair
    async fn find_open_policy(
        &mut self,
        customer_id: CustomerId,
        plan_id: PlanId,
    ) -> Result<Option<IssuedPolicy>, PortError>;

    /// Inserts a policy
    ///
    /// Returns `PortError::Conflict` when the customer already holds an open
    /// policy on the plan.
    async fn insert_policy(&mut self, policy: &IssuedPolicy) -> Result<InsertOutcome, PortError>;

    /// Stamps the customer's beneficiaries for `plan_id` with the policy
    /// number, returning how many were updated
    async fn link_beneficiaries(
        &mut self,
        customer_id: CustomerId,
        plan_id: PlanId,
        policy_number: &PolicyNumber,
    ) -> Result<u64, PortError>;

    async fn commit(self: Box<Self>) -> Result<(), PortError>;

    async fn rollback(self: Box<Self>) -> Result<(), PortError>;
}

/// Mock implementation of PolicyStore for testing
///
/// A transaction takes the store's lock for its whole lifetime and works on
/// a copy of the state, which replaces the shared state on commit. Purchases
/// are therefore fully serialized, like purchases of one customer are in
/// PostgreSQL.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use chrono::Utc;
    use core_kernel::{AdapterHealth, HealthCheckResult};
    use domain_customer::Beneficiary;
    use std::collections::{BTreeMap, HashMap, HashSet};
    use std::sync::Arc;
    use tokio::sync::{Mutex, OwnedMutexGuard};

    use crate::policy::PolicyStatus;

    /// Store call that the mock can be told to fail
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum FailurePoint {
        OpenPolicyLookup,
        InsertPolicy,
        LinkBeneficiaries,
        Commit,
    }

    #[derive(Debug, Default, Clone)]
    struct State {
        customers: HashMap<CustomerId, Customer>,
        plans: BTreeMap<PlanId, InsurancePlan>,
        policies: Vec<IssuedPolicy>,
        beneficiaries: Vec<Beneficiary>,
        failures: HashSet<FailurePoint>,
    }

    impl State {
        fn fail_at(&self, point: FailurePoint) -> Result<(), PortError> {
            if self.failures.contains(&point) {
                return Err(PortError::connection(format!("injected failure at {:?}", point)));
            }
            Ok(())
        }
    }

    /// In-memory mock implementation of PolicyStore
    #[derive(Debug, Default, Clone)]
    pub struct MockPolicyStore {
        state: Arc<Mutex<State>>,
    }

    impl MockPolicyStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn add_customer(&self, customer: Customer) {
            self.state.lock().await.customers.insert(customer.id, customer);
        }

        pub async fn add_plan(&self, plan: InsurancePlan) {
            self.state.lock().await.plans.insert(plan.id, plan);
        }

        pub async fn add_beneficiary(&self, beneficiary: Beneficiary) {
            self.state.lock().await.beneficiaries.push(beneficiary);
        }

        /// Inserts a policy directly, bypassing the issuance workflow
        pub async fn add_policy(&self, policy: IssuedPolicy) {
            self.state.lock().await.policies.push(policy);
        }

        /// Changes a plan in the catalog, as catalog maintenance would
        pub async fn update_plan(&self, plan: InsurancePlan) {
            self.state.lock().await.plans.insert(plan.id, plan);
        }

        pub async fn set_policy_status(&self, policy_number: &PolicyNumber, status: PolicyStatus) {
            let mut state = self.state.lock().await;
            if let Some(policy) = state
                .policies
                .iter_mut()
                .find(|p| &p.policy_number == policy_number)
            {
                policy.status = status;
            }
        }

        pub async fn inject_failure(&self, point: FailurePoint) {
            self.state.lock().await.failures.insert(point);
        }

        pub async fn policies(&self) -> Vec<IssuedPolicy> {
            self.state.lock().await.policies.clone()
        }

        pub async fn beneficiaries(&self) -> Vec<Beneficiary> {
            self.state.lock().await.beneficiaries.clone()
        }
    }

    impl DomainPort for MockPolicyStore {}

    #[async_trait]
    impl HealthCheckable for MockPolicyStore {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult {
                adapter_id: "mock-policy-store".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms: 0,
                message: Some("Mock adapter always healthy".to_string()),
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl PolicyStore for MockPolicyStore {
        async fn list_plans(&self, filter: &PlanFilter) -> Result<Vec<InsurancePlan>, PortError> {
            let state = self.state.lock().await;
            Ok(filter.apply(state.plans.values()))
        }

        async fn begin(&self) -> Result<Box<dyn IssuanceTransaction>, PortError> {
            let guard = self.state.clone().lock_owned().await;
            let working = guard.clone();
            Ok(Box::new(MockTransaction { guard, working }))
        }
    }

    struct MockTransaction {
        guard: OwnedMutexGuard<State>,
        working: State,
    }

    #[async_trait]
    impl IssuanceTransaction for MockTransaction {
        async fn lock_active_customer(&mut self, id: CustomerId) -> Result<Option<Customer>, PortError> {
            Ok(self
                .working
                .customers
                .get(&id)
                .filter(|c| c.is_active())
                .cloned())
        }

        async fn find_active_plan(&mut self, id: PlanId) -> Result<Option<InsurancePlan>, PortError> {
            Ok(self.working.plans.get(&id).filter(|p| p.is_active()).cloned())
        }

        async fn find_open_policy(
            &mut self,
            customer_id: CustomerId,
            plan_id: PlanId,
        ) -> Result<Option<IssuedPolicy>, PortError> {
            self.working.fail_at(FailurePoint::OpenPolicyLookup)?;
            Ok(self
                .working
                .policies
                .iter()
                .find(|p| {
                    p.customer_id == customer_id && p.plan_id == plan_id && p.status.blocks_new_purchase()
                })
                .cloned())
        }

        async fn insert_policy(&mut self, policy: &IssuedPolicy) -> Result<InsertOutcome, PortError> {
            self.working.fail_at(FailurePoint::InsertPolicy)?;
            if self
                .working
                .policies
                .iter()
                .any(|p| p.policy_number == policy.policy_number)
            {
                return Ok(InsertOutcome::PolicyNumberTaken);
            }
            if policy.status.blocks_new_purchase()
                && self.working.policies.iter().any(|p| {
                    p.customer_id == policy.customer_id
                        && p.plan_id == policy.plan_id
                        && p.status.blocks_new_purchase()
                })
            {
                return Err(PortError::conflict("customer already holds an open policy on this plan"));
            }
            self.working.policies.push(policy.clone());
            Ok(InsertOutcome::Inserted)
        }

        async fn link_beneficiaries(
            &mut self,
            customer_id: CustomerId,
            plan_id: PlanId,
            policy_number: &PolicyNumber,
        ) -> Result<u64, PortError> {
            self.working.fail_at(FailurePoint::LinkBeneficiaries)?;
            let mut linked = 0;
            for beneficiary in self
                .working
                .beneficiaries
                .iter_mut()
                .filter(|b| b.customer_id == customer_id && b.plan_id == Some(plan_id))
            {
                beneficiary.policy_number = Some(policy_number.to_string());
                linked += 1;
            }
            Ok(linked)
        }

        async fn commit(self: Box<Self>) -> Result<(), PortError> {
            let MockTransaction { mut guard, working } = *self;
            working.fail_at(FailurePoint::Commit)?;
            *guard = working;
            Ok(())
        }

        async fn rollback(self: Box<Self>) -> Result<(), PortError> {
            Ok(())
        }
    }
}
