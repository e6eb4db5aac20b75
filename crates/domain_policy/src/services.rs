//! Policy domain services
//!
//! [`PlanCatalogService`] answers eligibility queries and
//! [`PolicyIssuanceService`] runs the purchase workflow. Both hold the
//! injected [`PolicyStore`] and nothing else that is shared.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use core_kernel::{DomainError, PortError};

use crate::eligibility::PlanFilter;
use crate::plan::InsurancePlan;
use crate::policy::{IssuedPolicy, PurchaseRequest};
use crate::policy_number::{PolicyNumber, MAX_POLICY_NUMBER_ATTEMPTS};
use crate::ports::{InsertOutcome, IssuanceTransaction, PolicyStore};

/// Source of issuance timestamps
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

const DUPLICATE_POLICY: &str = "duplicate active policy";

/// Lists the plans an applicant is eligible for
#[derive(Clone)]
pub struct PlanCatalogService {
    store: Arc<dyn PolicyStore>,
}

impl PlanCatalogService {
    pub fn new(store: Arc<dyn PolicyStore>) -> Self {
        Self { store }
    }

    /// Returns active plans matching the filter, ordered by plan id
    ///
    /// An empty result is not an error.
    #[instrument(skip(self), fields(age = ?filter.age, max_sum = ?filter.max_sum))]
    pub async fn list_plans(&self, filter: PlanFilter) -> Result<Vec<InsurancePlan>, DomainError> {
        let plans = self
            .store
            .list_plans(&filter)
            .await
            .map_err(|e| DomainError::storage("failed to list plans", e))?;

        debug!(count = plans.len(), "Plans listed");
        Ok(plans)
    }
}

/// Issues policies
///
/// A purchase runs as one store transaction:
///
/// 1. Lock the active customer
/// 2. Load the active plan and check the customer's age against its window
/// 3. Reject if the customer already holds a pending or active policy on it
/// 4. Generate a policy number, regenerating on collision
/// 5. Insert the pending policy with the plan's sum assured and premium
/// 6. Stamp the customer's beneficiaries for the plan with the number
/// 7. Commit
///
/// Any error rolls the transaction back, so a failed purchase leaves no
/// policy and no beneficiary changes behind.
#[derive(Clone)]
pub struct PolicyIssuanceService {
    store: Arc<dyn PolicyStore>,
    clock: Clock,
}

impl fmt::Debug for PolicyIssuanceService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolicyIssuanceService").finish_non_exhaustive()
    }
}

impl PolicyIssuanceService {
    pub fn new(store: Arc<dyn PolicyStore>) -> Self {
        Self {
            store,
            clock: Arc::new(Utc::now),
        }
    }

    /// Replaces the wall clock used for issuance timestamps
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Purchases a plan for a customer
    ///
    /// # Errors
    ///
    /// - `NotFound("customer")` if the customer does not exist or is soft-deleted
    /// - `NotFound("plan")` if the plan does not exist or is soft-deleted
    /// - `Validation` if the customer's age is outside the plan's window
    /// - `Conflict("duplicate active policy")` if a pending or active policy
    ///   already exists for the pair
    /// - `Internal` on storage failure or when no free policy number is found
    #[instrument(
        skip(self, request),
        fields(customer_id = %request.customer_id, plan_id = %request.plan_id)
    )]
    pub async fn purchase(&self, request: PurchaseRequest) -> Result<IssuedPolicy, DomainError> {
        let mut tx = self
            .store
            .begin()
            .await
            .map_err(|e| DomainError::storage("failed to start transaction", e))?;

        match self.issue_in(&mut *tx, &request).await {
            Ok(policy) => {
                tx.commit()
                    .await
                    .map_err(|e| DomainError::storage("failed to commit policy", e))?;
                info!(policy_number = %policy.policy_number, "Policy issued");
                Ok(policy)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "Rollback after failed purchase did not complete");
                }
                Err(err)
            }
        }
    }

    async fn issue_in(
        &self,
        tx: &mut dyn IssuanceTransaction,
        request: &PurchaseRequest,
    ) -> Result<IssuedPolicy, DomainError> {
        let customer = tx
            .lock_active_customer(request.customer_id)
            .await
            .map_err(|e| DomainError::storage("failed to load customer", e))?
            .ok_or_else(|| DomainError::not_found("customer"))?;

        let plan = tx
            .find_active_plan(request.plan_id)
            .await
            .map_err(|e| DomainError::storage("failed to load plan", e))?
            .ok_or_else(|| DomainError::not_found("plan"))?;

        if !plan.accepts_age(customer.age) {
            return Err(DomainError::validation(format!(
                "customer age {} is outside the plan's eligibility window {}-{}",
                customer.age, plan.min_age, plan.max_age
            )));
        }

        let existing = tx
            .find_open_policy(customer.id, plan.id)
            .await
            .map_err(|e| DomainError::storage("failed to check existing policies", e))?;
        if let Some(existing) = existing {
            debug!(policy_number = %existing.policy_number, "Open policy already exists");
            return Err(DomainError::conflict(DUPLICATE_POLICY));
        }

        let issued_at = (self.clock)();
        let policy = self.insert_with_fresh_number(tx, request, &plan, issued_at).await?;

        let linked = tx
            .link_beneficiaries(customer.id, plan.id, &policy.policy_number)
            .await
            .map_err(|e| DomainError::storage("failed to link beneficiaries", e))?;
        info!(linked, policy_number = %policy.policy_number, "Beneficiaries linked");

        Ok(policy)
    }

    async fn insert_with_fresh_number(
        &self,
        tx: &mut dyn IssuanceTransaction,
        request: &PurchaseRequest,
        plan: &InsurancePlan,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedPolicy, DomainError> {
        for attempt in 0..MAX_POLICY_NUMBER_ATTEMPTS {
            let number = PolicyNumber::generate(plan.id, &request.customer_id, issued_at, attempt);
            let policy = IssuedPolicy::issue(number, request, plan, issued_at);

            let outcome = tx.insert_policy(&policy).await;
            match outcome {
                Ok(InsertOutcome::Inserted) => return Ok(policy),
                Ok(InsertOutcome::PolicyNumberTaken) => {
                    debug!(attempt, policy_number = %policy.policy_number, "Policy number taken, regenerating");
                }
                Err(PortError::Conflict { .. }) => return Err(DomainError::conflict(DUPLICATE_POLICY)),
                Err(e) => return Err(DomainError::storage("failed to insert policy", e)),
            }
        }

        Err(DomainError::internal(format!(
            "no free policy number after {} attempts",
            MAX_POLICY_NUMBER_ATTEMPTS
        )))
    }
}
