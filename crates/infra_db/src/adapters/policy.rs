//! PostgreSQL Policy Store
//!
//! Implements `PolicyStore` and `IssuanceTransaction` on a real PostgreSQL
//! transaction. The customer row is locked with `SELECT ... FOR UPDATE`, so
//! purchases by the same customer run one after another, and the partial
//! unique index on open policies backs up the duplicate check.
//!
//! Each policy insert runs in a savepoint. A taken policy number rolls back
//! only the savepoint, leaving the purchase transaction usable for the next
//! number.

use async_trait::async_trait;
use sqlx::{Connection, PgPool, Postgres, Transaction};
use tracing::{debug, instrument};

use core_kernel::{CustomerId, DomainPort, HealthCheckResult, HealthCheckable, PlanId, PortError};
use domain_customer::Customer;
use domain_policy::{
    InsertOutcome, InsurancePlan, IssuanceTransaction, IssuedPolicy, PaymentFrequency, PlanFilter,
    PolicyNumber, PolicyStatus, PolicyStore,
};

use crate::adapters::customer::row_to_customer;
use crate::adapters::{db_to_port_error, ping};
use crate::repositories::beneficiary::BeneficiaryRepository;
use crate::repositories::customer::CustomerRepository;
use crate::repositories::plan::{PlanRepository, PlanRow};
use crate::repositories::policy::{
    PaymentFrequency as DbPaymentFrequency, PolicyRepository, PolicyRow, PolicyStatus as DbPolicyStatus,
    OPEN_POLICY_CONSTRAINT, POLICY_NUMBER_CONSTRAINT,
};

/// PostgreSQL-backed implementation of the PolicyStore trait
#[derive(Debug, Clone)]
pub struct PostgresPolicyStore {
    plans: PlanRepository,
    pool: PgPool,
}

impl PostgresPolicyStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            plans: PlanRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresPolicyStore {}

#[async_trait]
impl HealthCheckable for PostgresPolicyStore {
    async fn health_check(&self) -> HealthCheckResult {
        ping(&self.pool, "postgres-policy-store").await
    }
}

#[async_trait]
impl PolicyStore for PostgresPolicyStore {
    #[instrument(skip(self))]
    async fn list_plans(&self, filter: &PlanFilter) -> Result<Vec<InsurancePlan>, PortError> {
        let rows = self
            .plans
            .list_active(filter.age, filter.max_sum)
            .await
            .map_err(db_to_port_error)?;
        Ok(rows.into_iter().map(row_to_plan).collect())
    }

    async fn begin(&self) -> Result<Box<dyn IssuanceTransaction>, PortError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_to_port_error(e.into()))?;
        Ok(Box::new(PostgresIssuanceTransaction { tx }))
    }
}

/// A purchase running on one PostgreSQL transaction
///
/// Dropping it without calling `commit` rolls the transaction back.
pub struct PostgresIssuanceTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl IssuanceTransaction for PostgresIssuanceTransaction {
    #[instrument(skip(self), fields(customer_id = %id))]
    async fn lock_active_customer(&mut self, id: CustomerId) -> Result<Option<Customer>, PortError> {
        let row = CustomerRepository::lock_active(&mut *self.tx, id.into())
            .await
            .map_err(db_to_port_error)?;
        Ok(row.map(row_to_customer))
    }

    async fn find_active_plan(&mut self, id: PlanId) -> Result<Option<InsurancePlan>, PortError> {
        let row = PlanRepository::find_active(&mut *self.tx, id.value())
            .await
            .map_err(db_to_port_error)?;
        Ok(row.map(row_to_plan))
    }

    async fn find_open_policy(
        &mut self,
        customer_id: CustomerId,
        plan_id: PlanId,
    ) -> Result<Option<IssuedPolicy>, PortError> {
        let row = PolicyRepository::find_open(&mut *self.tx, customer_id.into(), plan_id.value())
            .await
            .map_err(db_to_port_error)?;
        Ok(row.map(row_to_policy))
    }

    #[instrument(skip(self, policy), fields(policy_number = %policy.policy_number))]
    async fn insert_policy(&mut self, policy: &IssuedPolicy) -> Result<InsertOutcome, PortError> {
        let mut savepoint = Connection::begin(&mut *self.tx)
            .await
            .map_err(|e| db_to_port_error(e.into()))?;

        let inserted = PolicyRepository::insert(&mut *savepoint, &policy_to_row(policy)).await;
        match inserted {
            Ok(()) => {
                savepoint.commit().await.map_err(|e| db_to_port_error(e.into()))?;
                Ok(InsertOutcome::Inserted)
            }
            Err(e) => {
                savepoint.rollback().await.map_err(|e| db_to_port_error(e.into()))?;
                if e.is_unique_violation_of(POLICY_NUMBER_CONSTRAINT) {
                    debug!("Policy number already taken");
                    Ok(InsertOutcome::PolicyNumberTaken)
                } else if e.is_unique_violation_of(OPEN_POLICY_CONSTRAINT) {
                    Err(PortError::conflict("customer already holds an open policy on this plan"))
                } else {
                    Err(db_to_port_error(e))
                }
            }
        }
    }

    async fn link_beneficiaries(
        &mut self,
        customer_id: CustomerId,
        plan_id: PlanId,
        policy_number: &PolicyNumber,
    ) -> Result<u64, PortError> {
        BeneficiaryRepository::link_policy(
            &mut *self.tx,
            customer_id.into(),
            plan_id.value(),
            policy_number.as_str(),
        )
        .await
        .map_err(db_to_port_error)
    }

    async fn commit(self: Box<Self>) -> Result<(), PortError> {
        self.tx.commit().await.map_err(|e| db_to_port_error(e.into()))
    }

    async fn rollback(self: Box<Self>) -> Result<(), PortError> {
        self.tx.rollback().await.map_err(|e| db_to_port_error(e.into()))
    }
}

// ============================================================================
// Row conversions
// ============================================================================

fn row_to_plan(row: PlanRow) -> InsurancePlan {
    InsurancePlan {
        id: PlanId::new(row.plan_id),
        name: row.name,
        description: row.description,
        min_age: row.min_age,
        max_age: row.max_age,
        sum_assured_limit: row.sum_assured_limit,
        premium: row.premium,
        status: row.status,
        created_at: row.created_at,
        deleted_at: row.deleted_at,
    }
}

fn row_to_policy(row: PolicyRow) -> IssuedPolicy {
    IssuedPolicy {
        policy_number: PolicyNumber::from_stored(row.policy_number),
        customer_id: CustomerId::from(row.customer_id),
        plan_id: PlanId::new(row.plan_id),
        sum_assured: row.sum_assured,
        premium_amount: row.premium_amount,
        payment_frequency: match row.payment_frequency {
            DbPaymentFrequency::Single => PaymentFrequency::Single,
            DbPaymentFrequency::Annual => PaymentFrequency::Annual,
            DbPaymentFrequency::SemiAnnual => PaymentFrequency::SemiAnnual,
            DbPaymentFrequency::Quarterly => PaymentFrequency::Quarterly,
            DbPaymentFrequency::Monthly => PaymentFrequency::Monthly,
        },
        payment_method: row.payment_method,
        issued_at: row.issued_at,
        effective_date: row.effective_date,
        status: match row.status {
            DbPolicyStatus::Pending => PolicyStatus::Pending,
            DbPolicyStatus::Active => PolicyStatus::Active,
            DbPolicyStatus::Lapsed => PolicyStatus::Lapsed,
            DbPolicyStatus::Cancelled => PolicyStatus::Cancelled,
            DbPolicyStatus::Expired => PolicyStatus::Expired,
        },
    }
}

fn policy_to_row(policy: &IssuedPolicy) -> PolicyRow {
    PolicyRow {
        policy_number: policy.policy_number.to_string(),
        customer_id: policy.customer_id.into(),
        plan_id: policy.plan_id.value(),
        sum_assured: policy.sum_assured,
        premium_amount: policy.premium_amount,
        payment_frequency: match policy.payment_frequency {
            PaymentFrequency::Single => DbPaymentFrequency::Single,
            PaymentFrequency::Annual => DbPaymentFrequency::Annual,
            PaymentFrequency::SemiAnnual => DbPaymentFrequency::SemiAnnual,
            PaymentFrequency::Quarterly => DbPaymentFrequency::Quarterly,
            PaymentFrequency::Monthly => DbPaymentFrequency::Monthly,
        },
        payment_method: policy.payment_method.clone(),
        issued_at: policy.issued_at,
        effective_date: policy.effective_date,
        status: status_to_db(policy.status),
    }
}

fn status_to_db(status: PolicyStatus) -> DbPolicyStatus {
    match status {
        PolicyStatus::Pending => DbPolicyStatus::Pending,
        PolicyStatus::Active => DbPolicyStatus::Active,
        PolicyStatus::Lapsed => DbPolicyStatus::Lapsed,
        PolicyStatus::Cancelled => DbPolicyStatus::Cancelled,
        PolicyStatus::Expired => DbPolicyStatus::Expired,
    }
}
