//! Issued policies and purchase requests

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{CustomerId, PlanId};

use crate::plan::InsurancePlan;
use crate::policy_number::PolicyNumber;

/// Days between issuance and the start of cover
pub const EFFECTIVE_DATE_OFFSET_DAYS: i64 = 15;

/// Lifecycle status of an issued policy
///
/// The issuance workflow only ever writes `Pending`; the other states are
/// set by activation and cancellation processes outside this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyStatus {
    Pending,
    Active,
    Lapsed,
    Cancelled,
    Expired,
}

impl PolicyStatus {
    /// Pending and active policies keep the customer from buying the same plan again
    pub fn blocks_new_purchase(&self) -> bool {
        matches!(self, PolicyStatus::Pending | PolicyStatus::Active)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyStatus::Pending => "pending",
            PolicyStatus::Active => "active",
            PolicyStatus::Lapsed => "lapsed",
            PolicyStatus::Cancelled => "cancelled",
            PolicyStatus::Expired => "expired",
        }
    }
}

/// How often the premium is paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentFrequency {
    /// Single payment for the whole term
    Single,
    Annual,
    /// Twice per year
    SemiAnnual,
    Quarterly,
    Monthly,
}

impl PaymentFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentFrequency::Single => "single",
            PaymentFrequency::Annual => "annual",
            PaymentFrequency::SemiAnnual => "semi_annual",
            PaymentFrequency::Quarterly => "quarterly",
            PaymentFrequency::Monthly => "monthly",
        }
    }
}

/// A request to buy a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRequest {
    pub customer_id: CustomerId,
    pub plan_id: PlanId,
    pub payment_frequency: PaymentFrequency,
    /// Free-form label such as "credit_card" or "bank_transfer"
    pub payment_method: String,
}

/// A policy created by a successful purchase
///
/// Sum assured and premium are copied from the plan when the policy is
/// issued and do not follow later catalog changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssuedPolicy {
    pub policy_number: PolicyNumber,
    pub customer_id: CustomerId,
    pub plan_id: PlanId,
    pub sum_assured: Decimal,
    pub premium_amount: Decimal,
    pub payment_frequency: PaymentFrequency,
    pub payment_method: String,
    pub issued_at: DateTime<Utc>,
    pub effective_date: DateTime<Utc>,
    pub status: PolicyStatus,
}

impl IssuedPolicy {
    /// Builds a pending policy for `plan` from a purchase request
    pub fn issue(
        policy_number: PolicyNumber,
        request: &PurchaseRequest,
        plan: &InsurancePlan,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            policy_number,
            customer_id: request.customer_id,
            plan_id: plan.id,
            sum_assured: plan.sum_assured_limit,
            premium_amount: plan.premium,
            payment_frequency: request.payment_frequency,
            payment_method: request.payment_method.clone(),
            issued_at,
            effective_date: issued_at + Duration::days(EFFECTIVE_DATE_OFFSET_DAYS),
            status: PolicyStatus::Pending,
        }
    }
}
