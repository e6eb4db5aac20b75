//! Policy DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use domain_policy::{IssuedPolicy, PaymentFrequency, PolicyStatus};

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct PurchasePolicyRequest {
    #[validate(length(min = 1))]
    pub customer_id: String,
    #[validate(range(min = 1))]
    pub plan_id: i64,
    pub payment_frequency: PaymentFrequency,
    #[validate(length(min = 1, max = 30))]
    pub payment_method: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PolicyResponse {
    pub policy_number: String,
    pub customer_id: String,
    pub plan_id: i64,
    pub sum_assured: Decimal,
    pub premium_amount: Decimal,
    pub payment_frequency: PaymentFrequency,
    pub payment_method: String,
    pub issued_at: DateTime<Utc>,
    pub effective_date: DateTime<Utc>,
    pub status: PolicyStatus,
}

impl From<IssuedPolicy> for PolicyResponse {
    fn from(p: IssuedPolicy) -> Self {
        Self {
            policy_number: p.policy_number.into_inner(),
            customer_id: p.customer_id.to_string(),
            plan_id: p.plan_id.value(),
            sum_assured: p.sum_assured,
            premium_amount: p.premium_amount,
            payment_frequency: p.payment_frequency,
            payment_method: p.payment_method,
            issued_at: p.issued_at,
            effective_date: p.effective_date,
            status: p.status,
        }
    }
}
