//! Beneficiaries named by a customer
//!
//! A beneficiary may point at the plan it is meant for. When a policy for
//! that plan is issued the beneficiary is stamped with the policy number.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{BeneficiaryId, CustomerId, PlanId};

/// Beneficiary data supplied when replacing a customer's beneficiary set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBeneficiary {
    pub plan_id: Option<PlanId>,
    pub first_name: String,
    pub last_name: String,
    pub relationship: String,
    /// Share of the payout, 0 to 100
    pub percentage: Decimal,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// A stored beneficiary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beneficiary {
    pub id: BeneficiaryId,
    pub customer_id: CustomerId,
    pub plan_id: Option<PlanId>,
    /// Number of the policy issued for `plan_id`, once there is one
    pub policy_number: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub relationship: String,
    pub percentage: Decimal,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Beneficiary {
    pub fn from_new(customer_id: CustomerId, new: NewBeneficiary) -> Self {
        Self {
            id: BeneficiaryId::new_v7(),
            customer_id,
            plan_id: new.plan_id,
            policy_number: None,
            first_name: new.first_name,
            last_name: new.last_name,
            relationship: new.relationship,
            percentage: new.percentage,
            email: new.email,
            phone: new.phone,
            created_at: Utc::now(),
        }
    }

    pub fn is_linked_to_policy(&self) -> bool {
        self.policy_number.is_some()
    }
}

/// Sums the payout shares of a beneficiary set
pub fn total_share<'a>(beneficiaries: impl IntoIterator<Item = &'a NewBeneficiary>) -> Decimal {
    beneficiaries.into_iter().map(|b| b.percentage).sum()
}
