//! Insurance plan catalog entries
//!
//! Plans are maintained outside this service; the issuance workflow only
//! reads them. A plan fixes the eligibility window, the maximum insurable
//! sum and a flat premium.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::PlanId;

/// A plan in the insurance catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsurancePlan {
    pub id: PlanId,
    pub name: String,
    pub description: Option<String>,
    /// Youngest applicant age accepted, inclusive
    pub min_age: i32,
    /// Oldest applicant age accepted, inclusive
    pub max_age: i32,
    /// Maximum insurable sum; issued policies assure exactly this amount
    pub sum_assured_limit: Decimal,
    /// Fixed premium per payment
    pub premium: Decimal,
    /// Catalog status label
    pub status: String,
    pub created_at: DateTime<Utc>,
    /// Set when the plan is withdrawn from the catalog
    pub deleted_at: Option<DateTime<Utc>>,
}

impl InsurancePlan {
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }

    /// Returns true if `age` lies inside the plan's eligibility window
    pub fn accepts_age(&self, age: i32) -> bool {
        self.min_age <= age && age <= self.max_age
    }

    /// Returns true if the plan's ceiling fits under the requested amount
    pub fn fits_sum(&self, max_sum: Decimal) -> bool {
        self.sum_assured_limit <= max_sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn plan() -> InsurancePlan {
        InsurancePlan {
            id: PlanId::new(1),
            name: "Term Life 20".to_string(),
            description: None,
            min_age: 20,
            max_age: 60,
            sum_assured_limit: dec!(500000),
            premium: dec!(12000),
            status: "available".to_string(),
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn test_age_window_is_inclusive() {
        let plan = plan();
        assert!(plan.accepts_age(20));
        assert!(plan.accepts_age(60));
        assert!(!plan.accepts_age(19));
        assert!(!plan.accepts_age(61));
    }

    #[test]
    fn test_fits_sum_compares_ceiling() {
        let plan = plan();
        assert!(plan.fits_sum(dec!(500000)));
        assert!(plan.fits_sum(dec!(1000000)));
        assert!(!plan.fits_sum(dec!(499999.99)));
    }
}
