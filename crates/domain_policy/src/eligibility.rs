//! Plan eligibility filtering
//!
//! A [`PlanFilter`] selects the catalog plans an applicant may buy. Absent
//! criteria do not restrict; present criteria are combined with AND:
//!
//! - `age`: `min_age <= age <= max_age`
//! - `max_sum`: `sum_assured_limit <= max_sum`

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::plan::InsurancePlan;

/// Criteria for listing plans
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanFilter {
    pub age: Option<i32>,
    pub max_sum: Option<Decimal>,
}

impl PlanFilter {
    /// A filter that accepts every active plan
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_age(age: i32) -> Self {
        Self {
            age: Some(age),
            max_sum: None,
        }
    }

    pub fn with_max_sum(mut self, max_sum: Decimal) -> Self {
        self.max_sum = Some(max_sum);
        self
    }

    pub fn is_unfiltered(&self) -> bool {
        self.age.is_none() && self.max_sum.is_none()
    }

    /// Applies the criteria to a single plan; soft-deleted plans never match
    pub fn matches(&self, plan: &InsurancePlan) -> bool {
        if !plan.is_active() {
            return false;
        }
        if let Some(age) = self.age {
            if !plan.accepts_age(age) {
                return false;
            }
        }
        if let Some(max_sum) = self.max_sum {
            if !plan.fits_sum(max_sum) {
                return false;
            }
        }
        true
    }

    /// Filters a plan sequence, keeping the input order
    pub fn apply<'a>(&self, plans: impl IntoIterator<Item = &'a InsurancePlan>) -> Vec<InsurancePlan> {
        plans.into_iter().filter(|p| self.matches(p)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use core_kernel::PlanId;
    use rust_decimal_macros::dec;

    fn plan(id: i64, min_age: i32, max_age: i32, limit: Decimal) -> InsurancePlan {
        InsurancePlan {
            id: PlanId::new(id),
            name: format!("Plan {}", id),
            description: None,
            min_age,
            max_age,
            sum_assured_limit: limit,
            premium: dec!(1000),
            status: "available".to_string(),
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn test_unfiltered_accepts_active_plans() {
        let mut withdrawn = plan(2, 18, 60, dec!(100000));
        withdrawn.deleted_at = Some(Utc::now());
        let plans = vec![plan(1, 18, 60, dec!(100000)), withdrawn];

        let result = PlanFilter::all().apply(&plans);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, PlanId::new(1));
    }

    #[test]
    fn test_age_and_sum_combine() {
        let plans = vec![
            plan(1, 18, 40, dec!(100000)),
            plan(2, 18, 40, dec!(200000)),
            plan(3, 41, 70, dec!(50000)),
        ];
        let filter = PlanFilter::for_age(30).with_max_sum(dec!(100000));

        let ids: Vec<_> = filter.apply(&plans).into_iter().map(|p| p.id.value()).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_no_match_is_empty() {
        let plans = vec![plan(1, 18, 40, dec!(100000))];
        assert!(PlanFilter::for_age(90).apply(&plans).is_empty());
    }
}
