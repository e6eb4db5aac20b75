//! Plan DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use domain_policy::{InsurancePlan, PlanFilter};

/// Query string of `GET /api/v1/plans`
///
/// Both parameters are kept as raw strings: a value that does not parse, or
/// is not positive, is ignored rather than rejected.
#[derive(Debug, Default, Deserialize)]
pub struct PlanQuery {
    pub age: Option<String>,
    pub sum_assured: Option<String>,
}

impl PlanQuery {
    pub fn to_filter(&self) -> PlanFilter {
        PlanFilter {
            age: self
                .age
                .as_deref()
                .and_then(|v| v.trim().parse::<i32>().ok())
                .filter(|age| *age > 0),
            max_sum: self
                .sum_assured
                .as_deref()
                .and_then(|v| v.trim().parse::<Decimal>().ok())
                .filter(|sum| *sum > Decimal::ZERO),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlanResponse {
    pub plan_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub min_age: i32,
    pub max_age: i32,
    pub sum_assured_limit: Decimal,
    pub premium: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<InsurancePlan> for PlanResponse {
    fn from(p: InsurancePlan) -> Self {
        Self {
            plan_id: p.id.value(),
            name: p.name,
            description: p.description,
            min_age: p.min_age,
            max_age: p.max_age,
            sum_assured_limit: p.sum_assured_limit,
            premium: p.premium,
            status: p.status,
            created_at: p.created_at,
        }
    }
}
