//! Policy number generation
//!
//! Numbers read `P{plan_id}-{customer suffix}-{unix seconds}`. Two purchases
//! in the same second for the same plan and suffix would collide, so the
//! issuance workflow retries with an attempt counter appended (`-1`, `-2`, ...)
//! until the store accepts the number.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{CustomerId, PlanId};

/// Characters of the customer id embedded in the number
pub const CUSTOMER_SUFFIX_LEN: usize = 4;

/// Attempts made before issuance gives up on finding a free number
pub const MAX_POLICY_NUMBER_ATTEMPTS: u32 = 5;

/// Human-readable identifier of an issued policy
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyNumber(String);

impl PolicyNumber {
    /// Generates the number for a given attempt; attempt 0 carries no suffix
    pub fn generate(
        plan_id: PlanId,
        customer_id: &CustomerId,
        issued_at: DateTime<Utc>,
        attempt: u32,
    ) -> Self {
        let base = format!(
            "P{}-{}-{}",
            plan_id,
            customer_id.suffix(CUSTOMER_SUFFIX_LEN),
            issued_at.timestamp()
        );
        if attempt == 0 {
            Self(base)
        } else {
            Self(format!("{}-{}", base, attempt))
        }
    }

    /// Wraps a number read back from storage
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PolicyNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PolicyNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
