//! Custom Test Assertions
//!
//! Assertion helpers for issued policies that report every mismatching
//! field instead of stopping at the first one.

use chrono::Duration;

use domain_customer::Beneficiary;
use domain_policy::{InsurancePlan, IssuedPolicy, PolicyStatus, PurchaseRequest, EFFECTIVE_DATE_OFFSET_DAYS};

/// Asserts that a policy was issued for `request` on `plan` with the terms
/// frozen from the plan
///
/// # Panics
///
/// Panics listing every field that differs
pub fn assert_issued_from(policy: &IssuedPolicy, request: &PurchaseRequest, plan: &InsurancePlan) {
    let mut problems = Vec::new();

    if policy.customer_id != request.customer_id {
        problems.push(format!("customer {} != {}", policy.customer_id, request.customer_id));
    }
    if policy.plan_id != plan.id {
        problems.push(format!("plan {} != {}", policy.plan_id, plan.id));
    }
    if policy.sum_assured != plan.sum_assured_limit {
        problems.push(format!("sum assured {} != {}", policy.sum_assured, plan.sum_assured_limit));
    }
    if policy.premium_amount != plan.premium {
        problems.push(format!("premium {} != {}", policy.premium_amount, plan.premium));
    }
    if policy.payment_frequency != request.payment_frequency {
        problems.push(format!(
            "frequency {} != {}",
            policy.payment_frequency.as_str(),
            request.payment_frequency.as_str()
        ));
    }
    if policy.payment_method != request.payment_method {
        problems.push(format!("method {} != {}", policy.payment_method, request.payment_method));
    }
    if policy.status != PolicyStatus::Pending {
        problems.push(format!("status {} != pending", policy.status.as_str()));
    }
    let expected_effective = policy.issued_at + Duration::days(EFFECTIVE_DATE_OFFSET_DAYS);
    if policy.effective_date != expected_effective {
        problems.push(format!("effective date {} != {}", policy.effective_date, expected_effective));
    }

    assert!(
        problems.is_empty(),
        "policy {} does not match its request: {}",
        policy.policy_number,
        problems.join("; ")
    );
}

/// Asserts that the policy number has the `P{plan}-{suffix}-{seconds}` shape
pub fn assert_policy_number_format(policy: &IssuedPolicy) {
    let number = policy.policy_number.as_str();
    let expected_prefix = format!("P{}-{}-", policy.plan_id, policy.customer_id.suffix(4));
    assert!(
        number.starts_with(&expected_prefix),
        "policy number {number} should start with {expected_prefix}"
    );
    let rest = &number[expected_prefix.len()..];
    assert!(
        rest.split('-').all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit())),
        "policy number {number} should end in digits"
    );
}

/// Asserts that exactly `expected` beneficiaries carry `policy_number`
pub fn assert_linked_count(beneficiaries: &[Beneficiary], policy_number: &str, expected: usize) {
    let linked = beneficiaries
        .iter()
        .filter(|b| b.policy_number.as_deref() == Some(policy_number))
        .count();
    assert_eq!(
        linked, expected,
        "expected {expected} beneficiaries linked to {policy_number}, found {linked}"
    );
}
