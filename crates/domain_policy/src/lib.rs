//! Policy Domain
//!
//! This crate covers the insurance side of the policy issuance backend:
//!
//! - **Plans**: read-only catalog entries with an age window, a sum assured
//!   limit and a fixed premium
//! - **Eligibility**: filtering the catalog by applicant age and the largest
//!   sum the applicant wants covered
//! - **Issuance**: turning a purchase request into a pending policy, with
//!   duplicate detection, policy-number generation and beneficiary linkage
//!   inside a single store transaction
//!
//! # Invariants
//!
//! - A customer holds at most one pending or active policy per plan.
//! - Sum assured and premium are frozen from the plan at issuance.
//! - Cover starts 15 days after issuance.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_policy::{PolicyIssuanceService, PurchaseRequest, PaymentFrequency};
//!
//! let service = PolicyIssuanceService::new(store);
//! let policy = service.purchase(PurchaseRequest {
//!     customer_id,
//!     plan_id: PlanId::new(3),
//!     payment_frequency: PaymentFrequency::Monthly,
//!     payment_method: "credit_card".into(),
//! }).await?;
//! ```

pub mod plan;
pub mod eligibility;
pub mod policy;
pub mod policy_number;
pub mod ports;
pub mod services;

pub use plan::InsurancePlan;
pub use eligibility::PlanFilter;
pub use policy::{IssuedPolicy, PaymentFrequency, PolicyStatus, PurchaseRequest, EFFECTIVE_DATE_OFFSET_DAYS};
pub use policy_number::{PolicyNumber, MAX_POLICY_NUMBER_ATTEMPTS};
pub use ports::{InsertOutcome, IssuanceTransaction, PolicyStore};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::{FailurePoint, MockPolicyStore};
pub use services::{Clock, PlanCatalogService, PolicyIssuanceService};
