//! Customer Domain
//!
//! This crate manages the people side of the policy issuance backend:
//! customers onboarded through the API, the beneficiaries they name and
//! their health declarations.
//!
//! # Lifecycle rules
//!
//! - A customer must be at least 18 years old when onboarded; the rule is
//!   checked at creation time only.
//! - Customers are soft-deleted and never removed.
//! - A customer's beneficiary set is replaced wholesale: the previous rows
//!   are deleted and the new ones inserted in one unit of work.
//! - Each customer has at most one health declaration, created on first
//!   submission and overwritten in place afterwards.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_customer::{OnboardingService, NewCustomer, Gender};
//!
//! let service = OnboardingService::new(port);
//! let customer = service.create_customer(NewCustomer {
//!     first_name: "Somchai".into(),
//!     last_name: "Jaidee".into(),
//!     birth_date: None,
//!     age: 34,
//!     gender: Gender::Male,
//!     email: "somchai@example.com".into(),
//!     phone: "0812345678".into(),
//! }).await?;
//! ```

pub mod customer;
pub mod beneficiary;
pub mod health;
pub mod validation;
pub mod ports;
pub mod service;

pub use customer::{Customer, NewCustomer, Gender, MIN_ONBOARDING_AGE};
pub use beneficiary::{Beneficiary, NewBeneficiary};
pub use health::{HealthDeclaration, HealthDeclarationInput, UpsertOutcome};
pub use validation::{CustomerValidator, ValidationResult};
pub use ports::CustomerPort;
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockCustomerPort;
pub use service::OnboardingService;
