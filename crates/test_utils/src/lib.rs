//! Test Utilities Crate
//!
//! Shared test infrastructure for the policy issuance test suite.
//!
//! # Modules
//!
//! - `fixtures`: Ready-made customers, plans, beneficiaries and declarations
//! - `builders`: Builder patterns for test data construction
//! - `database`: PostgreSQL test containers with the schema applied
//! - `assertions`: Assertion helpers for issued policies

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
