//! Core Kernel - Foundational types for the policy issuance backend
//!
//! This crate provides the building blocks shared by every domain crate:
//! - Strongly-typed identifiers for customers, beneficiaries, declarations and plans
//! - The domain error taxonomy returned to the request boundary
//! - Port abstractions implemented by storage adapters

pub mod identifiers;
pub mod error;
pub mod ports;

pub use identifiers::{CustomerId, BeneficiaryId, DeclarationId, PlanId};
pub use error::DomainError;
pub use ports::{PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth};
