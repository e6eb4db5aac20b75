//! Repository implementations for the stored records
//!
//! Repositories encapsulate SQL and map between database rows and plain row
//! structs; the adapters translate rows to domain types. Queries are built
//! with `sqlx::query_as::<_, Row>` and checked at runtime.
//!
//! Methods that take `&mut PgConnection` instead of `&self` run inside a
//! transaction owned by the caller.

pub mod customer;
pub mod beneficiary;
pub mod health;
pub mod plan;
pub mod policy;

pub use customer::CustomerRepository;
pub use beneficiary::BeneficiaryRepository;
pub use health::HealthDeclarationRepository;
pub use plan::PlanRepository;
pub use policy::PolicyRepository;
