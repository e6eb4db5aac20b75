//! Infrastructure Database Layer
//!
//! PostgreSQL storage for the policy issuance backend, built on SQLx.
//!
//! # Architecture
//!
//! - [`pool`]: connection pool configuration and embedded migrations
//! - [`repositories`]: SQL for each table, returning plain row structs
//! - [`adapters`]: implementations of the domain ports over the repositories
//!
//! The issuance workflow runs on a single transaction opened by
//! [`adapters::PostgresPolicyStore`]; customer rows are locked for the
//! duration of a purchase and a partial unique index keeps at most one open
//! policy per customer and plan.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/insurance")).await?;
//! run_migrations(&pool).await?;
//! let store = PostgresPolicyStore::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{create_pool, create_pool_from_url, run_migrations, DatabaseConfig, DatabasePool, MIGRATOR};
pub use error::DatabaseError;
pub use adapters::{PostgresCustomerAdapter, PostgresPolicyStore};
