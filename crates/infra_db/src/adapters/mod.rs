//! Domain Adapters
//!
//! Adapter implementations for the domain ports, connecting them to the
//! PostgreSQL repositories:
//!
//! - [`PostgresCustomerAdapter`] implements `domain_customer::CustomerPort`
//! - [`PostgresPolicyStore`] implements `domain_policy::PolicyStore`
//!
//! # Usage
//!
//! ```rust,ignore
//! use infra_db::adapters::{PostgresCustomerAdapter, PostgresPolicyStore};
//!
//! let customers = Arc::new(PostgresCustomerAdapter::new(pool.clone()));
//! let policies = Arc::new(PostgresPolicyStore::new(pool));
//! ```

pub mod customer;
pub mod policy;

pub use customer::PostgresCustomerAdapter;
pub use policy::{PostgresIssuanceTransaction, PostgresPolicyStore};

use chrono::Utc;
use sqlx::PgPool;
use tracing::warn;

use core_kernel::{AdapterHealth, HealthCheckResult, PortError};

use crate::error::DatabaseError;

/// Converts database errors to port errors
///
/// Constraint errors the adapters do not map by name get a fixed message;
/// the server text names tables and constraints and is only logged.
fn db_to_port_error(e: DatabaseError) -> PortError {
    match e {
        DatabaseError::NotFound(msg) => PortError::not_found("Record", msg),
        DatabaseError::DuplicateEntry { constraint, message } => {
            warn!(?constraint, %message, "Unmapped unique violation");
            PortError::conflict("record already exists")
        }
        DatabaseError::ForeignKeyViolation { constraint, message } => {
            warn!(?constraint, %message, "Unmapped foreign key violation");
            PortError::validation("referenced record does not exist")
        }
        DatabaseError::ConstraintViolation { constraint, message } => {
            warn!(?constraint, %message, "Unmapped check violation");
            PortError::validation("value out of the accepted range")
        }
        DatabaseError::ConnectionFailed(msg) => PortError::connection(msg),
        DatabaseError::PoolExhausted => PortError::connection("connection pool exhausted"),
        other => PortError::internal(other.to_string()),
    }
}

/// Runs `SELECT 1` and reports latency
async fn ping(pool: &PgPool, adapter_id: &str) -> HealthCheckResult {
    let start = std::time::Instant::now();

    let result = sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await;

    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(_) => HealthCheckResult {
            adapter_id: adapter_id.to_string(),
            status: AdapterHealth::Healthy,
            latency_ms,
            message: None,
            checked_at: Utc::now(),
        },
        Err(e) => HealthCheckResult {
            adapter_id: adapter_id.to_string(),
            status: AdapterHealth::Unhealthy,
            latency_ms,
            message: Some(format!("Database error: {}", e)),
            checked_at: Utc::now(),
        },
    }
}
