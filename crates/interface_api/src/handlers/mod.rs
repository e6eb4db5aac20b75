//! Request handlers
//!
//! Handlers translate between DTOs and domain calls; all rules live in the
//! domain services.

pub mod customer;
pub mod health;
pub mod plan;
pub mod policy;

use core_kernel::CustomerId;

use crate::error::ApiError;

/// Parses a customer id from a path or body value, with or without the `CUS-` prefix
pub(crate) fn parse_customer_id(raw: &str) -> Result<CustomerId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid customer id '{}'", raw)))
}
