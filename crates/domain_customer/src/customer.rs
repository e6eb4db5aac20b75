//! Customer entity
//!
//! A customer is the natural person who buys policies. Identity is system
//! generated; email and phone are unique across all customers, including
//! soft-deleted ones.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::CustomerId;

/// Minimum age at which a customer may be onboarded
pub const MIN_ONBOARDING_AGE: i32 = 18;

/// Gender as recorded on the application form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Data supplied when onboarding a customer
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewCustomer {
    #[validate(length(min = 1, max = 100, message = "first name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "last name is required"))]
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    #[validate(range(min = 1, max = 150, message = "age must be a positive number"))]
    pub age: i32,
    pub gender: Gender,
    #[validate(email(message = "email is not a valid address"))]
    pub email: String,
    #[validate(length(min = 1, max = 20, message = "phone is required"))]
    pub phone: String,
}

/// An onboarded customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub age: i32,
    pub gender: Gender,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set when the customer is soft-deleted
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Customer {
    /// Builds a customer record from validated onboarding data
    pub fn from_new(new: NewCustomer) -> Self {
        let now = Utc::now();
        Self {
            id: CustomerId::new_v7(),
            first_name: new.first_name,
            last_name: new.last_name,
            birth_date: new.birth_date,
            age: new.age,
            gender: new.gender,
            email: new.email,
            phone: new.phone,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}
