//! Health declarations
//!
//! One declaration per customer. Submitting again overwrites the stored
//! declaration in place and keeps its identifier.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{CustomerId, DeclarationId};

/// Declaration fields as submitted by the customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthDeclarationInput {
    /// Height in centimetres
    pub height: Decimal,
    /// Weight in kilograms
    pub weight: Decimal,
    pub blood_group: String,
    pub has_chronic_disease: bool,
    pub chronic_disease: Option<String>,
    pub has_been_hospitalized_last_year: bool,
    pub smoking_status: Option<String>,
    pub medical_details: Option<String>,
    pub surgical_history: Option<String>,
    pub allergies: Option<String>,
    pub family_medical_history: Option<String>,
}

/// A stored health declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthDeclaration {
    pub id: DeclarationId,
    pub customer_id: CustomerId,
    #[serde(flatten)]
    pub details: HealthDeclarationInput,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HealthDeclaration {
    pub fn new(customer_id: CustomerId, details: HealthDeclarationInput) -> Self {
        let now = Utc::now();
        Self {
            id: DeclarationId::new_v7(),
            customer_id,
            details,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrites the declared fields, keeping identity and creation time
    pub fn overwrite(&mut self, details: HealthDeclarationInput) {
        self.details = details;
        self.updated_at = Utc::now();
    }
}

/// Whether an upsert created a new declaration or replaced an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
    Created,
    Updated,
}
