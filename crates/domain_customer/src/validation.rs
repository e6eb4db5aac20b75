//! Customer validation rules
//!
//! # Validation Rules
//!
//! ## Onboarding
//! - Field shape (names, email, phone, age range) via `validator` derive
//! - Age must be at least [`MIN_ONBOARDING_AGE`]
//! - Birth date, when given, cannot be in the future
//!
//! ## Beneficiaries
//! - First and last name and relationship are required
//! - Each share must lie within 0..=100 with at most two decimal places
//! - Shares not totalling 100 are reported as a warning only
//!
//! ## Health declarations
//! - Height and weight must be positive, below 1000 and carry at most two
//!   decimal places
//! - Blood group is required

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use validator::Validate;

use core_kernel::DomainError;

use crate::beneficiary::{total_share, NewBeneficiary};
use crate::customer::{NewCustomer, MIN_ONBOARDING_AGE};
use crate::health::HealthDeclarationInput;

/// Decimal places kept by the stored share, height and weight columns
pub const MAX_DECIMAL_PLACES: u32 = 2;

/// Exclusive upper bound for height (cm) and weight (kg)
pub const MAX_BODY_MEASURE: Decimal = dec!(1000);

/// Result of a validation pass
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    /// Non-fatal findings
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
        self.is_valid = false;
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Converts into a `DomainError::Validation` carrying every error, or `Ok`
    pub fn into_result(self) -> Result<Vec<String>, DomainError> {
        if self.is_valid {
            Ok(self.warnings)
        } else {
            Err(DomainError::validation(self.errors.join("; ")))
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::ok()
    }
}

/// Validator for customer-side input
pub struct CustomerValidator;

impl CustomerValidator {
    /// Validates onboarding data, including the minimum age rule
    pub fn validate_new_customer(input: &NewCustomer) -> ValidationResult {
        let mut result = ValidationResult::ok();

        if let Err(errors) = input.validate() {
            result.add_error(errors.to_string());
        }

        if input.age < MIN_ONBOARDING_AGE {
            result.add_error(format!(
                "customer must be at least {} years old to proceed",
                MIN_ONBOARDING_AGE
            ));
        }

        if let Some(birth_date) = input.birth_date {
            if birth_date > Utc::now().date_naive() {
                result.add_error("birth date cannot be in the future");
            }
        }

        result
    }

    /// Validates a replacement beneficiary set
    pub fn validate_beneficiaries(beneficiaries: &[NewBeneficiary]) -> ValidationResult {
        let mut result = ValidationResult::ok();

        for (index, beneficiary) in beneficiaries.iter().enumerate() {
            if beneficiary.first_name.trim().is_empty() || beneficiary.last_name.trim().is_empty() {
                result.add_error(format!("beneficiary {}: first and last name are required", index));
            }
            if beneficiary.relationship.trim().is_empty() {
                result.add_error(format!("beneficiary {}: relationship is required", index));
            }
            if beneficiary.percentage < dec!(0) || beneficiary.percentage > dec!(100) {
                result.add_error(format!(
                    "beneficiary {}: percentage {} must be between 0 and 100",
                    index, beneficiary.percentage
                ));
            }
            if beneficiary.percentage.scale() > MAX_DECIMAL_PLACES {
                result.add_error(format!(
                    "beneficiary {}: percentage {} has more than {} decimal places",
                    index, beneficiary.percentage, MAX_DECIMAL_PLACES
                ));
            }
        }

        // Shares need not total 100; a mismatch is only a warning
        let total = total_share(beneficiaries);
        if !beneficiaries.is_empty() && total != dec!(100) {
            result.add_warning(format!("beneficiary shares total {}%, not 100%", total));
        }

        result
    }

    /// Validates a health declaration submission
    pub fn validate_health(input: &HealthDeclarationInput) -> ValidationResult {
        let mut result = ValidationResult::ok();

        for (field, value) in [("height", input.height), ("weight", input.weight)] {
            if value <= dec!(0) {
                result.add_error(format!("{} must be positive", field));
            } else if value >= MAX_BODY_MEASURE {
                result.add_error(format!("{} must be less than {}", field, MAX_BODY_MEASURE));
            }
            if value.scale() > MAX_DECIMAL_PLACES {
                result.add_error(format!(
                    "{} has more than {} decimal places",
                    field, MAX_DECIMAL_PLACES
                ));
            }
        }
        if input.blood_group.trim().is_empty() {
            result.add_error("blood group is required");
        }
        if input.has_chronic_disease
            && input.chronic_disease.as_deref().map_or(true, |d| d.trim().is_empty())
        {
            result.add_warning("chronic disease declared without a description");
        }

        result
    }
}
