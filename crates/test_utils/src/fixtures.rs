//! Pre-built Test Fixtures
//!
//! Names come from `fake`; emails and phone numbers are made unique per
//! process so fixtures never trip the customer uniqueness constraints.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{TimeZone, Utc, DateTime};
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use rust_decimal_macros::dec;
use uuid::Uuid;

use core_kernel::PlanId;
use domain_customer::{Gender, HealthDeclarationInput, NewBeneficiary, NewCustomer};
use domain_policy::InsurancePlan;

static NEXT_PHONE: AtomicU64 = AtomicU64::new(1);

/// Fixture for contact details
pub struct ContactFixtures;

impl ContactFixtures {
    /// An email address no other fixture returns
    pub fn unique_email(first_name: &str) -> String {
        let local: String = first_name
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect();
        format!(
            "{}.{}@example.com",
            local.to_lowercase(),
            Uuid::new_v4().simple()
        )
    }

    /// A ten digit mobile number no other fixture returns in this process
    pub fn unique_phone() -> String {
        let n = NEXT_PHONE.fetch_add(1, Ordering::Relaxed);
        format!("08{:08}", n % 100_000_000)
    }
}

/// Fixture for onboarding data
pub struct CustomerFixtures;

impl CustomerFixtures {
    /// Onboarding data for an adult of the given age
    pub fn new_customer(age: i32) -> NewCustomer {
        let first_name: String = FirstName().fake();
        let last_name: String = LastName().fake();
        NewCustomer {
            email: ContactFixtures::unique_email(&first_name),
            phone: ContactFixtures::unique_phone(),
            first_name,
            last_name,
            birth_date: None,
            age,
            gender: Gender::Other,
        }
    }

    /// A 35 year old applicant
    pub fn adult() -> NewCustomer {
        Self::new_customer(35)
    }

    /// A 17 year old applicant, rejected at onboarding
    pub fn minor() -> NewCustomer {
        Self::new_customer(17)
    }
}

/// Fixture for the plan catalog
pub struct PlanFixtures;

impl PlanFixtures {
    /// Catalog timestamp used by every plan fixture
    pub fn catalog_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }

    /// Term life for ages 20 to 60, one million sum assured
    pub fn term_life(id: i64) -> InsurancePlan {
        InsurancePlan {
            id: PlanId::new(id),
            name: "Term Life 20".to_string(),
            description: Some("Twenty year level term cover".to_string()),
            min_age: 20,
            max_age: 60,
            sum_assured_limit: dec!(1000000),
            premium: dec!(12000),
            status: "available".to_string(),
            created_at: Self::catalog_date(),
            deleted_at: None,
        }
    }

    /// Health cover for ages 18 to 70 with a small ceiling
    pub fn health_plan(id: i64) -> InsurancePlan {
        InsurancePlan {
            id: PlanId::new(id),
            name: "Health Care Plus".to_string(),
            description: Some("Inpatient and outpatient cover".to_string()),
            min_age: 18,
            max_age: 70,
            sum_assured_limit: dec!(200000),
            premium: dec!(850.50),
            status: "available".to_string(),
            created_at: Self::catalog_date(),
            deleted_at: None,
        }
    }

    /// Senior savings plan for ages 50 to 80
    pub fn senior_savings(id: i64) -> InsurancePlan {
        InsurancePlan {
            id: PlanId::new(id),
            name: "Senior Savings".to_string(),
            description: None,
            min_age: 50,
            max_age: 80,
            sum_assured_limit: dec!(500000),
            premium: dec!(30000),
            status: "available".to_string(),
            created_at: Self::catalog_date(),
            deleted_at: None,
        }
    }
}

/// Fixture for beneficiaries
pub struct BeneficiaryFixtures;

impl BeneficiaryFixtures {
    pub fn for_plan(plan_id: Option<PlanId>, percentage: rust_decimal::Decimal) -> NewBeneficiary {
        NewBeneficiary {
            plan_id,
            first_name: FirstName().fake(),
            last_name: LastName().fake(),
            relationship: "child".to_string(),
            percentage,
            email: None,
            phone: None,
        }
    }

    /// Two beneficiaries for `plan_id` splitting the payout evenly
    pub fn even_split(plan_id: PlanId) -> Vec<NewBeneficiary> {
        vec![
            Self::for_plan(Some(plan_id), dec!(50)),
            Self::for_plan(Some(plan_id), dec!(50)),
        ]
    }
}

/// Fixture for health declarations
pub struct HealthFixtures;

impl HealthFixtures {
    pub fn healthy() -> HealthDeclarationInput {
        HealthDeclarationInput {
            height: dec!(172.5),
            weight: dec!(68.0),
            blood_group: "O+".to_string(),
            has_chronic_disease: false,
            chronic_disease: None,
            has_been_hospitalized_last_year: false,
            smoking_status: Some("never".to_string()),
            medical_details: None,
            surgical_history: None,
            allergies: Some("penicillin".to_string()),
            family_medical_history: None,
        }
    }

    pub fn with_chronic_disease() -> HealthDeclarationInput {
        HealthDeclarationInput {
            has_chronic_disease: true,
            chronic_disease: Some("type 2 diabetes".to_string()),
            ..Self::healthy()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contacts_are_unique() {
        assert_ne!(ContactFixtures::unique_phone(), ContactFixtures::unique_phone());
        assert_ne!(
            ContactFixtures::unique_email("ann"),
            ContactFixtures::unique_email("ann")
        );
    }

    #[test]
    fn test_phone_fits_column() {
        assert_eq!(ContactFixtures::unique_phone().len(), 10);
    }

    #[test]
    fn test_plan_fixtures_are_active() {
        assert!(PlanFixtures::term_life(1).is_active());
        assert!(PlanFixtures::health_plan(2).accepts_age(18));
        assert!(!PlanFixtures::senior_savings(3).accepts_age(35));
    }
}
