//! Customer, beneficiary and health declaration DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::PlanId;
use domain_customer::{
    Beneficiary, Customer, Gender, HealthDeclaration, HealthDeclarationInput, NewBeneficiary, NewCustomer,
    UpsertOutcome,
};

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    #[validate(range(min = 1, max = 150))]
    pub age: i32,
    pub gender: Gender,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 20))]
    pub phone: String,
}

impl From<CreateCustomerRequest> for NewCustomer {
    fn from(req: CreateCustomerRequest) -> Self {
        NewCustomer {
            first_name: req.first_name,
            last_name: req.last_name,
            birth_date: req.birth_date,
            age: req.age,
            gender: req.gender,
            email: req.email,
            phone: req.phone,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CustomerResponse {
    pub customer_id: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub age: i32,
    pub gender: Gender,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Customer> for CustomerResponse {
    fn from(c: Customer) -> Self {
        Self {
            customer_id: c.id.to_string(),
            first_name: c.first_name,
            last_name: c.last_name,
            birth_date: c.birth_date,
            age: c.age,
            gender: c.gender,
            email: c.email,
            phone: c.phone,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct BeneficiaryRequest {
    #[validate(range(min = 1))]
    pub plan_id: Option<i64>,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(length(min = 1, max = 50))]
    pub relationship: String,
    pub percentage: Decimal,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
}

impl From<BeneficiaryRequest> for NewBeneficiary {
    fn from(req: BeneficiaryRequest) -> Self {
        NewBeneficiary {
            plan_id: req.plan_id.map(PlanId::new),
            first_name: req.first_name,
            last_name: req.last_name,
            relationship: req.relationship,
            percentage: req.percentage,
            email: req.email,
            phone: req.phone,
        }
    }
}

/// Replaces the whole beneficiary set; an empty list clears it
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct ReplaceBeneficiariesRequest {
    #[validate(nested)]
    pub beneficiaries: Vec<BeneficiaryRequest>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BeneficiaryResponse {
    pub beneficiary_id: String,
    pub customer_id: String,
    pub plan_id: Option<i64>,
    pub policy_number: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub relationship: String,
    pub percentage: Decimal,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl From<Beneficiary> for BeneficiaryResponse {
    fn from(b: Beneficiary) -> Self {
        Self {
            beneficiary_id: b.id.to_string(),
            customer_id: b.customer_id.to_string(),
            plan_id: b.plan_id.map(|id| id.value()),
            policy_number: b.policy_number,
            first_name: b.first_name,
            last_name: b.last_name,
            relationship: b.relationship,
            percentage: b.percentage,
            email: b.email,
            phone: b.phone,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct HealthDeclarationRequest {
    pub height: Decimal,
    pub weight: Decimal,
    #[validate(length(min = 1, max = 5))]
    pub blood_group: String,
    #[serde(default)]
    pub has_chronic_disease: bool,
    pub chronic_disease: Option<String>,
    #[serde(default)]
    pub has_been_hospitalized_last_year: bool,
    #[validate(length(max = 30))]
    pub smoking_status: Option<String>,
    pub medical_details: Option<String>,
    pub surgical_history: Option<String>,
    pub allergies: Option<String>,
    pub family_medical_history: Option<String>,
}

impl From<HealthDeclarationRequest> for HealthDeclarationInput {
    fn from(req: HealthDeclarationRequest) -> Self {
        HealthDeclarationInput {
            height: req.height,
            weight: req.weight,
            blood_group: req.blood_group,
            has_chronic_disease: req.has_chronic_disease,
            chronic_disease: req.chronic_disease,
            has_been_hospitalized_last_year: req.has_been_hospitalized_last_year,
            smoking_status: req.smoking_status,
            medical_details: req.medical_details,
            surgical_history: req.surgical_history,
            allergies: req.allergies,
            family_medical_history: req.family_medical_history,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthDeclarationResponse {
    pub declaration_id: String,
    pub customer_id: String,
    #[serde(flatten)]
    pub details: HealthDeclarationInput,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Present on upsert responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<UpsertOutcome>,
}

impl HealthDeclarationResponse {
    pub fn new(declaration: HealthDeclaration, outcome: Option<UpsertOutcome>) -> Self {
        Self {
            declaration_id: declaration.id.to_string(),
            customer_id: declaration.customer_id.to_string(),
            details: declaration.details,
            created_at: declaration.created_at,
            updated_at: declaration.updated_at,
            outcome,
        }
    }
}
