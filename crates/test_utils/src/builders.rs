//! Test Data Builders
//!
//! Builders for the records tests set up most often, with defaults that pass
//! every validation rule. Tests override only the fields they care about.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{CustomerId, PlanId};
use domain_customer::{Beneficiary, Customer, Gender};
use domain_policy::{InsurancePlan, PaymentFrequency, PurchaseRequest};
use infra_db::repositories::plan::NewPlan;

use crate::fixtures::{CustomerFixtures, PlanFixtures};

/// Builder for customers stored directly in mock adapters
pub struct TestCustomerBuilder {
    customer: Customer,
}

impl Default for TestCustomerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestCustomerBuilder {
    pub fn new() -> Self {
        Self {
            customer: Customer::from_new(CustomerFixtures::adult()),
        }
    }

    pub fn with_age(mut self, age: i32) -> Self {
        self.customer.age = age;
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.customer.gender = gender;
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.customer.email = email.into();
        self
    }

    /// Marks the customer soft-deleted
    pub fn deleted(mut self) -> Self {
        self.customer.deleted_at = Some(Utc::now());
        self
    }

    pub fn build(self) -> Customer {
        self.customer
    }
}

/// Builder for catalog plans
pub struct TestPlanBuilder {
    plan: InsurancePlan,
}

impl TestPlanBuilder {
    /// Starts from the term life fixture with the given id
    pub fn new(id: i64) -> Self {
        Self {
            plan: PlanFixtures::term_life(id),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.plan.name = name.into();
        self
    }

    pub fn with_age_window(mut self, min_age: i32, max_age: i32) -> Self {
        self.plan.min_age = min_age;
        self.plan.max_age = max_age;
        self
    }

    pub fn with_sum_assured_limit(mut self, limit: Decimal) -> Self {
        self.plan.sum_assured_limit = limit;
        self
    }

    pub fn with_premium(mut self, premium: Decimal) -> Self {
        self.plan.premium = premium;
        self
    }

    /// Marks the plan withdrawn from the catalog
    pub fn deleted_at(mut self, at: DateTime<Utc>) -> Self {
        self.plan.deleted_at = Some(at);
        self
    }

    pub fn build(self) -> InsurancePlan {
        self.plan
    }

    /// Catalog insert for the PostgreSQL store; the id is assigned by the database
    pub fn build_new(self) -> NewPlan {
        NewPlan {
            name: self.plan.name,
            description: self.plan.description,
            min_age: self.plan.min_age,
            max_age: self.plan.max_age,
            sum_assured_limit: self.plan.sum_assured_limit,
            premium: self.plan.premium,
            status: self.plan.status,
        }
    }
}

/// Builder for beneficiaries stored directly in mock adapters
pub struct TestBeneficiaryBuilder {
    customer_id: CustomerId,
    plan_id: Option<PlanId>,
    percentage: Decimal,
}

impl TestBeneficiaryBuilder {
    pub fn new(customer_id: CustomerId) -> Self {
        Self {
            customer_id,
            plan_id: None,
            percentage: dec!(100),
        }
    }

    pub fn for_plan(mut self, plan_id: PlanId) -> Self {
        self.plan_id = Some(plan_id);
        self
    }

    pub fn with_percentage(mut self, percentage: Decimal) -> Self {
        self.percentage = percentage;
        self
    }

    pub fn build(self) -> Beneficiary {
        Beneficiary::from_new(
            self.customer_id,
            crate::fixtures::BeneficiaryFixtures::for_plan(self.plan_id, self.percentage),
        )
    }
}

/// Builder for purchase requests
pub struct PurchaseRequestBuilder {
    request: PurchaseRequest,
}

impl PurchaseRequestBuilder {
    /// Annual premiums paid by bank transfer
    pub fn new(customer_id: CustomerId, plan_id: PlanId) -> Self {
        Self {
            request: PurchaseRequest {
                customer_id,
                plan_id,
                payment_frequency: PaymentFrequency::Annual,
                payment_method: "bank_transfer".to_string(),
            },
        }
    }

    pub fn with_frequency(mut self, frequency: PaymentFrequency) -> Self {
        self.request.payment_frequency = frequency;
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.request.payment_method = method.into();
        self
    }

    pub fn build(self) -> PurchaseRequest {
        self.request
    }
}
