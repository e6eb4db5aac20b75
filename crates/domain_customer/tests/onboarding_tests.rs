//! Onboarding service tests
//!
//! Exercise the customer-side rules against the in-memory port:
//! - minimum age and field validation at creation
//! - uniqueness of email and phone
//! - beneficiary replacement semantics
//! - health declaration upsert semantics

use std::sync::Arc;

use core_kernel::{CustomerId, DomainError, PlanId};
use domain_customer::{
    CustomerPort, Gender, HealthDeclarationInput, MockCustomerPort, NewBeneficiary, NewCustomer,
    OnboardingService, UpsertOutcome,
};
use rust_decimal_macros::dec;

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn new_customer(email: &str, phone: &str, age: i32) -> NewCustomer {
    NewCustomer {
        first_name: "Pimchanok".to_string(),
        last_name: "Rattanakul".to_string(),
        birth_date: None,
        age,
        gender: Gender::Female,
        email: email.to_string(),
        phone: phone.to_string(),
    }
}

fn beneficiary(first_name: &str, plan: Option<i64>, percentage: rust_decimal::Decimal) -> NewBeneficiary {
    NewBeneficiary {
        plan_id: plan.map(PlanId::new),
        first_name: first_name.to_string(),
        last_name: "Rattanakul".to_string(),
        relationship: "Child".to_string(),
        percentage,
        email: None,
        phone: None,
    }
}

fn health(weight: rust_decimal::Decimal) -> HealthDeclarationInput {
    HealthDeclarationInput {
        height: dec!(165.50),
        weight,
        blood_group: "O".to_string(),
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

fn service() -> (OnboardingService, MockCustomerPort) {
    let port = MockCustomerPort::new();
    (OnboardingService::new(Arc::new(port.clone())), port)
}

// ============================================================================
// Customer creation
// ============================================================================

mod customer_creation {
    use super::*;

    #[tokio::test]
    async fn test_create_customer_persists_record() {
        let (service, port) = service();
        let customer = service
            .create_customer(new_customer("pim@example.com", "0810000001", 30))
            .await
            .unwrap();

        let stored = port.get_customer(customer.id).await.unwrap().unwrap();
        assert_eq!(stored.email, "pim@example.com");
        assert!(stored.is_active());
    }

    #[tokio::test]
    async fn test_underage_customer_is_rejected_and_not_stored() {
        let (service, port) = service();
        let err = service
            .create_customer(new_customer("young@example.com", "0810000002", 17))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert!(port.all_customers().await.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let (service, _) = service();
        service
            .create_customer(new_customer("same@example.com", "0810000003", 30))
            .await
            .unwrap();

        let err = service
            .create_customer(new_customer("same@example.com", "0810000004", 30))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_deactivate_then_lookup_is_not_found() {
        let (service, _) = service();
        let customer = service
            .create_customer(new_customer("gone@example.com", "0810000005", 50))
            .await
            .unwrap();

        service.deactivate_customer(customer.id).await.unwrap();

        assert_eq!(
            service.get_customer(customer.id).await.unwrap_err(),
            DomainError::not_found("customer")
        );
        assert_eq!(
            service.deactivate_customer(customer.id).await.unwrap_err(),
            DomainError::not_found("customer")
        );
    }
}

// ============================================================================
// Beneficiaries
// ============================================================================

mod beneficiaries {
    use super::*;

    #[tokio::test]
    async fn test_replace_removes_previous_set() {
        let (service, _) = service();
        let customer = service
            .create_customer(new_customer("ben@example.com", "0810000010", 45))
            .await
            .unwrap();

        service
            .replace_beneficiaries(
                customer.id,
                vec![beneficiary("First", Some(1), dec!(50)), beneficiary("Second", Some(1), dec!(50))],
            )
            .await
            .unwrap();
        service
            .replace_beneficiaries(customer.id, vec![beneficiary("Third", Some(2), dec!(100))])
            .await
            .unwrap();

        let listed = service.list_beneficiaries(customer.id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].first_name, "Third");
        assert_eq!(listed[0].plan_id, Some(PlanId::new(2)));
        assert!(!listed[0].is_linked_to_policy());
    }

    #[tokio::test]
    async fn test_shares_not_totalling_100_are_accepted() {
        let (service, _) = service();
        let customer = service
            .create_customer(new_customer("share@example.com", "0810000011", 45))
            .await
            .unwrap();

        let stored = service
            .replace_beneficiaries(customer.id, vec![beneficiary("Only", None, dec!(40))])
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[tokio::test]
    async fn test_share_above_100_is_validation_error() {
        let (service, _) = service();
        let customer = service
            .create_customer(new_customer("over@example.com", "0810000012", 45))
            .await
            .unwrap();

        let err = service
            .replace_beneficiaries(customer.id, vec![beneficiary("Greedy", None, dec!(100.01))])
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_share_with_three_decimals_is_rejected_and_not_stored() {
        let (service, port) = service();
        let customer = service
            .create_customer(new_customer("third@example.com", "0810000013", 45))
            .await
            .unwrap();

        let err = service
            .replace_beneficiaries(customer.id, vec![beneficiary("Third", None, dec!(33.333))])
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(ref m) if m.contains("decimal places")));
        assert!(port.list_beneficiaries(customer.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_returned_shares_match_listing() {
        let (service, _) = service();
        let customer = service
            .create_customer(new_customer("scale@example.com", "0810000014", 45))
            .await
            .unwrap();

        let returned = service
            .replace_beneficiaries(customer.id, vec![beneficiary("Tenth", None, dec!(33.3))])
            .await
            .unwrap();
        assert_eq!(returned[0].percentage.to_string(), "33.30");

        let listed = service.list_beneficiaries(customer.id).await.unwrap();
        assert_eq!(listed, returned);
    }

    #[tokio::test]
    async fn test_unknown_customer_is_not_found() {
        let (service, _) = service();
        let err = service
            .replace_beneficiaries(CustomerId::new(), vec![beneficiary("Orphan", None, dec!(100))])
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::not_found("customer"));
    }
}

// ============================================================================
// Health declarations
// ============================================================================

mod health_declarations {
    use super::*;

    #[tokio::test]
    async fn test_upsert_creates_then_updates_in_place() {
        let (service, _) = service();
        let customer = service
            .create_customer(new_customer("health@example.com", "0810000020", 33))
            .await
            .unwrap();

        let (first, outcome) = service
            .upsert_health_declaration(customer.id, health(dec!(60)))
            .await
            .unwrap();
        assert_eq!(outcome, UpsertOutcome::Created);

        let (second, outcome) = service
            .upsert_health_declaration(customer.id, health(dec!(62.5)))
            .await
            .unwrap();
        assert_eq!(outcome, UpsertOutcome::Updated);
        assert_eq!(second.id, first.id);
        assert_eq!(second.created_at, first.created_at);

        let stored = service.get_health_declaration(customer.id).await.unwrap();
        assert_eq!(stored.details.weight, dec!(62.5));
    }

    #[tokio::test]
    async fn test_upsert_for_unknown_customer_is_not_found() {
        let (service, _) = service();
        let err = service
            .upsert_health_declaration(CustomerId::new(), health(dec!(60)))
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::not_found("customer"));
    }

    #[tokio::test]
    async fn test_non_positive_weight_is_rejected() {
        let (service, _) = service();
        let customer = service
            .create_customer(new_customer("light@example.com", "0810000021", 33))
            .await
            .unwrap();

        let err = service
            .upsert_health_declaration(customer.id, health(dec!(0)))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_weight_beyond_storage_range_is_validation_error() {
        let (service, port) = service();
        let customer = service
            .create_customer(new_customer("heavy@example.com", "0810000022", 33))
            .await
            .unwrap();

        let err = service
            .upsert_health_declaration(customer.id, health(dec!(1000.5)))
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::validation("weight must be less than 1000"));
        assert!(port.get_health_declaration(customer.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_declaration_is_not_found() {
        let (service, _) = service();
        let customer = service
            .create_customer(new_customer("nohealth@example.com", "0810000022", 33))
            .await
            .unwrap();

        assert_eq!(
            service.get_health_declaration(customer.id).await.unwrap_err(),
            DomainError::not_found("health declaration")
        );
    }
}
