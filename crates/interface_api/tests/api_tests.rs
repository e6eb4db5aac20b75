//! HTTP boundary tests against the in-memory adapters

use std::sync::Arc;

use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use core_kernel::CustomerId;
use domain_customer::MockCustomerPort;
use domain_policy::MockPolicyStore;
use interface_api::dto::customer::{BeneficiaryResponse, CustomerResponse, HealthDeclarationResponse};
use interface_api::dto::plan::PlanResponse;
use interface_api::dto::policy::PolicyResponse;
use interface_api::error::ErrorResponse;
use interface_api::handlers::health::HealthResponse;
use interface_api::{create_router, AppState};
use test_utils::{PlanFixtures, TestBeneficiaryBuilder, TestCustomerBuilder, TestPlanBuilder};

struct TestApp {
    server: TestServer,
    customers: MockCustomerPort,
    store: MockPolicyStore,
}

fn test_app() -> TestApp {
    let customers = MockCustomerPort::new();
    let store = MockPolicyStore::new();
    let state = AppState::new(Arc::new(customers.clone()), Arc::new(store.clone()));
    let server = TestServer::new(create_router(state)).unwrap();
    TestApp { server, customers, store }
}

fn customer_body(email: &str, phone: &str, age: i32) -> Value {
    json!({
        "first_name": "Ada",
        "last_name": "Lovelace",
        "birth_date": null,
        "age": age,
        "gender": "Female",
        "email": email,
        "phone": phone,
    })
}

fn health_body(blood_group: &str) -> Value {
    json!({
        "height": "170.0",
        "weight": "65.5",
        "blood_group": blood_group,
        "has_chronic_disease": false,
        "has_been_hospitalized_last_year": false,
        "smoking_status": "never",
    })
}

async fn create_customer(app: &TestApp, email: &str, phone: &str) -> CustomerResponse {
    let response = app
        .server
        .post("/api/v1/customers")
        .json(&customer_body(email, phone, 30))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<CustomerResponse>()
}

mod health {
    use super::*;

    #[tokio::test]
    async fn test_liveness() {
        let app = test_app();

        let response = app.server.get("/health").await;

        response.assert_status_ok();
        assert_eq!(response.json::<HealthResponse>().status, "healthy");
    }

    #[tokio::test]
    async fn test_readiness_reports_both_adapters() {
        let app = test_app();

        let response = app.server.get("/health/ready").await;

        response.assert_status_ok();
        let body = response.json::<HealthResponse>();
        assert_eq!(body.status, "ready");
        assert_eq!(body.checks.len(), 2);
    }

    #[tokio::test]
    async fn test_request_id_is_returned() {
        let app = test_app();

        let response = app.server.get("/health").await;

        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_caller_request_id_is_echoed() {
        let app = test_app();

        let response = app
            .server
            .get("/api/v1/plans")
            .add_header(
                HeaderName::from_static("x-request-id"),
                HeaderValue::from_static("req-42"),
            )
            .await;

        response.assert_status_ok();
        assert_eq!(response.headers()["x-request-id"], "req-42");
    }

    #[tokio::test]
    async fn test_cors_headers_on_api_routes() {
        let app = test_app();

        let response = app
            .server
            .get("/api/v1/plans")
            .add_header(header::ORIGIN, HeaderValue::from_static("https://portal.example.com"))
            .await;

        response.assert_status_ok();
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert!(response.headers().contains_key("x-request-id"));
    }
}

mod customers {
    use super::*;

    #[tokio::test]
    async fn test_create_customer() {
        let app = test_app();

        let created = create_customer(&app, "ada@example.com", "0811111111").await;

        assert!(created.customer_id.starts_with("CUS-"));
        assert_eq!(created.email, "ada@example.com");
        assert_eq!(app.customers.all_customers().await.len(), 1);
    }

    #[tokio::test]
    async fn test_underage_customer_is_unprocessable() {
        let app = test_app();

        let response = app
            .server
            .post("/api/v1/customers")
            .json(&customer_body("kid@example.com", "0822222222", 17))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.json::<ErrorResponse>().error, "validation_error");
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let app = test_app();
        create_customer(&app, "dup@example.com", "0833333333").await;

        let response = app
            .server
            .post("/api/v1/customers")
            .json(&customer_body("dup@example.com", "0844444444", 40))
            .await;

        response.assert_status(StatusCode::CONFLICT);
        assert_eq!(response.json::<ErrorResponse>().error, "conflict");
    }

    #[tokio::test]
    async fn test_malformed_email_fails_field_validation() {
        let app = test_app();

        let response = app
            .server
            .post("/api/v1/customers")
            .json(&customer_body("not-an-email", "0855555555", 30))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body = response.json::<ErrorResponse>();
        let details = body.details.unwrap_or_default();
        assert!(details.iter().any(|d| d.starts_with("email")));
    }

    #[tokio::test]
    async fn test_missing_field_is_bad_request() {
        let app = test_app();

        let response = app
            .server
            .post("/api/v1/customers")
            .json(&json!({ "first_name": "Ada" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_and_delete_customer() {
        let app = test_app();
        let created = create_customer(&app, "gone@example.com", "0866666666").await;
        let path = format!("/api/v1/customers/{}", created.customer_id);

        app.server.get(&path).await.assert_status_ok();
        app.server.delete(&path).await.assert_status(StatusCode::NO_CONTENT);
        app.server.get(&path).await.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_customer_is_not_found() {
        let app = test_app();

        let response = app
            .server
            .get(&format!("/api/v1/customers/{}", CustomerId::new()))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<ErrorResponse>().message, "customer not found");
    }

    #[tokio::test]
    async fn test_invalid_customer_id_is_bad_request() {
        let app = test_app();

        app.server
            .get("/api/v1/customers/not-a-uuid")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}

mod beneficiaries {
    use super::*;

    fn beneficiary(name: &str, percentage: &str) -> Value {
        json!({
            "plan_id": 1,
            "first_name": name,
            "last_name": "Doe",
            "relationship": "sibling",
            "percentage": percentage,
        })
    }

    #[tokio::test]
    async fn test_replace_removes_previous_set() {
        let app = test_app();
        let created = create_customer(&app, "ben@example.com", "0877777777").await;
        let path = format!("/api/v1/customers/{}/beneficiaries", created.customer_id);

        app.server
            .put(&path)
            .json(&json!({ "beneficiaries": [beneficiary("Ann", "60"), beneficiary("Bob", "40")] }))
            .await
            .assert_status_ok();
        app.server
            .put(&path)
            .json(&json!({ "beneficiaries": [beneficiary("Cid", "100")] }))
            .await
            .assert_status_ok();

        let listed = app.server.get(&path).await.json::<Vec<BeneficiaryResponse>>();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].first_name, "Cid");
        assert_eq!(listed[0].plan_id, Some(1));
        assert!(listed[0].policy_number.is_none());
    }

    #[tokio::test]
    async fn test_percentage_over_hundred_is_unprocessable() {
        let app = test_app();
        let created = create_customer(&app, "pct@example.com", "0888888888").await;

        let response = app
            .server
            .put(&format!("/api/v1/customers/{}/beneficiaries", created.customer_id))
            .json(&json!({ "beneficiaries": [beneficiary("Ann", "120")] }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_nested_field_errors_are_reported() {
        let app = test_app();
        let created = create_customer(&app, "nest@example.com", "0899999999").await;

        let response = app
            .server
            .put(&format!("/api/v1/customers/{}/beneficiaries", created.customer_id))
            .json(&json!({ "beneficiaries": [beneficiary("", "50")] }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let details = response.json::<ErrorResponse>().details.unwrap_or_default();
        assert!(details.iter().any(|d| d.contains("first_name")));
    }

    #[tokio::test]
    async fn test_unknown_customer_is_not_found() {
        let app = test_app();

        let response = app
            .server
            .put(&format!("/api/v1/customers/{}/beneficiaries", CustomerId::new()))
            .json(&json!({ "beneficiaries": [beneficiary("Ann", "100")] }))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }
}

mod health_declarations {
    use super::*;

    #[tokio::test]
    async fn test_upsert_creates_then_overwrites() {
        let app = test_app();
        let created = create_customer(&app, "hd@example.com", "0712345678").await;
        let path = format!("/api/v1/customers/{}/health", created.customer_id);

        let first = app.server.put(&path).json(&health_body("A+")).await;
        first.assert_status(StatusCode::CREATED);
        let first = first.json::<HealthDeclarationResponse>();

        let second = app.server.put(&path).json(&health_body("B-")).await;
        second.assert_status_ok();
        let second = second.json::<HealthDeclarationResponse>();

        assert_eq!(first.declaration_id, second.declaration_id);
        let fetched = app.server.get(&path).await.json::<HealthDeclarationResponse>();
        assert_eq!(fetched.details.blood_group, "B-");
        assert!(fetched.outcome.is_none());
    }

    #[tokio::test]
    async fn test_missing_declaration_is_not_found() {
        let app = test_app();
        let created = create_customer(&app, "nohd@example.com", "0723456789").await;

        app.server
            .get(&format!("/api/v1/customers/{}/health", created.customer_id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_empty_blood_group_is_unprocessable() {
        let app = test_app();
        let created = create_customer(&app, "blood@example.com", "0734567890").await;

        app.server
            .put(&format!("/api/v1/customers/{}/health", created.customer_id))
            .json(&health_body(""))
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_oversized_height_is_unprocessable() {
        let app = test_app();
        let created = create_customer(&app, "tall@example.com", "0745678901").await;
        let mut body = health_body("O");
        body["height"] = json!("1000.5");

        let response = app
            .server
            .put(&format!("/api/v1/customers/{}/health", created.customer_id))
            .json(&body)
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let error = response.json::<ErrorResponse>();
        assert!(error.message.contains("height must be less than 1000"));
    }
}

mod plans {
    use super::*;

    async fn seeded_app() -> TestApp {
        let app = test_app();
        app.store.add_plan(PlanFixtures::term_life(1)).await;
        app.store.add_plan(PlanFixtures::health_plan(2)).await;
        app.store.add_plan(PlanFixtures::senior_savings(3)).await;
        app
    }

    fn ids(plans: &[PlanResponse]) -> Vec<i64> {
        plans.iter().map(|p| p.plan_id).collect()
    }

    #[tokio::test]
    async fn test_lists_all_plans_without_filters() {
        let app = seeded_app().await;

        let plans = app.server.get("/api/v1/plans").await.json::<Vec<PlanResponse>>();

        assert_eq!(ids(&plans), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_filters_by_age_and_sum() {
        let app = seeded_app().await;

        let plans = app
            .server
            .get("/api/v1/plans")
            .add_query_param("age", "55")
            .add_query_param("sum_assured", "600000")
            .await
            .json::<Vec<PlanResponse>>();

        assert_eq!(ids(&plans), vec![2, 3]);
    }

    #[tokio::test]
    async fn test_invalid_parameters_are_ignored() {
        let app = seeded_app().await;

        let response = app
            .server
            .get("/api/v1/plans")
            .add_query_param("age", "abc")
            .add_query_param("sum_assured", "-5")
            .await;

        response.assert_status_ok();
        assert_eq!(ids(&response.json::<Vec<PlanResponse>>()), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_no_match_is_empty_list() {
        let app = seeded_app().await;

        let response = app.server.get("/api/v1/plans").add_query_param("age", "99").await;

        response.assert_status_ok();
        assert!(response.json::<Vec<PlanResponse>>().is_empty());
    }
}

mod purchase {
    use super::*;

    fn purchase_body(customer_id: &str, plan_id: i64) -> Value {
        json!({
            "customer_id": customer_id,
            "plan_id": plan_id,
            "payment_frequency": "monthly",
            "payment_method": "credit_card",
        })
    }

    #[tokio::test]
    async fn test_purchase_issues_pending_policy() {
        let app = test_app();
        let customer = TestCustomerBuilder::new().build();
        let plan = TestPlanBuilder::new(5).with_premium(dec!(1500)).build();
        app.store.add_customer(customer.clone()).await;
        app.store.add_plan(plan.clone()).await;
        app.store
            .add_beneficiary(TestBeneficiaryBuilder::new(customer.id).for_plan(plan.id).build())
            .await;

        let response = app
            .server
            .post("/api/v1/policies/purchase")
            .json(&purchase_body(&customer.id.to_string(), 5))
            .await;

        response.assert_status(StatusCode::CREATED);
        let policy = response.json::<PolicyResponse>();
        assert!(policy.policy_number.starts_with("P5-"));
        assert_eq!(policy.premium_amount, dec!(1500));
        assert_eq!(policy.sum_assured, plan.sum_assured_limit);
        assert_eq!(policy.status, domain_policy::PolicyStatus::Pending);

        let linked = app.store.beneficiaries().await;
        assert_eq!(linked[0].policy_number.as_deref(), Some(policy.policy_number.as_str()));
    }

    #[tokio::test]
    async fn test_second_purchase_conflicts() {
        let app = test_app();
        let customer = TestCustomerBuilder::new().build();
        app.store.add_customer(customer.clone()).await;
        app.store.add_plan(PlanFixtures::term_life(1)).await;
        let body = purchase_body(&customer.id.to_string(), 1);

        app.server.post("/api/v1/policies/purchase").json(&body).await.assert_status(StatusCode::CREATED);
        let response = app.server.post("/api/v1/policies/purchase").json(&body).await;

        response.assert_status(StatusCode::CONFLICT);
        assert_eq!(response.json::<ErrorResponse>().message, "duplicate active policy");
        assert_eq!(app.store.policies().await.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_plan_is_not_found() {
        let app = test_app();
        let customer = TestCustomerBuilder::new().build();
        app.store.add_customer(customer.clone()).await;

        let response = app
            .server
            .post("/api/v1/policies/purchase")
            .json(&purchase_body(&customer.id.to_string(), 42))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<ErrorResponse>().message, "plan not found");
    }

    #[tokio::test]
    async fn test_deleted_customer_is_not_found() {
        let app = test_app();
        let customer = TestCustomerBuilder::new().deleted().build();
        app.store.add_customer(customer.clone()).await;
        app.store.add_plan(PlanFixtures::term_life(1)).await;

        let response = app
            .server
            .post("/api/v1/policies/purchase")
            .json(&purchase_body(&customer.id.to_string(), 1))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<ErrorResponse>().message, "customer not found");
    }

    #[tokio::test]
    async fn test_age_outside_plan_window_is_unprocessable() {
        let app = test_app();
        let customer = TestCustomerBuilder::new().with_age(25).build();
        app.store.add_customer(customer.clone()).await;
        app.store.add_plan(PlanFixtures::senior_savings(3)).await;

        app.server
            .post("/api/v1/policies/purchase")
            .json(&purchase_body(&customer.id.to_string(), 3))
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_store_failure_hides_details() {
        let app = test_app();
        let customer = TestCustomerBuilder::new().build();
        app.store.add_customer(customer.clone()).await;
        app.store.add_plan(PlanFixtures::term_life(1)).await;
        app.store.inject_failure(domain_policy::FailurePoint::Commit).await;

        let response = app
            .server
            .post("/api/v1/policies/purchase")
            .json(&purchase_body(&customer.id.to_string(), 1))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.json::<ErrorResponse>().message, "An internal error occurred");
        assert!(app.store.policies().await.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_customer_id_is_bad_request() {
        let app = test_app();

        app.server
            .post("/api/v1/policies/purchase")
            .json(&purchase_body("CUS-garbage", 1))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_frequency_is_bad_request() {
        let app = test_app();
        let mut body = purchase_body(&CustomerId::new().to_string(), 1);
        body["payment_frequency"] = json!("fortnightly");

        app.server
            .post("/api/v1/policies/purchase")
            .json(&body)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_plan_id_must_be_positive() {
        let app = test_app();

        app.server
            .post("/api/v1/policies/purchase")
            .json(&purchase_body(&CustomerId::new().to_string(), 0))
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }
}
