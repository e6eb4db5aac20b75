//! HTTP API Layer
//!
//! REST API of the policy issuance backend, built on Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for customers, plans and policies
//! - **Middleware**: Request ids, tracing, audit logging
//! - **DTOs**: Request/Response data transfer objects with validation rules
//! - **Error Handling**: Domain errors mapped to consistent JSON responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let app = create_router(AppState::from_pool(pool));
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;

use std::sync::Arc;

use axum::{
    http::HeaderName,
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use domain_customer::{CustomerPort, OnboardingService};
use domain_policy::{PlanCatalogService, PolicyIssuanceService, PolicyStore};
use infra_db::{DatabasePool, PostgresCustomerAdapter, PostgresPolicyStore};

use crate::handlers::{customer, health, plan, policy};
use crate::middleware::{audit_middleware, REQUEST_ID_HEADER};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub onboarding: OnboardingService,
    pub catalog: PlanCatalogService,
    pub issuance: PolicyIssuanceService,
    pub customer_port: Arc<dyn CustomerPort>,
    pub policy_store: Arc<dyn PolicyStore>,
}

impl AppState {
    /// Builds the services on top of the given store adapters
    pub fn new(customer_port: Arc<dyn CustomerPort>, policy_store: Arc<dyn PolicyStore>) -> Self {
        Self {
            onboarding: OnboardingService::new(customer_port.clone()),
            catalog: PlanCatalogService::new(policy_store.clone()),
            issuance: PolicyIssuanceService::new(policy_store.clone()),
            customer_port,
            policy_store,
        }
    }

    /// Wires the PostgreSQL adapters
    pub fn from_pool(pool: DatabasePool) -> Self {
        Self::new(
            Arc::new(PostgresCustomerAdapter::new(pool.clone())),
            Arc::new(PostgresPolicyStore::new(pool)),
        )
    }
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    // Public routes
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Customer routes
    let customer_routes = Router::new()
        .route("/", post(customer::create_customer))
        .route("/:id", get(customer::get_customer).delete(customer::delete_customer))
        .route(
            "/:id/beneficiaries",
            put(customer::replace_beneficiaries).get(customer::list_beneficiaries),
        )
        .route(
            "/:id/health",
            put(customer::upsert_health_declaration).get(customer::get_health_declaration),
        );

    // Plan routes
    let plan_routes = Router::new().route("/", get(plan::list_plans));

    // Policy routes
    let policy_routes = Router::new().route("/purchase", post(policy::purchase_policy));

    let api_routes = Router::new()
        .nest("/customers", customer_routes)
        .nest("/plans", plan_routes)
        .nest("/policies", policy_routes)
        .layer(axum_middleware::from_fn(audit_middleware));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
