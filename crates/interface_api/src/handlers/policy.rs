//! Policy handlers

use axum::{extract::State, http::StatusCode, Json};

use core_kernel::PlanId;
use domain_policy::PurchaseRequest;

use crate::dto::policy::{PolicyResponse, PurchasePolicyRequest};
use crate::dto::ValidatedJson;
use crate::handlers::parse_customer_id;
use crate::{error::ApiError, AppState};

/// Purchases a plan, issuing a pending policy
pub async fn purchase_policy(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<PurchasePolicyRequest>,
) -> Result<(StatusCode, Json<PolicyResponse>), ApiError> {
    let purchase = PurchaseRequest {
        customer_id: parse_customer_id(&request.customer_id)?,
        plan_id: PlanId::new(request.plan_id),
        payment_frequency: request.payment_frequency,
        payment_method: request.payment_method,
    };

    let policy = state.issuance.purchase(purchase).await?;
    Ok((StatusCode::CREATED, Json(policy.into())))
}
