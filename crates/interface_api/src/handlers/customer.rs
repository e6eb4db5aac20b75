//! Customer handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::dto::customer::*;
use crate::dto::ValidatedJson;
use crate::handlers::parse_customer_id;
use crate::{error::ApiError, AppState};
use domain_customer::UpsertOutcome;

/// Onboards a new customer
pub async fn create_customer(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<CustomerResponse>), ApiError> {
    let customer = state.onboarding.create_customer(request.into()).await?;
    Ok((StatusCode::CREATED, Json(customer.into())))
}

/// Gets an active customer by ID
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let id = parse_customer_id(&id)?;
    let customer = state.onboarding.get_customer(id).await?;
    Ok(Json(customer.into()))
}

/// Soft-deletes a customer
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_customer_id(&id)?;
    state.onboarding.deactivate_customer(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Replaces the customer's beneficiaries
pub async fn replace_beneficiaries(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<ReplaceBeneficiariesRequest>,
) -> Result<Json<Vec<BeneficiaryResponse>>, ApiError> {
    let id = parse_customer_id(&id)?;
    let beneficiaries = request.beneficiaries.into_iter().map(Into::into).collect();
    let stored = state.onboarding.replace_beneficiaries(id, beneficiaries).await?;
    Ok(Json(stored.into_iter().map(Into::into).collect()))
}

/// Lists the customer's beneficiaries
pub async fn list_beneficiaries(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<BeneficiaryResponse>>, ApiError> {
    let id = parse_customer_id(&id)?;
    let beneficiaries = state.onboarding.list_beneficiaries(id).await?;
    Ok(Json(beneficiaries.into_iter().map(Into::into).collect()))
}

/// Creates or overwrites the customer's health declaration
///
/// Responds 201 when the declaration is new and 200 when it replaced one.
pub async fn upsert_health_declaration(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<HealthDeclarationRequest>,
) -> Result<(StatusCode, Json<HealthDeclarationResponse>), ApiError> {
    let id = parse_customer_id(&id)?;
    let (declaration, outcome) = state
        .onboarding
        .upsert_health_declaration(id, request.into())
        .await?;

    let status = match outcome {
        UpsertOutcome::Created => StatusCode::CREATED,
        UpsertOutcome::Updated => StatusCode::OK,
    };
    Ok((status, Json(HealthDeclarationResponse::new(declaration, Some(outcome)))))
}

/// Gets the customer's health declaration
pub async fn get_health_declaration(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HealthDeclarationResponse>, ApiError> {
    let id = parse_customer_id(&id)?;
    let declaration = state.onboarding.get_health_declaration(id).await?;
    Ok(Json(HealthDeclarationResponse::new(declaration, None)))
}
