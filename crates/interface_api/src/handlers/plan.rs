//! Plan handlers

use axum::{
    extract::{Query, State},
    Json,
};

use crate::dto::plan::{PlanQuery, PlanResponse};
use crate::{error::ApiError, AppState};

/// Lists plans the applicant is eligible for
pub async fn list_plans(
    State(state): State<AppState>,
    Query(query): Query<PlanQuery>,
) -> Result<Json<Vec<PlanResponse>>, ApiError> {
    let plans = state.catalog.list_plans(query.to_filter()).await?;
    Ok(Json(plans.into_iter().map(Into::into).collect()))
}
