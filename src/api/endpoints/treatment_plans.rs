//! Treatment plan endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository;
use crate::models::{NewProgressEntry, TreatmentPlan, TreatmentPlanDraft};

/// `GET /api/treatment-plans`
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<TreatmentPlan>>, ApiError> {
    let plans = repository::list_treatment_plans(&ctx.store)?;
    Ok(Json(plans))
}

/// `GET /api/treatment-plans/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<TreatmentPlan>, ApiError> {
    let plan = repository::get_treatment_plan(&ctx.store, &id)?;
    Ok(Json(plan))
}

/// `POST /api/treatment-plans`: prices are derived when the draft omits them.
pub async fn create(
    State(ctx): State<ApiContext>,
    payload: Result<Json<TreatmentPlanDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<TreatmentPlan>), ApiError> {
    let Json(draft) = payload?;
    let plan = repository::create_treatment_plan(&ctx.store, draft)?;
    Ok((StatusCode::CREATED, Json(plan)))
}

/// `PUT /api/treatment-plans/:id`
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    payload: Result<Json<TreatmentPlanDraft>, JsonRejection>,
) -> Result<Json<TreatmentPlan>, ApiError> {
    let Json(draft) = payload?;
    let plan = repository::update_treatment_plan(&ctx.store, &id, draft)?;
    Ok(Json(plan))
}

/// `POST /api/treatment-plans/:id/progress`: returns the whole plan with
/// the new entry last.
pub async fn add_progress(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    payload: Result<Json<NewProgressEntry>, JsonRejection>,
) -> Result<Json<TreatmentPlan>, ApiError> {
    let Json(entry) = payload?;
    let plan = repository::add_progress_entry(&ctx.store, &id, entry)?;
    tracing::debug!(id = %id, entries = plan.progress_tracking.len(), "Progress recorded");
    Ok(Json(plan))
}
