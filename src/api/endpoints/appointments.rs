//! Appointment endpoints.
//!
//! - `GET  /api/appointments`: all appointments, insertion order
//! - `GET  /api/appointments/:id`
//! - `POST /api/appointments`: create from a partial record
//! - `PUT  /api/appointments/:id`: merge a partial record
//! - `PUT  /api/appointments/:id/cancel`

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository;
use crate::models::{Appointment, AppointmentDraft};

pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<Appointment>>, ApiError> {
    let appointments = repository::list_appointments(&ctx.store)?;
    Ok(Json(appointments))
}

pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<Appointment>, ApiError> {
    let appointment = repository::get_appointment(&ctx.store, &id)?;
    Ok(Json(appointment))
}

pub async fn create(
    State(ctx): State<ApiContext>,
    payload: Result<Json<AppointmentDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Appointment>), ApiError> {
    let Json(draft) = payload?;
    let appointment = repository::create_appointment(&ctx.store, draft)?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    payload: Result<Json<AppointmentDraft>, JsonRejection>,
) -> Result<Json<Appointment>, ApiError> {
    let Json(draft) = payload?;
    let appointment = repository::update_appointment(&ctx.store, &id, draft)?;
    Ok(Json(appointment))
}

/// Any request body is ignored.
pub async fn cancel(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<Appointment>, ApiError> {
    let appointment = repository::cancel_appointment(&ctx.store, &id)?;
    Ok(Json(appointment))
}
