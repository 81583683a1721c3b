use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    IdResponse,
};
use crate::{
    entities::{crop, fertilizer_schedule, irrigation_schedule},
    errors::ApiError,
    reporting::{due_status, DueStatus},
    services::schedules::{LogEvent, NewSchedule, ScheduleUpdate},
    AppState,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateScheduleRequest {
    pub crop_id: Uuid,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub rate: Decimal,
    pub last_event_on: Option<NaiveDate>,
    pub next_event_on: NaiveDate,
}

impl CreateScheduleRequest {
    fn into_input(self) -> NewSchedule {
        NewSchedule {
            crop_id: self.crop_id,
            description: self.description,
            rate: self.rate,
            last_event_on: self.last_event_on,
            next_event_on: self.next_event_on,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateScheduleRequest {
    pub description: Option<String>,
    pub rate: Option<Decimal>,
    pub next_event_on: Option<NaiveDate>,
}

impl UpdateScheduleRequest {
    fn into_update(self) -> ScheduleUpdate {
        ScheduleUpdate {
            description: self.description,
            rate: self.rate,
            next_event_on: self.next_event_on,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct LogEventRequest {
    pub event_on: NaiveDate,
    pub amount_used: Decimal,
    pub notes: Option<String>,
    pub next_event_on: NaiveDate,
}

impl LogEventRequest {
    fn into_event(self) -> LogEvent {
        LogEvent {
            event_on: self.event_on,
            amount_used: self.amount_used,
            notes: self.notes,
            next_event_on: self.next_event_on,
        }
    }
}

/// Schedule row as returned to clients, with the due band derived at
/// read time.
#[derive(Debug, Serialize)]
pub struct ScheduleView<S: Serialize> {
    #[serde(flatten)]
    pub schedule: S,
    pub crop_name: Option<String>,
    pub due: DueStatus,
}

fn fertilizer_view(
    (schedule, crop): (fertilizer_schedule::Model, Option<crop::Model>),
    today: NaiveDate,
) -> ScheduleView<fertilizer_schedule::Model> {
    ScheduleView {
        due: due_status(schedule.next_application_on, today),
        crop_name: crop.map(|c| c.name),
        schedule,
    }
}

fn irrigation_view(
    (schedule, crop): (irrigation_schedule::Model, Option<crop::Model>),
    today: NaiveDate,
) -> ScheduleView<irrigation_schedule::Model> {
    ScheduleView {
        due: due_status(schedule.next_event_on, today),
        crop_name: crop.map(|c| c.name),
        schedule,
    }
}

// ---- fertilizer ----

async fn create_fertilizer(
    State(state): State<AppState>,
    Json(payload): Json<CreateScheduleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let id = state
        .services
        .schedules
        .create_fertilizer_schedule(payload.into_input())
        .await
        .map_err(map_service_error)?;
    Ok(created_response(IdResponse { id }))
}

async fn list_fertilizer(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let today = Utc::now().date_naive();
    let schedules = state
        .services
        .schedules
        .list_fertilizer_schedules()
        .await
        .map_err(map_service_error)?;
    let views: Vec<_> = schedules
        .into_iter()
        .map(|pair| fertilizer_view(pair, today))
        .collect();
    Ok(success_response(views))
}

async fn get_fertilizer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let schedule = state
        .services
        .schedules
        .get_fertilizer_schedule(id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Fertilizer schedule {} not found", id)))?;
    Ok(success_response(schedule))
}

async fn update_fertilizer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateScheduleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    state
        .services
        .schedules
        .update_fertilizer_schedule(id, payload.into_update())
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

async fn delete_fertilizer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .schedules
        .delete_fertilizer_schedule(id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

async fn log_fertilizer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<LogEventRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let log_id = state
        .services
        .schedules
        .log_fertilizer_application(id, payload.into_event())
        .await
        .map_err(map_service_error)?;
    Ok(created_response(IdResponse { id: log_id }))
}

async fn list_fertilizer_logs(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let logs = state
        .services
        .schedules
        .list_fertilizer_logs(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(logs))
}

// ---- irrigation ----

async fn create_irrigation(
    State(state): State<AppState>,
    Json(payload): Json<CreateScheduleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let id = state
        .services
        .schedules
        .create_irrigation_schedule(payload.into_input())
        .await
        .map_err(map_service_error)?;
    Ok(created_response(IdResponse { id }))
}

async fn list_irrigation(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let today = Utc::now().date_naive();
    let schedules = state
        .services
        .schedules
        .list_irrigation_schedules()
        .await
        .map_err(map_service_error)?;
    let views: Vec<_> = schedules
        .into_iter()
        .map(|pair| irrigation_view(pair, today))
        .collect();
    Ok(success_response(views))
}

async fn get_irrigation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let schedule = state
        .services
        .schedules
        .get_irrigation_schedule(id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Irrigation schedule {} not found", id)))?;
    Ok(success_response(schedule))
}

async fn update_irrigation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateScheduleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    state
        .services
        .schedules
        .update_irrigation_schedule(id, payload.into_update())
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

async fn delete_irrigation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .schedules
        .delete_irrigation_schedule(id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

async fn log_irrigation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<LogEventRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let log_id = state
        .services
        .schedules
        .log_irrigation_event(id, payload.into_event())
        .await
        .map_err(map_service_error)?;
    Ok(created_response(IdResponse { id: log_id }))
}

async fn list_irrigation_logs(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let logs = state
        .services
        .schedules
        .list_irrigation_logs(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(logs))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/fertilizer", get(list_fertilizer).post(create_fertilizer))
        .route(
            "/fertilizer/:id",
            get(get_fertilizer)
                .put(update_fertilizer)
                .delete(delete_fertilizer),
        )
        .route(
            "/fertilizer/:id/logs",
            get(list_fertilizer_logs).post(log_fertilizer),
        )
        .route("/irrigation", get(list_irrigation).post(create_irrigation))
        .route(
            "/irrigation/:id",
            get(get_irrigation)
                .put(update_irrigation)
                .delete(delete_irrigation),
        )
        .route(
            "/irrigation/:id/logs",
            get(list_irrigation_logs).post(log_irrigation),
        )
}
