use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    IdResponse,
};
use crate::{
    entities::crop::CropStatus,
    errors::ApiError,
    services::crops::{CropUpdate, NewCrop},
    AppState,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCropRequest {
    pub field_id: Uuid,
    #[validate(length(min = 1, message = "Crop name is required"))]
    pub name: String,
    #[serde(default)]
    pub status: Option<CropStatus>,
    pub planted_on: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCropRequest {
    pub name: Option<String>,
    pub status: Option<CropStatus>,
    pub planted_on: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct CropListParams {
    pub field_id: Option<Uuid>,
}

async fn create_crop(
    State(state): State<AppState>,
    Json(payload): Json<CreateCropRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let id = state
        .services
        .crops
        .create_crop(NewCrop {
            field_id: payload.field_id,
            name: payload.name,
            status: payload.status.unwrap_or(CropStatus::Active),
            planted_on: payload.planted_on,
        })
        .await
        .map_err(map_service_error)?;
    Ok(created_response(IdResponse { id }))
}

async fn get_crop(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let crop = state
        .services
        .crops
        .get_crop(id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Crop {} not found", id)))?;
    Ok(success_response(crop))
}

async fn list_crops(
    State(state): State<AppState>,
    Query(params): Query<CropListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let crops = state
        .services
        .crops
        .list_crops(params.field_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(crops))
}

async fn update_crop(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCropRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    state
        .services
        .crops
        .update_crop(
            id,
            CropUpdate {
                name: payload.name,
                status: payload.status,
                planted_on: payload.planted_on,
            },
        )
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

async fn delete_crop(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .crops
        .delete_crop(id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_crops).post(create_crop))
        .route("/:id", get(get_crop).put(update_crop).delete(delete_crop))
}
