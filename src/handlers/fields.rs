use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    IdResponse, PaginatedResponse, PaginationParams,
};
use crate::{
    errors::ApiError,
    services::fields::{FieldUpdate, NewField},
    AppState,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateFieldRequest {
    #[validate(length(min = 1, message = "Field name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    pub area_acres: Decimal,
    #[validate(length(min = 1, message = "Soil type is required"))]
    pub soil_type: String,
    pub last_crop: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateFieldRequest {
    pub name: Option<String>,
    pub location: Option<String>,
    pub area_acres: Option<Decimal>,
    pub soil_type: Option<String>,
    pub last_crop: Option<String>,
    pub notes: Option<String>,
}

async fn create_field(
    State(state): State<AppState>,
    Json(payload): Json<CreateFieldRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let id = state
        .services
        .fields
        .create_field(NewField {
            name: payload.name,
            location: payload.location,
            area_acres: payload.area_acres,
            soil_type: payload.soil_type,
            last_crop: payload.last_crop,
            notes: payload.notes,
        })
        .await
        .map_err(map_service_error)?;
    Ok(created_response(IdResponse { id }))
}

async fn get_field(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let field = state
        .services
        .fields
        .get_field(id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Field {} not found", id)))?;
    Ok(success_response(field))
}

async fn list_fields(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let fields = state
        .services
        .fields
        .list_fields(pagination.limit(), pagination.offset())
        .await
        .map_err(map_service_error)?;
    let total = state
        .services
        .fields
        .count_fields()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(PaginatedResponse::new(
        fields,
        pagination.page,
        pagination.limit(),
        total,
    )))
}

async fn update_field(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateFieldRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    state
        .services
        .fields
        .update_field(
            id,
            FieldUpdate {
                name: payload.name,
                location: payload.location,
                area_acres: payload.area_acres,
                soil_type: payload.soil_type,
                last_crop: payload.last_crop,
                notes: payload.notes,
            },
        )
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

async fn delete_field(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .fields
        .delete_field(id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_fields).post(create_field))
        .route(
            "/:id",
            get(get_field).put(update_field).delete(delete_field),
        )
}
