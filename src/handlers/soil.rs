use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    IdResponse,
};
use crate::{
    entities::soil_treatment::TreatmentType,
    errors::ApiError,
    reporting::PhEffectiveness,
    services::soil::{NewSoilTest, NewSoilTreatment},
    AppState,
};

#[derive(Debug, Deserialize, Validate)]
pub struct RecordTestRequest {
    pub field_id: Uuid,
    pub tested_on: NaiveDate,
    #[validate(range(min = 0.0, max = 14.0, message = "pH must be between 0 and 14"))]
    pub ph: f64,
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub moisture: f64,
    pub temperature: f64,
    pub organic_matter: f64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RecordTreatmentRequest {
    pub field_id: Uuid,
    pub treatment_type: TreatmentType,
    pub applied_on: NaiveDate,
    pub total_cost: Decimal,
    pub cost_per_acre: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct SoilListParams {
    pub field_id: Option<Uuid>,
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct EffectivenessView {
    pub treatment_id: Uuid,
    pub field_id: Uuid,
    pub treatment_type: TreatmentType,
    pub applied_on: NaiveDate,
    pub ph_before: Option<f64>,
    pub ph_after: Option<f64>,
    pub effectiveness: PhEffectiveness,
}

async fn record_test(
    State(state): State<AppState>,
    Json(payload): Json<RecordTestRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let id = state
        .services
        .soil
        .record_test(NewSoilTest {
            field_id: payload.field_id,
            tested_on: payload.tested_on,
            ph: payload.ph,
            nitrogen: payload.nitrogen,
            phosphorus: payload.phosphorus,
            potassium: payload.potassium,
            moisture: payload.moisture,
            temperature: payload.temperature,
            organic_matter: payload.organic_matter,
        })
        .await
        .map_err(map_service_error)?;
    Ok(created_response(IdResponse { id }))
}

async fn list_tests(
    State(state): State<AppState>,
    Query(params): Query<SoilListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let tests = state
        .services
        .soil
        .list_tests(params.field_id, params.limit)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(tests))
}

async fn delete_test(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .soil
        .delete_test(id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

async fn record_treatment(
    State(state): State<AppState>,
    Json(payload): Json<RecordTreatmentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let id = state
        .services
        .soil
        .record_treatment(NewSoilTreatment {
            field_id: payload.field_id,
            treatment_type: payload.treatment_type,
            applied_on: payload.applied_on,
            total_cost: payload.total_cost,
            cost_per_acre: payload.cost_per_acre,
        })
        .await
        .map_err(map_service_error)?;
    Ok(created_response(IdResponse { id }))
}

async fn list_treatments(
    State(state): State<AppState>,
    Query(params): Query<SoilListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let treatments = state
        .services
        .soil
        .list_treatments(params.field_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(treatments))
}

async fn treatment_effectiveness(
    State(state): State<AppState>,
    Query(params): Query<SoilListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let results = state
        .services
        .soil
        .treatment_effectiveness(params.field_id)
        .await
        .map_err(map_service_error)?;
    let views: Vec<EffectivenessView> = results
        .into_iter()
        .map(|r| EffectivenessView {
            treatment_id: r.treatment.id,
            field_id: r.treatment.field_id,
            treatment_type: r.treatment.treatment_type,
            applied_on: r.treatment.applied_on,
            ph_before: r.ph_before,
            ph_after: r.ph_after,
            effectiveness: r.effectiveness,
        })
        .collect();
    Ok(success_response(views))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tests", get(list_tests).post(record_test))
        .route("/tests/:id", axum::routing::delete(delete_test))
        .route("/treatments", get(list_treatments).post(record_treatment))
        .route("/treatments/effectiveness", get(treatment_effectiveness))
}
