use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    IdResponse,
};
use crate::{
    entities::financial_record::RecordType,
    errors::ApiError,
    filters::{DateRangePreset, ReportFilterParams},
    services::financials::{FinancialRecordUpdate, NewFinancialRecord},
    AppState,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateRecordRequest {
    pub record_type: RecordType,
    pub category_id: Option<Uuid>,
    pub source: Option<String>,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub amount: Decimal,
    pub transacted_on: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRecordRequest {
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub transacted_on: Option<NaiveDate>,
    #[serde(default, deserialize_with = "super::common::double_option")]
    pub category_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "super::common::double_option")]
    pub notes: Option<Option<String>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, message = "Category name is required"))]
    pub name: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct RecordListParams {
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub range: Option<DateRangePreset>,
    pub record_type: Option<RecordType>,
}

impl RecordListParams {
    fn filter(&self) -> ReportFilterParams {
        ReportFilterParams {
            date_from: self.date_from.clone(),
            date_to: self.date_to.clone(),
            range: self.range,
            ..Default::default()
        }
    }
}

async fn create_record(
    State(state): State<AppState>,
    Json(payload): Json<CreateRecordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let id = state
        .services
        .financials
        .add_record(NewFinancialRecord {
            record_type: payload.record_type,
            category_id: payload.category_id,
            source: payload.source,
            description: payload.description,
            amount: payload.amount,
            transacted_on: payload.transacted_on,
            notes: payload.notes,
        })
        .await
        .map_err(map_service_error)?;
    Ok(created_response(IdResponse { id }))
}

async fn get_record(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state
        .services
        .financials
        .get_record(id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Financial record {} not found", id)))?;
    Ok(success_response(record))
}

async fn list_records(
    State(state): State<AppState>,
    Query(params): Query<RecordListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let today = Utc::now().date_naive();
    let filter = params.filter().resolve(DateRangePreset::ThisMonth, today);
    let records = state
        .services
        .financials
        .list_records(&filter.range, params.record_type)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(records))
}

async fn update_record(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRecordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    state
        .services
        .financials
        .update_record(
            id,
            FinancialRecordUpdate {
                description: payload.description,
                amount: payload.amount,
                transacted_on: payload.transacted_on,
                category_id: payload.category_id,
                notes: payload.notes,
            },
        )
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

async fn remove_record(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .financials
        .remove_record(id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

async fn list_categories(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let categories = state
        .services
        .financials
        .list_expense_categories()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(categories))
}

async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let id = state
        .services
        .financials
        .create_expense_category(payload.name)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(IdResponse { id }))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/records", get(list_records).post(create_record))
        .route(
            "/records/:id",
            get(get_record).put(update_record).delete(remove_record),
        )
        .route("/categories", get(list_categories).post(create_category))
}
