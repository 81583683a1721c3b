use axum::{
    extract::{Path, Query, State},
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
    entities::{inventory_category, inventory_item, inventory_log::InventoryAction},
    errors::ApiError,
    reporting::{stock_status, StockStatus},
    services::inventory::{InventoryItemUpdate, NewInventoryItem},
    AppState,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateItemRequest {
    #[validate(length(min = 1, message = "Item name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "SKU is required"))]
    pub sku: String,
    pub category_id: Uuid,
    pub quantity: Decimal,
    pub reorder_level: Decimal,
    pub unit_cost: Decimal,
    #[validate(length(min = 1, message = "Unit is required"))]
    pub unit: String,
    pub expires_on: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub reorder_level: Option<Decimal>,
    pub unit_cost: Option<Decimal>,
    #[serde(default, deserialize_with = "super::common::double_option")]
    pub expires_on: Option<Option<NaiveDate>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct MovementRequest {
    pub action: InventoryAction,
    pub quantity: Decimal,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, message = "Category name is required"))]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ItemListParams {
    pub category_id: Option<Uuid>,
}

/// Item row as returned to clients, with its category name and the
/// stock status derived at read time.
#[derive(Debug, Serialize)]
pub struct ItemView {
    #[serde(flatten)]
    pub item: inventory_item::Model,
    pub category_name: Option<String>,
    pub stock: StockStatus,
}

fn item_view(
    (item, category): (inventory_item::Model, Option<inventory_category::Model>),
    today: NaiveDate,
) -> ItemView {
    ItemView {
        stock: stock_status(item.quantity, item.reorder_level, item.expires_on, today),
        category_name: category.map(|c| c.name),
        item,
    }
}

async fn create_item(
    State(state): State<AppState>,
    Json(payload): Json<CreateItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let id = state
        .services
        .inventory
        .create_item(NewInventoryItem {
            name: payload.name,
            sku: payload.sku,
            category_id: payload.category_id,
            quantity: payload.quantity,
            reorder_level: payload.reorder_level,
            unit_cost: payload.unit_cost,
            unit: payload.unit,
            expires_on: payload.expires_on,
        })
        .await
        .map_err(map_service_error)?;
    Ok(created_response(IdResponse { id }))
}

async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state
        .services
        .inventory
        .get_item(id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Inventory item {} not found", id)))?;
    Ok(success_response(item))
}

async fn list_items(
    State(state): State<AppState>,
    Query(params): Query<ItemListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let today = Utc::now().date_naive();
    let items = state
        .services
        .inventory
        .list_items(params.category_id)
        .await
        .map_err(map_service_error)?;
    let views: Vec<_> = items.into_iter().map(|pair| item_view(pair, today)).collect();
    Ok(success_response(views))
}

async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    state
        .services
        .inventory
        .update_item(
            id,
            InventoryItemUpdate {
                name: payload.name,
                reorder_level: payload.reorder_level,
                unit_cost: payload.unit_cost,
                expires_on: payload.expires_on,
            },
        )
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

async fn retire_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .inventory
        .retire_item(id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

async fn record_movement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<MovementRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let log_id = state
        .services
        .inventory
        .record_movement(id, payload.action, payload.quantity)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(IdResponse { id: log_id }))
}

async fn list_categories(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let categories = state
        .services
        .inventory
        .list_categories()
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
        .inventory
        .create_category(payload.name)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(IdResponse { id }))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route(
            "/items/:id",
            get(get_item).put(update_item).delete(retire_item),
        )
        .route("/items/:id/movements", axum::routing::post(record_movement))
        .route("/categories", get(list_categories).post(create_category))
}
