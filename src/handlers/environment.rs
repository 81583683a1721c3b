use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::common::{
    map_service_error, no_content_response, success_response, validate_input, PaginatedResponse,
    PaginationParams,
};
use crate::{
    errors::ApiError,
    filters::{DateRangePreset, ReportFilterParams},
    AppState,
};

#[derive(Debug, Deserialize, Default)]
pub struct IssueListParams {
    pub field: Option<String>,
    pub status: Option<String>,
    pub severity: Option<String>,
    pub search: Option<String>,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    20
}

#[derive(Debug, Deserialize, Validate)]
pub struct StatusChangeRequest {
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,
    pub resolution_notes: Option<String>,
}

async fn list_issues(
    State(state): State<AppState>,
    Query(params): Query<IssueListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let today = Utc::now().date_naive();
    let filter = ReportFilterParams {
        field: params.field.clone(),
        status: params.status.clone(),
        severity: params.severity.clone(),
        search: params.search.clone(),
        ..Default::default()
    }
    .resolve(DateRangePreset::CurrentYear, today);

    let pagination = PaginationParams {
        page: params.page,
        per_page: params.per_page,
    };
    let (issues, total) = state
        .services
        .environment
        .list_issues(&filter, pagination.limit(), pagination.offset())
        .await
        .map_err(map_service_error)?;
    Ok(success_response(PaginatedResponse::new(
        issues,
        pagination.page,
        pagination.limit(),
        total,
    )))
}

async fn get_issue(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let issue = state
        .services
        .environment
        .get_issue(id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Issue {} not found", id)))?;
    Ok(success_response(issue))
}

async fn change_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusChangeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    state
        .services
        .environment
        .transition_status(id, &payload.status, payload.resolution_notes)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

async fn summary(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let summary = state
        .services
        .environment
        .summary()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(serde_json::json!({
        "total": summary.total,
        "by_status": summary
            .by_status
            .iter()
            .map(|(status, count)| (status.to_string(), *count))
            .collect::<std::collections::HashMap<_, _>>(),
        "by_severity": summary
            .by_severity
            .iter()
            .map(|(severity, count)| (severity.to_string(), *count))
            .collect::<std::collections::HashMap<_, _>>(),
        "open_critical": summary.open_critical,
    })))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/issues", get(list_issues))
        .route("/issues/summary", get(summary))
        .route("/issues/:id", get(get_issue))
        .route("/issues/:id/status", axum::routing::post(change_status))
}
