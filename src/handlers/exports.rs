use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::Utc;

use super::reports::{build_report, default_window};
use crate::{errors::ApiError, filters::ReportFilterParams, reporting::csv::render_csv, AppState};

/// `GET /exports/dashboard.csv` etc. The CSV is rendered from the same
/// view-model as the JSON report, so exports always match the page.
async fn export_csv(
    State(state): State<AppState>,
    Path(file): Path<String>,
    Query(params): Query<ReportFilterParams>,
) -> Result<Response, ApiError> {
    let report = file
        .strip_suffix(".csv")
        .ok_or_else(|| ApiError::BadRequest("Export file name must end in .csv".to_string()))?;

    let today = Utc::now().date_naive();
    let filter = params.resolve(default_window(report), today);
    let vm = build_report(&state, report, &filter, today).await?;

    let body = render_csv(&vm);
    let disposition = format!("attachment; filename=\"{}-{}.csv\"", report, today);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/:file", get(export_csv))
}
