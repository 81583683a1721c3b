use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use chrono::{NaiveDate, Utc};

use super::common::{map_service_error, success_response};
use crate::{
    errors::ApiError,
    filters::{DateRangePreset, ReportFilter, ReportFilterParams},
    reporting::ReportViewModel,
    AppState,
};

/// Default reporting window for each report page.
pub fn default_window(report: &str) -> DateRangePreset {
    match report {
        "inventory" => DateRangePreset::Last30Days,
        "environment" | "soil" => DateRangePreset::CurrentYear,
        _ => DateRangePreset::ThisMonth,
    }
}

/// Builds the named report. Shared by the JSON endpoints and the CSV
/// exporter so both always agree on content.
pub async fn build_report(
    state: &AppState,
    report: &str,
    filter: &ReportFilter,
    today: NaiveDate,
) -> Result<ReportViewModel, ApiError> {
    let reports = &state.services.reports;
    let vm = match report {
        "dashboard" => reports.dashboard(filter, today).await,
        "fertilizer" => reports.fertilizer(today).await,
        "irrigation" => reports.irrigation(today).await,
        "soil" => reports.soil(filter, today).await,
        "inventory" => reports.inventory(filter, today).await,
        "financial" => reports.financial(filter, today).await,
        "environment" => reports.environment(filter, today).await,
        other => {
            return Err(ApiError::NotFound(format!("Unknown report: {}", other)));
        }
    };
    vm.map_err(map_service_error)
}

async fn report_handler(
    State(state): State<AppState>,
    axum::extract::Path(report): axum::extract::Path<String>,
    Query(params): Query<ReportFilterParams>,
) -> Result<impl IntoResponse, ApiError> {
    let today = Utc::now().date_naive();
    let filter = params.resolve(default_window(&report), today);
    let vm = build_report(&state, &report, &filter, today).await?;
    Ok(success_response(vm))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/:report", get(report_handler))
}
