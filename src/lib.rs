//! Farm back-office API: fields, crops, fertilizer/irrigation
//! scheduling, soil health, inventory, financials, and environmental
//! issue tracking, plus the derived reports built on top of them.

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod filters;
pub mod handlers;
pub mod migrations;
pub mod migrator;
pub mod reporting;
pub mod services;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

pub use services::AppServices;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: AppServices,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        Self {
            services: AppServices::new(db.clone()),
            db,
            config,
        }
    }
}

/// Full v1 API surface, nested under `/api/v1` by the binary.
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .nest("/fields", handlers::fields::routes())
        .nest("/crops", handlers::crops::routes())
        .nest("/schedules", handlers::schedules::routes())
        .nest("/soil", handlers::soil::routes())
        .nest("/inventory", handlers::inventory::routes())
        .nest("/financials", handlers::financials::routes())
        .nest("/environment", handlers::environment::routes())
        .nest("/reports", handlers::reports::routes())
        .nest("/exports", handlers::exports::routes())
}
