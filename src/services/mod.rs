//! Domain services. Each owns a shared database handle and exposes the
//! operations one back-office area needs; handlers stay thin on top.

pub mod crops;
pub mod environment;
pub mod fields;
pub mod financials;
pub mod inventory;
pub mod reports;
pub mod schedules;
pub mod soil;

use crate::db::DbPool;
use std::sync::Arc;

/// All services wired onto one connection pool, cloned into the
/// application state at startup.
#[derive(Clone)]
pub struct AppServices {
    pub fields: fields::FieldService,
    pub crops: crops::CropService,
    pub schedules: schedules::ScheduleService,
    pub soil: soil::SoilService,
    pub inventory: inventory::InventoryService,
    pub financials: financials::FinancialService,
    pub environment: environment::EnvironmentService,
    pub reports: reports::ReportService,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            fields: fields::FieldService::new(db_pool.clone()),
            crops: crops::CropService::new(db_pool.clone()),
            schedules: schedules::ScheduleService::new(db_pool.clone()),
            soil: soil::SoilService::new(db_pool.clone()),
            inventory: inventory::InventoryService::new(db_pool.clone()),
            financials: financials::FinancialService::new(db_pool.clone()),
            environment: environment::EnvironmentService::new(db_pool.clone()),
            reports: reports::ReportService::new(db_pool),
        }
    }
}
