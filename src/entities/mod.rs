pub mod crop;
pub mod environmental_issue;
pub mod expense_category;
pub mod fertilizer_log;
pub mod fertilizer_schedule;
pub mod field;
pub mod financial_record;
pub mod inventory_category;
pub mod inventory_item;
pub mod inventory_log;
pub mod irrigation_log;
pub mod irrigation_schedule;
pub mod soil_test;
pub mod soil_treatment;
