//! HTTP layer: request DTOs, validation, and thin translation onto the
//! domain services. Every mutation returns JSON, never a redirect.

pub mod common;
pub mod crops;
pub mod environment;
pub mod exports;
pub mod fields;
pub mod financials;
pub mod inventory;
pub mod reports;
pub mod schedules;
pub mod soil;
