pub mod m20240612_000001_create_field_tables;
pub mod m20240612_000002_create_schedule_tables;
pub mod m20240612_000003_create_inventory_finance_tables;
