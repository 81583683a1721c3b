use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m20240612_000001_create_field_tables::Migration),
            Box::new(migrations::m20240612_000002_create_schedule_tables::Migration),
            Box::new(migrations::m20240612_000003_create_inventory_finance_tables::Migration),
        ]
    }
}
