use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FertilizerSchedules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FertilizerSchedules::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FertilizerSchedules::CropId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FertilizerSchedules::Description)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FertilizerSchedules::QuantityPerAcre)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FertilizerSchedules::LastAppliedOn)
                            .date()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(FertilizerSchedules::NextApplicationOn)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FertilizerSchedules::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FertilizerSchedules::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_fertilizer_schedules_crop_id")
                            .from(FertilizerSchedules::Table, FertilizerSchedules::CropId)
                            .to(Crops::Table, Crops::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Due-status listings scan by next application date
        manager
            .create_index(
                Index::create()
                    .name("idx_fertilizer_schedules_next_on")
                    .table(FertilizerSchedules::Table)
                    .col(FertilizerSchedules::NextApplicationOn)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(IrrigationSchedules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IrrigationSchedules::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IrrigationSchedules::CropId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IrrigationSchedules::Description)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IrrigationSchedules::WaterRate)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IrrigationSchedules::LastEventOn)
                            .date()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(IrrigationSchedules::NextEventOn)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IrrigationSchedules::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IrrigationSchedules::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_irrigation_schedules_crop_id")
                            .from(IrrigationSchedules::Table, IrrigationSchedules::CropId)
                            .to(Crops::Table, Crops::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_irrigation_schedules_next_on")
                    .table(IrrigationSchedules::Table)
                    .col(IrrigationSchedules::NextEventOn)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FertilizerLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FertilizerLogs::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FertilizerLogs::ScheduleId).uuid().not_null())
                    .col(ColumnDef::new(FertilizerLogs::EventOn).date().not_null())
                    .col(
                        ColumnDef::new(FertilizerLogs::AmountUsed)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(FertilizerLogs::Notes).text().null())
                    .col(
                        ColumnDef::new(FertilizerLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_fertilizer_logs_schedule_id")
                            .from(FertilizerLogs::Table, FertilizerLogs::ScheduleId)
                            .to(FertilizerSchedules::Table, FertilizerSchedules::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(IrrigationLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IrrigationLogs::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(IrrigationLogs::ScheduleId).uuid().not_null())
                    .col(ColumnDef::new(IrrigationLogs::EventOn).date().not_null())
                    .col(
                        ColumnDef::new(IrrigationLogs::AmountUsed)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(IrrigationLogs::Notes).text().null())
                    .col(
                        ColumnDef::new(IrrigationLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_irrigation_logs_schedule_id")
                            .from(IrrigationLogs::Table, IrrigationLogs::ScheduleId)
                            .to(IrrigationSchedules::Table, IrrigationSchedules::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(IrrigationLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FertilizerLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(IrrigationSchedules::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FertilizerSchedules::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Crops {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum FertilizerSchedules {
    Table,
    Id,
    CropId,
    Description,
    QuantityPerAcre,
    LastAppliedOn,
    NextApplicationOn,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum IrrigationSchedules {
    Table,
    Id,
    CropId,
    Description,
    WaterRate,
    LastEventOn,
    NextEventOn,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum FertilizerLogs {
    Table,
    Id,
    ScheduleId,
    EventOn,
    AmountUsed,
    Notes,
    CreatedAt,
}

#[derive(DeriveIden)]
enum IrrigationLogs {
    Table,
    Id,
    ScheduleId,
    EventOn,
    AmountUsed,
    Notes,
    CreatedAt,
}
