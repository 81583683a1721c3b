use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Fields::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Fields::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(Fields::Name).string().not_null())
                    .col(ColumnDef::new(Fields::Location).string().not_null())
                    .col(
                        ColumnDef::new(Fields::AreaAcres)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Fields::SoilType).string().not_null())
                    .col(ColumnDef::new(Fields::LastCrop).string().null())
                    .col(ColumnDef::new(Fields::Notes).text().null())
                    .col(
                        ColumnDef::new(Fields::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Fields::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Crops::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Crops::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(Crops::FieldId).uuid().not_null())
                    .col(ColumnDef::new(Crops::Name).string().not_null())
                    .col(ColumnDef::new(Crops::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Crops::PlantedOn).date().null())
                    .col(
                        ColumnDef::new(Crops::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Crops::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_crops_field_id")
                            .from(Crops::Table, Crops::FieldId)
                            .to(Fields::Table, Fields::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SoilTests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SoilTests::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SoilTests::FieldId).uuid().not_null())
                    .col(ColumnDef::new(SoilTests::TestedOn).date().not_null())
                    .col(ColumnDef::new(SoilTests::Ph).double().not_null())
                    .col(ColumnDef::new(SoilTests::Nitrogen).double().not_null())
                    .col(ColumnDef::new(SoilTests::Phosphorus).double().not_null())
                    .col(ColumnDef::new(SoilTests::Potassium).double().not_null())
                    .col(ColumnDef::new(SoilTests::Moisture).double().not_null())
                    .col(ColumnDef::new(SoilTests::Temperature).double().not_null())
                    .col(ColumnDef::new(SoilTests::OrganicMatter).double().not_null())
                    .col(
                        ColumnDef::new(SoilTests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_soil_tests_field_id")
                            .from(SoilTests::Table, SoilTests::FieldId)
                            .to(Fields::Table, Fields::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Latest-per-field lookups group by field and order by test date
        manager
            .create_index(
                Index::create()
                    .name("idx_soil_tests_field_tested_on")
                    .table(SoilTests::Table)
                    .col(SoilTests::FieldId)
                    .col(SoilTests::TestedOn)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SoilTreatments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SoilTreatments::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SoilTreatments::FieldId).uuid().not_null())
                    .col(
                        ColumnDef::new(SoilTreatments::TreatmentType)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(SoilTreatments::AppliedOn).date().not_null())
                    .col(
                        ColumnDef::new(SoilTreatments::TotalCost)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SoilTreatments::CostPerAcre)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SoilTreatments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_soil_treatments_field_id")
                            .from(SoilTreatments::Table, SoilTreatments::FieldId)
                            .to(Fields::Table, Fields::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SoilTreatments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SoilTests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Crops::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Fields::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Fields {
    Table,
    Id,
    Name,
    Location,
    AreaAcres,
    SoilType,
    LastCrop,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Crops {
    Table,
    Id,
    FieldId,
    Name,
    Status,
    PlantedOn,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum SoilTests {
    Table,
    Id,
    FieldId,
    TestedOn,
    Ph,
    Nitrogen,
    Phosphorus,
    Potassium,
    Moisture,
    Temperature,
    OrganicMatter,
    CreatedAt,
}

#[derive(DeriveIden)]
enum SoilTreatments {
    Table,
    Id,
    FieldId,
    TreatmentType,
    AppliedOn,
    TotalCost,
    CostPerAcre,
    CreatedAt,
}
