use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InventoryCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InventoryCategories::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(InventoryCategories::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InventoryItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InventoryItems::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(InventoryItems::Name).string().not_null())
                    .col(ColumnDef::new(InventoryItems::Sku).string().not_null())
                    .col(ColumnDef::new(InventoryItems::CategoryId).uuid().not_null())
                    .col(
                        ColumnDef::new(InventoryItems::Quantity)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InventoryItems::ReorderLevel)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InventoryItems::UnitCost)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(InventoryItems::Unit).string().not_null())
                    .col(ColumnDef::new(InventoryItems::ExpiresOn).date().null())
                    .col(
                        ColumnDef::new(InventoryItems::Status)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InventoryItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InventoryItems::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventory_items_category_id")
                            .from(InventoryItems::Table, InventoryItems::CategoryId)
                            .to(InventoryCategories::Table, InventoryCategories::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_inventory_items_sku")
                    .table(InventoryItems::Table)
                    .col(InventoryItems::Sku)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InventoryLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InventoryLogs::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(InventoryLogs::ItemId).uuid().not_null())
                    .col(
                        ColumnDef::new(InventoryLogs::Action)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InventoryLogs::Quantity)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InventoryLogs::RecordedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventory_logs_item_id")
                            .from(InventoryLogs::Table, InventoryLogs::ItemId)
                            .to(InventoryItems::Table, InventoryItems::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ExpenseCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExpenseCategories::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ExpenseCategories::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FinancialRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FinancialRecords::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FinancialRecords::RecordType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(FinancialRecords::CategoryId).uuid().null())
                    .col(ColumnDef::new(FinancialRecords::Source).string().null())
                    .col(
                        ColumnDef::new(FinancialRecords::Description)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FinancialRecords::Amount)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FinancialRecords::TransactedOn)
                            .date()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FinancialRecords::Notes).text().null())
                    .col(
                        ColumnDef::new(FinancialRecords::Status)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FinancialRecords::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FinancialRecords::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_financial_records_category_id")
                            .from(FinancialRecords::Table, FinancialRecords::CategoryId)
                            .to(ExpenseCategories::Table, ExpenseCategories::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Range reports filter on transaction date and soft-delete status
        manager
            .create_index(
                Index::create()
                    .name("idx_financial_records_transacted_on")
                    .table(FinancialRecords::Table)
                    .col(FinancialRecords::TransactedOn)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EnvironmentalIssues::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EnvironmentalIssues::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EnvironmentalIssues::SupervisorId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(EnvironmentalIssues::FieldId).uuid().not_null())
                    .col(
                        ColumnDef::new(EnvironmentalIssues::IssueType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EnvironmentalIssues::Severity)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EnvironmentalIssues::Status)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EnvironmentalIssues::Description)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EnvironmentalIssues::EstimatedImpact)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(EnvironmentalIssues::ReportedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EnvironmentalIssues::ResolvedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(EnvironmentalIssues::AdminNotified)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EnvironmentalIssues::ResolutionNotes)
                            .text()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_environmental_issues_status_severity")
                    .table(EnvironmentalIssues::Table)
                    .col(EnvironmentalIssues::Status)
                    .col(EnvironmentalIssues::Severity)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EnvironmentalIssues::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FinancialRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExpenseCategories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InventoryLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InventoryItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InventoryCategories::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum InventoryCategories {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum InventoryItems {
    Table,
    Id,
    Name,
    Sku,
    CategoryId,
    Quantity,
    ReorderLevel,
    UnitCost,
    Unit,
    ExpiresOn,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum InventoryLogs {
    Table,
    Id,
    ItemId,
    Action,
    Quantity,
    RecordedAt,
}

#[derive(DeriveIden)]
enum ExpenseCategories {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum FinancialRecords {
    Table,
    Id,
    RecordType,
    CategoryId,
    Source,
    Description,
    Amount,
    TransactedOn,
    Notes,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum EnvironmentalIssues {
    Table,
    Id,
    SupervisorId,
    FieldId,
    IssueType,
    Severity,
    Status,
    Description,
    EstimatedImpact,
    ReportedAt,
    ResolvedAt,
    AdminNotified,
    ResolutionNotes,
}
