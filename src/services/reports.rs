use crate::{
    db::DbPool,
    entities::{crop, environmental_issue, field},
    errors::ServiceError,
    filters::ReportFilter,
    reporting::{
        decimal_to_f64, due_status, stock_status, ChartSeries, ReportViewModel, StatusBadge,
        SummaryCard, TableRow, Tone, NUTRIENT_NPK, SOIL_MOISTURE,
    },
    services::{
        environment::EnvironmentService, financials::FinancialService,
        inventory::InventoryService, schedules::ScheduleService, soil::SoilService,
    },
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Assembles the read-only report pages. All derivation (due banding,
/// stock status, nutrient bands, deltas) happens here, on top of the
/// domain services; the handlers only serialize the result.
#[derive(Clone)]
pub struct ReportService {
    db_pool: Arc<DbPool>,
    schedules: ScheduleService,
    soil: SoilService,
    inventory: InventoryService,
    financials: FinancialService,
    environment: EnvironmentService,
}

fn money(amount: Decimal) -> String {
    format!("${:.2}", decimal_to_f64(amount))
}

fn date_cell(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "—".to_string())
}

fn delta_tone(change_pct: f64) -> Tone {
    if change_pct >= 0.0 {
        Tone::Success
    } else {
        Tone::Danger
    }
}

impl ReportService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            schedules: ScheduleService::new(db_pool.clone()),
            soil: SoilService::new(db_pool.clone()),
            inventory: InventoryService::new(db_pool.clone()),
            financials: FinancialService::new(db_pool.clone()),
            environment: EnvironmentService::new(db_pool.clone()),
            db_pool,
        }
    }

    async fn field_names(&self) -> Result<HashMap<Uuid, String>, ServiceError> {
        let db = &*self.db_pool;
        let fields = field::Entity::find()
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        Ok(fields.into_iter().map(|f| (f.id, f.name)).collect())
    }

    /// Landing-page overview: headline counts plus everything due within
    /// the next three days.
    #[instrument(skip(self))]
    pub async fn dashboard(
        &self,
        filter: &ReportFilter,
        today: NaiveDate,
    ) -> Result<ReportViewModel, ServiceError> {
        let db = &*self.db_pool;
        let field_count = field::Entity::find()
            .count(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let crop_count = crop::Entity::find()
            .filter(crop::Column::Status.eq(crop::CropStatus::Active))
            .count(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let fertilizer_due = self.schedules.count_fertilizer_due(today).await?;
        let irrigation_due = self.schedules.count_irrigation_due(today).await?;
        let issues = self.environment.summary().await?;
        let finances = self.financials.summary_with_deltas(&filter.range).await?;

        let mut rows = Vec::new();
        for (schedule, crop) in self.schedules.list_fertilizer_schedules().await? {
            let status = due_status(schedule.next_application_on, today);
            if status == crate::reporting::DueStatus::Scheduled {
                continue;
            }
            rows.push(
                TableRow::new(vec![
                    "Fertilizer".to_string(),
                    crop.map(|c| c.name).unwrap_or_default(),
                    schedule.description,
                    schedule.next_application_on.to_string(),
                ])
                .with_badge(StatusBadge::new(status.label(), status.tone())),
            );
        }
        for (schedule, crop) in self.schedules.list_irrigation_schedules().await? {
            let status = due_status(schedule.next_event_on, today);
            if status == crate::reporting::DueStatus::Scheduled {
                continue;
            }
            rows.push(
                TableRow::new(vec![
                    "Irrigation".to_string(),
                    crop.map(|c| c.name).unwrap_or_default(),
                    schedule.description,
                    schedule.next_event_on.to_string(),
                ])
                .with_badge(StatusBadge::new(status.label(), status.tone())),
            );
        }

        let issue_tone = if issues.open_critical > 0 {
            Tone::Danger
        } else {
            Tone::Success
        };

        Ok(ReportViewModel::new("Farm Dashboard", today)
            .card(SummaryCard::new("Fields", field_count.to_string(), Tone::Info))
            .card(SummaryCard::new(
                "Active Crops",
                crop_count.to_string(),
                Tone::Info,
            ))
            .card(SummaryCard::new(
                "Fertilizer Due",
                fertilizer_due.to_string(),
                if fertilizer_due > 0 { Tone::Warning } else { Tone::Success },
            ))
            .card(SummaryCard::new(
                "Irrigation Due",
                irrigation_due.to_string(),
                if irrigation_due > 0 { Tone::Warning } else { Tone::Success },
            ))
            .card(SummaryCard::new(
                "Open Critical Issues",
                issues.open_critical.to_string(),
                issue_tone,
            ))
            .card(
                SummaryCard::new(
                    "Net Profit",
                    money(finances.current.net_profit),
                    delta_tone(finances.net_change_pct),
                )
                .with_delta(finances.net_change_pct),
            )
            .columns(&["Type", "Crop", "Description", "Next Date"])
            .rows(rows)
            .or_empty("Nothing is due in the next 3 days"))
    }

    /// Fertilizer schedule overview with due banding per row
    #[instrument(skip(self))]
    pub async fn fertilizer(&self, today: NaiveDate) -> Result<ReportViewModel, ServiceError> {
        let schedules = self.schedules.list_fertilizer_schedules().await?;
        let due = self.schedules.count_fertilizer_due(today).await?;
        let total = schedules.len();

        let rows = schedules
            .into_iter()
            .map(|(schedule, crop)| {
                let status = due_status(schedule.next_application_on, today);
                TableRow::new(vec![
                    crop.map(|c| c.name).unwrap_or_default(),
                    schedule.description,
                    format!("{:.2}/acre", decimal_to_f64(schedule.quantity_per_acre)),
                    date_cell(schedule.last_applied_on),
                    schedule.next_application_on.to_string(),
                ])
                .with_badge(StatusBadge::new(status.label(), status.tone()))
            })
            .collect();

        Ok(ReportViewModel::new("Fertilizer Schedules", today)
            .card(SummaryCard::new("Schedules", total.to_string(), Tone::Info))
            .card(SummaryCard::new(
                "Due Today",
                due.to_string(),
                if due > 0 { Tone::Danger } else { Tone::Success },
            ))
            .columns(&["Crop", "Description", "Rate", "Last Applied", "Next Application"])
            .rows(rows)
            .or_empty("No schedules found"))
    }

    /// Irrigation schedule overview with due banding per row
    #[instrument(skip(self))]
    pub async fn irrigation(&self, today: NaiveDate) -> Result<ReportViewModel, ServiceError> {
        let schedules = self.schedules.list_irrigation_schedules().await?;
        let due = self.schedules.count_irrigation_due(today).await?;
        let total = schedules.len();

        let rows = schedules
            .into_iter()
            .map(|(schedule, crop)| {
                let status = due_status(schedule.next_event_on, today);
                TableRow::new(vec![
                    crop.map(|c| c.name).unwrap_or_default(),
                    schedule.description,
                    format!("{:.2}/hr", decimal_to_f64(schedule.water_rate)),
                    date_cell(schedule.last_event_on),
                    schedule.next_event_on.to_string(),
                ])
                .with_badge(StatusBadge::new(status.label(), status.tone()))
            })
            .collect();

        Ok(ReportViewModel::new("Irrigation Schedules", today)
            .card(SummaryCard::new("Schedules", total.to_string(), Tone::Info))
            .card(SummaryCard::new(
                "Due Today",
                due.to_string(),
                if due > 0 { Tone::Danger } else { Tone::Success },
            ))
            .columns(&["Crop", "Description", "Water Rate", "Last Event", "Next Event"])
            .rows(rows)
            .or_empty("No schedules found"))
    }

    /// Latest soil test per field, with nutrient and moisture readings
    /// banded against the named thresholds.
    #[instrument(skip(self))]
    pub async fn soil(
        &self,
        filter: &ReportFilter,
        today: NaiveDate,
    ) -> Result<ReportViewModel, ServiceError> {
        let names = self.field_names().await?;
        let mut tests = self.soil.latest_per_field().await?;
        if let Some(field_id) = filter.field_id {
            tests.retain(|t| t.field_id == field_id);
        }

        let tested_fields = tests.len();
        let avg_ph = if tests.is_empty() {
            None
        } else {
            Some(tests.iter().map(|t| t.ph).sum::<f64>() / tests.len() as f64)
        };

        let rows = tests
            .into_iter()
            .map(|test| {
                let moisture_band = SOIL_MOISTURE.classify(test.moisture);
                TableRow::new(vec![
                    names.get(&test.field_id).cloned().unwrap_or_default(),
                    test.tested_on.to_string(),
                    format!("{:.1}", test.ph),
                    format!("{:.0} ({})", test.nitrogen, NUTRIENT_NPK.classify(test.nitrogen)),
                    format!(
                        "{:.0} ({})",
                        test.phosphorus,
                        NUTRIENT_NPK.classify(test.phosphorus)
                    ),
                    format!(
                        "{:.0} ({})",
                        test.potassium,
                        NUTRIENT_NPK.classify(test.potassium)
                    ),
                    format!("{:.0}% ({})", test.moisture, moisture_band),
                ])
            })
            .collect();

        let mut report = ReportViewModel::new("Soil Health", today).card(SummaryCard::new(
            "Fields Tested",
            tested_fields.to_string(),
            Tone::Info,
        ));
        if let Some(avg_ph) = avg_ph {
            report = report.card(SummaryCard::new(
                "Average pH",
                format!("{:.1}", avg_ph),
                Tone::Info,
            ));
        }
        Ok(report
            .columns(&[
                "Field",
                "Tested On",
                "pH",
                "Nitrogen",
                "Phosphorus",
                "Potassium",
                "Moisture",
            ])
            .rows(rows)
            .or_empty("No recent soil test results available"))
    }

    /// Inventory stock overview with per-item status and window
    /// usage/waste totals.
    #[instrument(skip(self))]
    pub async fn inventory(
        &self,
        filter: &ReportFilter,
        today: NaiveDate,
    ) -> Result<ReportViewModel, ServiceError> {
        let items = self.inventory.list_items(None).await?;
        let totals = self.inventory.movement_totals(&filter.range, None).await?;

        let mut low_stock = 0u64;
        let mut expiring = 0u64;
        let rows: Vec<TableRow> = items
            .into_iter()
            .map(|(item, category)| {
                let status =
                    stock_status(item.quantity, item.reorder_level, item.expires_on, today);
                match status {
                    crate::reporting::StockStatus::LowStock => low_stock += 1,
                    crate::reporting::StockStatus::ExpiringSoon => expiring += 1,
                    crate::reporting::StockStatus::Ok => {}
                }
                TableRow::new(vec![
                    item.name,
                    item.sku,
                    category.map(|c| c.name).unwrap_or_default(),
                    format!("{} {}", item.quantity.round_dp(2), item.unit),
                    item.reorder_level.round_dp(2).to_string(),
                    money(item.unit_cost),
                    date_cell(item.expires_on),
                ])
                .with_badge(StatusBadge::new(status.label(), status.tone()))
            })
            .collect();

        Ok(ReportViewModel::new("Inventory", today)
            .card(SummaryCard::new("Items", rows.len().to_string(), Tone::Info))
            .card(SummaryCard::new(
                "Low Stock",
                low_stock.to_string(),
                if low_stock > 0 { Tone::Danger } else { Tone::Success },
            ))
            .card(SummaryCard::new(
                "Expiring Soon",
                expiring.to_string(),
                if expiring > 0 { Tone::Warning } else { Tone::Success },
            ))
            .card(SummaryCard::new(
                "Waste Rate",
                format!("{:.1}%", totals.waste_rate()),
                Tone::Info,
            ))
            .columns(&[
                "Item",
                "SKU",
                "Category",
                "On Hand",
                "Reorder At",
                "Unit Cost",
                "Expires",
            ])
            .rows(rows)
            .or_empty("No inventory items found"))
    }

    /// Income/expense totals with period-over-period deltas, a monthly
    /// series, and the record list for the window.
    #[instrument(skip(self))]
    pub async fn financial(
        &self,
        filter: &ReportFilter,
        today: NaiveDate,
    ) -> Result<ReportViewModel, ServiceError> {
        let summary = self.financials.summary_with_deltas(&filter.range).await?;
        let monthly = self.financials.monthly_series(&filter.range).await?;
        let breakdown = self.financials.category_breakdown(&filter.range).await?;
        let records = self.financials.list_records(&filter.range, None).await?;
        let categories = self.financials.list_expense_categories().await?;
        let category_names: HashMap<Uuid, String> =
            categories.into_iter().map(|c| (c.id, c.name)).collect();

        let labels: Vec<String> = monthly.iter().map(|p| p.label()).collect();
        let income_points: Vec<Option<f64>> = monthly.iter().map(|p| p.income).collect();
        let expense_points: Vec<Option<f64>> = monthly.iter().map(|p| p.expenses).collect();

        let breakdown_labels: Vec<String> = breakdown
            .iter()
            .map(|c| {
                c.category
                    .as_ref()
                    .map(|cat| cat.name.clone())
                    .unwrap_or_else(|| "Uncategorized".to_string())
            })
            .collect();
        let breakdown_points: Vec<Option<f64>> = breakdown
            .iter()
            .map(|c| Some(decimal_to_f64(c.total)))
            .collect();

        let rows = records
            .into_iter()
            .map(|record| {
                let counterparty = match record.record_type {
                    crate::entities::financial_record::RecordType::Income => {
                        record.source.clone().unwrap_or_default()
                    }
                    crate::entities::financial_record::RecordType::Expense => record
                        .category_id
                        .and_then(|id| category_names.get(&id).cloned())
                        .unwrap_or_default(),
                };
                TableRow::new(vec![
                    record.transacted_on.to_string(),
                    record.record_type.to_string(),
                    record.description,
                    counterparty,
                    money(record.amount),
                ])
            })
            .collect();

        Ok(ReportViewModel::new("Financials", today)
            .card(
                SummaryCard::new(
                    "Income",
                    money(summary.current.total_income),
                    delta_tone(summary.income_change_pct),
                )
                .with_delta(summary.income_change_pct),
            )
            .card(
                SummaryCard::new(
                    "Expenses",
                    money(summary.current.total_expenses),
                    delta_tone(-summary.expense_change_pct),
                )
                .with_delta(summary.expense_change_pct),
            )
            .card(
                SummaryCard::new(
                    "Net Profit",
                    money(summary.current.net_profit),
                    delta_tone(summary.net_change_pct),
                )
                .with_delta(summary.net_change_pct),
            )
            .series(ChartSeries::new("Income", labels.clone(), income_points))
            .series(ChartSeries::new("Expenses", labels, expense_points))
            .series(ChartSeries::new(
                "Expenses by Category",
                breakdown_labels,
                breakdown_points,
            ))
            .columns(&["Date", "Type", "Description", "Category / Source", "Amount"])
            .rows(rows)
            .or_empty("No financial records found"))
    }

    /// Environmental issue queue with severity badges and queue counts
    #[instrument(skip(self))]
    pub async fn environment(
        &self,
        filter: &ReportFilter,
        today: NaiveDate,
    ) -> Result<ReportViewModel, ServiceError> {
        let names = self.field_names().await?;
        let summary = self.environment.summary().await?;
        let (issues, total) = self.environment.list_issues(filter, 200, 0).await?;

        let rows = issues
            .into_iter()
            .map(|issue| {
                let tone = match issue.severity {
                    environmental_issue::IssueSeverity::Critical => Tone::Danger,
                    environmental_issue::IssueSeverity::High => Tone::Warning,
                    environmental_issue::IssueSeverity::Medium => Tone::Info,
                    environmental_issue::IssueSeverity::Low => Tone::Muted,
                };
                TableRow::new(vec![
                    issue.reported_at.date_naive().to_string(),
                    names.get(&issue.field_id).cloned().unwrap_or_default(),
                    issue.issue_type,
                    issue.status.to_string(),
                    issue.description,
                ])
                .with_badge(StatusBadge::new(issue.severity.to_string(), tone))
            })
            .collect();

        let open = summary
            .by_status
            .get(&environmental_issue::IssueStatus::Open)
            .copied()
            .unwrap_or(0)
            + summary
                .by_status
                .get(&environmental_issue::IssueStatus::InProgress)
                .copied()
                .unwrap_or(0);

        Ok(ReportViewModel::new("Environmental Issues", today)
            .card(SummaryCard::new("Matching", total.to_string(), Tone::Info))
            .card(SummaryCard::new("Open", open.to_string(), Tone::Warning))
            .card(SummaryCard::new(
                "Open Critical",
                summary.open_critical.to_string(),
                if summary.open_critical > 0 { Tone::Danger } else { Tone::Success },
            ))
            .columns(&["Reported", "Field", "Type", "Status", "Description"])
            .rows(rows)
            .or_empty("No environmental issues found"))
    }
}
