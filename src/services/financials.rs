use crate::{
    db::DbPool,
    entities::{expense_category, financial_record},
    errors::ServiceError,
    filters::DateRange,
    reporting::{decimal_to_f64, percentage_change, FinancialSummary},
};
use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::entities::financial_record::{RecordStatus, RecordType};

/// Service for income/expense records and the aggregates built on them.
///
/// Records are never hard-deleted; removal flips the status to inactive
/// so past report snapshots stay reproducible.
#[derive(Clone)]
pub struct FinancialService {
    db_pool: Arc<DbPool>,
}

#[derive(Debug, Clone)]
pub struct NewFinancialRecord {
    pub record_type: RecordType,
    pub category_id: Option<Uuid>,
    pub source: Option<String>,
    pub description: String,
    pub amount: Decimal,
    pub transacted_on: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FinancialRecordUpdate {
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub transacted_on: Option<NaiveDate>,
    pub category_id: Option<Option<Uuid>>,
    pub notes: Option<Option<String>>,
}

/// Current-window summary with percent deltas against the window of the
/// same length immediately before it.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryWithDeltas {
    pub current: FinancialSummary,
    pub income_change_pct: f64,
    pub expense_change_pct: f64,
    pub net_change_pct: f64,
}

/// Expense total for one category inside the window.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: Option<expense_category::Model>,
    pub total: Decimal,
}

/// One month of the income/expense series. Months with no records at
/// all carry `None` so charts can render a gap instead of a zero.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyPoint {
    pub year: i32,
    pub month: u32,
    pub income: Option<f64>,
    pub expenses: Option<f64>,
}

impl MonthlyPoint {
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

fn check_record_shape(
    record_type: RecordType,
    category_id: Option<Uuid>,
    source: &Option<String>,
) -> Result<(), ServiceError> {
    match record_type {
        RecordType::Expense if category_id.is_none() => Err(ServiceError::invalid_field(
            "category_id",
            "is required for expense records",
        )),
        RecordType::Income if source.as_deref().map_or(true, |s| s.trim().is_empty()) => Err(
            ServiceError::invalid_field("source", "is required for income records"),
        ),
        _ => Ok(()),
    }
}

impl FinancialService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Adds an income or expense record
    #[instrument(skip(self))]
    pub async fn add_record(&self, input: NewFinancialRecord) -> Result<Uuid, ServiceError> {
        if input.amount <= Decimal::ZERO {
            return Err(ServiceError::invalid_field(
                "amount",
                "must be a positive number",
            ));
        }
        if input.description.trim().is_empty() {
            return Err(ServiceError::invalid_field(
                "description",
                "must not be empty",
            ));
        }
        check_record_shape(input.record_type, input.category_id, &input.source)?;

        let db = &*self.db_pool;
        if let Some(category_id) = input.category_id {
            expense_category::Entity::find_by_id(category_id)
                .one(db)
                .await
                .map_err(ServiceError::DatabaseError)?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Expense category {} not found", category_id))
                })?;
        }

        let now = Utc::now();
        let id = Uuid::new_v4();
        let model = financial_record::ActiveModel {
            id: Set(id),
            record_type: Set(input.record_type),
            category_id: Set(input.category_id),
            source: Set(input.source),
            description: Set(input.description),
            amount: Set(input.amount),
            transacted_on: Set(input.transacted_on),
            notes: Set(input.notes),
            status: Set(RecordStatus::Active),
            created_at: Set(now),
            updated_at: Set(now),
        };
        model.insert(db).await.map_err(ServiceError::DatabaseError)?;

        info!(record_id = %id, record_type = ?input.record_type, "Financial record added");
        Ok(id)
    }

    /// Gets a record by ID, inactive ones included
    #[instrument(skip(self))]
    pub async fn get_record(
        &self,
        record_id: Uuid,
    ) -> Result<Option<financial_record::Model>, ServiceError> {
        let db = &*self.db_pool;
        financial_record::Entity::find_by_id(record_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Overwrites a record's editable fields. Repeating the same update
    /// leaves the record unchanged.
    #[instrument(skip(self))]
    pub async fn update_record(
        &self,
        record_id: Uuid,
        update: FinancialRecordUpdate,
    ) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let existing = financial_record::Entity::find_by_id(record_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Financial record {} not found", record_id))
            })?;

        if let Some(amount) = update.amount {
            if amount <= Decimal::ZERO {
                return Err(ServiceError::invalid_field(
                    "amount",
                    "must be a positive number",
                ));
            }
        }
        let category_id = update.category_id.unwrap_or(existing.category_id);
        check_record_shape(existing.record_type, category_id, &existing.source)?;

        if let Some(Some(category_id)) = update.category_id {
            expense_category::Entity::find_by_id(category_id)
                .one(db)
                .await
                .map_err(ServiceError::DatabaseError)?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Expense category {} not found", category_id))
                })?;
        }

        let mut model: financial_record::ActiveModel = existing.into();
        if let Some(description) = update.description {
            model.description = Set(description);
        }
        if let Some(amount) = update.amount {
            model.amount = Set(amount);
        }
        if let Some(transacted_on) = update.transacted_on {
            model.transacted_on = Set(transacted_on);
        }
        if let Some(category_id) = update.category_id {
            model.category_id = Set(category_id);
        }
        if let Some(notes) = update.notes {
            model.notes = Set(notes);
        }
        model.updated_at = Set(Utc::now());
        model.update(db).await.map_err(ServiceError::DatabaseError)?;

        info!(record_id = %record_id, "Financial record updated");
        Ok(())
    }

    /// Removes a record from all reports by flipping it inactive
    #[instrument(skip(self))]
    pub async fn remove_record(&self, record_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let existing = financial_record::Entity::find_by_id(record_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Financial record {} not found", record_id))
            })?;

        let mut model: financial_record::ActiveModel = existing.into();
        model.status = Set(RecordStatus::Inactive);
        model.updated_at = Set(Utc::now());
        model.update(db).await.map_err(ServiceError::DatabaseError)?;

        info!(record_id = %record_id, "Financial record removed");
        Ok(())
    }

    /// Lists active records inside the window, newest first
    #[instrument(skip(self))]
    pub async fn list_records(
        &self,
        range: &DateRange,
        record_type: Option<RecordType>,
    ) -> Result<Vec<financial_record::Model>, ServiceError> {
        let db = &*self.db_pool;
        let mut query = financial_record::Entity::find()
            .filter(financial_record::Column::Status.eq(RecordStatus::Active))
            .filter(financial_record::Column::TransactedOn.gte(range.from))
            .filter(financial_record::Column::TransactedOn.lte(range.to))
            .order_by_desc(financial_record::Column::TransactedOn);
        if let Some(record_type) = record_type {
            query = query.filter(financial_record::Column::RecordType.eq(record_type));
        }
        query.all(db).await.map_err(ServiceError::DatabaseError)
    }

    /// Summarizes the window and compares against the preceding window
    /// of the same length.
    #[instrument(skip(self))]
    pub async fn summary_with_deltas(
        &self,
        range: &DateRange,
    ) -> Result<SummaryWithDeltas, ServiceError> {
        let current_records = self.list_records(range, None).await?;
        let previous_records = self.list_records(&range.preceding(), None).await?;

        let current = FinancialSummary::from_records(&current_records);
        let previous = FinancialSummary::from_records(&previous_records);

        Ok(SummaryWithDeltas {
            income_change_pct: percentage_change(
                decimal_to_f64(current.total_income),
                decimal_to_f64(previous.total_income),
            ),
            expense_change_pct: percentage_change(
                decimal_to_f64(current.total_expenses),
                decimal_to_f64(previous.total_expenses),
            ),
            net_change_pct: percentage_change(current.net_as_f64(), previous.net_as_f64()),
            current,
        })
    }

    /// Expense totals per category inside the window, largest first.
    /// Expenses with no surviving category fold into a `None` bucket.
    #[instrument(skip(self))]
    pub async fn category_breakdown(
        &self,
        range: &DateRange,
    ) -> Result<Vec<CategoryTotal>, ServiceError> {
        let db = &*self.db_pool;
        let expenses = self.list_records(range, Some(RecordType::Expense)).await?;
        let categories = expense_category::Entity::find()
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let mut totals: BTreeMap<Option<Uuid>, Decimal> = BTreeMap::new();
        for record in &expenses {
            *totals.entry(record.category_id).or_default() += record.amount;
        }

        let mut breakdown: Vec<CategoryTotal> = totals
            .into_iter()
            .map(|(category_id, total)| CategoryTotal {
                category: category_id
                    .and_then(|id| categories.iter().find(|c| c.id == id).cloned()),
                total,
            })
            .collect();
        breakdown.sort_by(|a, b| b.total.cmp(&a.total));
        Ok(breakdown)
    }

    /// Month-by-month income/expense series across the window. Every
    /// calendar month in the window appears; months without any records
    /// carry `None` on both sides.
    #[instrument(skip(self))]
    pub async fn monthly_series(
        &self,
        range: &DateRange,
    ) -> Result<Vec<MonthlyPoint>, ServiceError> {
        let records = self.list_records(range, None).await?;

        let mut buckets: BTreeMap<(i32, u32), (Decimal, Decimal)> = BTreeMap::new();
        for record in &records {
            let key = (record.transacted_on.year(), record.transacted_on.month());
            let entry = buckets.entry(key).or_default();
            match record.record_type {
                RecordType::Income => entry.0 += record.amount,
                RecordType::Expense => entry.1 += record.amount,
            }
        }

        let mut series = Vec::new();
        let (mut year, mut month) = (range.from.year(), range.from.month());
        let end = (range.to.year(), range.to.month());
        loop {
            let point = match buckets.get(&(year, month)) {
                Some((income, expenses)) => MonthlyPoint {
                    year,
                    month,
                    income: Some(decimal_to_f64(*income)),
                    expenses: Some(decimal_to_f64(*expenses)),
                },
                None => MonthlyPoint {
                    year,
                    month,
                    income: None,
                    expenses: None,
                },
            };
            series.push(point);
            if (year, month) == end {
                break;
            }
            month += 1;
            if month > 12 {
                month = 1;
                year += 1;
            }
        }
        Ok(series)
    }

    /// Lists expense categories ordered by name
    #[instrument(skip(self))]
    pub async fn list_expense_categories(
        &self,
    ) -> Result<Vec<expense_category::Model>, ServiceError> {
        let db = &*self.db_pool;
        expense_category::Entity::find()
            .order_by_asc(expense_category::Column::Name)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Creates an expense category
    #[instrument(skip(self))]
    pub async fn create_expense_category(&self, name: String) -> Result<Uuid, ServiceError> {
        if name.trim().is_empty() {
            return Err(ServiceError::invalid_field("name", "must not be empty"));
        }
        let db = &*self.db_pool;
        let id = Uuid::new_v4();
        let model = expense_category::ActiveModel {
            id: Set(id),
            name: Set(name),
        };
        model.insert(db).await.map_err(ServiceError::DatabaseError)?;
        info!(category_id = %id, "Expense category created");
        Ok(id)
    }
}
