use crate::{
    db::DbPool,
    entities::{crop, fertilizer_log, fertilizer_schedule, irrigation_log, irrigation_schedule},
    errors::ServiceError,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Service for fertilizer and irrigation schedules.
///
/// A schedule carries exactly one mutable next-occurrence pointer;
/// logging an event appends an immutable log row and advances that
/// pointer inside a single transaction.
#[derive(Clone)]
pub struct ScheduleService {
    db_pool: Arc<DbPool>,
}

#[derive(Debug, Clone)]
pub struct NewSchedule {
    pub crop_id: Uuid,
    pub description: String,
    pub rate: Decimal,
    pub last_event_on: Option<NaiveDate>,
    pub next_event_on: NaiveDate,
}

#[derive(Debug, Clone, Default)]
pub struct ScheduleUpdate {
    pub description: Option<String>,
    pub rate: Option<Decimal>,
    pub next_event_on: Option<NaiveDate>,
}

/// Input for logging one application/irrigation event. The caller
/// supplies the advanced next-occurrence date along with the event.
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub event_on: NaiveDate,
    pub amount_used: Decimal,
    pub notes: Option<String>,
    pub next_event_on: NaiveDate,
}

fn check_date_order(last: Option<NaiveDate>, next: NaiveDate) -> Result<(), ServiceError> {
    if let Some(last) = last {
        if next < last {
            return Err(ServiceError::invalid_field(
                "next_event_on",
                "must not be earlier than the last event date",
            ));
        }
    }
    Ok(())
}

fn check_log_event(event: &LogEvent) -> Result<(), ServiceError> {
    if event.amount_used <= Decimal::ZERO {
        return Err(ServiceError::invalid_field(
            "amount_used",
            "must be a positive number",
        ));
    }
    if event.next_event_on < event.event_on {
        return Err(ServiceError::invalid_field(
            "next_event_on",
            "must not be earlier than the event date",
        ));
    }
    Ok(())
}

impl ScheduleService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    async fn require_crop(&self, crop_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        crop::Entity::find_by_id(crop_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Crop {} not found", crop_id)))?;
        Ok(())
    }

    // ---- fertilizer ----

    /// Creates a fertilizer schedule for an existing crop
    #[instrument(skip(self))]
    pub async fn create_fertilizer_schedule(
        &self,
        input: NewSchedule,
    ) -> Result<Uuid, ServiceError> {
        check_date_order(input.last_event_on, input.next_event_on)?;
        if input.rate <= Decimal::ZERO {
            return Err(ServiceError::invalid_field(
                "quantity_per_acre",
                "must be a positive number",
            ));
        }
        self.require_crop(input.crop_id).await?;

        let db = &*self.db_pool;
        let now = Utc::now();
        let id = Uuid::new_v4();

        let model = fertilizer_schedule::ActiveModel {
            id: Set(id),
            crop_id: Set(input.crop_id),
            description: Set(input.description),
            quantity_per_acre: Set(input.rate),
            last_applied_on: Set(input.last_event_on),
            next_application_on: Set(input.next_event_on),
            created_at: Set(now),
            updated_at: Set(now),
        };
        model.insert(db).await.map_err(ServiceError::DatabaseError)?;

        info!(schedule_id = %id, "Fertilizer schedule created");
        Ok(id)
    }

    /// Lists fertilizer schedules with their crops, soonest first
    #[instrument(skip(self))]
    pub async fn list_fertilizer_schedules(
        &self,
    ) -> Result<Vec<(fertilizer_schedule::Model, Option<crop::Model>)>, ServiceError> {
        let db = &*self.db_pool;
        fertilizer_schedule::Entity::find()
            .find_also_related(crop::Entity)
            .order_by_asc(fertilizer_schedule::Column::NextApplicationOn)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Gets a fertilizer schedule by ID
    #[instrument(skip(self))]
    pub async fn get_fertilizer_schedule(
        &self,
        schedule_id: Uuid,
    ) -> Result<Option<fertilizer_schedule::Model>, ServiceError> {
        let db = &*self.db_pool;
        fertilizer_schedule::Entity::find_by_id(schedule_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Overwrites a fertilizer schedule's descriptive fields
    #[instrument(skip(self))]
    pub async fn update_fertilizer_schedule(
        &self,
        schedule_id: Uuid,
        update: ScheduleUpdate,
    ) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let existing = fertilizer_schedule::Entity::find_by_id(schedule_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Fertilizer schedule {} not found", schedule_id))
            })?;

        if let Some(next) = update.next_event_on {
            check_date_order(existing.last_applied_on, next)?;
        }
        if let Some(rate) = update.rate {
            if rate <= Decimal::ZERO {
                return Err(ServiceError::invalid_field(
                    "quantity_per_acre",
                    "must be a positive number",
                ));
            }
        }

        let mut model: fertilizer_schedule::ActiveModel = existing.into();
        if let Some(description) = update.description {
            model.description = Set(description);
        }
        if let Some(rate) = update.rate {
            model.quantity_per_acre = Set(rate);
        }
        if let Some(next) = update.next_event_on {
            model.next_application_on = Set(next);
        }
        model.updated_at = Set(Utc::now());
        model.update(db).await.map_err(ServiceError::DatabaseError)?;

        info!(schedule_id = %schedule_id, "Fertilizer schedule updated");
        Ok(())
    }

    /// Deletes a fertilizer schedule
    #[instrument(skip(self))]
    pub async fn delete_fertilizer_schedule(&self, schedule_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let result = fertilizer_schedule::Entity::delete_by_id(schedule_id)
            .exec(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Fertilizer schedule {} not found",
                schedule_id
            )));
        }
        info!(schedule_id = %schedule_id, "Fertilizer schedule deleted");
        Ok(())
    }

    /// Logs one fertilizer application: appends the log row and advances
    /// the schedule's last/next dates in a single transaction.
    #[instrument(skip(self))]
    pub async fn log_fertilizer_application(
        &self,
        schedule_id: Uuid,
        event: LogEvent,
    ) -> Result<Uuid, ServiceError> {
        check_log_event(&event)?;

        let db = &*self.db_pool;
        let txn = db.begin().await.map_err(ServiceError::DatabaseError)?;

        let schedule = fertilizer_schedule::Entity::find_by_id(schedule_id)
            .one(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Fertilizer schedule {} not found", schedule_id))
            })?;

        let log_id = Uuid::new_v4();
        let log = fertilizer_log::ActiveModel {
            id: Set(log_id),
            schedule_id: Set(schedule.id),
            event_on: Set(event.event_on),
            amount_used: Set(event.amount_used),
            notes: Set(event.notes),
            created_at: Set(Utc::now()),
        };
        log.insert(&txn).await.map_err(ServiceError::DatabaseError)?;

        let mut model: fertilizer_schedule::ActiveModel = schedule.into();
        model.last_applied_on = Set(Some(event.event_on));
        model.next_application_on = Set(event.next_event_on);
        model.updated_at = Set(Utc::now());
        model
            .update(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        txn.commit().await.map_err(ServiceError::DatabaseError)?;

        info!(schedule_id = %schedule_id, log_id = %log_id, "Fertilizer application logged");
        Ok(log_id)
    }

    /// Lists the application log for one fertilizer schedule, newest first
    #[instrument(skip(self))]
    pub async fn list_fertilizer_logs(
        &self,
        schedule_id: Uuid,
    ) -> Result<Vec<fertilizer_log::Model>, ServiceError> {
        let db = &*self.db_pool;
        fertilizer_log::Entity::find()
            .filter(fertilizer_log::Column::ScheduleId.eq(schedule_id))
            .order_by_desc(fertilizer_log::Column::EventOn)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Counts fertilizer schedules due on or before the given day
    #[instrument(skip(self))]
    pub async fn count_fertilizer_due(&self, today: NaiveDate) -> Result<u64, ServiceError> {
        let db = &*self.db_pool;
        fertilizer_schedule::Entity::find()
            .filter(fertilizer_schedule::Column::NextApplicationOn.lte(today))
            .count(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    // ---- irrigation ----

    /// Creates an irrigation schedule for an existing crop
    #[instrument(skip(self))]
    pub async fn create_irrigation_schedule(
        &self,
        input: NewSchedule,
    ) -> Result<Uuid, ServiceError> {
        check_date_order(input.last_event_on, input.next_event_on)?;
        if input.rate <= Decimal::ZERO {
            return Err(ServiceError::invalid_field(
                "water_rate",
                "must be a positive number",
            ));
        }
        self.require_crop(input.crop_id).await?;

        let db = &*self.db_pool;
        let now = Utc::now();
        let id = Uuid::new_v4();

        let model = irrigation_schedule::ActiveModel {
            id: Set(id),
            crop_id: Set(input.crop_id),
            description: Set(input.description),
            water_rate: Set(input.rate),
            last_event_on: Set(input.last_event_on),
            next_event_on: Set(input.next_event_on),
            created_at: Set(now),
            updated_at: Set(now),
        };
        model.insert(db).await.map_err(ServiceError::DatabaseError)?;

        info!(schedule_id = %id, "Irrigation schedule created");
        Ok(id)
    }

    /// Lists irrigation schedules with their crops, soonest first
    #[instrument(skip(self))]
    pub async fn list_irrigation_schedules(
        &self,
    ) -> Result<Vec<(irrigation_schedule::Model, Option<crop::Model>)>, ServiceError> {
        let db = &*self.db_pool;
        irrigation_schedule::Entity::find()
            .find_also_related(crop::Entity)
            .order_by_asc(irrigation_schedule::Column::NextEventOn)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Gets an irrigation schedule by ID
    #[instrument(skip(self))]
    pub async fn get_irrigation_schedule(
        &self,
        schedule_id: Uuid,
    ) -> Result<Option<irrigation_schedule::Model>, ServiceError> {
        let db = &*self.db_pool;
        irrigation_schedule::Entity::find_by_id(schedule_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Overwrites an irrigation schedule's descriptive fields
    #[instrument(skip(self))]
    pub async fn update_irrigation_schedule(
        &self,
        schedule_id: Uuid,
        update: ScheduleUpdate,
    ) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let existing = irrigation_schedule::Entity::find_by_id(schedule_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Irrigation schedule {} not found", schedule_id))
            })?;

        if let Some(next) = update.next_event_on {
            check_date_order(existing.last_event_on, next)?;
        }
        if let Some(rate) = update.rate {
            if rate <= Decimal::ZERO {
                return Err(ServiceError::invalid_field(
                    "water_rate",
                    "must be a positive number",
                ));
            }
        }

        let mut model: irrigation_schedule::ActiveModel = existing.into();
        if let Some(description) = update.description {
            model.description = Set(description);
        }
        if let Some(rate) = update.rate {
            model.water_rate = Set(rate);
        }
        if let Some(next) = update.next_event_on {
            model.next_event_on = Set(next);
        }
        model.updated_at = Set(Utc::now());
        model.update(db).await.map_err(ServiceError::DatabaseError)?;

        info!(schedule_id = %schedule_id, "Irrigation schedule updated");
        Ok(())
    }

    /// Deletes an irrigation schedule
    #[instrument(skip(self))]
    pub async fn delete_irrigation_schedule(&self, schedule_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let result = irrigation_schedule::Entity::delete_by_id(schedule_id)
            .exec(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Irrigation schedule {} not found",
                schedule_id
            )));
        }
        info!(schedule_id = %schedule_id, "Irrigation schedule deleted");
        Ok(())
    }

    /// Logs one irrigation event; same transactional contract as the
    /// fertilizer variant.
    #[instrument(skip(self))]
    pub async fn log_irrigation_event(
        &self,
        schedule_id: Uuid,
        event: LogEvent,
    ) -> Result<Uuid, ServiceError> {
        check_log_event(&event)?;

        let db = &*self.db_pool;
        let txn = db.begin().await.map_err(ServiceError::DatabaseError)?;

        let schedule = irrigation_schedule::Entity::find_by_id(schedule_id)
            .one(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Irrigation schedule {} not found", schedule_id))
            })?;

        let log_id = Uuid::new_v4();
        let log = irrigation_log::ActiveModel {
            id: Set(log_id),
            schedule_id: Set(schedule.id),
            event_on: Set(event.event_on),
            amount_used: Set(event.amount_used),
            notes: Set(event.notes),
            created_at: Set(Utc::now()),
        };
        log.insert(&txn).await.map_err(ServiceError::DatabaseError)?;

        let mut model: irrigation_schedule::ActiveModel = schedule.into();
        model.last_event_on = Set(Some(event.event_on));
        model.next_event_on = Set(event.next_event_on);
        model.updated_at = Set(Utc::now());
        model
            .update(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        txn.commit().await.map_err(ServiceError::DatabaseError)?;

        info!(schedule_id = %schedule_id, log_id = %log_id, "Irrigation event logged");
        Ok(log_id)
    }

    /// Lists the event log for one irrigation schedule, newest first
    #[instrument(skip(self))]
    pub async fn list_irrigation_logs(
        &self,
        schedule_id: Uuid,
    ) -> Result<Vec<irrigation_log::Model>, ServiceError> {
        let db = &*self.db_pool;
        irrigation_log::Entity::find()
            .filter(irrigation_log::Column::ScheduleId.eq(schedule_id))
            .order_by_desc(irrigation_log::Column::EventOn)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Counts irrigation schedules due on or before the given day
    #[instrument(skip(self))]
    pub async fn count_irrigation_due(&self, today: NaiveDate) -> Result<u64, ServiceError> {
        let db = &*self.db_pool;
        irrigation_schedule::Entity::find()
            .filter(irrigation_schedule::Column::NextEventOn.lte(today))
            .count(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }
}
