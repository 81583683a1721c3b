use crate::{
    db::DbPool,
    entities::{crop, crop::CropStatus, fertilizer_schedule, field, irrigation_schedule},
    errors::ServiceError,
};
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Service for managing crops planted on fields
#[derive(Clone)]
pub struct CropService {
    db_pool: Arc<DbPool>,
}

#[derive(Debug, Clone)]
pub struct NewCrop {
    pub field_id: Uuid,
    pub name: String,
    pub status: CropStatus,
    pub planted_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct CropUpdate {
    pub name: Option<String>,
    pub status: Option<CropStatus>,
    pub planted_on: Option<NaiveDate>,
}

impl CropService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Creates a crop on an existing field
    #[instrument(skip(self))]
    pub async fn create_crop(&self, input: NewCrop) -> Result<Uuid, ServiceError> {
        if input.name.trim().is_empty() {
            return Err(ServiceError::invalid_field("name", "must not be empty"));
        }

        let db = &*self.db_pool;

        field::Entity::find_by_id(input.field_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Field {} not found", input.field_id))
            })?;

        let now = Utc::now();
        let id = Uuid::new_v4();

        let model = crop::ActiveModel {
            id: Set(id),
            field_id: Set(input.field_id),
            name: Set(input.name),
            status: Set(input.status),
            planted_on: Set(input.planted_on),
            created_at: Set(now),
            updated_at: Set(now),
        };

        model.insert(db).await.map_err(ServiceError::DatabaseError)?;

        info!(crop_id = %id, "Crop created");
        Ok(id)
    }

    /// Gets a crop by ID
    #[instrument(skip(self))]
    pub async fn get_crop(&self, crop_id: Uuid) -> Result<Option<crop::Model>, ServiceError> {
        let db = &*self.db_pool;
        crop::Entity::find_by_id(crop_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Lists crops, optionally restricted to one field
    #[instrument(skip(self))]
    pub async fn list_crops(
        &self,
        field_id: Option<Uuid>,
    ) -> Result<Vec<crop::Model>, ServiceError> {
        let db = &*self.db_pool;
        let mut query = crop::Entity::find().order_by_asc(crop::Column::Name);
        if let Some(field_id) = field_id {
            query = query.filter(crop::Column::FieldId.eq(field_id));
        }
        query.all(db).await.map_err(ServiceError::DatabaseError)
    }

    /// Updates a crop; resubmitting the same payload is a no-op
    #[instrument(skip(self))]
    pub async fn update_crop(&self, crop_id: Uuid, update: CropUpdate) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let existing = crop::Entity::find_by_id(crop_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Crop {} not found", crop_id)))?;

        let mut model: crop::ActiveModel = existing.into();
        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(status) = update.status {
            model.status = Set(status);
        }
        if let Some(planted_on) = update.planted_on {
            model.planted_on = Set(Some(planted_on));
        }
        model.updated_at = Set(Utc::now());

        model.update(db).await.map_err(ServiceError::DatabaseError)?;

        info!(crop_id = %crop_id, "Crop updated");
        Ok(())
    }

    /// Deletes a crop; refused while schedules still reference it
    #[instrument(skip(self))]
    pub async fn delete_crop(&self, crop_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let referencing_schedules = fertilizer_schedule::Entity::find()
            .filter(fertilizer_schedule::Column::CropId.eq(crop_id))
            .count(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            + irrigation_schedule::Entity::find()
                .filter(irrigation_schedule::Column::CropId.eq(crop_id))
                .count(db)
                .await
                .map_err(ServiceError::DatabaseError)?;

        if referencing_schedules > 0 {
            return Err(ServiceError::Conflict(format!(
                "Crop is still referenced by {} schedule(s)",
                referencing_schedules
            )));
        }

        let result = crop::Entity::delete_by_id(crop_id)
            .exec(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("Crop {} not found", crop_id)));
        }

        info!(crop_id = %crop_id, "Crop deleted");
        Ok(())
    }
}
