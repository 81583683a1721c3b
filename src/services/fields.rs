use crate::{
    db::DbPool,
    entities::{crop, field},
    errors::ServiceError,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Service for managing farm fields
#[derive(Clone)]
pub struct FieldService {
    db_pool: Arc<DbPool>,
}

/// Input for creating a field
#[derive(Debug, Clone)]
pub struct NewField {
    pub name: String,
    pub location: String,
    pub area_acres: Decimal,
    pub soil_type: String,
    pub last_crop: Option<String>,
    pub notes: Option<String>,
}

/// Partial update for a field; absent values leave the column untouched
#[derive(Debug, Clone, Default)]
pub struct FieldUpdate {
    pub name: Option<String>,
    pub location: Option<String>,
    pub area_acres: Option<Decimal>,
    pub soil_type: Option<String>,
    pub last_crop: Option<String>,
    pub notes: Option<String>,
}

impl FieldService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Creates a new field
    #[instrument(skip(self))]
    pub async fn create_field(&self, input: NewField) -> Result<Uuid, ServiceError> {
        if input.name.trim().is_empty() {
            return Err(ServiceError::invalid_field("name", "must not be empty"));
        }
        if input.area_acres <= Decimal::ZERO {
            return Err(ServiceError::invalid_field(
                "area_acres",
                "must be a positive number",
            ));
        }

        let db = &*self.db_pool;
        let now = Utc::now();
        let id = Uuid::new_v4();

        let model = field::ActiveModel {
            id: Set(id),
            name: Set(input.name),
            location: Set(input.location),
            area_acres: Set(input.area_acres),
            soil_type: Set(input.soil_type),
            last_crop: Set(input.last_crop),
            notes: Set(input.notes),
            created_at: Set(now),
            updated_at: Set(now),
        };

        model.insert(db).await.map_err(ServiceError::DatabaseError)?;

        info!(field_id = %id, "Field created");
        Ok(id)
    }

    /// Gets a field by ID
    #[instrument(skip(self))]
    pub async fn get_field(&self, field_id: Uuid) -> Result<Option<field::Model>, ServiceError> {
        let db = &*self.db_pool;
        field::Entity::find_by_id(field_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Lists fields ordered by name
    #[instrument(skip(self))]
    pub async fn list_fields(
        &self,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<field::Model>, ServiceError> {
        let db = &*self.db_pool;
        field::Entity::find()
            .order_by_asc(field::Column::Name)
            .limit(Some(limit))
            .offset(offset)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Counts all fields
    #[instrument(skip(self))]
    pub async fn count_fields(&self) -> Result<u64, ServiceError> {
        let db = &*self.db_pool;
        field::Entity::find()
            .count(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Updates a field; resubmitting the same payload is a no-op
    #[instrument(skip(self))]
    pub async fn update_field(
        &self,
        field_id: Uuid,
        update: FieldUpdate,
    ) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let existing = field::Entity::find_by_id(field_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Field {} not found", field_id)))?;

        if let Some(area) = update.area_acres {
            if area <= Decimal::ZERO {
                return Err(ServiceError::invalid_field(
                    "area_acres",
                    "must be a positive number",
                ));
            }
        }

        let mut model: field::ActiveModel = existing.into();
        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(location) = update.location {
            model.location = Set(location);
        }
        if let Some(area) = update.area_acres {
            model.area_acres = Set(area);
        }
        if let Some(soil_type) = update.soil_type {
            model.soil_type = Set(soil_type);
        }
        if let Some(last_crop) = update.last_crop {
            model.last_crop = Set(Some(last_crop));
        }
        if let Some(notes) = update.notes {
            model.notes = Set(Some(notes));
        }
        model.updated_at = Set(Utc::now());

        model.update(db).await.map_err(ServiceError::DatabaseError)?;

        info!(field_id = %field_id, "Field updated");
        Ok(())
    }

    /// Deletes a field; refused while crops still reference it
    #[instrument(skip(self))]
    pub async fn delete_field(&self, field_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let referencing_crops = crop::Entity::find()
            .filter(crop::Column::FieldId.eq(field_id))
            .count(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if referencing_crops > 0 {
            return Err(ServiceError::Conflict(format!(
                "Field is still referenced by {} crop(s)",
                referencing_crops
            )));
        }

        let result = field::Entity::delete_by_id(field_id)
            .exec(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Field {} not found",
                field_id
            )));
        }

        info!(field_id = %field_id, "Field deleted");
        Ok(())
    }
}
