use crate::{
    db::DbPool,
    entities::{inventory_category, inventory_item, inventory_log},
    errors::ServiceError,
    filters::DateRange,
    reporting::{decimal_to_f64, waste_rate},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Service for inventory items, categories and the stock movement log.
#[derive(Clone)]
pub struct InventoryService {
    db_pool: Arc<DbPool>,
}

#[derive(Debug, Clone)]
pub struct NewInventoryItem {
    pub name: String,
    pub sku: String,
    pub category_id: Uuid,
    pub quantity: Decimal,
    pub reorder_level: Decimal,
    pub unit_cost: Decimal,
    pub unit: String,
    pub expires_on: Option<chrono::NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct InventoryItemUpdate {
    pub name: Option<String>,
    pub reorder_level: Option<Decimal>,
    pub unit_cost: Option<Decimal>,
    pub expires_on: Option<Option<chrono::NaiveDate>>,
}

/// Usage and waste totals over one reporting window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovementTotals {
    pub added: Decimal,
    pub used: Decimal,
    pub wasted: Decimal,
}

impl MovementTotals {
    /// Waste as a percentage of everything that left stock
    pub fn waste_rate(&self) -> f64 {
        waste_rate(decimal_to_f64(self.wasted), decimal_to_f64(self.used))
    }
}

impl InventoryService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Creates an inventory item under an existing category
    #[instrument(skip(self))]
    pub async fn create_item(&self, input: NewInventoryItem) -> Result<Uuid, ServiceError> {
        if input.name.trim().is_empty() {
            return Err(ServiceError::invalid_field("name", "must not be empty"));
        }
        if input.sku.trim().is_empty() {
            return Err(ServiceError::invalid_field("sku", "must not be empty"));
        }
        if input.quantity < Decimal::ZERO || input.reorder_level < Decimal::ZERO {
            return Err(ServiceError::invalid_field(
                "quantity",
                "must not be negative",
            ));
        }

        let db = &*self.db_pool;
        inventory_category::Entity::find_by_id(input.category_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Inventory category {} not found", input.category_id))
            })?;

        let existing = inventory_item::Entity::find()
            .filter(inventory_item::Column::Sku.eq(input.sku.clone()))
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "SKU {} is already in use",
                input.sku
            )));
        }

        let now = Utc::now();
        let id = Uuid::new_v4();
        let model = inventory_item::ActiveModel {
            id: Set(id),
            name: Set(input.name),
            sku: Set(input.sku),
            category_id: Set(input.category_id),
            quantity: Set(input.quantity),
            reorder_level: Set(input.reorder_level),
            unit_cost: Set(input.unit_cost),
            unit: Set(input.unit),
            expires_on: Set(input.expires_on),
            status: Set(inventory_item::ItemStatus::Active),
            created_at: Set(now),
            updated_at: Set(now),
        };
        model.insert(db).await.map_err(ServiceError::DatabaseError)?;

        info!(item_id = %id, "Inventory item created");
        Ok(id)
    }

    /// Gets an inventory item by ID
    #[instrument(skip(self))]
    pub async fn get_item(
        &self,
        item_id: Uuid,
    ) -> Result<Option<inventory_item::Model>, ServiceError> {
        let db = &*self.db_pool;
        inventory_item::Entity::find_by_id(item_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Lists active items with their categories, ordered by name
    #[instrument(skip(self))]
    pub async fn list_items(
        &self,
        category_id: Option<Uuid>,
    ) -> Result<Vec<(inventory_item::Model, Option<inventory_category::Model>)>, ServiceError>
    {
        let db = &*self.db_pool;
        let mut query = inventory_item::Entity::find()
            .filter(inventory_item::Column::Status.eq(inventory_item::ItemStatus::Active))
            .find_also_related(inventory_category::Entity)
            .order_by_asc(inventory_item::Column::Name);
        if let Some(category_id) = category_id {
            query = query.filter(inventory_item::Column::CategoryId.eq(category_id));
        }
        query.all(db).await.map_err(ServiceError::DatabaseError)
    }

    /// Overwrites an item's descriptive fields
    #[instrument(skip(self))]
    pub async fn update_item(
        &self,
        item_id: Uuid,
        update: InventoryItemUpdate,
    ) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let existing = inventory_item::Entity::find_by_id(item_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Inventory item {} not found", item_id))
            })?;

        if let Some(reorder) = update.reorder_level {
            if reorder < Decimal::ZERO {
                return Err(ServiceError::invalid_field(
                    "reorder_level",
                    "must not be negative",
                ));
            }
        }

        let mut model: inventory_item::ActiveModel = existing.into();
        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(ServiceError::invalid_field("name", "must not be empty"));
            }
            model.name = Set(name);
        }
        if let Some(reorder) = update.reorder_level {
            model.reorder_level = Set(reorder);
        }
        if let Some(cost) = update.unit_cost {
            model.unit_cost = Set(cost);
        }
        if let Some(expires_on) = update.expires_on {
            model.expires_on = Set(expires_on);
        }
        model.updated_at = Set(Utc::now());
        model.update(db).await.map_err(ServiceError::DatabaseError)?;

        info!(item_id = %item_id, "Inventory item updated");
        Ok(())
    }

    /// Retires an item; its movement log stays intact
    #[instrument(skip(self))]
    pub async fn retire_item(&self, item_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let existing = inventory_item::Entity::find_by_id(item_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Inventory item {} not found", item_id))
            })?;

        let mut model: inventory_item::ActiveModel = existing.into();
        model.status = Set(inventory_item::ItemStatus::Inactive);
        model.updated_at = Set(Utc::now());
        model.update(db).await.map_err(ServiceError::DatabaseError)?;

        info!(item_id = %item_id, "Inventory item retired");
        Ok(())
    }

    /// Applies a stock movement: appends the log row and adjusts the
    /// item's on-hand quantity in a single transaction.
    #[instrument(skip(self))]
    pub async fn record_movement(
        &self,
        item_id: Uuid,
        action: inventory_log::InventoryAction,
        quantity: Decimal,
    ) -> Result<Uuid, ServiceError> {
        use sea_orm::TransactionTrait;

        if quantity <= Decimal::ZERO {
            return Err(ServiceError::invalid_field(
                "quantity",
                "must be a positive number",
            ));
        }

        let db = &*self.db_pool;
        let txn = db.begin().await.map_err(ServiceError::DatabaseError)?;

        let item = inventory_item::Entity::find_by_id(item_id)
            .one(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Inventory item {} not found", item_id))
            })?;

        let delta = match action {
            inventory_log::InventoryAction::Purchase
            | inventory_log::InventoryAction::ManualAdd => quantity,
            _ => -quantity,
        };
        let new_quantity = item.quantity + delta;
        if new_quantity < Decimal::ZERO {
            return Err(ServiceError::InvalidOperation(format!(
                "Cannot remove {} {}; only {} on hand",
                quantity, item.unit, item.quantity
            )));
        }

        let log_id = Uuid::new_v4();
        let log = inventory_log::ActiveModel {
            id: Set(log_id),
            item_id: Set(item.id),
            action: Set(action),
            quantity: Set(quantity),
            recorded_at: Set(Utc::now()),
        };
        log.insert(&txn).await.map_err(ServiceError::DatabaseError)?;

        let mut model: inventory_item::ActiveModel = item.into();
        model.quantity = Set(new_quantity);
        model.updated_at = Set(Utc::now());
        model
            .update(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        txn.commit().await.map_err(ServiceError::DatabaseError)?;

        info!(item_id = %item_id, log_id = %log_id, ?action, "Inventory movement recorded");
        Ok(log_id)
    }

    /// Lists categories ordered by name
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<inventory_category::Model>, ServiceError> {
        let db = &*self.db_pool;
        inventory_category::Entity::find()
            .order_by_asc(inventory_category::Column::Name)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Creates a category
    #[instrument(skip(self))]
    pub async fn create_category(&self, name: String) -> Result<Uuid, ServiceError> {
        if name.trim().is_empty() {
            return Err(ServiceError::invalid_field("name", "must not be empty"));
        }
        let db = &*self.db_pool;
        let id = Uuid::new_v4();
        let model = inventory_category::ActiveModel {
            id: Set(id),
            name: Set(name),
        };
        model.insert(db).await.map_err(ServiceError::DatabaseError)?;
        info!(category_id = %id, "Inventory category created");
        Ok(id)
    }

    /// Sums stock movements inside the window, grouped into added,
    /// used (manual removes and sales) and wasted.
    #[instrument(skip(self))]
    pub async fn movement_totals(
        &self,
        range: &DateRange,
        item_id: Option<Uuid>,
    ) -> Result<MovementTotals, ServiceError> {
        let db = &*self.db_pool;
        let mut query = inventory_log::Entity::find();
        if let Some(item_id) = item_id {
            query = query.filter(inventory_log::Column::ItemId.eq(item_id));
        }
        let logs = query.all(db).await.map_err(ServiceError::DatabaseError)?;

        let mut totals = MovementTotals::default();
        for log in logs {
            if !range.contains(log.recorded_at.date_naive()) {
                continue;
            }
            if log.action.is_waste() {
                totals.wasted += log.quantity;
            } else if log.action.is_usage() {
                totals.used += log.quantity;
            } else {
                totals.added += log.quantity;
            }
        }
        Ok(totals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn waste_rate_counts_waste_against_everything_consumed() {
        let totals = MovementTotals {
            added: dec!(100),
            used: dec!(30),
            wasted: dec!(10),
        };
        assert_eq!(totals.waste_rate(), 25.0);
    }

    #[test]
    fn waste_rate_is_zero_when_nothing_left_stock() {
        let totals = MovementTotals {
            added: dec!(100),
            ..Default::default()
        };
        assert_eq!(totals.waste_rate(), 0.0);
    }
}
