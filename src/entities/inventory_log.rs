use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Append-only stock movement used only for aggregation (usage counts,
/// waste rate).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub item_id: Uuid,
    pub action: InventoryAction,
    pub quantity: Decimal,
    pub recorded_at: DateTimeUtc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum InventoryAction {
    #[sea_orm(string_value = "purchase")]
    Purchase,
    #[sea_orm(string_value = "manual_add")]
    ManualAdd,
    #[sea_orm(string_value = "manual_remove")]
    ManualRemove,
    #[sea_orm(string_value = "sale")]
    Sale,
    #[sea_orm(string_value = "waste")]
    Waste,
}

impl InventoryAction {
    /// Actions that count as consumption when computing the waste rate.
    pub fn is_usage(self) -> bool {
        matches!(self, Self::ManualRemove | Self::Sale)
    }

    pub fn is_waste(self) -> bool {
        matches!(self, Self::Waste)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::inventory_item::Entity",
        from = "Column::ItemId",
        to = "super::inventory_item::Column::Id"
    )]
    Item,
}

impl Related<super::inventory_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Item.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
