use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "crops")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub field_id: Uuid,
    pub name: String,
    pub status: CropStatus,
    pub planted_on: Option<Date>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum CropStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::field::Entity",
        from = "Column::FieldId",
        to = "super::field::Column::Id"
    )]
    Field,
    #[sea_orm(has_many = "super::fertilizer_schedule::Entity")]
    FertilizerSchedules,
    #[sea_orm(has_many = "super::irrigation_schedule::Entity")]
    IrrigationSchedules,
}

impl Related<super::field::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Field.def()
    }
}

impl Related<super::fertilizer_schedule::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FertilizerSchedules.def()
    }
}

impl Related<super::irrigation_schedule::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IrrigationSchedules.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
