use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Append-only record of a soil amendment applied to a field.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "soil_treatments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub field_id: Uuid,
    pub treatment_type: TreatmentType,
    pub applied_on: Date,
    pub total_cost: Decimal,
    pub cost_per_acre: Decimal,
    pub created_at: DateTimeUtc,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumIter,
    DeriveActiveEnum,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "title_case")]
pub enum TreatmentType {
    #[sea_orm(string_value = "lime")]
    Lime,
    #[sea_orm(string_value = "gypsum")]
    Gypsum,
    #[sea_orm(string_value = "compost")]
    Compost,
    #[sea_orm(string_value = "sulfur")]
    Sulfur,
    #[sea_orm(string_value = "manure")]
    Manure,
    #[sea_orm(string_value = "biochar")]
    Biochar,
    #[sea_orm(string_value = "cover_crop")]
    CoverCrop,
    #[sea_orm(string_value = "other")]
    Other,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::field::Entity",
        from = "Column::FieldId",
        to = "super::field::Column::Id"
    )]
    Field,
}

impl Related<super::field::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Field.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
