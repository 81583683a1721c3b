use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A physical field on the farm. Referenced (never owned) by crops, soil
/// tests, schedules and environmental issues.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fields")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub area_acres: Decimal,
    pub soil_type: String,
    pub last_crop: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::crop::Entity")]
    Crops,
    #[sea_orm(has_many = "super::soil_test::Entity")]
    SoilTests,
    #[sea_orm(has_many = "super::soil_treatment::Entity")]
    SoilTreatments,
    #[sea_orm(has_many = "super::environmental_issue::Entity")]
    EnvironmentalIssues,
}

impl Related<super::crop::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Crops.def()
    }
}

impl Related<super::soil_test::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SoilTests.def()
    }
}

impl Related<super::soil_treatment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SoilTreatments.def()
    }
}

impl Related<super::environmental_issue::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EnvironmentalIssues.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
