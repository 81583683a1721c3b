use crate::{
    db::DbPool,
    entities::{field, soil_test, soil_treatment},
    errors::ServiceError,
    reporting::{ph_effectiveness, PhEffectiveness},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Service for soil test results and soil treatments.
#[derive(Clone)]
pub struct SoilService {
    db_pool: Arc<DbPool>,
}

#[derive(Debug, Clone)]
pub struct NewSoilTest {
    pub field_id: Uuid,
    pub tested_on: NaiveDate,
    pub ph: f64,
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub moisture: f64,
    pub temperature: f64,
    pub organic_matter: f64,
}

#[derive(Debug, Clone)]
pub struct NewSoilTreatment {
    pub field_id: Uuid,
    pub treatment_type: soil_treatment::TreatmentType,
    pub applied_on: NaiveDate,
    pub total_cost: Decimal,
    pub cost_per_acre: Decimal,
}

/// One treatment joined with the nearest soil tests around its
/// application date, banded by the resulting pH swing.
#[derive(Debug, Clone)]
pub struct TreatmentEffectiveness {
    pub treatment: soil_treatment::Model,
    pub ph_before: Option<f64>,
    pub ph_after: Option<f64>,
    pub effectiveness: PhEffectiveness,
}

impl SoilService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    async fn require_field(&self, field_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        field::Entity::find_by_id(field_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Field {} not found", field_id)))?;
        Ok(())
    }

    /// Records a soil test result against an existing field
    #[instrument(skip(self))]
    pub async fn record_test(&self, input: NewSoilTest) -> Result<Uuid, ServiceError> {
        if !(0.0..=14.0).contains(&input.ph) {
            return Err(ServiceError::invalid_field(
                "ph",
                "must be between 0 and 14",
            ));
        }
        for (name, value) in [
            ("nitrogen", input.nitrogen),
            ("phosphorus", input.phosphorus),
            ("potassium", input.potassium),
            ("moisture", input.moisture),
            ("organic_matter", input.organic_matter),
        ] {
            if value < 0.0 {
                return Err(ServiceError::invalid_field(name, "must not be negative"));
            }
        }
        self.require_field(input.field_id).await?;

        let db = &*self.db_pool;
        let id = Uuid::new_v4();
        let model = soil_test::ActiveModel {
            id: Set(id),
            field_id: Set(input.field_id),
            tested_on: Set(input.tested_on),
            ph: Set(input.ph),
            nitrogen: Set(input.nitrogen),
            phosphorus: Set(input.phosphorus),
            potassium: Set(input.potassium),
            moisture: Set(input.moisture),
            temperature: Set(input.temperature),
            organic_matter: Set(input.organic_matter),
            created_at: Set(Utc::now()),
        };
        model.insert(db).await.map_err(ServiceError::DatabaseError)?;

        info!(test_id = %id, field_id = %input.field_id, "Soil test recorded");
        Ok(id)
    }

    /// Lists soil tests, newest first, optionally restricted to a field
    #[instrument(skip(self))]
    pub async fn list_tests(
        &self,
        field_id: Option<Uuid>,
        limit: Option<u64>,
    ) -> Result<Vec<soil_test::Model>, ServiceError> {
        let db = &*self.db_pool;
        let mut query = soil_test::Entity::find()
            .order_by_desc(soil_test::Column::TestedOn)
            .order_by_desc(soil_test::Column::CreatedAt);
        if let Some(field_id) = field_id {
            query = query.filter(soil_test::Column::FieldId.eq(field_id));
        }
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        query.all(db).await.map_err(ServiceError::DatabaseError)
    }

    /// Returns the most recent test for each field that has any
    #[instrument(skip(self))]
    pub async fn latest_per_field(&self) -> Result<Vec<soil_test::Model>, ServiceError> {
        let tests = self.list_tests(None, None).await?;
        let mut seen = HashSet::new();
        Ok(tests
            .into_iter()
            .filter(|t| seen.insert(t.field_id))
            .collect())
    }

    /// Deletes a soil test result
    #[instrument(skip(self))]
    pub async fn delete_test(&self, test_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let result = soil_test::Entity::delete_by_id(test_id)
            .exec(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Soil test {} not found",
                test_id
            )));
        }
        info!(test_id = %test_id, "Soil test deleted");
        Ok(())
    }

    /// Records a soil treatment against an existing field
    #[instrument(skip(self))]
    pub async fn record_treatment(&self, input: NewSoilTreatment) -> Result<Uuid, ServiceError> {
        if input.total_cost < Decimal::ZERO || input.cost_per_acre < Decimal::ZERO {
            return Err(ServiceError::invalid_field(
                "total_cost",
                "must not be negative",
            ));
        }
        self.require_field(input.field_id).await?;

        let db = &*self.db_pool;
        let id = Uuid::new_v4();
        let model = soil_treatment::ActiveModel {
            id: Set(id),
            field_id: Set(input.field_id),
            treatment_type: Set(input.treatment_type),
            applied_on: Set(input.applied_on),
            total_cost: Set(input.total_cost),
            cost_per_acre: Set(input.cost_per_acre),
            created_at: Set(Utc::now()),
        };
        model.insert(db).await.map_err(ServiceError::DatabaseError)?;

        info!(treatment_id = %id, field_id = %input.field_id, "Soil treatment recorded");
        Ok(id)
    }

    /// Lists treatments, newest first, optionally restricted to a field
    #[instrument(skip(self))]
    pub async fn list_treatments(
        &self,
        field_id: Option<Uuid>,
    ) -> Result<Vec<soil_treatment::Model>, ServiceError> {
        let db = &*self.db_pool;
        let mut query = soil_treatment::Entity::find()
            .order_by_desc(soil_treatment::Column::AppliedOn);
        if let Some(field_id) = field_id {
            query = query.filter(soil_treatment::Column::FieldId.eq(field_id));
        }
        query.all(db).await.map_err(ServiceError::DatabaseError)
    }

    /// Evaluates each treatment by comparing the nearest soil test taken
    /// on or before its application date with the nearest one after it.
    /// Treatments missing either reading band as Minimal.
    #[instrument(skip(self))]
    pub async fn treatment_effectiveness(
        &self,
        field_id: Option<Uuid>,
    ) -> Result<Vec<TreatmentEffectiveness>, ServiceError> {
        let treatments = self.list_treatments(field_id).await?;
        let tests = self.list_tests(field_id, None).await?;

        Ok(treatments
            .into_iter()
            .map(|treatment| {
                let ph_before = tests
                    .iter()
                    .filter(|t| t.field_id == treatment.field_id)
                    .filter(|t| t.tested_on <= treatment.applied_on)
                    .max_by_key(|t| t.tested_on)
                    .map(|t| t.ph);
                let ph_after = tests
                    .iter()
                    .filter(|t| t.field_id == treatment.field_id)
                    .filter(|t| t.tested_on > treatment.applied_on)
                    .min_by_key(|t| t.tested_on)
                    .map(|t| t.ph);
                let effectiveness = match (ph_before, ph_after) {
                    (Some(before), Some(after)) => ph_effectiveness(after - before),
                    _ => PhEffectiveness::Minimal,
                };
                TreatmentEffectiveness {
                    treatment,
                    ph_before,
                    ph_after,
                    effectiveness,
                }
            })
            .collect())
    }
}
