use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::value_objects::plans::PlanLimits;
use crate::infrastructure::postgres::schema::plans;

#[derive(Debug, Clone)]
pub struct PlanEntity {
    pub id: Uuid,
    pub name: Option<String>,
    pub price_minor: i32,
    pub duration_days: i32,
    pub limits: PlanLimits,
    pub is_active: bool,
}

/// Raw row used for Diesel queries. Limits stay as JSON and are parsed into PlanLimits.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = plans)]
pub struct PlanRow {
    pub id: Uuid,
    pub name: Option<String>,
    pub price_minor: i32,
    pub duration_days: i32,
    pub limits: serde_json::Value,
    pub is_active: bool,
}

impl From<PlanRow> for PlanEntity {
    fn from(value: PlanRow) -> Self {
        let limits = serde_json::from_value(value.limits).unwrap_or_default();

        Self {
            id: value.id,
            name: value.name,
            price_minor: value.price_minor,
            duration_days: value.duration_days,
            limits,
            is_active: value.is_active,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = plans)]
pub struct InsertPlanRow {
    pub name: Option<String>,
    pub price_minor: i32,
    pub duration_days: i32,
    pub limits: serde_json::Value,
    pub is_active: bool,
}
