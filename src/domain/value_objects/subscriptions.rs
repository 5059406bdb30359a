use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::plans::PlanEntity;
use crate::domain::value_objects::enums::subscription_statuses::SubscriptionStatus;
use crate::domain::value_objects::plans::PlanLimits;

#[derive(Debug, Serialize)]
pub struct PlanDto {
    pub id: Uuid,
    pub name: Option<String>,
    pub price_minor: i32,
    pub duration_days: i32,
    pub limits: PlanLimits,
}

impl From<PlanEntity> for PlanDto {
    fn from(value: PlanEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            price_minor: value.price_minor,
            duration_days: value.duration_days,
            limits: value.limits,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CurrentSubscriptionDto {
    pub plan_id: Uuid,
    pub plan_name: Option<String>,
    pub status: SubscriptionStatus,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub limits: PlanLimits,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePlanRequest {
    pub name: String,
    pub price_minor: i32,
    pub duration_days: i32,
    pub limits: PlanLimits,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePlanRequest {
    pub name: Option<String>,
    pub price_minor: Option<i32>,
    pub duration_days: Option<i32>,
    pub limits: Option<PlanLimits>,
}
