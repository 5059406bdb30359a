use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::payments::PaymentEntity;

#[derive(Debug, Serialize)]
pub struct PaymentDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: Uuid,
    pub amount_minor: i32,
    pub provider_ref: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<PaymentEntity> for PaymentDto {
    fn from(value: PaymentEntity) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            plan_id: value.plan_id,
            amount_minor: value.amount_minor,
            provider_ref: value.provider_ref,
            status: value.status,
            created_at: value.created_at,
        }
    }
}
