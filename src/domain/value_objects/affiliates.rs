use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::affiliates::CommissionEntity;
use crate::domain::value_objects::enums::commission_statuses::CommissionStatus;

#[derive(Debug, Deserialize)]
pub struct RegisterReferralRequest {
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct CommissionDto {
    pub id: Uuid,
    pub payment_id: Uuid,
    pub amount_minor: i32,
    pub status: CommissionStatus,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<CommissionEntity> for CommissionDto {
    fn from(value: CommissionEntity) -> Self {
        Self {
            id: value.id,
            payment_id: value.payment_id,
            amount_minor: value.amount_minor,
            status: CommissionStatus::from_str(&value.status),
            paid_at: value.paid_at,
            created_at: value.created_at,
        }
    }
}
