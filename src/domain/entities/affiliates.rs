use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::{commissions, referrals};

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = referrals)]
pub struct ReferralEntity {
    pub id: Uuid,
    pub referrer_id: Uuid,
    pub referred_user_id: Uuid,
    pub code: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = referrals)]
pub struct InsertReferralEntity {
    pub referrer_id: Uuid,
    pub referred_user_id: Uuid,
    pub code: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = commissions)]
pub struct CommissionEntity {
    pub id: Uuid,
    pub referrer_id: Uuid,
    pub payment_id: Uuid,
    pub amount_minor: i32,
    pub status: String,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = commissions)]
pub struct InsertCommissionEntity {
    pub referrer_id: Uuid,
    pub payment_id: Uuid,
    pub amount_minor: i32,
    pub status: String,
    pub paid_at: Option<DateTime<Utc>>,
}
