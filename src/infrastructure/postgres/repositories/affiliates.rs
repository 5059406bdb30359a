use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::affiliates::{CommissionEntity, InsertCommissionEntity, InsertReferralEntity},
        repositories::affiliates::AffiliateRepository,
        value_objects::enums::commission_statuses::CommissionStatus,
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{app_users, commissions, referrals},
    },
};

pub struct AffiliatePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl AffiliatePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl AffiliateRepository for AffiliatePostgres {
    async fn find_code_owner(&self, code: &str) -> Result<Option<Uuid>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let owner = app_users::table
            .filter(app_users::referral_code.eq(code))
            .select(app_users::id)
            .first::<Uuid>(&mut conn)
            .optional()?;

        Ok(owner)
    }

    async fn find_referrer_of(&self, user_id: Uuid) -> Result<Option<Uuid>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let referrer = referrals::table
            .filter(referrals::referred_user_id.eq(user_id))
            .select(referrals::referrer_id)
            .first::<Uuid>(&mut conn)
            .optional()?;

        Ok(referrer)
    }

    async fn insert_referral(&self, insert_referral_entity: InsertReferralEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(referrals::table)
            .values(&insert_referral_entity)
            .returning(referrals::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn insert_commission(
        &self,
        insert_commission_entity: InsertCommissionEntity,
    ) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(commissions::table)
            .values(&insert_commission_entity)
            .returning(commissions::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn list_commissions_by_referrer(
        &self,
        referrer_id: Uuid,
    ) -> Result<Vec<CommissionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = commissions::table
            .filter(commissions::referrer_id.eq(referrer_id))
            .order(commissions::created_at.desc())
            .select(CommissionEntity::as_select())
            .load::<CommissionEntity>(&mut conn)?;

        Ok(results)
    }

    async fn mark_commission_paid(&self, commission_id: Uuid) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = update(commissions::table)
            .filter(commissions::id.eq(commission_id))
            .filter(commissions::status.eq(CommissionStatus::Pending.to_string()))
            .set((
                commissions::status.eq(CommissionStatus::Paid.to_string()),
                commissions::paid_at.eq(Some(Utc::now())),
            ))
            .execute(&mut conn)?;

        Ok(rows)
    }
}
