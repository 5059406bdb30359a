use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::affiliates::{
    CommissionEntity, InsertCommissionEntity, InsertReferralEntity,
};

#[async_trait]
#[automock]
pub trait AffiliateRepository {
    /// Owner of a referral code, looked up from the users table.
    async fn find_code_owner(&self, code: &str) -> Result<Option<Uuid>>;
    /// Who referred this user, if anyone.
    async fn find_referrer_of(&self, user_id: Uuid) -> Result<Option<Uuid>>;
    async fn insert_referral(&self, insert_referral_entity: InsertReferralEntity) -> Result<Uuid>;
    async fn insert_commission(
        &self,
        insert_commission_entity: InsertCommissionEntity,
    ) -> Result<Uuid>;
    async fn list_commissions_by_referrer(&self, referrer_id: Uuid)
    -> Result<Vec<CommissionEntity>>;
    async fn mark_commission_paid(&self, commission_id: Uuid) -> Result<usize>;
}
