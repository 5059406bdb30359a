use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::{
    payments::InsertPaymentEntity,
    plans::PlanEntity,
    subscriptions::{InsertSubscriptionEntity, SubscriptionEntity},
};

#[async_trait]
#[automock]
pub trait SubscriptionRepository {
    /// The user's single active, unexpired subscription joined to its plan.
    async fn find_active_with_plan(
        &self,
        user_id: Uuid,
    ) -> Result<Option<(SubscriptionEntity, PlanEntity)>>;

    /// Inserts the subscription, records the payment, and upgrades the
    /// account type in a single transaction.
    async fn activate(
        &self,
        insert_subscription_entity: InsertSubscriptionEntity,
        insert_payment_entity: InsertPaymentEntity,
    ) -> Result<(Uuid, Uuid)>;

    async fn cancel_current(&self, user_id: Uuid) -> Result<usize>;
}
