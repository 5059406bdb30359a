use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::payments::PaymentEntity;

#[async_trait]
#[automock]
pub trait PaymentRepository {
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<PaymentEntity>>;
    async fn list_all(&self) -> Result<Vec<PaymentEntity>>;
}
