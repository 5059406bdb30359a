use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::links::{InsertLinkEntity, LinkEntity};

#[async_trait]
#[automock]
pub trait LinkRepository {
    async fn count_by_user(&self, user_id: Uuid) -> Result<i64>;
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<LinkEntity>>;
    async fn list_ids_by_user(&self, user_id: Uuid) -> Result<Vec<Uuid>>;
    async fn max_position(&self, user_id: Uuid) -> Result<Option<i32>>;
    async fn insert(&self, insert_link_entity: InsertLinkEntity) -> Result<Uuid>;
    async fn update(
        &self,
        link_id: Uuid,
        user_id: Uuid,
        title: Option<String>,
        url: Option<String>,
    ) -> Result<usize>;
    async fn delete(&self, link_id: Uuid, user_id: Uuid) -> Result<usize>;
    /// Writes `position = index` for every id, all rows in one transaction.
    async fn set_positions(&self, user_id: Uuid, ordered_ids: Vec<Uuid>) -> Result<()>;
}
