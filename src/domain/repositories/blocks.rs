use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::blocks::{BlockEntity, InsertBlockEntity};

#[async_trait]
#[automock]
pub trait BlockRepository {
    /// Counts blocks across every page the user owns.
    async fn count_by_user(&self, user_id: Uuid) -> Result<i64>;
    async fn list_by_page(&self, page_id: Uuid) -> Result<Vec<BlockEntity>>;
    async fn list_ids_by_page(&self, page_id: Uuid) -> Result<Vec<Uuid>>;
    async fn max_position(&self, page_id: Uuid) -> Result<Option<i32>>;
    async fn insert(&self, insert_block_entity: InsertBlockEntity) -> Result<Uuid>;
    async fn update_content(
        &self,
        block_id: Uuid,
        page_id: Uuid,
        content: serde_json::Value,
    ) -> Result<usize>;
    async fn delete(&self, block_id: Uuid, page_id: Uuid) -> Result<usize>;
    /// Writes `position = index` for every id, all rows in one transaction.
    async fn set_positions(&self, page_id: Uuid, ordered_ids: Vec<Uuid>) -> Result<()>;
}
