use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::pages::{InsertPageEntity, PageEntity};

#[async_trait]
#[automock]
pub trait PageRepository {
    async fn count_by_user(&self, user_id: Uuid) -> Result<i64>;
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<PageEntity>>;
    async fn find_owned(&self, page_id: Uuid, user_id: Uuid) -> Result<Option<PageEntity>>;
    async fn insert(&self, insert_page_entity: InsertPageEntity) -> Result<Uuid>;
    /// Deletes the page and its blocks in one transaction.
    async fn delete(&self, page_id: Uuid, user_id: Uuid) -> Result<usize>;
}
