use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::socials::{
    InsertMenuSocialEntity, InsertProfileSocialEntity, SocialEntity,
};

#[async_trait]
#[automock]
pub trait SocialRepository {
    async fn count_profile_by_user(&self, user_id: Uuid) -> Result<i64>;
    async fn count_menu_by_user(&self, user_id: Uuid) -> Result<i64>;
    async fn list_profile_by_user(&self, user_id: Uuid) -> Result<Vec<SocialEntity>>;
    async fn list_menu_by_user(&self, user_id: Uuid) -> Result<Vec<SocialEntity>>;
    async fn insert_profile(&self, entity: InsertProfileSocialEntity) -> Result<Uuid>;
    async fn insert_menu(&self, entity: InsertMenuSocialEntity) -> Result<Uuid>;
    async fn delete_profile(&self, social_id: Uuid, user_id: Uuid) -> Result<usize>;
    async fn delete_menu(&self, social_id: Uuid, user_id: Uuid) -> Result<usize>;
}
