use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::teams::{
    InsertTeamEntity, InsertTeamMemberEntity, TeamEntity, TeamMemberEntity,
};

#[async_trait]
#[automock]
pub trait TeamRepository {
    /// Team id the user currently belongs to, if any.
    async fn find_team_of_user(&self, user_id: Uuid) -> Result<Option<Uuid>>;
    async fn find_owned(&self, team_id: Uuid, owner_id: Uuid) -> Result<Option<TeamEntity>>;
    async fn create_team(&self, insert_team_entity: InsertTeamEntity) -> Result<Uuid>;
    async fn count_members(&self, team_id: Uuid) -> Result<i64>;
    async fn list_members(&self, team_id: Uuid) -> Result<Vec<TeamMemberEntity>>;
    async fn add_member(&self, insert_member_entity: InsertTeamMemberEntity) -> Result<Uuid>;
    async fn remove_member(&self, team_id: Uuid, user_id: Uuid) -> Result<usize>;
}
