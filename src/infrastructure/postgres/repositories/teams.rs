use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, delete, insert_into, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::teams::{
            InsertTeamEntity, InsertTeamMemberEntity, TeamEntity, TeamMemberEntity,
        },
        repositories::teams::TeamRepository,
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{team_members, teams},
    },
};

pub struct TeamPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl TeamPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl TeamRepository for TeamPostgres {
    async fn find_team_of_user(&self, user_id: Uuid) -> Result<Option<Uuid>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let team_id = team_members::table
            .filter(team_members::user_id.eq(user_id))
            .select(team_members::team_id)
            .first::<Uuid>(&mut conn)
            .optional()?;

        Ok(team_id)
    }

    async fn find_owned(&self, team_id: Uuid, owner_id: Uuid) -> Result<Option<TeamEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let team = teams::table
            .filter(teams::id.eq(team_id))
            .filter(teams::owner_id.eq(owner_id))
            .select(TeamEntity::as_select())
            .first::<TeamEntity>(&mut conn)
            .optional()?;

        Ok(team)
    }

    async fn create_team(&self, insert_team_entity: InsertTeamEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(teams::table)
            .values(&insert_team_entity)
            .returning(teams::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn count_members(&self, team_id: Uuid) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let count = team_members::table
            .filter(team_members::team_id.eq(team_id))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(count)
    }

    async fn list_members(&self, team_id: Uuid) -> Result<Vec<TeamMemberEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = team_members::table
            .filter(team_members::team_id.eq(team_id))
            .order(team_members::created_at.asc())
            .select(TeamMemberEntity::as_select())
            .load::<TeamMemberEntity>(&mut conn)?;

        Ok(results)
    }

    async fn add_member(&self, insert_member_entity: InsertTeamMemberEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(team_members::table)
            .values(&insert_member_entity)
            .returning(team_members::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn remove_member(&self, team_id: Uuid, user_id: Uuid) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = delete(team_members::table)
            .filter(team_members::team_id.eq(team_id))
            .filter(team_members::user_id.eq(user_id))
            .execute(&mut conn)?;

        Ok(rows)
    }
}
