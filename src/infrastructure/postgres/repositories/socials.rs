use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, delete, insert_into, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::socials::{InsertMenuSocialEntity, InsertProfileSocialEntity, SocialEntity},
        repositories::socials::SocialRepository,
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{menu_socials, profile_socials},
    },
};

pub struct SocialPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SocialPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SocialRepository for SocialPostgres {
    async fn count_profile_by_user(&self, user_id: Uuid) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let count = profile_socials::table
            .filter(profile_socials::user_id.eq(user_id))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(count)
    }

    async fn count_menu_by_user(&self, user_id: Uuid) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let count = menu_socials::table
            .filter(menu_socials::user_id.eq(user_id))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(count)
    }

    async fn list_profile_by_user(&self, user_id: Uuid) -> Result<Vec<SocialEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = profile_socials::table
            .filter(profile_socials::user_id.eq(user_id))
            .order(profile_socials::created_at.asc())
            .select(SocialEntity::as_select())
            .load::<SocialEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_menu_by_user(&self, user_id: Uuid) -> Result<Vec<SocialEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = menu_socials::table
            .filter(menu_socials::user_id.eq(user_id))
            .order(menu_socials::created_at.asc())
            .select((
                menu_socials::id,
                menu_socials::user_id,
                menu_socials::network,
                menu_socials::url,
                menu_socials::created_at,
            ))
            .load::<SocialEntity>(&mut conn)?;

        Ok(results)
    }

    async fn insert_profile(&self, entity: InsertProfileSocialEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(profile_socials::table)
            .values(&entity)
            .returning(profile_socials::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn insert_menu(&self, entity: InsertMenuSocialEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(menu_socials::table)
            .values(&entity)
            .returning(menu_socials::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn delete_profile(&self, social_id: Uuid, user_id: Uuid) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = delete(profile_socials::table)
            .filter(profile_socials::id.eq(social_id))
            .filter(profile_socials::user_id.eq(user_id))
            .execute(&mut conn)?;

        Ok(rows)
    }

    async fn delete_menu(&self, social_id: Uuid, user_id: Uuid) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = delete(menu_socials::table)
            .filter(menu_socials::id.eq(social_id))
            .filter(menu_socials::user_id.eq(user_id))
            .execute(&mut conn)?;

        Ok(rows)
    }
}
