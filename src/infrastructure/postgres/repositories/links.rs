use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{RunQueryDsl, delete, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::links::{InsertLinkEntity, LinkEntity},
        repositories::links::LinkRepository,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::links},
};

#[derive(AsChangeset)]
#[diesel(table_name = links)]
struct LinkChangeset {
    title: Option<String>,
    url: Option<String>,
    updated_at: DateTime<Utc>,
}

pub struct LinkPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl LinkPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl LinkRepository for LinkPostgres {
    async fn count_by_user(&self, user_id: Uuid) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let count = links::table
            .filter(links::user_id.eq(user_id))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(count)
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<LinkEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = links::table
            .filter(links::user_id.eq(user_id))
            .order(links::position.asc())
            .select(LinkEntity::as_select())
            .load::<LinkEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_ids_by_user(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let ids = links::table
            .filter(links::user_id.eq(user_id))
            .order(links::position.asc())
            .select(links::id)
            .load::<Uuid>(&mut conn)?;

        Ok(ids)
    }

    async fn max_position(&self, user_id: Uuid) -> Result<Option<i32>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let max = links::table
            .filter(links::user_id.eq(user_id))
            .select(diesel::dsl::max(links::position))
            .get_result::<Option<i32>>(&mut conn)?;

        Ok(max)
    }

    async fn insert(&self, insert_link_entity: InsertLinkEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(links::table)
            .values(&insert_link_entity)
            .returning(links::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn update(
        &self,
        link_id: Uuid,
        user_id: Uuid,
        title: Option<String>,
        url: Option<String>,
    ) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = update(links::table)
            .filter(links::id.eq(link_id))
            .filter(links::user_id.eq(user_id))
            .set(&LinkChangeset {
                title,
                url,
                updated_at: Utc::now(),
            })
            .execute(&mut conn)?;

        Ok(rows)
    }

    async fn delete(&self, link_id: Uuid, user_id: Uuid) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = delete(links::table)
            .filter(links::id.eq(link_id))
            .filter(links::user_id.eq(user_id))
            .execute(&mut conn)?;

        Ok(rows)
    }

    async fn set_positions(&self, user_id: Uuid, ordered_ids: Vec<Uuid>) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            for (index, link_id) in ordered_ids.iter().enumerate() {
                update(links::table)
                    .filter(links::id.eq(link_id))
                    .filter(links::user_id.eq(user_id))
                    .set(links::position.eq(index as i32))
                    .execute(conn)?;
            }
            Ok(())
        })?;

        Ok(())
    }
}
