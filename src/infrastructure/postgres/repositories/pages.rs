use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, delete, insert_into, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::pages::{InsertPageEntity, PageEntity},
        repositories::pages::PageRepository,
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{blocks, pages},
    },
};

pub struct PagePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PagePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PageRepository for PagePostgres {
    async fn count_by_user(&self, user_id: Uuid) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let count = pages::table
            .filter(pages::user_id.eq(user_id))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(count)
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<PageEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = pages::table
            .filter(pages::user_id.eq(user_id))
            .order(pages::created_at.asc())
            .select(PageEntity::as_select())
            .load::<PageEntity>(&mut conn)?;

        Ok(results)
    }

    async fn find_owned(&self, page_id: Uuid, user_id: Uuid) -> Result<Option<PageEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let page = pages::table
            .filter(pages::id.eq(page_id))
            .filter(pages::user_id.eq(user_id))
            .select(PageEntity::as_select())
            .first::<PageEntity>(&mut conn)
            .optional()?;

        Ok(page)
    }

    async fn insert(&self, insert_page_entity: InsertPageEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(pages::table)
            .values(&insert_page_entity)
            .returning(pages::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn delete(&self, page_id: Uuid, user_id: Uuid) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = conn.transaction::<_, diesel::result::Error, _>(|conn| {
            let owned = pages::table
                .filter(pages::id.eq(page_id))
                .filter(pages::user_id.eq(user_id))
                .select(pages::id)
                .first::<Uuid>(conn)
                .optional()?;

            if owned.is_none() {
                return Ok(0);
            }

            delete(blocks::table)
                .filter(blocks::page_id.eq(page_id))
                .execute(conn)?;

            delete(pages::table)
                .filter(pages::id.eq(page_id))
                .execute(conn)
        })?;

        Ok(rows)
    }
}
