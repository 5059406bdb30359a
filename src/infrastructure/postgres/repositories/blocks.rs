use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{RunQueryDsl, delete, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::blocks::{BlockEntity, InsertBlockEntity},
        repositories::blocks::BlockRepository,
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{blocks, pages},
    },
};

pub struct BlockPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl BlockPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl BlockRepository for BlockPostgres {
    async fn count_by_user(&self, user_id: Uuid) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let count = blocks::table
            .inner_join(pages::table)
            .filter(pages::user_id.eq(user_id))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(count)
    }

    async fn list_by_page(&self, page_id: Uuid) -> Result<Vec<BlockEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = blocks::table
            .filter(blocks::page_id.eq(page_id))
            .order(blocks::position.asc())
            .select(BlockEntity::as_select())
            .load::<BlockEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_ids_by_page(&self, page_id: Uuid) -> Result<Vec<Uuid>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let ids = blocks::table
            .filter(blocks::page_id.eq(page_id))
            .order(blocks::position.asc())
            .select(blocks::id)
            .load::<Uuid>(&mut conn)?;

        Ok(ids)
    }

    async fn max_position(&self, page_id: Uuid) -> Result<Option<i32>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let max = blocks::table
            .filter(blocks::page_id.eq(page_id))
            .select(diesel::dsl::max(blocks::position))
            .get_result::<Option<i32>>(&mut conn)?;

        Ok(max)
    }

    async fn insert(&self, insert_block_entity: InsertBlockEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(blocks::table)
            .values(&insert_block_entity)
            .returning(blocks::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn update_content(
        &self,
        block_id: Uuid,
        page_id: Uuid,
        content: serde_json::Value,
    ) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = update(blocks::table)
            .filter(blocks::id.eq(block_id))
            .filter(blocks::page_id.eq(page_id))
            .set((
                blocks::content.eq(content),
                blocks::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(rows)
    }

    async fn delete(&self, block_id: Uuid, page_id: Uuid) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = delete(blocks::table)
            .filter(blocks::id.eq(block_id))
            .filter(blocks::page_id.eq(page_id))
            .execute(&mut conn)?;

        Ok(rows)
    }

    async fn set_positions(&self, page_id: Uuid, ordered_ids: Vec<Uuid>) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            for (index, block_id) in ordered_ids.iter().enumerate() {
                update(blocks::table)
                    .filter(blocks::id.eq(block_id))
                    .filter(blocks::page_id.eq(page_id))
                    .set(blocks::position.eq(index as i32))
                    .execute(conn)?;
            }
            Ok(())
        })?;

        Ok(())
    }
}
