use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::plans::{InsertPlanRow, PlanEntity, PlanRow},
        repositories::plans::PlanRepository,
        value_objects::subscriptions::{CreatePlanRequest, UpdatePlanRequest},
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::plans},
};

#[derive(AsChangeset)]
#[diesel(table_name = plans)]
struct PlanChangeset {
    name: Option<String>,
    price_minor: Option<i32>,
    duration_days: Option<i32>,
    limits: Option<serde_json::Value>,
}

pub struct PlanPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PlanPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PlanRepository for PlanPostgres {
    async fn find_active_plan_by_id(&self, plan_id: Uuid) -> Result<Option<PlanEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = plans::table
            .filter(plans::id.eq(plan_id))
            .filter(plans::is_active.eq(true))
            .select(PlanRow::as_select())
            .first::<PlanRow>(&mut conn)
            .optional()?;

        Ok(row.map(PlanEntity::from))
    }

    async fn list_active_plans(&self) -> Result<Vec<PlanEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = plans::table
            .filter(plans::is_active.eq(true))
            .order(plans::price_minor.asc())
            .select(PlanRow::as_select())
            .load::<PlanRow>(&mut conn)?;

        Ok(rows.into_iter().map(PlanEntity::from).collect())
    }

    async fn create_plan(&self, request: CreatePlanRequest) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let insert_row = InsertPlanRow {
            name: Some(request.name),
            price_minor: request.price_minor,
            duration_days: request.duration_days,
            limits: serde_json::to_value(&request.limits)?,
            is_active: true,
        };

        let result = insert_into(plans::table)
            .values(&insert_row)
            .returning(plans::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn update_plan(&self, plan_id: Uuid, request: UpdatePlanRequest) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let limits = request
            .limits
            .map(|limits| serde_json::to_value(&limits))
            .transpose()?;

        let rows = update(plans::table)
            .filter(plans::id.eq(plan_id))
            .set(&PlanChangeset {
                name: request.name,
                price_minor: request.price_minor,
                duration_days: request.duration_days,
                limits,
            })
            .execute(&mut conn)?;

        Ok(rows)
    }

    async fn deactivate_plan(&self, plan_id: Uuid) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = update(plans::table)
            .filter(plans::id.eq(plan_id))
            .set(plans::is_active.eq(false))
            .execute(&mut conn)?;

        Ok(rows)
    }
}
