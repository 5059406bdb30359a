use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::plans::PlanEntity;
use crate::domain::value_objects::subscriptions::{CreatePlanRequest, UpdatePlanRequest};

#[async_trait]
#[automock]
pub trait PlanRepository {
    async fn find_active_plan_by_id(&self, plan_id: Uuid) -> Result<Option<PlanEntity>>;
    async fn list_active_plans(&self) -> Result<Vec<PlanEntity>>;
    async fn create_plan(&self, request: CreatePlanRequest) -> Result<Uuid>;
    async fn update_plan(&self, plan_id: Uuid, request: UpdatePlanRequest) -> Result<usize>;
    async fn deactivate_plan(&self, plan_id: Uuid) -> Result<usize>;
}
