use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use crate::domain::{
    repositories::{payments::PaymentRepository, plans::PlanRepository, users::UserRepository},
    value_objects::{
        payments::PaymentDto,
        subscriptions::{CreatePlanRequest, UpdatePlanRequest},
        users::UserDto,
    },
};

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("plan not found")]
    PlanNotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AdminError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            AdminError::PlanNotFound => StatusCode::NOT_FOUND,
            AdminError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, AdminError>;

pub struct AdminUseCase<P, U, Pay>
where
    P: PlanRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    Pay: PaymentRepository + Send + Sync + 'static,
{
    plan_repo: Arc<P>,
    user_repo: Arc<U>,
    payment_repo: Arc<Pay>,
}

impl<P, U, Pay> AdminUseCase<P, U, Pay>
where
    P: PlanRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    Pay: PaymentRepository + Send + Sync + 'static,
{
    pub fn new(plan_repo: Arc<P>, user_repo: Arc<U>, payment_repo: Arc<Pay>) -> Self {
        Self {
            plan_repo,
            user_repo,
            payment_repo,
        }
    }

    pub async fn create_plan(&self, request: CreatePlanRequest) -> UseCaseResult<Uuid> {
        let plan_id = self.plan_repo.create_plan(request).await.map_err(|err| {
            error!(db_error = ?err, "admin: failed to create plan");
            AdminError::Internal(err)
        })?;

        info!(%plan_id, "admin: plan created");
        Ok(plan_id)
    }

    pub async fn update_plan(&self, plan_id: Uuid, request: UpdatePlanRequest) -> UseCaseResult<()> {
        let updated = self
            .plan_repo
            .update_plan(plan_id, request)
            .await
            .map_err(|err| {
                error!(%plan_id, db_error = ?err, "admin: failed to update plan");
                AdminError::Internal(err)
            })?;

        if updated == 0 {
            return Err(AdminError::PlanNotFound);
        }

        info!(%plan_id, "admin: plan updated");
        Ok(())
    }

    pub async fn deactivate_plan(&self, plan_id: Uuid) -> UseCaseResult<()> {
        let updated = self.plan_repo.deactivate_plan(plan_id).await.map_err(|err| {
            error!(%plan_id, db_error = ?err, "admin: failed to deactivate plan");
            AdminError::Internal(err)
        })?;

        if updated == 0 {
            return Err(AdminError::PlanNotFound);
        }

        info!(%plan_id, "admin: plan deactivated");
        Ok(())
    }

    pub async fn list_users(&self) -> UseCaseResult<Vec<UserDto>> {
        let users = self.user_repo.list_all().await.map_err(|err| {
            error!(db_error = ?err, "admin: failed to list users");
            AdminError::Internal(err)
        })?;

        Ok(users.into_iter().map(UserDto::from).collect())
    }

    pub async fn list_payments(&self) -> UseCaseResult<Vec<PaymentDto>> {
        let payments = self.payment_repo.list_all().await.map_err(|err| {
            error!(db_error = ?err, "admin: failed to list payments");
            AdminError::Internal(err)
        })?;

        Ok(payments.into_iter().map(PaymentDto::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{
        payments::MockPaymentRepository, plans::MockPlanRepository, users::MockUserRepository,
    };
    use crate::domain::value_objects::plans::PlanLimits;
    use mockall::predicate::eq;

    fn usecase_with_plans(
        plan_repo: MockPlanRepository,
    ) -> AdminUseCase<MockPlanRepository, MockUserRepository, MockPaymentRepository> {
        AdminUseCase::new(
            Arc::new(plan_repo),
            Arc::new(MockUserRepository::new()),
            Arc::new(MockPaymentRepository::new()),
        )
    }

    #[tokio::test]
    async fn creates_a_plan_and_returns_its_id() {
        let plan_id = Uuid::new_v4();
        let mut plan_repo = MockPlanRepository::new();
        plan_repo
            .expect_create_plan()
            .withf(|request| request.name == "Pro" && request.price_minor == 990)
            .returning(move |_| Box::pin(async move { Ok(plan_id) }));

        let usecase = usecase_with_plans(plan_repo);

        let created = usecase
            .create_plan(CreatePlanRequest {
                name: "Pro".to_string(),
                price_minor: 990,
                duration_days: 30,
                limits: PlanLimits::default(),
            })
            .await
            .unwrap();

        assert_eq!(created, plan_id);
    }

    #[tokio::test]
    async fn updating_a_missing_plan_reports_not_found() {
        let plan_id = Uuid::new_v4();
        let mut plan_repo = MockPlanRepository::new();
        plan_repo
            .expect_update_plan()
            .with(eq(plan_id), mockall::predicate::always())
            .returning(|_, _| Box::pin(async { Ok(0) }));

        let usecase = usecase_with_plans(plan_repo);

        let result = usecase
            .update_plan(
                plan_id,
                UpdatePlanRequest {
                    name: None,
                    price_minor: Some(1490),
                    duration_days: None,
                    limits: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AdminError::PlanNotFound)));
    }

    #[tokio::test]
    async fn deactivating_a_plan_hides_it_from_listings() {
        let plan_id = Uuid::new_v4();
        let mut plan_repo = MockPlanRepository::new();
        plan_repo
            .expect_deactivate_plan()
            .with(eq(plan_id))
            .times(1)
            .returning(|_| Box::pin(async { Ok(1) }));

        let usecase = usecase_with_plans(plan_repo);

        usecase.deactivate_plan(plan_id).await.unwrap();
    }
}
