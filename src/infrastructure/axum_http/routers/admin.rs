use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use uuid::Uuid;

use crate::{
    domain::{
        repositories::{
            affiliates::AffiliateRepository, payments::PaymentRepository, plans::PlanRepository,
            users::UserRepository,
        },
        value_objects::subscriptions::{CreatePlanRequest, UpdatePlanRequest},
    },
    infrastructure::{
        axum_http::{auth::AdminUser, error_responses},
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{
                affiliates::AffiliatePostgres, payments::PaymentPostgres, plans::PlanPostgres,
                users::UserPostgres,
            },
        },
    },
    usecases::{admin::AdminUseCase, affiliates::AffiliatesUseCase},
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let plan_repository = PlanPostgres::new(Arc::clone(&db_pool));
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let payment_repository = PaymentPostgres::new(Arc::clone(&db_pool));
    let admin_usecase = AdminUseCase::new(
        Arc::new(plan_repository),
        Arc::new(user_repository),
        Arc::new(payment_repository),
    );

    let affiliate_repository = AffiliatePostgres::new(Arc::clone(&db_pool));
    let affiliates_usecase = AffiliatesUseCase::new(Arc::new(affiliate_repository));

    let admin_routes = Router::new()
        .route("/plans", post(create_plan))
        .route("/plans/:plan_id", patch(update_plan).delete(deactivate_plan))
        .route("/users", get(list_users))
        .route("/payments", get(list_payments))
        .with_state(Arc::new(admin_usecase));

    let commission_routes = Router::new()
        .route("/commissions/:commission_id/pay", post(pay_commission))
        .with_state(Arc::new(affiliates_usecase));

    admin_routes.merge(commission_routes)
}

pub async fn create_plan<P, U, Pay>(
    State(admin_usecase): State<Arc<AdminUseCase<P, U, Pay>>>,
    _admin: AdminUser,
    Json(request): Json<CreatePlanRequest>,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    Pay: PaymentRepository + Send + Sync + 'static,
{
    match admin_usecase.create_plan(request).await {
        Ok(plan_id) => (StatusCode::CREATED, Json(plan_id)).into_response(),
        Err(e) => error_responses::error_response(e.status_code(), e.to_string()),
    }
}

pub async fn update_plan<P, U, Pay>(
    State(admin_usecase): State<Arc<AdminUseCase<P, U, Pay>>>,
    _admin: AdminUser,
    Path(plan_id): Path<Uuid>,
    Json(request): Json<UpdatePlanRequest>,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    Pay: PaymentRepository + Send + Sync + 'static,
{
    match admin_usecase.update_plan(plan_id, request).await {
        Ok(_) => (StatusCode::OK, "Plan updated").into_response(),
        Err(e) => error_responses::error_response(e.status_code(), e.to_string()),
    }
}

pub async fn deactivate_plan<P, U, Pay>(
    State(admin_usecase): State<Arc<AdminUseCase<P, U, Pay>>>,
    _admin: AdminUser,
    Path(plan_id): Path<Uuid>,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    Pay: PaymentRepository + Send + Sync + 'static,
{
    match admin_usecase.deactivate_plan(plan_id).await {
        Ok(_) => (StatusCode::OK, "Plan deactivated").into_response(),
        Err(e) => error_responses::error_response(e.status_code(), e.to_string()),
    }
}

pub async fn list_users<P, U, Pay>(
    State(admin_usecase): State<Arc<AdminUseCase<P, U, Pay>>>,
    _admin: AdminUser,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    Pay: PaymentRepository + Send + Sync + 'static,
{
    match admin_usecase.list_users().await {
        Ok(users) => (StatusCode::OK, Json(users)).into_response(),
        Err(e) => error_responses::error_response(e.status_code(), e.to_string()),
    }
}

pub async fn list_payments<P, U, Pay>(
    State(admin_usecase): State<Arc<AdminUseCase<P, U, Pay>>>,
    _admin: AdminUser,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    Pay: PaymentRepository + Send + Sync + 'static,
{
    match admin_usecase.list_payments().await {
        Ok(payments) => (StatusCode::OK, Json(payments)).into_response(),
        Err(e) => error_responses::error_response(e.status_code(), e.to_string()),
    }
}

pub async fn pay_commission<A>(
    State(affiliates_usecase): State<Arc<AffiliatesUseCase<A>>>,
    _admin: AdminUser,
    Path(commission_id): Path<Uuid>,
) -> impl IntoResponse
where
    A: AffiliateRepository + Send + Sync + 'static,
{
    match affiliates_usecase.mark_commission_paid(commission_id).await {
        Ok(_) => (StatusCode::OK, "Commission paid").into_response(),
        Err(e) => error_responses::error_response(e.status_code(), e.to_string()),
    }
}
