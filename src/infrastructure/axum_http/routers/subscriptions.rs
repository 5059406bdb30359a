use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use crate::{
    domain::repositories::{
        affiliates::AffiliateRepository, plans::PlanRepository,
        subscriptions::SubscriptionRepository,
    },
    infrastructure::{
        axum_http::{auth::AuthUser, error_responses},
        payments::gateway_client::GatewayClient,
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{
                affiliates::AffiliatePostgres, plans::PlanPostgres,
                subscriptions::SubscriptionPostgres,
            },
        },
    },
    usecases::subscriptions::{PaymentGateway, SubscriptionUseCase},
};

pub fn routes(db_pool: Arc<PgPoolSquad>, gateway: Arc<GatewayClient>) -> Router {
    let plan_repository = PlanPostgres::new(Arc::clone(&db_pool));
    let subscription_repository = SubscriptionPostgres::new(Arc::clone(&db_pool));
    let affiliate_repository = AffiliatePostgres::new(Arc::clone(&db_pool));
    let subscriptions_usecase = SubscriptionUseCase::new(
        Arc::new(plan_repository),
        Arc::new(subscription_repository),
        Arc::new(affiliate_repository),
        gateway,
    );

    Router::new()
        .route("/plans", get(list_plans))
        .route("/current", get(get_current_subscription))
        .route("/cancel", post(cancel_subscription))
        .with_state(Arc::new(subscriptions_usecase))
}

pub async fn list_plans<P, S, A, G>(
    State(subscriptions_usecase): State<Arc<SubscriptionUseCase<P, S, A, G>>>,
    _auth: AuthUser,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    A: AffiliateRepository + Send + Sync + 'static,
    G: PaymentGateway + 'static,
{
    match subscriptions_usecase.list_plans().await {
        Ok(plans) => (StatusCode::OK, Json(plans)).into_response(),
        Err(e) => error_responses::error_response(e.status_code(), e.to_string()),
    }
}

pub async fn get_current_subscription<P, S, A, G>(
    State(subscriptions_usecase): State<Arc<SubscriptionUseCase<P, S, A, G>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    A: AffiliateRepository + Send + Sync + 'static,
    G: PaymentGateway + 'static,
{
    match subscriptions_usecase
        .get_current_subscription(auth.user_id)
        .await
    {
        Ok(subscription) => (StatusCode::OK, Json(subscription)).into_response(),
        Err(e) => error_responses::error_response(e.status_code(), e.to_string()),
    }
}

pub async fn cancel_subscription<P, S, A, G>(
    State(subscriptions_usecase): State<Arc<SubscriptionUseCase<P, S, A, G>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    A: AffiliateRepository + Send + Sync + 'static,
    G: PaymentGateway + 'static,
{
    match subscriptions_usecase.cancel_subscription(auth.user_id).await {
        Ok(_) => (StatusCode::OK, "Subscription canceled").into_response(),
        Err(e) => error_responses::error_response(e.status_code(), e.to_string()),
    }
}
