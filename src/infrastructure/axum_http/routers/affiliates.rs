use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use crate::{
    domain::{
        repositories::affiliates::AffiliateRepository,
        value_objects::affiliates::RegisterReferralRequest,
    },
    infrastructure::{
        axum_http::{auth::AuthUser, error_responses},
        postgres::{postgres_connection::PgPoolSquad, repositories::affiliates::AffiliatePostgres},
    },
    usecases::affiliates::AffiliatesUseCase,
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let affiliate_repository = AffiliatePostgres::new(Arc::clone(&db_pool));
    let affiliates_usecase = AffiliatesUseCase::new(Arc::new(affiliate_repository));

    Router::new()
        .route("/referrals", post(register_referral))
        .route("/commissions", get(list_commissions))
        .with_state(Arc::new(affiliates_usecase))
}

pub async fn register_referral<A>(
    State(affiliates_usecase): State<Arc<AffiliatesUseCase<A>>>,
    auth: AuthUser,
    Json(request): Json<RegisterReferralRequest>,
) -> impl IntoResponse
where
    A: AffiliateRepository + Send + Sync + 'static,
{
    match affiliates_usecase
        .register_referral(auth.user_id, request)
        .await
    {
        Ok(_) => (StatusCode::CREATED, "Referral registered").into_response(),
        Err(e) => error_responses::error_response(e.status_code(), e.to_string()),
    }
}

pub async fn list_commissions<A>(
    State(affiliates_usecase): State<Arc<AffiliatesUseCase<A>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    A: AffiliateRepository + Send + Sync + 'static,
{
    match affiliates_usecase.list_commissions(auth.user_id).await {
        Ok(commissions) => (StatusCode::OK, Json(commissions)).into_response(),
        Err(e) => error_responses::error_response(e.status_code(), e.to_string()),
    }
}
