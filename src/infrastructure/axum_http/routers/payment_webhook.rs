use std::sync::Arc;

use axum::{
    Router, body::Bytes, extract::State, http::HeaderMap, http::StatusCode,
    response::IntoResponse, routing::post,
};

use crate::{
    domain::repositories::{
        affiliates::AffiliateRepository, plans::PlanRepository,
        subscriptions::SubscriptionRepository,
    },
    infrastructure::{
        axum_http::error_responses,
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

const SIGNATURE_HEADER: &str = "Webhook-Signature";

/// Unauthenticated: the HMAC signature over the raw body is the only
/// credential the gateway presents.
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
        .route("/", post(handle_webhook))
        .with_state(Arc::new(subscriptions_usecase))
}

pub async fn handle_webhook<P, S, A, G>(
    State(subscriptions_usecase): State<Arc<SubscriptionUseCase<P, S, A, G>>>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    A: AffiliateRepository + Send + Sync + 'static,
    G: PaymentGateway + 'static,
{
    let signature = match headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok()) {
        Some(signature) => signature,
        None => {
            return error_responses::error_response(
                StatusCode::BAD_REQUEST,
                "Missing webhook signature header".to_string(),
            );
        }
    };

    match subscriptions_usecase.handle_webhook(&body, signature).await {
        Ok(_) => (StatusCode::OK, "Webhook processed").into_response(),
        Err(e) => error_responses::error_response(e.status_code(), e.to_string()),
    }
}
