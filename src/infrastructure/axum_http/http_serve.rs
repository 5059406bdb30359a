use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Result;
use axum::{
    Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::get,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use crate::{
    config::config_model::DotEnvyConfig,
    infrastructure::{
        axum_http::{default_routers, routers},
        payments::gateway_client::GatewayClient,
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{
                blocks::BlockPostgres, links::LinkPostgres, pages::PagePostgres,
                socials::SocialPostgres, subscriptions::SubscriptionPostgres, teams::TeamPostgres,
            },
        },
    },
    usecases::usage::{InMemoryUsageCache, UsageCounter},
};

type SharedUsageCounter = UsageCounter<
    SubscriptionPostgres,
    LinkPostgres,
    PagePostgres,
    BlockPostgres,
    SocialPostgres,
    TeamPostgres,
    InMemoryUsageCache,
>;

/// One counter serves every router, so a write through any usecase
/// invalidates the same cache the limits endpoint reads.
fn build_usage_counter(db_pool: &Arc<PgPoolSquad>) -> Arc<SharedUsageCounter> {
    Arc::new(UsageCounter::new(
        Arc::new(SubscriptionPostgres::new(Arc::clone(db_pool))),
        Arc::new(LinkPostgres::new(Arc::clone(db_pool))),
        Arc::new(PagePostgres::new(Arc::clone(db_pool))),
        Arc::new(BlockPostgres::new(Arc::clone(db_pool))),
        Arc::new(SocialPostgres::new(Arc::clone(db_pool))),
        Arc::new(TeamPostgres::new(Arc::clone(db_pool))),
        Arc::new(InMemoryUsageCache::new()),
    ))
}

pub async fn start(config: Arc<DotEnvyConfig>, db_pool: Arc<PgPoolSquad>) -> Result<()> {
    let usage_counter = build_usage_counter(&db_pool);
    let gateway = Arc::new(GatewayClient::new(
        config.payment_gateway.webhook_secret.clone(),
    ));

    let app = Router::new()
        .fallback(default_routers::not_found)
        .nest(
            "/api/v1/links",
            routers::links::routes(Arc::clone(&db_pool), Arc::clone(&usage_counter)),
        )
        .nest(
            "/api/v1/pages",
            routers::pages::routes(Arc::clone(&db_pool), Arc::clone(&usage_counter)),
        )
        .nest(
            "/api/v1/pages/:page_id/blocks",
            routers::blocks::routes(Arc::clone(&db_pool), Arc::clone(&usage_counter)),
        )
        .nest(
            "/api/v1/socials",
            routers::socials::routes(Arc::clone(&db_pool), Arc::clone(&usage_counter)),
        )
        .nest(
            "/api/v1/teams",
            routers::teams::routes(Arc::clone(&db_pool), Arc::clone(&usage_counter)),
        )
        .nest(
            "/api/v1/usage",
            routers::usage::routes(Arc::clone(&usage_counter)),
        )
        .nest(
            "/api/v1/subscriptions",
            routers::subscriptions::routes(Arc::clone(&db_pool), Arc::clone(&gateway)),
        )
        .nest(
            "/api/v1/payments/webhook",
            routers::payment_webhook::routes(Arc::clone(&db_pool), Arc::clone(&gateway)),
        )
        .nest(
            "/api/v1/affiliates",
            routers::affiliates::routes(Arc::clone(&db_pool)),
        )
        .nest("/api/v1/admin", routers::admin::routes(Arc::clone(&db_pool)))
        .route("/api/v1/health-check", get(default_routers::health_check))
        .layer(TimeoutLayer::new(Duration::from_secs(config.server.timeout)))
        .layer(RequestBodyLimitLayer::new(
            (config.server.body_limit * 1024 * 1024).try_into()?,
        ))
        .layer(
            CorsLayer::new()
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::PUT,
                    Method::DELETE,
                ])
                .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                .allow_origin(Any),
        )
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = TcpListener::bind(addr).await?;

    info!("Server is running on port {}", config.server.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
    };

    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
