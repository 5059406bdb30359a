use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{patch, post, put},
};
use uuid::Uuid;

use crate::{
    domain::{
        repositories::links::LinkRepository,
        value_objects::links::{CreateLinkRequest, ReorderRequest, UpdateLinkRequest},
    },
    infrastructure::{
        axum_http::{auth::AuthUser, error_responses},
        postgres::{postgres_connection::PgPoolSquad, repositories::links::LinkPostgres},
    },
    usecases::{links::LinksUseCase, usage::UsageService},
};

pub fn routes<U>(db_pool: Arc<PgPoolSquad>, usage: Arc<U>) -> Router
where
    U: UsageService + 'static,
{
    let link_repository = LinkPostgres::new(Arc::clone(&db_pool));
    let links_usecase = LinksUseCase::new(Arc::new(link_repository), usage);

    Router::new()
        .route("/", post(create_link).get(list_links))
        .route("/reorder", put(reorder_links))
        .route("/:link_id", patch(update_link).delete(delete_link))
        .with_state(Arc::new(links_usecase))
}

pub async fn create_link<L, U>(
    State(links_usecase): State<Arc<LinksUseCase<L, U>>>,
    auth: AuthUser,
    Json(request): Json<CreateLinkRequest>,
) -> impl IntoResponse
where
    L: LinkRepository + Send + Sync + 'static,
    U: UsageService + 'static,
{
    match links_usecase.create_link(auth.user_id, request).await {
        Ok(link) => (StatusCode::CREATED, Json(link)).into_response(),
        Err(e) => error_responses::error_response(e.status_code(), e.to_string()),
    }
}

pub async fn list_links<L, U>(
    State(links_usecase): State<Arc<LinksUseCase<L, U>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    L: LinkRepository + Send + Sync + 'static,
    U: UsageService + 'static,
{
    match links_usecase.list_links(auth.user_id).await {
        Ok(links) => (StatusCode::OK, Json(links)).into_response(),
        Err(e) => error_responses::error_response(e.status_code(), e.to_string()),
    }
}

pub async fn update_link<L, U>(
    State(links_usecase): State<Arc<LinksUseCase<L, U>>>,
    auth: AuthUser,
    Path(link_id): Path<Uuid>,
    Json(request): Json<UpdateLinkRequest>,
) -> impl IntoResponse
where
    L: LinkRepository + Send + Sync + 'static,
    U: UsageService + 'static,
{
    match links_usecase
        .update_link(link_id, auth.user_id, request)
        .await
    {
        Ok(_) => (StatusCode::OK, "Link updated").into_response(),
        Err(e) => error_responses::error_response(e.status_code(), e.to_string()),
    }
}

pub async fn delete_link<L, U>(
    State(links_usecase): State<Arc<LinksUseCase<L, U>>>,
    auth: AuthUser,
    Path(link_id): Path<Uuid>,
) -> impl IntoResponse
where
    L: LinkRepository + Send + Sync + 'static,
    U: UsageService + 'static,
{
    match links_usecase.delete_link(link_id, auth.user_id).await {
        Ok(_) => (StatusCode::OK, "Link deleted").into_response(),
        Err(e) => error_responses::error_response(e.status_code(), e.to_string()),
    }
}

pub async fn reorder_links<L, U>(
    State(links_usecase): State<Arc<LinksUseCase<L, U>>>,
    auth: AuthUser,
    Json(request): Json<ReorderRequest>,
) -> impl IntoResponse
where
    L: LinkRepository + Send + Sync + 'static,
    U: UsageService + 'static,
{
    match links_usecase
        .reorder_links(auth.user_id, request.ordered_ids)
        .await
    {
        Ok(_) => (StatusCode::OK, "Links reordered").into_response(),
        Err(e) => error_responses::error_response(e.status_code(), e.to_string()),
    }
}
