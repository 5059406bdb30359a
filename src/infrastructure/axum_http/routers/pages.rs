use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use uuid::Uuid;

use crate::{
    domain::{repositories::pages::PageRepository, value_objects::pages::CreatePageRequest},
    infrastructure::{
        axum_http::{auth::AuthUser, error_responses},
        postgres::{postgres_connection::PgPoolSquad, repositories::pages::PagePostgres},
    },
    usecases::{pages::PagesUseCase, usage::UsageService},
};

pub fn routes<U>(db_pool: Arc<PgPoolSquad>, usage: Arc<U>) -> Router
where
    U: UsageService + 'static,
{
    let page_repository = PagePostgres::new(Arc::clone(&db_pool));
    let pages_usecase = PagesUseCase::new(Arc::new(page_repository), usage);

    Router::new()
        .route("/", post(create_page).get(list_pages))
        .route("/:page_id", axum::routing::delete(delete_page))
        .with_state(Arc::new(pages_usecase))
}

pub async fn create_page<P, U>(
    State(pages_usecase): State<Arc<PagesUseCase<P, U>>>,
    auth: AuthUser,
    Json(request): Json<CreatePageRequest>,
) -> impl IntoResponse
where
    P: PageRepository + Send + Sync + 'static,
    U: UsageService + 'static,
{
    match pages_usecase.create_page(auth.user_id, request).await {
        Ok(page) => (StatusCode::CREATED, Json(page)).into_response(),
        Err(e) => error_responses::error_response(e.status_code(), e.to_string()),
    }
}

pub async fn list_pages<P, U>(
    State(pages_usecase): State<Arc<PagesUseCase<P, U>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    P: PageRepository + Send + Sync + 'static,
    U: UsageService + 'static,
{
    match pages_usecase.list_pages(auth.user_id).await {
        Ok(pages) => (StatusCode::OK, Json(pages)).into_response(),
        Err(e) => error_responses::error_response(e.status_code(), e.to_string()),
    }
}

pub async fn delete_page<P, U>(
    State(pages_usecase): State<Arc<PagesUseCase<P, U>>>,
    auth: AuthUser,
    Path(page_id): Path<Uuid>,
) -> impl IntoResponse
where
    P: PageRepository + Send + Sync + 'static,
    U: UsageService + 'static,
{
    match pages_usecase.delete_page(page_id, auth.user_id).await {
        Ok(_) => (StatusCode::OK, "Page deleted").into_response(),
        Err(e) => error_responses::error_response(e.status_code(), e.to_string()),
    }
}
