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
        repositories::{blocks::BlockRepository, pages::PageRepository},
        value_objects::{
            blocks::{CreateBlockRequest, UpdateBlockRequest},
            links::ReorderRequest,
        },
    },
    infrastructure::{
        axum_http::{auth::AuthUser, error_responses},
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{blocks::BlockPostgres, pages::PagePostgres},
        },
    },
    usecases::{blocks::BlocksUseCase, usage::UsageService},
};

/// Mounted under a page path, so every route carries the page id.
pub fn routes<U>(db_pool: Arc<PgPoolSquad>, usage: Arc<U>) -> Router
where
    U: UsageService + 'static,
{
    let block_repository = BlockPostgres::new(Arc::clone(&db_pool));
    let page_repository = PagePostgres::new(Arc::clone(&db_pool));
    let blocks_usecase = BlocksUseCase::new(
        Arc::new(block_repository),
        Arc::new(page_repository),
        usage,
    );

    Router::new()
        .route("/", post(create_block).get(list_blocks))
        .route("/reorder", put(reorder_blocks))
        .route("/:block_id", patch(update_block).delete(delete_block))
        .with_state(Arc::new(blocks_usecase))
}

pub async fn create_block<B, P, U>(
    State(blocks_usecase): State<Arc<BlocksUseCase<B, P, U>>>,
    auth: AuthUser,
    Path(page_id): Path<Uuid>,
    Json(request): Json<CreateBlockRequest>,
) -> impl IntoResponse
where
    B: BlockRepository + Send + Sync + 'static,
    P: PageRepository + Send + Sync + 'static,
    U: UsageService + 'static,
{
    match blocks_usecase
        .create_block(auth.user_id, page_id, request)
        .await
    {
        Ok(block) => (StatusCode::CREATED, Json(block)).into_response(),
        Err(e) => error_responses::error_response(e.status_code(), e.to_string()),
    }
}

pub async fn list_blocks<B, P, U>(
    State(blocks_usecase): State<Arc<BlocksUseCase<B, P, U>>>,
    auth: AuthUser,
    Path(page_id): Path<Uuid>,
) -> impl IntoResponse
where
    B: BlockRepository + Send + Sync + 'static,
    P: PageRepository + Send + Sync + 'static,
    U: UsageService + 'static,
{
    match blocks_usecase.list_blocks(auth.user_id, page_id).await {
        Ok(blocks) => (StatusCode::OK, Json(blocks)).into_response(),
        Err(e) => error_responses::error_response(e.status_code(), e.to_string()),
    }
}

pub async fn update_block<B, P, U>(
    State(blocks_usecase): State<Arc<BlocksUseCase<B, P, U>>>,
    auth: AuthUser,
    Path((page_id, block_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateBlockRequest>,
) -> impl IntoResponse
where
    B: BlockRepository + Send + Sync + 'static,
    P: PageRepository + Send + Sync + 'static,
    U: UsageService + 'static,
{
    match blocks_usecase
        .update_block(auth.user_id, page_id, block_id, request)
        .await
    {
        Ok(_) => (StatusCode::OK, "Block updated").into_response(),
        Err(e) => error_responses::error_response(e.status_code(), e.to_string()),
    }
}

pub async fn delete_block<B, P, U>(
    State(blocks_usecase): State<Arc<BlocksUseCase<B, P, U>>>,
    auth: AuthUser,
    Path((page_id, block_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse
where
    B: BlockRepository + Send + Sync + 'static,
    P: PageRepository + Send + Sync + 'static,
    U: UsageService + 'static,
{
    match blocks_usecase
        .delete_block(auth.user_id, page_id, block_id)
        .await
    {
        Ok(_) => (StatusCode::OK, "Block deleted").into_response(),
        Err(e) => error_responses::error_response(e.status_code(), e.to_string()),
    }
}

pub async fn reorder_blocks<B, P, U>(
    State(blocks_usecase): State<Arc<BlocksUseCase<B, P, U>>>,
    auth: AuthUser,
    Path(page_id): Path<Uuid>,
    Json(request): Json<ReorderRequest>,
) -> impl IntoResponse
where
    B: BlockRepository + Send + Sync + 'static,
    P: PageRepository + Send + Sync + 'static,
    U: UsageService + 'static,
{
    match blocks_usecase
        .reorder_blocks(auth.user_id, page_id, request.ordered_ids)
        .await
    {
        Ok(_) => (StatusCode::OK, "Blocks reordered").into_response(),
        Err(e) => error_responses::error_response(e.status_code(), e.to_string()),
    }
}
