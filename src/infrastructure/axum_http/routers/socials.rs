use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, post},
};
use uuid::Uuid;

use crate::{
    domain::{
        repositories::socials::SocialRepository,
        value_objects::{enums::social_surfaces::SocialSurface, socials::CreateSocialRequest},
    },
    infrastructure::{
        axum_http::{auth::AuthUser, error_responses},
        postgres::{postgres_connection::PgPoolSquad, repositories::socials::SocialPostgres},
    },
    usecases::{socials::SocialsUseCase, usage::UsageService},
};

pub fn routes<U>(db_pool: Arc<PgPoolSquad>, usage: Arc<U>) -> Router
where
    U: UsageService + 'static,
{
    let social_repository = SocialPostgres::new(Arc::clone(&db_pool));
    let socials_usecase = SocialsUseCase::new(Arc::new(social_repository), usage);

    Router::new()
        .route("/", post(create_social).get(list_socials))
        .route("/:surface/:social_id", delete(delete_social))
        .with_state(Arc::new(socials_usecase))
}

pub async fn create_social<S, U>(
    State(socials_usecase): State<Arc<SocialsUseCase<S, U>>>,
    auth: AuthUser,
    Json(request): Json<CreateSocialRequest>,
) -> impl IntoResponse
where
    S: SocialRepository + Send + Sync + 'static,
    U: UsageService + 'static,
{
    match socials_usecase.create_social(auth.user_id, request).await {
        Ok(social) => (StatusCode::CREATED, Json(social)).into_response(),
        Err(e) => error_responses::error_response(e.status_code(), e.to_string()),
    }
}

pub async fn list_socials<S, U>(
    State(socials_usecase): State<Arc<SocialsUseCase<S, U>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    S: SocialRepository + Send + Sync + 'static,
    U: UsageService + 'static,
{
    match socials_usecase.list_socials(auth.user_id).await {
        Ok(socials) => (StatusCode::OK, Json(socials)).into_response(),
        Err(e) => error_responses::error_response(e.status_code(), e.to_string()),
    }
}

pub async fn delete_social<S, U>(
    State(socials_usecase): State<Arc<SocialsUseCase<S, U>>>,
    auth: AuthUser,
    Path((surface, social_id)): Path<(SocialSurface, Uuid)>,
) -> impl IntoResponse
where
    S: SocialRepository + Send + Sync + 'static,
    U: UsageService + 'static,
{
    match socials_usecase
        .delete_social(auth.user_id, social_id, surface)
        .await
    {
        Ok(_) => (StatusCode::OK, "Social deleted").into_response(),
        Err(e) => error_responses::error_response(e.status_code(), e.to_string()),
    }
}
