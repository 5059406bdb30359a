use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use uuid::Uuid;

use crate::{
    domain::{
        repositories::teams::TeamRepository,
        value_objects::teams::{AddTeamMemberRequest, CreateTeamRequest},
    },
    infrastructure::{
        axum_http::{auth::AuthUser, error_responses},
        postgres::{postgres_connection::PgPoolSquad, repositories::teams::TeamPostgres},
    },
    usecases::{teams::TeamsUseCase, usage::UsageService},
};

pub fn routes<U>(db_pool: Arc<PgPoolSquad>, usage: Arc<U>) -> Router
where
    U: UsageService + 'static,
{
    let team_repository = TeamPostgres::new(Arc::clone(&db_pool));
    let teams_usecase = TeamsUseCase::new(Arc::new(team_repository), usage);

    Router::new()
        .route("/", post(create_team))
        .route("/members", get(list_members))
        .route("/:team_id/members", post(add_member))
        .route("/:team_id/members/:user_id", delete(remove_member))
        .with_state(Arc::new(teams_usecase))
}

pub async fn create_team<T, U>(
    State(teams_usecase): State<Arc<TeamsUseCase<T, U>>>,
    auth: AuthUser,
    Json(request): Json<CreateTeamRequest>,
) -> impl IntoResponse
where
    T: TeamRepository + Send + Sync + 'static,
    U: UsageService + 'static,
{
    match teams_usecase.create_team(auth.user_id, request).await {
        Ok(team_id) => (StatusCode::CREATED, Json(team_id)).into_response(),
        Err(e) => error_responses::error_response(e.status_code(), e.to_string()),
    }
}

pub async fn list_members<T, U>(
    State(teams_usecase): State<Arc<TeamsUseCase<T, U>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    T: TeamRepository + Send + Sync + 'static,
    U: UsageService + 'static,
{
    match teams_usecase.list_members(auth.user_id).await {
        Ok(members) => (StatusCode::OK, Json(members)).into_response(),
        Err(e) => error_responses::error_response(e.status_code(), e.to_string()),
    }
}

pub async fn add_member<T, U>(
    State(teams_usecase): State<Arc<TeamsUseCase<T, U>>>,
    auth: AuthUser,
    Path(team_id): Path<Uuid>,
    Json(request): Json<AddTeamMemberRequest>,
) -> impl IntoResponse
where
    T: TeamRepository + Send + Sync + 'static,
    U: UsageService + 'static,
{
    match teams_usecase
        .add_member(auth.user_id, team_id, request)
        .await
    {
        Ok(_) => (StatusCode::CREATED, "Member added").into_response(),
        Err(e) => error_responses::error_response(e.status_code(), e.to_string()),
    }
}

pub async fn remove_member<T, U>(
    State(teams_usecase): State<Arc<TeamsUseCase<T, U>>>,
    auth: AuthUser,
    Path((team_id, user_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse
where
    T: TeamRepository + Send + Sync + 'static,
    U: UsageService + 'static,
{
    match teams_usecase
        .remove_member(auth.user_id, team_id, user_id)
        .await
    {
        Ok(_) => (StatusCode::OK, "Member removed").into_response(),
        Err(e) => error_responses::error_response(e.status_code(), e.to_string()),
    }
}
