use std::sync::Arc;

use axum::{
    Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get,
};
use tracing::error;

use crate::{
    infrastructure::axum_http::{auth::AuthUser, error_responses},
    usecases::usage::UsageService,
};

pub fn routes<U>(usage: Arc<U>) -> Router
where
    U: UsageService + 'static,
{
    Router::new()
        .route("/limits", get(get_limits))
        .with_state(usage)
}

pub async fn get_limits<U>(State(usage): State<Arc<U>>, auth: AuthUser) -> impl IntoResponse
where
    U: UsageService + 'static,
{
    match usage.get_limits(auth.user_id).await {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(e) => {
            error!(user_id = %auth.user_id, db_error = ?e, "usage: failed to compute limits");
            error_responses::error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
