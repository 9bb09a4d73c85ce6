mod candidates;
mod record;
mod resolver;

use axum::{
    Json, Router, debug_handler,
    extract::State,
    routing::{get, post},
};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::{
    AppResult, AppState,
    extract::{AppJson, AppPath},
    ids::UserId,
    retry::RetryPolicy,
    session::CurrentUser,
    store::{Direction, Profile},
};

pub use candidates::{get_candidates, select_candidates};
pub use record::record_swipe;
pub use resolver::{SwipeOutcome, check_and_create_match};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/candidates", get(candidates))
        .route("/{target_id}", post(swipe))
}

#[derive(Debug, Deserialize)]
pub(crate) struct SwipeBody {
    direction: Direction,
}

#[debug_handler(state = AppState)]
async fn candidates(
    State(db_pool): State<SqlitePool>,
    CurrentUser(user_id): CurrentUser,
) -> AppResult<Json<Vec<Profile>>> {
    Ok(Json(get_candidates(&db_pool, &user_id).await?))
}

#[debug_handler(state = AppState)]
async fn swipe(
    AppPath(target_id): AppPath<UserId>,
    State(db_pool): State<SqlitePool>,
    State(retry): State<RetryPolicy>,
    CurrentUser(user_id): CurrentUser,
    AppJson(SwipeBody { direction }): AppJson<SwipeBody>,
) -> AppResult<Json<SwipeOutcome>> {
    let outcome = record_swipe(&db_pool, &retry, &user_id, &target_id, direction).await?;
    Ok(Json(outcome))
}
