use axum::{debug_handler, extract::State, http::StatusCode};
use sqlx::SqlitePool;
use tower_sessions::Session;
use tracing::info;

use crate::{
    AppResult, error::SwipeError, extract::AppPath, ids::UserId, session,
    store::ProfileRepository,
};

/// Development stand-in for the identity provider. Only mounted when `DEV_LOGIN` is set.
#[debug_handler(state = crate::AppState)]
pub async fn dev_login(
    AppPath(user_id): AppPath<UserId>,
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<StatusCode> {
    if !ProfileRepository::exists(&db_pool, &user_id).await? {
        return Err(SwipeError::ProfileMissing(user_id).into());
    }

    session::sign_in(&session, &user_id).await?;
    info!(user = %user_id, "dev login");
    Ok(StatusCode::NO_CONTENT)
}
