use axum::{debug_handler, http::StatusCode};
use tower_sessions::Session;

#[debug_handler]
pub async fn logout(session: Session) -> StatusCode {
    session.clear().await;
    StatusCode::NO_CONTENT
}
