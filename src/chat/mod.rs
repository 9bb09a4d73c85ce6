mod conversation;
mod msg;
mod ws;

use axum::{
    Json, Router, debug_handler,
    extract::State,
    routing::{get, post},
};
use serde::Serialize;
use sqlx::SqlitePool;
use tokio::sync::broadcast;

use crate::{
    AppResult, AppState,
    extract::{AppJson, AppPath},
    ids::UserId,
    session::CurrentUser,
    store::Message,
};

pub use conversation::{ChatSummary, chat_summaries};
pub use msg::{MAX_MESSAGE_CHARS, list_messages, mark_read, require_match, send_message};

use msg::SendMessageBody;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(chats))
        .route("/{peer_id}", get(messages).post(send))
        .route("/{peer_id}/read", post(read))
        .route("/{peer_id}/ws", get(ws::chat_ws))
}

#[derive(Serialize)]
struct MarkedRead {
    marked: u64,
}

#[debug_handler(state = AppState)]
async fn chats(
    State(db_pool): State<SqlitePool>,
    CurrentUser(user_id): CurrentUser,
) -> AppResult<Json<Vec<ChatSummary>>> {
    Ok(Json(chat_summaries(&db_pool, &user_id).await?))
}

#[debug_handler(state = AppState)]
async fn messages(
    AppPath(peer_id): AppPath<UserId>,
    State(db_pool): State<SqlitePool>,
    CurrentUser(user_id): CurrentUser,
) -> AppResult<Json<Vec<Message>>> {
    Ok(Json(list_messages(&db_pool, &user_id, &peer_id).await?))
}

#[debug_handler(state = AppState)]
async fn send(
    AppPath(peer_id): AppPath<UserId>,
    State(db_pool): State<SqlitePool>,
    State(tx): State<broadcast::Sender<Message>>,
    CurrentUser(user_id): CurrentUser,
    AppJson(SendMessageBody { content }): AppJson<SendMessageBody>,
) -> AppResult<Json<Message>> {
    Ok(Json(send_message(&db_pool, &tx, &user_id, &peer_id, &content).await?))
}

#[debug_handler(state = AppState)]
async fn read(
    AppPath(peer_id): AppPath<UserId>,
    State(db_pool): State<SqlitePool>,
    CurrentUser(user_id): CurrentUser,
) -> AppResult<Json<MarkedRead>> {
    let marked = mark_read(&db_pool, &user_id, &peer_id).await?;
    Ok(Json(MarkedRead { marked }))
}
