use axum::{
    debug_handler,
    extract::{
        State, WebSocketUpgrade,
        ws::{Message as WsMessage, WebSocket},
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use sqlx::SqlitePool;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};

use crate::{
    AppResult, AppState,
    extract::AppPath,
    ids::{PairKey, UserId},
    session::CurrentUser,
    store::Message,
};

use super::msg::{self, SendMessageBody};

/// Live feed of one conversation. Text frames `{"content": ...}` are sent as messages.
#[debug_handler(state = AppState)]
pub(crate) async fn chat_ws(
    AppPath(peer_id): AppPath<UserId>,
    State(db_pool): State<SqlitePool>,
    State(tx): State<broadcast::Sender<Message>>,
    CurrentUser(user_id): CurrentUser,
    ws: WebSocketUpgrade,
) -> AppResult<Response> {
    let pair_key = msg::require_match(&db_pool, &user_id, &peer_id).await?;

    Ok(ws.on_upgrade(move |socket| feed(socket, db_pool, tx, user_id, peer_id, pair_key)))
}

async fn feed(
    socket: WebSocket,
    db_pool: SqlitePool,
    tx: broadcast::Sender<Message>,
    user_id: UserId,
    peer_id: UserId,
    pair_key: PairKey,
) {
    let mut rx = tx.subscribe();
    let (mut sender, mut receiver) = socket.split();
    debug!(%pair_key, user = %user_id, "chat feed opened");

    let key = pair_key.clone();
    let mut broadcast_task = tokio::spawn(async move {
        loop {
            let message = match rx.recv().await {
                Ok(message) if message.pair_key == key => message,
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(pair_key = %key, skipped, "chat feed lagged");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };
            let Ok(text) = serde_json::to_string(&message) else {
                continue;
            };
            if sender.send(WsMessage::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    let mut receive_task = tokio::spawn(async move {
        while let Some(Ok(frame)) = receiver.next().await {
            let text = match frame {
                WsMessage::Text(text) => text,
                WsMessage::Close(_) => break,
                _ => continue,
            };
            let Ok(SendMessageBody { content }) = serde_json::from_str(text.as_str()) else {
                continue;
            };

            if let Err(err) = msg::send_message(&db_pool, &tx, &user_id, &peer_id, &content).await {
                warn!(error = %err, "message from chat feed rejected");
            }
        }
    });

    tokio::select! {
        _ = &mut broadcast_task => receive_task.abort(),
        _ = &mut receive_task => broadcast_task.abort(),
    };
    debug!(%pair_key, "chat feed closed");
}
