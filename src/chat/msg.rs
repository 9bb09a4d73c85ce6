use serde::Deserialize;
use sqlx::SqlitePool;
use tokio::sync::broadcast;
use tracing::debug;

use crate::{
    error::SwipeError,
    ids::{PairKey, UserId},
    store::{MatchRepository, Message, MessageRepository, now_millis},
};

pub const MAX_MESSAGE_CHARS: usize = 2000;

#[derive(Debug, Deserialize)]
pub(crate) struct SendMessageBody {
    pub(crate) content: String,
}

/// Key of the conversation between `me` and `peer`, if they share an active match.
pub async fn require_match(
    db_pool: &SqlitePool,
    me: &UserId,
    peer: &UserId,
) -> Result<PairKey, SwipeError> {
    let pair_key = PairKey::new(me, peer);
    match MatchRepository::get(db_pool, &pair_key).await? {
        Some(found) if found.active && me != peer => Ok(pair_key),
        _ => Err(SwipeError::NotMatched),
    }
}

pub async fn send_message(
    db_pool: &SqlitePool,
    tx: &broadcast::Sender<Message>,
    sender: &UserId,
    peer: &UserId,
    content: &str,
) -> Result<Message, SwipeError> {
    if content.trim().is_empty() {
        return Err(SwipeError::InvalidMessage("message is empty".to_owned()));
    }
    if content.chars().count() > MAX_MESSAGE_CHARS {
        return Err(SwipeError::InvalidMessage(format!(
            "message is longer than {MAX_MESSAGE_CHARS} characters"
        )));
    }

    let pair_key = require_match(db_pool, sender, peer).await?;
    let message =
        MessageRepository::append(db_pool, &pair_key, sender, content, now_millis()).await?;
    debug!(%pair_key, id = %message.id, "message stored");

    // nobody listening is fine
    let _ = tx.send(message.clone());
    Ok(message)
}

pub async fn list_messages(
    db_pool: &SqlitePool,
    me: &UserId,
    peer: &UserId,
) -> Result<Vec<Message>, SwipeError> {
    let pair_key = require_match(db_pool, me, peer).await?;
    MessageRepository::list(db_pool, &pair_key).await
}

/// Marks what `peer` sent to `me` as read. Returns how many messages changed.
pub async fn mark_read(
    db_pool: &SqlitePool,
    me: &UserId,
    peer: &UserId,
) -> Result<u64, SwipeError> {
    let pair_key = require_match(db_pool, me, peer).await?;
    MessageRepository::mark_read(db_pool, &pair_key, me).await
}
