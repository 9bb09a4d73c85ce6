use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    error::SwipeError,
    ids::{PairKey, UserId},
    matches::get_matches,
    store::{Message, MessageRepository, Profile},
};

#[derive(Debug, Clone, Serialize)]
pub struct ChatSummary {
    pub pair_key: PairKey,
    pub peer: Profile,
    pub last_message: Option<Message>,
    pub unread_count: i64,
}

/// One entry per active match, including matches nobody has written in yet.
pub async fn chat_summaries(
    db_pool: &SqlitePool,
    me: &UserId,
) -> Result<Vec<ChatSummary>, SwipeError> {
    let mut summaries = Vec::new();
    for matched in get_matches(db_pool, me).await? {
        let last_message = MessageRepository::last(db_pool, &matched.pair_key).await?;
        let unread_count = MessageRepository::unread_count(db_pool, &matched.pair_key, me).await?;
        summaries.push(ChatSummary {
            pair_key: matched.pair_key,
            peer: matched.peer,
            last_message,
            unread_count,
        });
    }
    Ok(summaries)
}
