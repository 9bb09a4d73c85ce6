use sqlx::{SqlitePool, sqlite::SqliteExecutor};
use uuid::Uuid;

use crate::{
    error::SwipeError,
    ids::{PairKey, UserId},
};

use super::Message;

/// Per-match message log.
pub struct MessageRepository;

impl MessageRepository {
    pub async fn append<'e, E: SqliteExecutor<'e>>(
        ex: E,
        pair_key: &PairKey,
        sender_id: &UserId,
        content: &str,
        sent_at: i64,
    ) -> Result<Message, SwipeError> {
        let message = sqlx::query_as::<_, Message>(
            r#"
INSERT INTO messages (id, pair_key, sender_id, content, sent_at, read)
VALUES (?, ?, ?, ?, ?, FALSE)
RETURNING id, pair_key, sender_id, content, sent_at, read
            "#,
        )
        .bind(Uuid::now_v7().to_string())
        .bind(pair_key)
        .bind(sender_id)
        .bind(content)
        .bind(sent_at)
        .fetch_one(ex)
        .await?;

        Ok(message)
    }

    /// Oldest first.
    pub async fn list(
        db_pool: &SqlitePool,
        pair_key: &PairKey,
    ) -> Result<Vec<Message>, SwipeError> {
        let messages = sqlx::query_as::<_, Message>(
            r#"
SELECT id, pair_key, sender_id, content, sent_at, read FROM messages
WHERE pair_key = ?
ORDER BY sent_at ASC, rowid ASC
            "#,
        )
        .bind(pair_key)
        .fetch_all(db_pool)
        .await?;

        Ok(messages)
    }

    pub async fn last(
        db_pool: &SqlitePool,
        pair_key: &PairKey,
    ) -> Result<Option<Message>, SwipeError> {
        let message = sqlx::query_as::<_, Message>(
            r#"
SELECT id, pair_key, sender_id, content, sent_at, read FROM messages
WHERE pair_key = ?
ORDER BY sent_at DESC, rowid DESC
LIMIT 1
            "#,
        )
        .bind(pair_key)
        .fetch_optional(db_pool)
        .await?;

        Ok(message)
    }

    /// Messages addressed to `reader` that `reader` has not opened yet.
    pub async fn unread_count(
        db_pool: &SqlitePool,
        pair_key: &PairKey,
        reader: &UserId,
    ) -> Result<i64, SwipeError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM messages WHERE pair_key = ? AND sender_id <> ? AND NOT read",
        )
        .bind(pair_key)
        .bind(reader)
        .fetch_one(db_pool)
        .await?;

        Ok(count)
    }

    pub async fn mark_read(
        db_pool: &SqlitePool,
        pair_key: &PairKey,
        reader: &UserId,
    ) -> Result<u64, SwipeError> {
        let result = sqlx::query(
            "UPDATE messages SET read = TRUE WHERE pair_key = ? AND sender_id <> ? AND NOT read",
        )
        .bind(pair_key)
        .bind(reader)
        .execute(db_pool)
        .await?;

        Ok(result.rows_affected())
    }
}
