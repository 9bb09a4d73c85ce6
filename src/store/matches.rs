use sqlx::{SqlitePool, sqlite::SqliteExecutor};

use crate::{
    error::SwipeError,
    ids::{PairKey, UserId, sorted},
};

use super::Match;

pub struct MatchRepository;

impl MatchRepository {
    pub async fn get<'e, E: SqliteExecutor<'e>>(
        ex: E,
        pair_key: &PairKey,
    ) -> Result<Option<Match>, SwipeError> {
        let found = sqlx::query_as::<_, Match>(
            "SELECT pair_key, user_a, user_b, created_at, active FROM matches WHERE pair_key = ?",
        )
        .bind(pair_key)
        .fetch_optional(ex)
        .await?;

        Ok(found)
    }

    /// Conditional create. `false` means the row was already there, which callers treat
    /// as success.
    pub async fn create_if_absent<'e, E: SqliteExecutor<'e>>(
        ex: E,
        a: &UserId,
        b: &UserId,
        created_at: i64,
    ) -> Result<bool, SwipeError> {
        let (user_a, user_b) = sorted(a, b);
        let result = sqlx::query(
            r#"
INSERT OR IGNORE INTO matches (pair_key, user_a, user_b, created_at, active)
VALUES (?, ?, ?, ?, TRUE)
            "#,
        )
        .bind(PairKey::new(a, b))
        .bind(user_a)
        .bind(user_b)
        .bind(created_at)
        .execute(ex)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Active matches `user_id` takes part in, oldest first.
    pub async fn list_active(
        db_pool: &SqlitePool,
        user_id: &UserId,
    ) -> Result<Vec<Match>, SwipeError> {
        let found = sqlx::query_as::<_, Match>(
            r#"
SELECT pair_key, user_a, user_b, created_at, active FROM matches
WHERE active AND (user_a = ? OR user_b = ?)
ORDER BY created_at, rowid
            "#,
        )
        .bind(user_id)
        .bind(user_id)
        .fetch_all(db_pool)
        .await?;

        Ok(found)
    }
}
