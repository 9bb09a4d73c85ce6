use std::collections::HashSet;

use sqlx::sqlite::SqliteExecutor;

use crate::{error::SwipeError, ids::UserId};

use super::{Direction, Swipe};

/// Append-only ledger of decisions, one row per (decider, target).
pub struct SwipeRepository;

impl SwipeRepository {
    /// Upsert by key. Re-swiping overwrites direction and time.
    pub async fn put<'e, E: SqliteExecutor<'e>>(
        ex: E,
        decider_id: &UserId,
        target_id: &UserId,
        direction: Direction,
        swiped_at: i64,
    ) -> Result<(), SwipeError> {
        sqlx::query(
            r#"
INSERT INTO swipes (decider_id, target_id, direction, swiped_at)
VALUES (?, ?, ?, ?)
ON CONFLICT (decider_id, target_id) DO UPDATE SET
    direction = excluded.direction,
    swiped_at = excluded.swiped_at
            "#,
        )
        .bind(decider_id)
        .bind(target_id)
        .bind(direction)
        .bind(swiped_at)
        .execute(ex)
        .await?;

        Ok(())
    }

    pub async fn get<'e, E: SqliteExecutor<'e>>(
        ex: E,
        decider_id: &UserId,
        target_id: &UserId,
    ) -> Result<Option<Swipe>, SwipeError> {
        let swipe = sqlx::query_as::<_, Swipe>(
            r#"
SELECT decider_id, target_id, direction, swiped_at FROM swipes
WHERE decider_id = ? AND target_id = ?
            "#,
        )
        .bind(decider_id)
        .bind(target_id)
        .fetch_optional(ex)
        .await?;

        Ok(swipe)
    }

    /// Everyone `decider_id` has already judged, in either direction.
    pub async fn swiped_targets<'e, E: SqliteExecutor<'e>>(
        ex: E,
        decider_id: &UserId,
    ) -> Result<HashSet<UserId>, SwipeError> {
        let targets =
            sqlx::query_as::<_, (UserId,)>("SELECT target_id FROM swipes WHERE decider_id = ?")
                .bind(decider_id)
                .fetch_all(ex)
                .await?;

        Ok(targets.into_iter().map(|(target,)| target).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::open_in_memory;

    fn id(raw: &str) -> UserId {
        UserId::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn put_overwrites_by_key() {
        let db_pool = open_in_memory().await.unwrap();
        SwipeRepository::put(&db_pool, &id("u1"), &id("u2"), Direction::Like, 10).await.unwrap();
        SwipeRepository::put(&db_pool, &id("u1"), &id("u2"), Direction::Dislike, 20).await.unwrap();

        let swipe = SwipeRepository::get(&db_pool, &id("u1"), &id("u2")).await.unwrap().unwrap();
        assert_eq!(swipe.direction, Direction::Dislike);
        assert_eq!(swipe.swiped_at, 20);

        let (rows,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM swipes")
            .fetch_one(&db_pool)
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn ledger_is_directed() {
        let db_pool = open_in_memory().await.unwrap();
        SwipeRepository::put(&db_pool, &id("u1"), &id("u2"), Direction::Like, 10).await.unwrap();

        assert!(SwipeRepository::get(&db_pool, &id("u2"), &id("u1")).await.unwrap().is_none());
        assert!(SwipeRepository::swiped_targets(&db_pool, &id("u2")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn swiped_targets_covers_both_directions() {
        let db_pool = open_in_memory().await.unwrap();
        SwipeRepository::put(&db_pool, &id("u1"), &id("u2"), Direction::Like, 10).await.unwrap();
        SwipeRepository::put(&db_pool, &id("u1"), &id("u3"), Direction::Dislike, 11).await.unwrap();

        let targets = SwipeRepository::swiped_targets(&db_pool, &id("u1")).await.unwrap();
        assert_eq!(targets, HashSet::from([id("u2"), id("u3")]));
    }
}
