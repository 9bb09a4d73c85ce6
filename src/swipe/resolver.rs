use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::{
    error::SwipeError,
    ids::{PairKey, UserId},
    retry::RetryPolicy,
    store::{Direction, MatchRepository, ProfileRepository, SwipeRepository, now_millis},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeOutcome {
    pub is_match: bool,
    pub matched_peer_name: Option<String>,
}

impl SwipeOutcome {
    pub fn no_match() -> Self {
        SwipeOutcome {
            is_match: false,
            matched_peer_name: None,
        }
    }

    pub fn matched(peer_name: Option<String>) -> Self {
        SwipeOutcome {
            is_match: true,
            matched_peer_name: peer_name,
        }
    }
}

/// `user_a` has just liked `user_b`. Matches them if `user_b` already liked `user_a`.
///
/// Safe to call again for the same pair, including concurrently from both sides: the
/// match row is keyed by [`PairKey`] and created with the matched-user unions in one
/// transaction.
pub async fn check_and_create_match(
    db_pool: &SqlitePool,
    retry: &RetryPolicy,
    user_a: &UserId,
    user_b: &UserId,
) -> Result<SwipeOutcome, SwipeError> {
    let reciprocal = SwipeRepository::get(db_pool, user_b, user_a).await?;
    if reciprocal.map(|swipe| swipe.direction) != Some(Direction::Like) {
        return Ok(SwipeOutcome::no_match());
    }

    let pair_key = PairKey::new(user_a, user_b);
    let active = retry
        .run("create match", || create_match(db_pool, &pair_key, user_a, user_b))
        .await?;
    if !active {
        debug!(%pair_key, "match exists but is inactive");
        return Ok(SwipeOutcome::no_match());
    }

    let peer_name = ProfileRepository::display_name(db_pool, user_b).await?;
    Ok(SwipeOutcome::matched(peer_name))
}

/// Returns whether the pair's match is active after this attempt.
async fn create_match(
    db_pool: &SqlitePool,
    pair_key: &PairKey,
    user_a: &UserId,
    user_b: &UserId,
) -> Result<bool, SwipeError> {
    let mut tx = db_pool.begin().await?;

    // the insert comes first so the transaction holds the write lock from the start
    let created = MatchRepository::create_if_absent(&mut *tx, user_a, user_b, now_millis()).await?;
    let record = MatchRepository::get(&mut *tx, pair_key)
        .await?
        .ok_or(SwipeError::Store(sqlx::Error::RowNotFound))?;

    if !record.active {
        tx.rollback().await?;
        return Ok(false);
    }

    ProfileRepository::union_matched_user(&mut *tx, user_a, user_b, record.created_at).await?;
    ProfileRepository::union_matched_user(&mut *tx, user_b, user_a, record.created_at).await?;
    tx.commit().await?;

    if created {
        info!(%pair_key, "match created");
    } else {
        debug!(%pair_key, "match already existed");
    }
    Ok(true)
}
