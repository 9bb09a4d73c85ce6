use sqlx::SqlitePool;
use tracing::debug;

use crate::{
    error::SwipeError,
    ids::UserId,
    retry::RetryPolicy,
    store::{Direction, ProfileRepository, SwipeRepository, now_millis},
};

use super::resolver::{SwipeOutcome, check_and_create_match};

/// The only way a swipe enters the system.
///
/// The ledger write always lands before reciprocity is checked, so a like is never
/// lost: if this call is abandoned after the write, the next swipe from either side
/// still finds it and completes the match.
pub async fn record_swipe(
    db_pool: &SqlitePool,
    retry: &RetryPolicy,
    decider: &UserId,
    target: &UserId,
    direction: Direction,
) -> Result<SwipeOutcome, SwipeError> {
    if decider == target {
        return Err(SwipeError::InvalidTarget);
    }
    for user in [decider, target] {
        if !ProfileRepository::exists(db_pool, user).await? {
            return Err(SwipeError::ProfileMissing(user.clone()));
        }
    }

    let swiped_at = now_millis();
    retry
        .run("record swipe", || {
            SwipeRepository::put(db_pool, decider, target, direction, swiped_at)
        })
        .await?;
    debug!(%decider, %target, ?direction, "swipe recorded");

    match direction {
        Direction::Dislike => Ok(SwipeOutcome::no_match()),
        Direction::Like => check_and_create_match(db_pool, retry, decider, target).await,
    }
}
