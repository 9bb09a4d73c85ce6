use axum::{Json, Router, debug_handler, extract::State, routing::get};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    AppResult, AppState,
    error::SwipeError,
    ids::{PairKey, UserId},
    session::CurrentUser,
    store::{MatchRepository, Profile, ProfileRepository},
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(matches))
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchedPeer {
    pub pair_key: PairKey,
    pub matched_at: i64,
    pub peer: Profile,
}

/// Everyone `me` is actively matched with, oldest match first.
pub async fn get_matches(
    db_pool: &SqlitePool,
    me: &UserId,
) -> Result<Vec<MatchedPeer>, SwipeError> {
    if !ProfileRepository::exists(db_pool, me).await? {
        return Err(SwipeError::ProfileMissing(me.clone()));
    }

    let mut peers = Vec::new();
    for found in MatchRepository::list_active(db_pool, me).await? {
        let Some(peer_id) = found.peer_of(me) else {
            continue;
        };
        // a match whose peer profile is gone has nothing to show
        let Some(peer) = ProfileRepository::get(db_pool, peer_id).await? else {
            continue;
        };
        peers.push(MatchedPeer {
            pair_key: found.pair_key,
            matched_at: found.created_at,
            peer,
        });
    }
    Ok(peers)
}

#[debug_handler(state = AppState)]
async fn matches(
    State(db_pool): State<SqlitePool>,
    CurrentUser(user_id): CurrentUser,
) -> AppResult<Json<Vec<MatchedPeer>>> {
    Ok(Json(get_matches(&db_pool, &user_id).await?))
}
