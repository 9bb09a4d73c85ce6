use std::collections::HashSet;

use sqlx::SqlitePool;
use tracing::debug;

use crate::{
    error::SwipeError,
    ids::UserId,
    store::{Profile, ProfileRepository, SwipeRepository},
};

/// Profiles `current` may still swipe on, in storage order.
///
/// Inactive profiles are never offered. An empty result means "no more candidates".
pub async fn get_candidates(
    db_pool: &SqlitePool,
    current: &UserId,
) -> Result<Vec<Profile>, SwipeError> {
    let me = ProfileRepository::get(db_pool, current)
        .await?
        .ok_or_else(|| SwipeError::ProfileMissing(current.clone()))?;
    let swiped = SwipeRepository::swiped_targets(db_pool, current).await?;
    let everyone = ProfileRepository::list(db_pool).await?;

    let candidates = select_candidates(&me, &swiped, everyone);
    debug!(user = %current, count = candidates.len(), "candidates selected");
    Ok(candidates)
}

pub fn select_candidates(
    me: &Profile,
    swiped: &HashSet<UserId>,
    profiles: Vec<Profile>,
) -> Vec<Profile> {
    let matched: HashSet<&UserId> = me.matched_users.iter().collect();

    profiles
        .into_iter()
        .filter(|profile| {
            profile.user_id != me.user_id
                && profile.is_active
                && !matched.contains(&profile.user_id)
                && !swiped.contains(&profile.user_id)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use sqlx::types::Json;

    use super::*;

    fn id(raw: &str) -> UserId {
        UserId::parse(raw).unwrap()
    }

    fn profile(raw: &str, is_active: bool) -> Profile {
        Profile {
            user_id: id(raw),
            display_name: raw.to_uppercase(),
            age: Some(21),
            guild: String::new(),
            bio: String::new(),
            interests: Json(Vec::new()),
            photos: Json(Vec::new()),
            is_active,
            matched_users: Vec::new(),
            created_at: 0,
        }
    }

    fn ids(profiles: &[Profile]) -> Vec<&str> {
        profiles.iter().map(|p| p.user_id.as_str()).collect()
    }

    #[test]
    fn excludes_self_matched_swiped_and_inactive() {
        let mut me = profile("me", true);
        me.matched_users = vec![id("matched")];
        let swiped = HashSet::from([id("liked"), id("disliked")]);
        let everyone = vec![
            profile("a", true),
            profile("me", true),
            profile("matched", true),
            profile("liked", true),
            profile("sleeping", false),
            profile("disliked", true),
            profile("b", true),
        ];

        let candidates = select_candidates(&me, &swiped, everyone);
        assert_eq!(ids(&candidates), ["a", "b"]);
    }

    #[test]
    fn keeps_storage_order() {
        let me = profile("me", true);
        let everyone = vec![profile("z", true), profile("m", true), profile("a", true)];
        let candidates = select_candidates(&me, &HashSet::new(), everyone);
        assert_eq!(ids(&candidates), ["z", "m", "a"]);
    }

    #[test]
    fn inactive_requester_still_sees_others() {
        let me = profile("me", false);
        let candidates = select_candidates(&me, &HashSet::new(), vec![profile("a", true)]);
        assert_eq!(ids(&candidates), ["a"]);
    }
}
