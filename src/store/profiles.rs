use std::collections::HashMap;

use sqlx::{SqlitePool, sqlite::SqliteExecutor, types::Json};

use crate::{error::SwipeError, ids::UserId};

use super::{NewProfile, Profile, now_millis};

pub struct ProfileRepository;

impl ProfileRepository {
    pub async fn create(db_pool: &SqlitePool, new: NewProfile) -> Result<Profile, SwipeError> {
        sqlx::query(
            r#"
INSERT INTO profiles
    (user_id, display_name, age, guild, bio, interests, photos, is_active, created_at)
VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new.user_id)
        .bind(&new.display_name)
        .bind(new.age)
        .bind(&new.guild)
        .bind(&new.bio)
        .bind(Json(&new.interests))
        .bind(Json(&new.photos))
        .bind(new.is_active)
        .bind(now_millis())
        .execute(db_pool)
        .await?;

        Self::get(db_pool, &new.user_id)
            .await?
            .ok_or(SwipeError::ProfileMissing(new.user_id))
    }

    /// The profile with its `matched_users` filled in.
    pub async fn get(
        db_pool: &SqlitePool,
        user_id: &UserId,
    ) -> Result<Option<Profile>, SwipeError> {
        let found = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(db_pool)
            .await?;
        let Some(mut profile) = found else {
            return Ok(None);
        };

        profile.matched_users = Self::matched_users(db_pool, user_id).await?;
        Ok(Some(profile))
    }

    pub async fn exists<'e, E: SqliteExecutor<'e>>(
        ex: E,
        user_id: &UserId,
    ) -> Result<bool, SwipeError> {
        let found = sqlx::query("SELECT 1 FROM profiles WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(ex)
            .await?;
        Ok(found.is_some())
    }

    pub async fn display_name<'e, E: SqliteExecutor<'e>>(
        ex: E,
        user_id: &UserId,
    ) -> Result<Option<String>, SwipeError> {
        let name = sqlx::query_as::<_, (String,)>(
            "SELECT display_name FROM profiles WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(ex)
        .await?;
        Ok(name.map(|(name,)| name))
    }

    /// All profiles in storage order, each with its `matched_users`.
    pub async fn list(db_pool: &SqlitePool) -> Result<Vec<Profile>, SwipeError> {
        let mut profiles = sqlx::query_as::<_, Profile>("SELECT * FROM profiles ORDER BY rowid")
            .fetch_all(db_pool)
            .await?;

        let edges = sqlx::query_as::<_, (UserId, UserId)>(
            "SELECT user_id, peer_id FROM matched_users ORDER BY matched_at, rowid",
        )
        .fetch_all(db_pool)
        .await?;

        let mut matched: HashMap<UserId, Vec<UserId>> = HashMap::new();
        for (user_id, peer_id) in edges {
            matched.entry(user_id).or_default().push(peer_id);
        }
        for profile in &mut profiles {
            profile.matched_users = matched.remove(&profile.user_id).unwrap_or_default();
        }

        Ok(profiles)
    }

    pub async fn matched_users<'e, E: SqliteExecutor<'e>>(
        ex: E,
        user_id: &UserId,
    ) -> Result<Vec<UserId>, SwipeError> {
        let peers = sqlx::query_as::<_, (UserId,)>(
            "SELECT peer_id FROM matched_users WHERE user_id = ? ORDER BY matched_at, rowid",
        )
        .bind(user_id)
        .fetch_all(ex)
        .await?;
        Ok(peers.into_iter().map(|(peer,)| peer).collect())
    }

    /// Adds `peer_id` to the set. Already present is a no-op, never a duplicate.
    pub async fn union_matched_user<'e, E: SqliteExecutor<'e>>(
        ex: E,
        user_id: &UserId,
        peer_id: &UserId,
        matched_at: i64,
    ) -> Result<bool, SwipeError> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO matched_users (user_id, peer_id, matched_at) VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(peer_id)
        .bind(matched_at)
        .execute(ex)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    pub async fn set_active(
        db_pool: &SqlitePool,
        user_id: &UserId,
        is_active: bool,
    ) -> Result<(), SwipeError> {
        let result = sqlx::query("UPDATE profiles SET is_active = ? WHERE user_id = ?")
            .bind(is_active)
            .bind(user_id)
            .execute(db_pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(SwipeError::ProfileMissing(user_id.clone()));
        }
        Ok(())
    }
}
