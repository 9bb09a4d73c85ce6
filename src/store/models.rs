use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};

use crate::ids::{PairKey, UserId};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Profile {
    pub user_id: UserId,
    pub display_name: String,
    pub age: Option<i64>,
    pub guild: String,
    pub bio: String,
    pub interests: Json<Vec<String>>,
    pub photos: Json<Vec<Photo>>,
    /// Only active profiles are offered to others as candidates.
    pub is_active: bool,
    /// Denormalized from `matched_users`; kept symmetric by the match resolver.
    #[sqlx(skip)]
    #[serde(skip)]
    pub matched_users: Vec<UserId>,
    #[serde(skip)]
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub url: String,
    pub order: u32,
    #[serde(default)]
    pub is_profile_photo: bool,
}

/// What registration writes. Everything but the name can be filled in later.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProfile {
    pub user_id: UserId,
    pub display_name: String,
    #[serde(default)]
    pub age: Option<i64>,
    #[serde(default)]
    pub guild: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub photos: Vec<Photo>,
    #[serde(default)]
    pub is_active: bool,
}

impl NewProfile {
    pub fn new(user_id: UserId, display_name: impl Into<String>) -> Self {
        NewProfile {
            user_id,
            display_name: display_name.into(),
            age: None,
            guild: String::new(),
            bio: String::new(),
            interests: Vec::new(),
            photos: Vec::new(),
            is_active: true,
        }
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Direction {
    Like,
    Dislike,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Swipe {
    pub decider_id: UserId,
    pub target_id: UserId,
    pub direction: Direction,
    pub swiped_at: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Match {
    pub pair_key: PairKey,
    pub user_a: UserId,
    pub user_b: UserId,
    pub created_at: i64,
    pub active: bool,
}

impl Match {
    pub fn participants(&self) -> [&UserId; 2] {
        [&self.user_a, &self.user_b]
    }

    pub fn peer_of(&self, user: &UserId) -> Option<&UserId> {
        if &self.user_a == user {
            Some(&self.user_b)
        } else if &self.user_b == user {
            Some(&self.user_a)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Message {
    pub id: String,
    pub pair_key: PairKey,
    pub sender_id: UserId,
    pub content: String,
    pub sent_at: i64,
    pub read: bool,
}
