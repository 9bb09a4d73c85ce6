use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SwipeError;

/// Joins the two halves of a [`PairKey`]. [`UserId`] refuses it, so it can never collide.
pub const PAIR_SEPARATOR: char = '|';

const MAX_USER_ID_LEN: usize = 128;

/// Verified user id as handed to us by the auth layer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(try_from = "String", into = "String")]
#[sqlx(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn parse(raw: impl Into<String>) -> Result<UserId, SwipeError> {
        let raw = raw.into();
        if raw.is_empty() || raw.len() > MAX_USER_ID_LEN || raw.contains(PAIR_SEPARATOR) {
            return Err(SwipeError::InvalidUserId(raw));
        }
        Ok(UserId(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = SwipeError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        UserId::parse(raw)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> String {
        id.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Order-independent key shared by a match record and its conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct PairKey(String);

impl PairKey {
    pub fn new(a: &UserId, b: &UserId) -> PairKey {
        let (low, high) = sorted(a, b);
        PairKey(format!("{low}{PAIR_SEPARATOR}{high}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn contains(&self, user: &UserId) -> bool {
        self.0
            .split(PAIR_SEPARATOR)
            .any(|part| part == user.as_str())
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The pair in lexicographic order, lower id first.
pub fn sorted<'a>(a: &'a UserId, b: &'a UserId) -> (&'a UserId, &'a UserId) {
    if a <= b { (a, b) } else { (b, a) }
}
