use thiserror::Error;

use crate::ids::UserId;

#[derive(Debug, Error)]
pub enum SwipeError {
    #[error("not authenticated")]
    NotAuthenticated,

    #[error("no profile for user {0}")]
    ProfileMissing(UserId),

    #[error("invalid user id {0:?}")]
    InvalidUserId(String),

    #[error("cannot swipe on yourself")]
    InvalidTarget,

    #[error("no active match with this user")]
    NotMatched,

    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// Transient; idempotent steps retry these before giving up.
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[source] sqlx::Error),

    #[error("store error: {0}")]
    Store(#[source] sqlx::Error),
}

impl SwipeError {
    pub fn is_transient(&self) -> bool {
        matches!(self, SwipeError::StoreUnavailable(_))
    }
}

impl From<sqlx::Error> for SwipeError {
    fn from(err: sqlx::Error) -> Self {
        if is_transient(&err) {
            SwipeError::StoreUnavailable(err)
        } else {
            SwipeError::Store(err)
        }
    }
}

// SQLITE_BUSY and SQLITE_LOCKED, including their extended codes
fn is_transient(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => true,
        sqlx::Error::Database(db) => db
            .code()
            .and_then(|code| code.parse::<i32>().ok())
            .is_some_and(|code| matches!(code & 0xff, 5 | 6)),
        _ => false,
    }
}
