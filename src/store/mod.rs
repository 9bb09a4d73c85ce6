//! SQLite-backed collaborators of the swipe pipeline.
//!
//! Every repository function that may run inside the match-creation transaction takes a
//! [`SqliteExecutor`](sqlx::sqlite::SqliteExecutor), so it works on the pool and on a
//! transaction alike.

mod matches;
mod messages;
mod models;
mod profiles;
mod swipes;

use std::{str::FromStr, time::Duration};

use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use time::OffsetDateTime;

pub use matches::MatchRepository;
pub use messages::MessageRepository;
pub use models::{Direction, Match, Message, NewProfile, Photo, Profile, Swipe};
pub use profiles::ProfileRepository;
pub use swipes::SwipeRepository;

pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(5));

    let db_pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    migrate(&db_pool).await?;
    Ok(db_pool)
}

/// A private in-memory database. One connection, never recycled, so the data outlives
/// every acquire.
pub async fn open_in_memory() -> Result<SqlitePool, sqlx::Error> {
    let db_pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    migrate(&db_pool).await?;
    Ok(db_pool)
}

pub async fn migrate(db_pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::migrate!("./migrations").run(db_pool).await?;
    Ok(())
}

/// Unix time in milliseconds, the unit every stored timestamp uses.
pub fn now_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}
