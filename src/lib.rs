//! Swipe → match → conversation pipeline for a student dating service.
//!
//! Every operation takes the caller's verified [`UserId`](ids::UserId) as an argument;
//! the HTTP layer gets it from the session through [`session::CurrentUser`].

pub mod appresult;
pub mod auth;
pub mod chat;
pub mod config;
pub mod error;
pub mod extract;
pub mod ids;
pub mod matches;
pub mod retry;
pub mod session;
pub mod store;
pub mod swipe;

use axum::{extract::FromRef, routing::get, Json, Router};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tokio::sync::broadcast;

pub use appresult::{AppError, AppResult};
pub use error::SwipeError;

use retry::RetryPolicy;
use store::Message;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub retry: RetryPolicy,
    /// Every stored chat message, for the live feeds.
    pub tx: broadcast::Sender<Message>,
}

impl AppState {
    pub fn new(db_pool: SqlitePool, retry: RetryPolicy) -> Self {
        AppState {
            db_pool,
            retry,
            tx: broadcast::channel(256).0,
        }
    }
}

/// All routes, without the session layer; the caller adds it.
pub fn router(app_state: AppState, dev_login: bool) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(auth::router(dev_login))
        .nest("/swipe", swipe::router())
        .nest("/matches", matches::router())
        .nest("/chats", chat::router())
        .with_state(app_state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}
