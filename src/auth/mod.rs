//! Session plumbing. Identity itself is verified upstream; this only clears sessions and,
//! in development, lets a known user id sign in directly.

mod login;
mod logout;

use axum::{routing::post, Router};

use crate::AppState;

pub use login::dev_login;
pub use logout::logout;

pub fn router(dev_login: bool) -> Router<AppState> {
    let router = Router::new().route("/logout", post(logout::logout));

    if dev_login {
        router.route("/dev/login/{user_id}", post(login::dev_login))
    } else {
        router
    }
}
