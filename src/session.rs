use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::{AppError, error::SwipeError, ids::UserId};

pub const USER_ID: &str = "user_id";

/// The verified caller, as stored in the session by the auth layer.
///
/// Handlers take this instead of reading the session themselves, so every pipeline call
/// gets the user id as a plain argument.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserId);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| anyhow::anyhow!(msg))?;

        let Some(user_id) = session.get::<String>(USER_ID).await? else {
            return Err(SwipeError::NotAuthenticated.into());
        };

        Ok(CurrentUser(UserId::parse(user_id)?))
    }
}

pub async fn sign_in(
    session: &Session,
    user_id: &UserId,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(USER_ID, user_id.as_str()).await
}
