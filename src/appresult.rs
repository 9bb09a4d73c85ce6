use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use crate::error::SwipeError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    pub fn status(&self) -> StatusCode {
        if let Some(rejection) = self.0.downcast_ref::<JsonRejection>() {
            return rejection.status();
        }
        if let Some(rejection) = self.0.downcast_ref::<PathRejection>() {
            return rejection.status();
        }
        let Some(err) = self.0.downcast_ref::<SwipeError>() else {
            return StatusCode::INTERNAL_SERVER_ERROR;
        };

        use SwipeError::*;
        match err {
            NotAuthenticated => StatusCode::UNAUTHORIZED,
            ProfileMissing(_) => StatusCode::NOT_FOUND,
            InvalidUserId(_) | InvalidTarget | InvalidMessage(_) => StatusCode::BAD_REQUEST,
            NotMatched => StatusCode::FORBIDDEN,
            StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn client_message(&self) -> String {
        if let Some(rejection) = self.0.downcast_ref::<JsonRejection>() {
            return rejection.body_text();
        }
        if let Some(rejection) = self.0.downcast_ref::<PathRejection>() {
            return rejection.body_text();
        }
        self.0.to_string()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        // store details stay in the log
        let message = if status.is_server_error() {
            error!(error = ?self.0, "request failed");
            status.canonical_reason().unwrap_or("error").to_owned()
        } else {
            self.client_message()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
