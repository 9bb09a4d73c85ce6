//! Body and path extractors whose rejections go through [`AppError`], so malformed input
//! gets the same `{"error": ...}` body as every other failure.

use axum::extract::{FromRequest, FromRequestParts};

use crate::AppError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);
