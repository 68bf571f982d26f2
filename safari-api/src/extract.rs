use axum::extract::{FromRequest, FromRequestParts, Query};

use crate::error::AppError;

/// `Json` whose rejection renders as `{"error": ...}`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `Query` whose rejection renders as `{"error": ...}`.
#[derive(FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

