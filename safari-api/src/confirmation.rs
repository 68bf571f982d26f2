use axum::{extract::RawQuery, routing::get, Json, Router};
use safari_core::confirmation::CONFIRMATION_PATH;
use safari_core::ConfirmationPayload;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route(CONFIRMATION_PATH, get(confirmation))
}

/// GET /booking-confirmation?reference=…
///
/// Decodes the hand-off query string back into the confirmation payload.
async fn confirmation(RawQuery(query): RawQuery) -> Result<Json<ConfirmationPayload>, AppError> {
    let payload = ConfirmationPayload::from_query_string(query.as_deref().unwrap_or_default())?;
    Ok(Json(payload))
}
