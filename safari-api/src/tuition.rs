use axum::{routing::get, Json, Router};
use safari_catalog::{ProgrammeLevel, TuitionCalculator, TuitionEstimate};
use serde::Deserialize;

use crate::error::AppError;
use crate::extract::AppQuery;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TuitionParams {
    pub programme: String,
    #[serde(default = "default_years")]
    pub years: u32,
    #[serde(default)]
    pub accommodation: bool,
}

fn default_years() -> u32 {
    1
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/tuition", get(estimate))
}

/// GET /api/tuition?programme=bachelor&years=3&accommodation=true
async fn estimate(AppQuery(params): AppQuery<TuitionParams>) -> Result<Json<TuitionEstimate>, AppError> {
    let programme: ProgrammeLevel = params.programme.parse()?;
    let estimate = TuitionCalculator.estimate(programme, params.years, params.accommodation)?;
    Ok(Json(estimate))
}
