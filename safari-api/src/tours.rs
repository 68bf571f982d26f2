use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use safari_catalog::TourSearch;
use safari_core::Tour;
use serde::Deserialize;
use tracing::debug;

use crate::error::AppError;
use crate::extract::AppQuery;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/tours", get(list_tours))
        .route("/api/tours/search", get(search_tours))
        .route("/api/tours/{slug}", get(get_tour))
}

/// GET /api/tours
async fn list_tours(State(state): State<AppState>) -> Result<Json<Vec<Tour>>, AppError> {
    Ok(Json(state.tours.list_tours().await?))
}

/// GET /api/tours/{slug}
async fn get_tour(State(state): State<AppState>, Path(slug): Path<String>) -> Result<Json<Tour>, AppError> {
    state
        .tours
        .get_tour(&slug)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Tour not found: {}", slug)))
}

/// GET /api/tours/search?q=
async fn search_tours(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<SearchParams>,
) -> Result<Json<Vec<Tour>>, AppError> {
    let search = TourSearch::with_limit(state.tours.list_tours().await?, state.business_rules.search_result_limit);
    let results: Vec<Tour> = search.filter(&params.q).into_iter().cloned().collect();
    debug!("Tour search {:?} matched {}", params.q, results.len());
    Ok(Json(results))
}
