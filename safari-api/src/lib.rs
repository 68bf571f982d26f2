use axum::{http::Method, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod admin;
pub mod bookings;
pub mod confirmation;
pub mod error;
pub mod extract;
pub mod state;
pub mod tours;
pub mod tuition;
pub mod worker;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let upload_limit = admin::gallery::upload_body_limit(state.business_rules.max_upload_bytes);
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
            axum::http::header::USER_AGENT,
        ]);

    Router::new()
        .merge(bookings::routes())
        .merge(tours::routes())
        .merge(tuition::routes())
        .merge(confirmation::routes())
        .merge(admin::routes(upload_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
