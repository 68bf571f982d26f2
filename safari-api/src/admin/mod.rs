use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::state::AppState;

pub mod bookings;
pub mod campaigns;
pub mod comments;
pub mod gallery;
pub mod users;

/// `upload_limit` is the request body cap for gallery uploads; every other
/// route keeps axum's default.
pub fn routes(upload_limit: usize) -> Router<AppState> {
    Router::new()
        .route("/api/admin/comments", get(comments::list_comments))
        .route(
            "/api/admin/comments/{id}",
            patch(comments::update_comment).delete(comments::delete_comment),
        )
        .route("/api/admin/users", get(users::list_users))
        .route(
            "/api/admin/users/{id}",
            patch(users::update_user).delete(users::delete_user),
        )
        .route("/api/admin/users/{id}/reset-password", post(users::reset_password))
        .route("/api/admin/bookings", get(bookings::list_bookings))
        .route("/api/admin/bookings/bulk", put(bookings::bulk_update))
        .route(
            "/api/admin/bookings/{id}",
            get(bookings::get_booking)
                .patch(bookings::update_booking)
                .delete(bookings::delete_booking),
        )
        .route(
            "/api/admin/gallery",
            get(gallery::list_images)
                .post(gallery::upload_image)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/admin/gallery/{id}", delete(gallery::delete_image))
        .route("/api/admin/campaigns", get(campaigns::list_campaigns).post(campaigns::create_campaign))
        .route(
            "/api/admin/campaigns/{id}",
            put(campaigns::update_campaign).delete(campaigns::delete_campaign),
        )
}
