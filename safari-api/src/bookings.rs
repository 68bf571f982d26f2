use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use rust_decimal::Decimal;
use safari_core::{Booking, BookingRequest, BookingStatus};
use safari_shared::models::{BookingEvent, BookingEventKind};
use safari_shared::Masked;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::extract::AppJson;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummary {
    pub id: Uuid,
    pub booking_reference: String,
    pub status: BookingStatus,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Serialize)]
pub struct CreateBookingResponse {
    pub booking: BookingSummary,
}

impl From<&Booking> for BookingSummary {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.id,
            booking_reference: booking.booking_reference.clone(),
            status: booking.status,
            subtotal: booking.subtotal,
            tax: booking.tax,
            total: booking.total,
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/bookings", post(create_booking))
}

/// POST /api/bookings
async fn create_booking(
    State(state): State<AppState>,
    AppJson(req): AppJson<BookingRequest>,
) -> Result<(StatusCode, Json<CreateBookingResponse>), AppError> {
    req.validate()?;

    // Amounts are recomputed from the submitted lines; the client total is advisory.
    let quote = state.pricing.quote_items(&req.items);
    if req.total.normalize() != quote.total {
        warn!(
            "Client total {} differs from computed total {} for {}",
            req.total, quote.total, req.booking_reference
        );
    }

    let booking = Booking::from_request(req, quote.subtotal, quote.tax, quote.total);
    let stored = state.bookings.create_booking(&booking).await?;

    info!(
        "Booking {} created for {} ({} guests, total {})",
        stored.booking_reference,
        Masked(stored.customer_info.email.as_str()),
        stored.number_of_guests(),
        stored.total
    );

    state.publish(BookingEvent::new(
        stored.id,
        stored.booking_reference.clone(),
        stored.customer_info.email.clone(),
        stored.total,
        BookingEventKind::Submitted,
    ));

    Ok((
        StatusCode::CREATED,
        Json(CreateBookingResponse {
            booking: BookingSummary::from(&stored),
        }),
    ))
}
