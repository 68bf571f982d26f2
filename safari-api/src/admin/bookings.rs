use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use safari_core::{Booking, BookingStatus, ListQuery, Page, RepositoryError};
use safari_shared::models::{BookingEvent, BookingEventKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::extract::{AppJson, AppQuery};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateBookingRequest {
    pub status: BookingStatus,
}

#[derive(Debug, Deserialize)]
pub struct BulkUpdateRequest {
    pub ids: Vec<Uuid>,
    pub status: BookingStatus,
}

#[derive(Debug, Serialize)]
pub struct BulkUpdateResponse {
    pub updated: usize,
    pub items: Vec<Booking>,
}

/// GET /api/admin/bookings
pub async fn list_bookings(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListQuery>,
) -> Result<Json<Page<Booking>>, AppError> {
    Ok(Json(state.bookings.list_bookings(&query).await?))
}

/// GET /api/admin/bookings/{id}
pub async fn get_booking(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Booking>, AppError> {
    let booking = state
        .bookings
        .get_booking(id)
        .await?
        .ok_or_else(|| RepositoryError::not_found("Booking", id))?;
    Ok(Json(booking))
}

/// PATCH /api/admin/bookings/{id}
pub async fn update_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(req): AppJson<UpdateBookingRequest>,
) -> Result<Json<Booking>, AppError> {
    let current = load_checked(&state, id, req.status).await?;
    if current.status == req.status {
        return Ok(Json(current));
    }
    let updated = state.bookings.update_status(id, current.status, req.status).await?;
    announce_status_change(&state, current.status, &updated);
    Ok(Json(updated))
}

/// PUT /api/admin/bookings/bulk
///
/// All-or-nothing: every id must exist and allow the transition, and the
/// writes land in one unit, so a booking changed in between fails the batch.
pub async fn bulk_update(
    State(state): State<AppState>,
    AppJson(req): AppJson<BulkUpdateRequest>,
) -> Result<Json<BulkUpdateResponse>, AppError> {
    if req.ids.is_empty() {
        return Err(AppError::Validation("No bookings selected".to_string()));
    }

    let mut seen = HashSet::new();
    let mut checked = Vec::with_capacity(req.ids.len());
    for id in req.ids.iter().filter(|id| seen.insert(**id)) {
        checked.push(load_checked(&state, *id, req.status).await?);
    }

    let changes: Vec<(Uuid, BookingStatus)> = checked
        .iter()
        .filter(|b| b.status != req.status)
        .map(|b| (b.id, b.status))
        .collect();
    let mut changed = state.bookings.update_statuses(&changes, req.status).await?;

    for (updated, (_, from)) in changed.iter().zip(&changes) {
        announce_status_change(&state, *from, updated);
    }

    let items: Vec<Booking> = checked
        .into_iter()
        .map(|booking| match changed.iter().position(|u| u.id == booking.id) {
            Some(index) => changed.swap_remove(index),
            None => booking,
        })
        .collect();

    info!("Bulk updated {} bookings to {}", changes.len(), req.status);
    Ok(Json(BulkUpdateResponse {
        updated: items.len(),
        items,
    }))
}

/// DELETE /api/admin/bookings/{id}
pub async fn delete_booking(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, AppError> {
    let booking = state
        .bookings
        .get_booking(id)
        .await?
        .ok_or_else(|| RepositoryError::not_found("Booking", id))?;
    state.bookings.delete_booking(id).await?;

    state.publish(BookingEvent::new(
        booking.id,
        booking.booking_reference,
        booking.customer_info.email,
        booking.total,
        BookingEventKind::Deleted,
    ));
    Ok(StatusCode::NO_CONTENT)
}

async fn load_checked(state: &AppState, id: Uuid, next: BookingStatus) -> Result<Booking, AppError> {
    let booking = state
        .bookings
        .get_booking(id)
        .await?
        .ok_or_else(|| RepositoryError::not_found("Booking", id))?;
    booking.status.transition_to(next)?;
    Ok(booking)
}

fn announce_status_change(state: &AppState, from: BookingStatus, updated: &Booking) {
    info!("Booking {} moved {} -> {}", updated.booking_reference, from, updated.status);
    state.publish(BookingEvent::new(
        updated.id,
        updated.booking_reference.clone(),
        updated.customer_info.email.clone(),
        updated.total,
        BookingEventKind::StatusChanged {
            from: from.to_string(),
            to: updated.status.to_string(),
        },
    ));
}
