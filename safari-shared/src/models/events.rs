use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pii::Masked;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookingEventKind {
    Submitted,
    StatusChanged { from: String, to: String },
    Deleted,
}

/// Emitted by the API whenever a booking is created or an admin touches it.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BookingEvent {
    pub booking_id: Uuid,
    pub booking_reference: String,
    pub customer_email: Masked<String>,
    pub total: Decimal,
    pub kind: BookingEventKind,
    pub occurred_at: DateTime<Utc>,
}

impl BookingEvent {
    pub fn new(
        booking_id: Uuid,
        booking_reference: impl Into<String>,
        customer_email: impl Into<String>,
        total: Decimal,
        kind: BookingEventKind,
    ) -> Self {
        Self {
            booking_id,
            booking_reference: booking_reference.into(),
            customer_email: Masked(customer_email.into()),
            total,
            kind,
            occurred_at: Utc::now(),
        }
    }

    pub fn topic(&self) -> &'static str {
        match self.kind {
            BookingEventKind::Submitted => "booking.submitted",
            BookingEventKind::StatusChanged { .. } => "booking.status_changed",
            BookingEventKind::Deleted => "booking.deleted",
        }
    }
}
