use safari_shared::models::{BookingEvent, BookingEventKind};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, warn};

/// Drains booking events and writes an audit line per event. Returns when the
/// channel closes.
pub async fn start_event_worker(mut rx: broadcast::Receiver<BookingEvent>) {
    info!("Booking event worker started");

    loop {
        match rx.recv().await {
            Ok(event) => record(&event),
            Err(RecvError::Lagged(skipped)) => warn!("Event worker lagged, skipped {} events", skipped),
            Err(RecvError::Closed) => {
                info!("Event channel closed, worker stopping");
                break;
            }
        }
    }
}

fn record(event: &BookingEvent) {
    match &event.kind {
        BookingEventKind::Submitted => info!(
            topic = event.topic(),
            "Booking {} submitted by {} for {}",
            event.booking_reference,
            event.customer_email,
            event.total
        ),
        BookingEventKind::StatusChanged { from, to } => info!(
            topic = event.topic(),
            "Booking {} moved {} -> {}",
            event.booking_reference,
            from,
            to
        ),
        BookingEventKind::Deleted => info!(
            topic = event.topic(),
            "Booking {} deleted",
            event.booking_reference
        ),
    }
}
