use safari_core::confirmation::{ConfirmationPayload, SESSION_KEY};

use crate::handoff::SessionStore;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmationState {
    Ready(ConfirmationPayload),
    NotFound,
}

/// Loads what the confirmation page renders.
pub struct ConfirmationView;

impl ConfirmationView {
    /// Session storage first (same-tab hand-off), then the query string
    /// (fresh navigation, shared link).
    pub fn load(session: &dyn SessionStore, query: &str) -> ConfirmationState {
        let stored = session.get(SESSION_KEY);
        match ConfirmationPayload::resolve(stored.as_deref(), query) {
            Some(payload) => ConfirmationState::Ready(payload),
            None => ConfirmationState::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handoff::MemorySessionStore;
    use rust_decimal::Decimal;

    fn payload(reference: &str) -> ConfirmationPayload {
        ConfirmationPayload {
            booking_reference: reference.to_string(),
            customer_name: "Jane Doe".to_string(),
            customer_email: "jane@example.com".to_string(),
            total_amount: Decimal::from(1100),
            number_of_guests: 2,
            tour_title: "Bwindi Gorilla Trek".to_string(),
            tour_date: "2025-07-01".to_string(),
            tour_price: Decimal::from(500),
            special_requests: String::new(),
        }
    }

    #[test]
    fn test_session_copy_preferred() {
        let session = MemorySessionStore::default();
        session.set(SESSION_KEY, payload("SB1").to_session_value().unwrap());

        let state = ConfirmationView::load(&session, &payload("SB2").to_query_string());
        assert_eq!(state, ConfirmationState::Ready(payload("SB1")));
    }

    #[test]
    fn test_query_only_after_fresh_navigation() {
        let session = MemorySessionStore::default();
        let query = format!("?{}", payload("SB2").to_query_string());
        assert_eq!(ConfirmationView::load(&session, &query), ConfirmationState::Ready(payload("SB2")));
    }

    #[test]
    fn test_nothing_to_show() {
        let session = MemorySessionStore::default();
        assert_eq!(ConfirmationView::load(&session, "reference=SB1"), ConfirmationState::NotFound);
    }
}
