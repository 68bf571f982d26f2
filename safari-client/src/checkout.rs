use safari_catalog::{PriceBreakdown, PricingEngine};
use safari_core::booking::validate_items;
use safari_core::confirmation::{ConfirmationError, ConfirmationPayload, SESSION_KEY};
use safari_core::{BookingReference, BookingRequest, ValidationError};
use safari_shared::Masked;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::cart::Cart;
use crate::form::{CheckoutForm, CheckoutPhase};
use crate::gateway::{BookingGateway, GatewayError};
use crate::handoff::{schedule_redirect, Navigator, RedirectHandle, RedirectTimings, SessionStore};

pub const GENERIC_FAILURE: &str = "Failed to submit booking. Please try again.";

#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("A booking is already being submitted")]
    Busy,
    #[error("Booking rejected: {0}")]
    Rejected(#[from] GatewayError),
    #[error("Could not prepare confirmation: {0}")]
    Confirmation(#[from] ConfirmationError),
}

impl CheckoutError {
    /// Text shown to the visitor.
    pub fn user_message(&self) -> String {
        match self {
            CheckoutError::Validation(e) => e.to_string(),
            CheckoutError::Busy => "Your booking is already being processed.".to_string(),
            CheckoutError::Rejected(e) => e.server_message().unwrap_or(GENERIC_FAILURE).to_string(),
            CheckoutError::Confirmation(_) => GENERIC_FAILURE.to_string(),
        }
    }
}

/// Result of a successful submit: the confirmation that was handed off and
/// the pending redirect.
#[derive(Debug)]
pub struct Submitted {
    pub confirmation: ConfirmationPayload,
    pub confirmation_url: String,
    pub redirect: RedirectHandle,
}

/// Checkout page state plus its collaborators.
///
/// `submit` walks Idle → Validating → Submitting → Redirecting. Every failure
/// returns to Idle with `error` set; nothing is sent when validation fails.
pub struct CheckoutFlow {
    cart: Arc<dyn Cart>,
    gateway: Arc<dyn BookingGateway>,
    session: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    pricing: PricingEngine,
    timings: RedirectTimings,
    form: CheckoutForm,
    phase: CheckoutPhase,
    error: Option<String>,
}

impl CheckoutFlow {
    pub fn new(
        cart: Arc<dyn Cart>,
        gateway: Arc<dyn BookingGateway>,
        session: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
        pricing: PricingEngine,
    ) -> Self {
        let form = CheckoutForm::new(&cart.items());
        Self {
            cart,
            gateway,
            session,
            navigator,
            pricing,
            timings: RedirectTimings::default(),
            form,
            phase: CheckoutPhase::Idle,
            error: None,
        }
    }

    pub fn with_timings(mut self, timings: RedirectTimings) -> Self {
        self.timings = timings;
        self
    }

    pub fn form(&self) -> &CheckoutForm {
        &self.form
    }

    /// Field edits go through here; re-syncs guests with the cart first.
    pub fn form_mut(&mut self) -> &mut CheckoutForm {
        self.refresh_cart();
        &mut self.form
    }

    /// Re-initializes guests if the cart lines changed.
    pub fn refresh_cart(&mut self) -> bool {
        self.form.sync_with_cart(&self.cart.items())
    }

    pub fn phase(&self) -> CheckoutPhase {
        self.phase
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn quote(&self) -> PriceBreakdown {
        self.pricing.quote(self.cart.total())
    }

    /// Fails with `Busy` once a booking has been accepted and the redirect
    /// is pending.
    pub async fn submit(&mut self) -> Result<Submitted, CheckoutError> {
        if self.phase.is_busy() {
            return Err(CheckoutError::Busy);
        }
        self.error = None;

        let result = self.run_submit().await;
        if let Err(e) = &result {
            match e {
                CheckoutError::Validation(_) => warn!("Checkout validation failed: {}", e),
                CheckoutError::Rejected(GatewayError::Rejected { .. }) => warn!("Booking rejected by server: {}", e),
                _ => error!("Booking submission failed: {}", e),
            }
            self.error = Some(e.user_message());
            self.phase = CheckoutPhase::Idle;
        }
        result
    }

    async fn run_submit(&mut self) -> Result<Submitted, CheckoutError> {
        // 1. Validate
        self.phase = CheckoutPhase::Validating;
        let items = self.cart.items();
        validate_items(&items)?;
        self.form.sync_with_cart(&items);
        self.form.validate()?;

        // 2. Submit
        self.phase = CheckoutPhase::Submitting;
        let quote = self.pricing.quote(self.cart.total());
        let sent_reference = BookingReference::generate().to_string();
        let request = BookingRequest {
            customer_info: self.form.customer_info().clone(),
            guests: self.form.guests().to_vec(),
            items,
            total: quote.total,
            booking_reference: sent_reference.clone(),
        };

        info!(
            "Submitting booking {} for {}",
            sent_reference,
            Masked(request.customer_info.email.as_str())
        );
        let accepted = self.gateway.submit(&request).await?;

        // 3. Hand off to the confirmation page
        self.phase = CheckoutPhase::Redirecting;
        let reference = accepted.booking_reference.unwrap_or(sent_reference);
        let confirmation = ConfirmationPayload::build(
            &reference,
            &request.customer_info,
            &request.items,
            request.total,
            request.guests.len() as u32,
        )?;

        self.session.set(SESSION_KEY, confirmation.to_session_value()?);
        let confirmation_url = confirmation.confirmation_url();
        let redirect = schedule_redirect(
            self.cart.clone(),
            self.navigator.clone(),
            confirmation_url.clone(),
            self.timings,
        );

        info!("Booking {} accepted, redirecting to confirmation", reference);
        Ok(Submitted {
            confirmation,
            confirmation_url,
            redirect,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::MemoryCart;
    use crate::form::{CustomerField, GuestField};
    use crate::gateway::BookingAccepted;
    use crate::handoff::{MemoryNavigator, MemorySessionStore, RedirectOutcome};
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use safari_core::CartItem;
    use std::sync::Mutex;

    /// Records requests and answers with a canned result.
    struct StubGateway {
        sent: Mutex<Vec<BookingRequest>>,
        reply: Result<BookingAccepted, GatewayError>,
    }

    impl StubGateway {
        fn replying(reply: Result<BookingAccepted, GatewayError>) -> Arc<Self> {
            Arc::new(Self {
                sent: Mutex::new(Vec::new()),
                reply,
            })
        }

        fn sent(&self) -> Vec<BookingRequest> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl BookingGateway for StubGateway {
        async fn submit(&self, request: &BookingRequest) -> Result<BookingAccepted, GatewayError> {
            self.sent.lock().unwrap().push(request.clone());
            self.reply.clone()
        }
    }

    struct Harness {
        flow: CheckoutFlow,
        cart: Arc<MemoryCart>,
        gateway: Arc<StubGateway>,
        session: Arc<MemorySessionStore>,
        navigator: Arc<MemoryNavigator>,
    }

    fn harness(reply: Result<BookingAccepted, GatewayError>) -> Harness {
        let cart = Arc::new(MemoryCart::new(vec![CartItem {
            tour_id: "bwindi-gorilla-trek".to_string(),
            title: "Bwindi Gorilla Trek".to_string(),
            price: Decimal::from(500),
            guests: 2,
            date: "2025-07-01".to_string(),
            image: String::new(),
        }]));
        let gateway = StubGateway::replying(reply);
        let session = Arc::new(MemorySessionStore::default());
        let navigator = Arc::new(MemoryNavigator::new("/checkout", true));
        let flow = CheckoutFlow::new(
            cart.clone(),
            gateway.clone(),
            session.clone(),
            navigator.clone(),
            PricingEngine::default(),
        );
        Harness { flow, cart, gateway, session, navigator }
    }

    fn fill(flow: &mut CheckoutFlow) {
        let form = flow.form_mut();
        form.set_customer_field(CustomerField::Name, "Jane Doe");
        form.set_customer_field(CustomerField::Email, "jane@example.com");
        form.set_customer_field(CustomerField::Phone, "+256700000000");
        form.set_customer_field(CustomerField::SpecialRequests, "Window seat");
        for i in 0..form.guests().len() {
            form.update_guest(i, GuestField::Name(format!("Guest {}", i + 1)));
            form.update_guest(i, GuestField::Age("34".to_string()));
        }
    }

    fn accepted(reference: Option<&str>) -> Result<BookingAccepted, GatewayError> {
        Ok(BookingAccepted {
            booking_reference: reference.map(str::to_string),
        })
    }

    #[tokio::test]
    async fn test_missing_customer_field_sends_nothing() {
        for field in [CustomerField::Name, CustomerField::Email, CustomerField::Phone] {
            let mut h = harness(accepted(None));
            fill(&mut h.flow);
            h.flow.form_mut().set_customer_field(field, "");

            let err = h.flow.submit().await.unwrap_err();
            assert!(matches!(err, CheckoutError::Validation(ValidationError::MissingCustomerField(_))));
            assert!(h.gateway.sent().is_empty());
            assert_eq!(h.flow.phase(), CheckoutPhase::Idle);
            assert!(h.flow.error().unwrap().contains("required customer information"));
        }
    }

    #[tokio::test]
    async fn test_incomplete_guest_sends_nothing() {
        let mut h = harness(accepted(None));
        fill(&mut h.flow);
        h.flow.form_mut().update_guest(1, GuestField::Age("0".to_string()));
        assert!(h.flow.submit().await.is_err());

        h.flow.form_mut().update_guest(1, GuestField::Age("20".to_string()));
        h.flow.form_mut().update_guest(0, GuestField::Name("  ".to_string()));
        assert!(h.flow.submit().await.is_err());

        assert!(h.gateway.sent().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_booking_hands_off_through_both_channels() {
        let mut h = harness(accepted(None));
        fill(&mut h.flow);
        let quote = h.flow.quote();
        assert_eq!(quote.subtotal, Decimal::from(1000));
        assert_eq!(quote.tax, Decimal::from(100));
        assert_eq!(quote.total, Decimal::from(1100));

        let submitted = h.flow.submit().await.unwrap();
        assert_eq!(h.flow.phase(), CheckoutPhase::Redirecting);

        let sent = h.gateway.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].total, Decimal::from(1100));
        assert_eq!(sent[0].guests.len(), 2);

        let from_session =
            ConfirmationPayload::from_session_value(&h.session.get(SESSION_KEY).unwrap()).unwrap();
        let query = submitted.confirmation_url.split_once('?').unwrap().1;
        let from_query = ConfirmationPayload::from_query_string(query).unwrap();

        assert_eq!(from_session.booking_reference, sent[0].booking_reference);
        assert_eq!(from_query.booking_reference, sent[0].booking_reference);
        assert_eq!(from_session, from_query);
        assert_eq!(from_session.total_amount, Decimal::from(1100));
        assert_eq!(from_session.number_of_guests, 2);
        assert_eq!(from_session.special_requests, "Window seat");

        // Cart survives until the redirect fires.
        assert!(!h.cart.is_empty());
        assert_eq!(submitted.redirect.finished().await, RedirectOutcome::Navigated);
        assert!(h.cart.is_empty());
        assert_eq!(h.navigator.current_path(), "/booking-confirmation");
    }

    #[tokio::test(start_paused = true)]
    async fn test_server_reference_wins() {
        let mut h = harness(accepted(Some("SB4242")));
        fill(&mut h.flow);

        let submitted = h.flow.submit().await.unwrap();
        assert_eq!(submitted.confirmation.booking_reference, "SB4242");
        assert!(submitted.confirmation_url.contains("reference=SB4242"));
        submitted.redirect.abort();
    }

    #[tokio::test]
    async fn test_server_error_message_is_surfaced() {
        let mut h = harness(Err(GatewayError::Rejected {
            status: 409,
            message: Some("Tour date is fully booked".to_string()),
        }));
        fill(&mut h.flow);

        assert!(h.flow.submit().await.is_err());
        assert_eq!(h.flow.error(), Some("Tour date is fully booked"));
        assert_eq!(h.flow.phase(), CheckoutPhase::Idle);
        assert!(h.session.get(SESSION_KEY).is_none());
        assert!(!h.cart.is_empty());
    }

    #[tokio::test]
    async fn test_network_error_uses_generic_message() {
        let mut h = harness(Err(GatewayError::Transport("connection refused".to_string())));
        fill(&mut h.flow);

        assert!(h.flow.submit().await.is_err());
        assert_eq!(h.flow.error(), Some(GENERIC_FAILURE));
        assert!(!h.flow.phase().is_busy());
    }

    #[tokio::test]
    async fn test_empty_cart() {
        let mut h = harness(accepted(None));
        h.cart.clear();
        let err = h.flow.submit().await.unwrap_err();
        assert!(matches!(err, CheckoutError::Validation(ValidationError::EmptyCart)));
        assert!(h.gateway.sent().is_empty());
    }

    #[tokio::test]
    async fn test_item_without_date_sends_nothing() {
        let mut h = harness(accepted(None));
        h.cart.clear();
        h.cart.add(CartItem {
            tour_id: "kruger-big-five".to_string(),
            title: "Kruger Big Five".to_string(),
            price: Decimal::from(800),
            guests: 1,
            date: String::new(),
            image: String::new(),
        });
        fill(&mut h.flow);

        let Err(err) = h.flow.submit().await else {
            panic!("submit should fail without a tour date");
        };
        assert!(matches!(err, CheckoutError::Validation(ValidationError::IncompleteItem { index: 0 })));
        assert!(h.gateway.sent().is_empty());
        assert_eq!(h.flow.phase(), CheckoutPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_submit_while_redirecting_is_rejected() {
        let mut h = harness(accepted(None));
        fill(&mut h.flow);
        let submitted = h.flow.submit().await.unwrap();

        assert!(matches!(h.flow.submit().await, Err(CheckoutError::Busy)));
        assert_eq!(h.gateway.sent().len(), 1);
        submitted.redirect.abort();
    }
}
