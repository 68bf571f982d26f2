pub mod admin;
pub mod cart;
pub mod checkout;
pub mod confirmation_view;
pub mod form;
pub mod gateway;
pub mod handoff;
pub mod search_box;

pub use admin::{AdminScreen, AdminTransport, HttpAdminTransport, Toast, ToastKind};
pub use cart::{Cart, MemoryCart};
pub use checkout::{CheckoutError, CheckoutFlow, Submitted};
pub use confirmation_view::{ConfirmationState, ConfirmationView};
pub use form::{CheckoutForm, CheckoutPhase, CustomerField, GuestField};
pub use gateway::{BookingAccepted, BookingGateway, GatewayError, HttpBookingGateway};
pub use handoff::{MemorySessionStore, Navigator, RedirectHandle, RedirectOutcome, RedirectTimings, SessionStore};
pub use search_box::SearchBox;
