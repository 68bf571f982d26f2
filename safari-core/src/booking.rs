use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::CoreError;

// ============================================================================
// Checkout inputs
// ============================================================================

/// A tour the visitor put in the cart, with the number of guests and the
/// chosen date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub tour_id: String,
    pub title: String,
    pub price: Decimal,
    pub guests: u32,
    pub date: String,
    #[serde(default)]
    pub image: String,
}

impl CartItem {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.guests)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub special_requests: String,
}

impl CustomerInfo {
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [("name", &self.name), ("email", &self.email), ("phone", &self.phone)] {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingCustomerField(field));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestInfo {
    pub name: String,
    pub age: u32,
    #[serde(default)]
    pub dietary_restrictions: String,
    #[serde(default)]
    pub medical_conditions: String,
}

impl GuestInfo {
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && self.age != 0
    }
}

/// Total number of guests across every cart line.
pub fn guest_count(items: &[CartItem]) -> usize {
    items.iter().map(|item| item.guests as usize).sum()
}

/// One blank guest entry per guest across all cart lines.
pub fn blank_guests(items: &[CartItem]) -> Vec<GuestInfo> {
    vec![GuestInfo::default(); guest_count(items)]
}

/// Every line needs a tour title and a date: both travel to the
/// confirmation page.
pub fn validate_items(items: &[CartItem]) -> Result<(), ValidationError> {
    if items.is_empty() {
        return Err(ValidationError::EmptyCart);
    }
    match items
        .iter()
        .position(|item| item.title.trim().is_empty() || item.date.trim().is_empty())
    {
        Some(index) => Err(ValidationError::IncompleteItem { index }),
        None => Ok(()),
    }
}

pub fn validate_guests(guests: &[GuestInfo]) -> Result<(), ValidationError> {
    match guests.iter().position(|g| !g.is_complete()) {
        Some(index) => Err(ValidationError::IncompleteGuest { index }),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please fill in all required customer information ({0} is missing)")]
    MissingCustomerField(&'static str),
    #[error("Please fill in all guest information (guest {} is incomplete)", .index + 1)]
    IncompleteGuest { index: usize },
    #[error("Expected {expected} guests but received {actual}")]
    GuestCountMismatch { expected: usize, actual: usize },
    #[error("Your cart is empty")]
    EmptyCart,
    #[error("Cart item {} is missing its tour or date", .index + 1)]
    IncompleteItem { index: usize },
    #[error("Invalid booking reference: {0}")]
    InvalidReference(String),
    #[error("{0}")]
    Invalid(String),
}

// ============================================================================
// Booking reference
// ============================================================================

/// Client-generated correlation id: `SB` followed by a millisecond timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingReference(String);

impl BookingReference {
    pub const PREFIX: &'static str = "SB";

    pub fn generate() -> Self {
        Self::at(Utc::now())
    }

    pub fn at(instant: DateTime<Utc>) -> Self {
        Self(format!("{}{}", Self::PREFIX, instant.timestamp_millis()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for BookingReference {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix(Self::PREFIX)
            .ok_or_else(|| ValidationError::InvalidReference(s.to_string()))?;
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::InvalidReference(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for BookingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Wire request
// ============================================================================

/// Body of `POST /api/bookings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub customer_info: CustomerInfo,
    pub guests: Vec<GuestInfo>,
    pub items: Vec<CartItem>,
    pub total: Decimal,
    pub booking_reference: String,
}

impl BookingRequest {
    /// Checks everything the checkout form checks before submitting, plus the
    /// guest-count invariant the form maintains.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_items(&self.items)?;
        self.customer_info.validate()?;
        validate_guests(&self.guests)?;

        let expected = guest_count(&self.items);
        if self.guests.len() != expected {
            return Err(ValidationError::GuestCountMismatch {
                expected,
                actual: self.guests.len(),
            });
        }
        if self.total < Decimal::ZERO {
            return Err(ValidationError::Invalid("Total cannot be negative".to_string()));
        }
        self.booking_reference.parse::<BookingReference>()?;
        Ok(())
    }

    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }
}

// ============================================================================
// Persisted booking
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    /// Pending → Confirmed | Cancelled, Confirmed → Completed | Cancelled.
    /// Cancelled and Completed are terminal. Re-applying the current status is
    /// allowed.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        *self == next
            || matches!(
                (self, next),
                (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Completed) | (Confirmed, Cancelled)
            )
    }

    pub fn transition_to(&self, next: BookingStatus) -> Result<BookingStatus, CoreError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoreError::InvalidTransition {
                from: self.to_string(),
                to: next.to_string(),
            })
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "completed" => Ok(BookingStatus::Completed),
            other => Err(ValidationError::Invalid(format!("Unknown booking status: {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub booking_reference: String,
    pub customer_info: CustomerInfo,
    pub guests: Vec<GuestInfo>,
    pub items: Vec<CartItem>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn from_request(req: BookingRequest, subtotal: Decimal, tax: Decimal, total: Decimal) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            booking_reference: req.booking_reference,
            customer_info: req.customer_info,
            guests: req.guests,
            items: req.items,
            subtotal,
            tax,
            total,
            status: BookingStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn number_of_guests(&self) -> usize {
        self.guests.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn item(price: i64, guests: u32) -> CartItem {
        CartItem {
            tour_id: "gorilla-trek".to_string(),
            title: "Gorilla Trek".to_string(),
            price: Decimal::from(price),
            guests,
            date: "2025-07-01".to_string(),
            image: String::new(),
        }
    }

    fn customer() -> CustomerInfo {
        CustomerInfo {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: "+256700000000".to_string(),
            ..Default::default()
        }
    }

    fn guest(name: &str, age: u32) -> GuestInfo {
        GuestInfo {
            name: name.to_string(),
            age,
            ..Default::default()
        }
    }

    #[test]
    fn test_blank_guests_matches_cart_guest_sum() {
        let carts = vec![vec![], vec![item(100, 1)], vec![item(100, 2), item(50, 3)], vec![item(1, 0), item(1, 4)]];
        for cart in carts {
            let expected: u32 = cart.iter().map(|i| i.guests).sum();
            assert_eq!(blank_guests(&cart).len(), expected as usize);
        }
    }

    #[test]
    fn test_customer_validation_reports_first_missing_field() {
        let mut info = customer();
        assert!(info.validate().is_ok());

        info.phone = "   ".to_string();
        assert_eq!(info.validate(), Err(ValidationError::MissingCustomerField("phone")));

        info.name.clear();
        assert_eq!(info.validate(), Err(ValidationError::MissingCustomerField("name")));
    }

    #[test]
    fn test_guest_with_zero_age_is_incomplete() {
        let guests = vec![guest("Ann", 30), guest("Bob", 0)];
        assert_eq!(validate_guests(&guests), Err(ValidationError::IncompleteGuest { index: 1 }));
        assert_eq!(
            ValidationError::IncompleteGuest { index: 1 }.to_string(),
            "Please fill in all guest information (guest 2 is incomplete)"
        );
    }

    #[test]
    fn test_booking_reference_format() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let reference = BookingReference::at(at);
        assert_eq!(reference.as_str(), "SB1700000000123");
        assert!("SB1700000000123".parse::<BookingReference>().is_ok());
        assert!("XX123".parse::<BookingReference>().is_err());
        assert!("SB".parse::<BookingReference>().is_err());
        assert!("SB12a".parse::<BookingReference>().is_err());
    }

    #[test]
    fn test_request_validation_checks_guest_count() {
        let req = BookingRequest {
            customer_info: customer(),
            guests: vec![guest("Ann", 30)],
            items: vec![item(500, 2)],
            total: Decimal::from(1100),
            booking_reference: "SB1".to_string(),
        };
        assert_eq!(
            req.validate(),
            Err(ValidationError::GuestCountMismatch { expected: 2, actual: 1 })
        );
        assert_eq!(req.subtotal(), Decimal::from(1000));
    }

    #[test]
    fn test_request_wire_format_is_camel_case() {
        let json = serde_json::json!({
            "customerInfo": {"name": "Jane", "email": "j@x.io", "phone": "1", "country": "UG", "specialRequests": ""},
            "guests": [{"name": "Jane", "age": 31, "dietaryRestrictions": "", "medicalConditions": ""}],
            "items": [{"tourId": "t1", "title": "Gorilla Trek", "price": 500, "guests": 1, "date": "2025-07-01", "image": ""}],
            "total": 550,
            "bookingReference": "SB1700000000000"
        });
        let req: BookingRequest = serde_json::from_value(json).unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.items[0].price, Decimal::from(500));
    }

    #[test]
    fn test_status_transitions() {
        use BookingStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(Completed));
        assert!(Cancelled.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Confirmed));
        assert!(!Completed.can_transition_to(Pending));
        assert!(Pending.transition_to(Completed).is_err());
        assert_eq!("CONFIRMED".parse::<BookingStatus>().unwrap(), Confirmed);
    }
}
