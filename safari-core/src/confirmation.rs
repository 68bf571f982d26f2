use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use url::form_urlencoded;

use crate::booking::{CartItem, CustomerInfo};

/// Route the checkout hands off to.
pub const CONFIRMATION_PATH: &str = "/booking-confirmation";

/// Session-storage key holding the JSON-encoded payload.
pub const SESSION_KEY: &str = "bookingConfirmation";

/// Denormalized summary of a completed booking.
///
/// The checkout writes it twice: as JSON under [`SESSION_KEY`] and as the
/// query string of the confirmation URL. The confirmation view treats both
/// as authoritative and prefers the session copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationPayload {
    pub booking_reference: String,
    pub customer_name: String,
    pub customer_email: String,
    pub total_amount: Decimal,
    pub number_of_guests: u32,
    pub tour_title: String,
    pub tour_date: String,
    pub tour_price: Decimal,
    #[serde(default)]
    pub special_requests: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfirmationError {
    #[error("Missing confirmation parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid confirmation parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: String },
    #[error("Booking has no tours to confirm")]
    NoItems,
    #[error("Malformed confirmation data: {0}")]
    Malformed(String),
}

impl ConfirmationPayload {
    /// Summary of the first tour in the cart plus the booking totals.
    pub fn build(
        booking_reference: &str,
        customer: &CustomerInfo,
        items: &[CartItem],
        total_amount: Decimal,
        number_of_guests: u32,
    ) -> Result<Self, ConfirmationError> {
        let first = items.first().ok_or(ConfirmationError::NoItems)?;
        Ok(Self {
            booking_reference: booking_reference.to_string(),
            customer_name: customer.name.clone(),
            customer_email: customer.email.clone(),
            total_amount: total_amount.normalize(),
            number_of_guests,
            tour_title: first.title.clone(),
            tour_date: first.date.clone(),
            tour_price: first.price.normalize(),
            special_requests: customer.special_requests.clone(),
        })
    }

    pub fn to_session_value(&self) -> Result<String, ConfirmationError> {
        serde_json::to_string(self).map_err(|e| ConfirmationError::Malformed(e.to_string()))
    }

    pub fn from_session_value(raw: &str) -> Result<Self, ConfirmationError> {
        serde_json::from_str(raw).map_err(|e| ConfirmationError::Malformed(e.to_string()))
    }

    /// `reference, name, email, total, guests, tour, date, price` and
    /// `requests` when non-empty.
    pub fn to_query_string(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query
            .append_pair("reference", &self.booking_reference)
            .append_pair("name", &self.customer_name)
            .append_pair("email", &self.customer_email)
            .append_pair("total", &self.total_amount.normalize().to_string())
            .append_pair("guests", &self.number_of_guests.to_string())
            .append_pair("tour", &self.tour_title)
            .append_pair("date", &self.tour_date)
            .append_pair("price", &self.tour_price.normalize().to_string());
        if !self.special_requests.is_empty() {
            query.append_pair("requests", &self.special_requests);
        }
        query.finish()
    }

    pub fn from_query_string(query: &str) -> Result<Self, ConfirmationError> {
        let params: HashMap<String, String> = form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
            .into_owned()
            .collect();
        Self::from_params(&params)
    }

    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, ConfirmationError> {
        let required = |name: &'static str| -> Result<String, ConfirmationError> {
            params
                .get(name)
                .filter(|v| !v.is_empty())
                .cloned()
                .ok_or(ConfirmationError::MissingParameter(name))
        };
        let decimal = |name: &'static str| -> Result<Decimal, ConfirmationError> {
            let raw = required(name)?;
            Decimal::from_str(&raw).map_err(|_| ConfirmationError::InvalidParameter { name, value: raw })
        };

        // Wire order, so the first missing parameter is the one reported.
        let booking_reference = required("reference")?;
        let customer_name = required("name")?;
        let customer_email = required("email")?;
        let total_amount = decimal("total")?;
        let guests_raw = required("guests")?;
        let number_of_guests = guests_raw
            .parse::<u32>()
            .map_err(|_| ConfirmationError::InvalidParameter { name: "guests", value: guests_raw })?;

        Ok(Self {
            booking_reference,
            customer_name,
            customer_email,
            total_amount,
            number_of_guests,
            tour_title: required("tour")?,
            tour_date: required("date")?,
            tour_price: decimal("price")?,
            special_requests: params.get("requests").cloned().unwrap_or_default(),
        })
    }

    pub fn confirmation_url(&self) -> String {
        format!("{}?{}", CONFIRMATION_PATH, self.to_query_string())
    }

    /// Session copy first, query string second. A session value that fails
    /// to parse is ignored rather than masking a usable query string.
    pub fn resolve(session_value: Option<&str>, query: &str) -> Option<Self> {
        session_value
            .and_then(|raw| Self::from_session_value(raw).ok())
            .or_else(|| Self::from_query_string(query).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> ConfirmationPayload {
        ConfirmationPayload {
            booking_reference: "SB1700000000000".to_string(),
            customer_name: "Jane Doe".to_string(),
            customer_email: "jane+safari@example.com".to_string(),
            total_amount: Decimal::from(1100),
            number_of_guests: 2,
            tour_title: "Gorilla Trek & Canopy Walk".to_string(),
            tour_date: "2025-07-01".to_string(),
            tour_price: Decimal::from(500),
            special_requests: String::new(),
        }
    }

    #[test]
    fn test_query_string_omits_empty_requests() {
        let query = payload().to_query_string();
        assert!(query.starts_with("reference=SB1700000000000&name=Jane+Doe"));
        assert!(query.contains("email=jane%2Bsafari%40example.com"));
        assert!(query.contains("tour=Gorilla+Trek+%26+Canopy+Walk"));
        assert!(query.contains("total=1100"));
        assert!(!query.contains("requests="));
    }

    #[test]
    fn test_query_and_session_carry_same_payload() {
        let mut original = payload();
        original.special_requests = "Vegetarian lunch".to_string();

        let from_query = ConfirmationPayload::from_query_string(&original.to_query_string()).unwrap();
        let from_session = ConfirmationPayload::from_session_value(&original.to_session_value().unwrap()).unwrap();

        assert_eq!(from_query, original);
        assert_eq!(from_session, original);
    }

    #[test]
    fn test_missing_parameter_is_reported() {
        let err = ConfirmationPayload::from_query_string("reference=SB1&name=Jane").unwrap_err();
        assert_eq!(err, ConfirmationError::MissingParameter("email"));

        let err = ConfirmationPayload::from_query_string(
            "reference=SB1&name=J&email=j%40x.io&total=abc&guests=1&tour=T&date=D&price=1",
        )
        .unwrap_err();
        assert!(matches!(err, ConfirmationError::InvalidParameter { name: "total", .. }));
    }

    #[test]
    fn test_built_payload_survives_both_channels() {
        let customer = CustomerInfo {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: "+254700000000".to_string(),
            country: "Kenya".to_string(),
            special_requests: "Window seat".to_string(),
        };
        let items = vec![CartItem {
            tour_id: "bwindi-gorilla-trek".to_string(),
            title: "Bwindi Gorilla Trek".to_string(),
            price: Decimal::new(49950, 2),
            guests: 2,
            date: "2025-07-01".to_string(),
            image: String::new(),
        }];
        assert!(crate::booking::validate_items(&items).is_ok());

        let built = ConfirmationPayload::build("SB1", &customer, &items, Decimal::new(109890, 2), 2).unwrap();
        let from_query = ConfirmationPayload::from_query_string(&built.to_query_string()).unwrap();
        let from_session = ConfirmationPayload::from_session_value(&built.to_session_value().unwrap()).unwrap();
        assert_eq!(from_query, built);
        assert_eq!(from_session, built);

        let mut undated = items.clone();
        undated[0].date = String::new();
        assert_eq!(
            crate::booking::validate_items(&undated),
            Err(crate::booking::ValidationError::IncompleteItem { index: 0 })
        );
    }

    #[test]
    fn test_resolve_prefers_session() {
        let session = payload();
        let mut other = payload();
        other.booking_reference = "SB42".to_string();

        let resolved = ConfirmationPayload::resolve(
            Some(&session.to_session_value().unwrap()),
            &other.to_query_string(),
        )
        .unwrap();
        assert_eq!(resolved.booking_reference, "SB1700000000000");

        let fallback = ConfirmationPayload::resolve(Some("{not json"), &other.to_query_string()).unwrap();
        assert_eq!(fallback.booking_reference, "SB42");

        assert!(ConfirmationPayload::resolve(None, "").is_none());
    }

    #[test]
    fn test_session_value_uses_wire_names() {
        let value: serde_json::Value = serde_json::from_str(&payload().to_session_value().unwrap()).unwrap();
        assert_eq!(value["bookingReference"], "SB1700000000000");
        assert_eq!(value["numberOfGuests"], 2);
        assert_eq!(value["totalAmount"].as_f64(), Some(1100.0));
    }

    #[test]
    fn test_confirmation_url() {
        assert!(payload().confirmation_url().starts_with("/booking-confirmation?reference=SB"));
    }
}
