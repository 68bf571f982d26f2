use safari_core::booking::{blank_guests, guest_count, validate_guests};
use safari_core::{CartItem, CustomerInfo, GuestInfo, ValidationError};

/// Where the checkout form is in its submit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutPhase {
    Idle,
    Validating,
    Submitting,
    Redirecting,
}

impl CheckoutPhase {
    /// The submit control is disabled outside `Idle`.
    pub fn is_busy(&self) -> bool {
        !matches!(self, CheckoutPhase::Idle)
    }

    pub fn status_message(&self) -> Option<&'static str> {
        match self {
            CheckoutPhase::Idle => None,
            CheckoutPhase::Validating => Some("Checking your details..."),
            CheckoutPhase::Submitting => Some("Processing your booking..."),
            CheckoutPhase::Redirecting => Some("Booking confirmed! Redirecting..."),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerField {
    Name,
    Email,
    Phone,
    Country,
    SpecialRequests,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuestField {
    Name(String),
    /// Raw input; anything that doesn't parse as a whole number becomes 0.
    Age(String),
    DietaryRestrictions(String),
    MedicalConditions(String),
}

/// Controlled-input state for customer details and one entry per guest.
///
/// `guests.len()` always equals the sum of `guests` over the cart lines the
/// form was last synced with.
#[derive(Debug, Clone, Default)]
pub struct CheckoutForm {
    customer_info: CustomerInfo,
    guests: Vec<GuestInfo>,
    synced_items: Vec<CartItem>,
}

impl CheckoutForm {
    pub fn new(items: &[CartItem]) -> Self {
        let mut form = Self::default();
        form.sync_with_cart(items);
        form
    }

    /// Re-initializes the guest list when the cart lines changed since the
    /// last sync. Returns whether a reset happened.
    pub fn sync_with_cart(&mut self, items: &[CartItem]) -> bool {
        if self.synced_items.as_slice() == items && self.guests.len() == guest_count(items) {
            return false;
        }
        self.guests = blank_guests(items);
        self.synced_items = items.to_vec();
        true
    }

    pub fn customer_info(&self) -> &CustomerInfo {
        &self.customer_info
    }

    pub fn guests(&self) -> &[GuestInfo] {
        &self.guests
    }

    pub fn set_customer_field(&mut self, field: CustomerField, value: impl Into<String>) {
        let value = value.into();
        let info = &mut self.customer_info;
        match field {
            CustomerField::Name => info.name = value,
            CustomerField::Email => info.email = value,
            CustomerField::Phone => info.phone = value,
            CustomerField::Country => info.country = value,
            CustomerField::SpecialRequests => info.special_requests = value,
        }
    }

    /// Updates one guest. Out-of-range indexes are ignored.
    pub fn update_guest(&mut self, index: usize, field: GuestField) {
        let Some(guest) = self.guests.get_mut(index) else {
            return;
        };
        match field {
            GuestField::Name(v) => guest.name = v,
            GuestField::Age(v) => guest.age = v.trim().parse().unwrap_or(0),
            GuestField::DietaryRestrictions(v) => guest.dietary_restrictions = v,
            GuestField::MedicalConditions(v) => guest.medical_conditions = v,
        }
    }

    /// Customer presence checks first, then each guest.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.customer_info.validate()?;
        validate_guests(&self.guests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn item(tour_id: &str, guests: u32) -> CartItem {
        CartItem {
            tour_id: tour_id.to_string(),
            title: "Gorilla Trek".to_string(),
            price: Decimal::from(500),
            guests,
            date: "2025-07-01".to_string(),
            image: String::new(),
        }
    }

    fn filled(items: &[CartItem]) -> CheckoutForm {
        let mut form = CheckoutForm::new(items);
        form.set_customer_field(CustomerField::Name, "Jane Doe");
        form.set_customer_field(CustomerField::Email, "jane@example.com");
        form.set_customer_field(CustomerField::Phone, "+256700000000");
        for i in 0..form.guests().len() {
            form.update_guest(i, GuestField::Name(format!("Guest {}", i + 1)));
            form.update_guest(i, GuestField::Age("30".to_string()));
        }
        form
    }

    #[test]
    fn test_guest_list_tracks_cart() {
        let mut form = CheckoutForm::new(&[item("a", 2), item("b", 3)]);
        assert_eq!(form.guests().len(), 5);

        assert!(!form.sync_with_cart(&[item("a", 2), item("b", 3)]));
        assert!(form.sync_with_cart(&[item("a", 1)]));
        assert_eq!(form.guests().len(), 1);
    }

    #[test]
    fn test_cart_change_resets_entered_guests() {
        let mut form = filled(&[item("a", 2)]);
        assert!(form.validate().is_ok());

        form.sync_with_cart(&[item("a", 3)]);
        assert_eq!(form.guests().len(), 3);
        assert!(form.guests().iter().all(|g| g.name.is_empty() && g.age == 0));
    }

    #[test]
    fn test_validation_requires_customer_fields() {
        for field in [CustomerField::Name, CustomerField::Email, CustomerField::Phone] {
            let mut form = filled(&[item("a", 1)]);
            form.set_customer_field(field, "");
            assert!(matches!(form.validate(), Err(ValidationError::MissingCustomerField(_))));
        }
    }

    #[test]
    fn test_unparseable_age_counts_as_zero() {
        let mut form = filled(&[item("a", 2)]);
        form.update_guest(1, GuestField::Age("thirty".to_string()));
        assert_eq!(form.guests()[1].age, 0);
        assert_eq!(form.validate(), Err(ValidationError::IncompleteGuest { index: 1 }));
    }

    #[test]
    fn test_update_out_of_range_guest_is_ignored() {
        let mut form = filled(&[item("a", 1)]);
        form.update_guest(7, GuestField::Name("Nobody".to_string()));
        assert_eq!(form.guests().len(), 1);
    }

    #[test]
    fn test_phase_busy_flags() {
        assert!(!CheckoutPhase::Idle.is_busy());
        assert!(CheckoutPhase::Submitting.is_busy());
        assert!(CheckoutPhase::Redirecting.status_message().unwrap().contains("Redirecting"));
    }
}
