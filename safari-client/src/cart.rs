use rust_decimal::Decimal;
use safari_core::CartItem;
use std::sync::{Mutex, MutexGuard};

/// Cart store the checkout reads from. Injected so the flow can be exercised
/// without the real storefront state.
pub trait Cart: Send + Sync {
    fn items(&self) -> Vec<CartItem>;

    /// Subtotal: sum of `price * guests` over all lines.
    fn total(&self) -> Decimal {
        self.items().iter().map(CartItem::line_total).sum()
    }

    fn clear(&self);
}

#[derive(Debug, Default)]
pub struct MemoryCart {
    items: Mutex<Vec<CartItem>>,
}

impl MemoryCart {
    pub fn new(items: Vec<CartItem>) -> Self {
        Self {
            items: Mutex::new(items),
        }
    }

    /// Adds a line, or bumps guests and date on an existing line for the same tour.
    pub fn add(&self, item: CartItem) {
        let mut items = self.lock();
        match items.iter_mut().find(|i| i.tour_id == item.tour_id) {
            Some(existing) => {
                existing.guests = item.guests;
                existing.date = item.date;
            }
            None => items.push(item),
        }
    }

    pub fn remove(&self, tour_id: &str) {
        self.lock().retain(|i| i.tour_id != tour_id);
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<CartItem>> {
        self.items.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Cart for MemoryCart {
    fn items(&self) -> Vec<CartItem> {
        self.lock().clone()
    }

    fn clear(&self) {
        self.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(tour_id: &str, price: i64, guests: u32) -> CartItem {
        CartItem {
            tour_id: tour_id.to_string(),
            title: tour_id.to_string(),
            price: Decimal::from(price),
            guests,
            date: "2025-07-01".to_string(),
            image: String::new(),
        }
    }

    #[test]
    fn test_total_is_price_times_guests() {
        let cart = MemoryCart::new(vec![item("a", 500, 2), item("b", 120, 1)]);
        assert_eq!(cart.total(), Decimal::from(1120));
    }

    #[test]
    fn test_add_existing_tour_updates_line() {
        let cart = MemoryCart::default();
        cart.add(item("a", 500, 2));
        cart.add(item("a", 500, 4));
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].guests, 4);

        cart.remove("a");
        assert!(cart.is_empty());
    }

    #[test]
    fn test_clear() {
        let cart = MemoryCart::new(vec![item("a", 1, 1)]);
        cart.clear();
        assert!(cart.items().is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
    }
}
