use rust_decimal::{Decimal, RoundingStrategy};
use safari_core::CartItem;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Fraction of the subtotal charged as tax (0.1 = 10%)
    pub tax_rate: Decimal,

    /// ISO currency code shown next to amounts
    pub currency: String,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::new(1, 1),
            currency: "USD".to_string(),
        }
    }
}

/// Subtotal, tax and total for a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    config: PricingConfig,
}

impl PricingEngine {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// `tax = subtotal * tax_rate` rounded to cents (half away from zero),
    /// `total = subtotal + tax`.
    pub fn quote(&self, subtotal: Decimal) -> PriceBreakdown {
        let tax = (subtotal * self.config.tax_rate)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            .normalize();
        PriceBreakdown {
            subtotal: subtotal.normalize(),
            tax,
            total: (subtotal + tax).normalize(),
        }
    }

    pub fn quote_items(&self, items: &[CartItem]) -> PriceBreakdown {
        self.quote(items.iter().map(CartItem::line_total).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: Decimal, guests: u32) -> CartItem {
        CartItem {
            tour_id: "t1".to_string(),
            title: "Gorilla Trek".to_string(),
            price,
            guests,
            date: "2025-07-01".to_string(),
            image: String::new(),
        }
    }

    #[test]
    fn test_ten_percent_tax() {
        let engine = PricingEngine::default();
        let quote = engine.quote(Decimal::from(1000));
        assert_eq!(quote.tax, Decimal::from(100));
        assert_eq!(quote.total, Decimal::from(1100));
    }

    #[test]
    fn test_quote_items_multiplies_by_guests() {
        let engine = PricingEngine::default();
        let quote = engine.quote_items(&[item(Decimal::from(500), 2)]);
        assert_eq!(quote.subtotal, Decimal::from(1000));
        assert_eq!(quote.tax, Decimal::from(100));
        assert_eq!(quote.total, Decimal::from(1100));
    }

    #[test]
    fn test_tax_rounds_to_cents() {
        let engine = PricingEngine::default();
        // 33.35 * 0.1 = 3.335 -> 3.34
        let quote = engine.quote(Decimal::new(3335, 2));
        assert_eq!(quote.tax, Decimal::new(334, 2));
        assert_eq!(quote.total, Decimal::new(3669, 2));

        // 0.1 + 0.2 style inputs stay exact
        let quote = engine.quote_items(&[item(Decimal::new(1, 1), 1), item(Decimal::new(2, 1), 1)]);
        assert_eq!(quote.subtotal, Decimal::new(3, 1));
    }

    #[test]
    fn test_custom_rate() {
        let engine = PricingEngine::new(PricingConfig {
            tax_rate: Decimal::new(18, 2),
            currency: "UGX".to_string(),
        });
        assert_eq!(engine.quote(Decimal::from(200)).tax, Decimal::from(36));
        assert_eq!(engine.config().currency, "UGX");
    }
}
