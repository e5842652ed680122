//! The order summary panel beside the checkout form.

use serde::Serialize;

use crate::types::{CartSnapshot, PaymentMethod, Price};

/// One line of the "your order" list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryLine {
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub line_total: Price,
}

/// Totals and labels for the order summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub lines: Vec<SummaryLine>,
    /// Units across all lines.
    pub item_count: u32,
    /// Distinct lines.
    pub line_count: usize,
    pub total: Price,
    /// Always zero; no discounts are offered.
    pub discount: Price,
    pub payment_label: Option<&'static str>,
}

impl OrderSummary {
    /// Build the summary from the cart selection and chosen payment method.
    #[must_use]
    pub fn new(cart: &CartSnapshot, payment: Option<PaymentMethod>) -> Self {
        Self {
            lines: cart
                .items
                .iter()
                .map(|item| SummaryLine {
                    name: item.name.clone(),
                    image: item.image.clone(),
                    quantity: item.quantity,
                    line_total: item.line_total(),
                })
                .collect(),
            item_count: cart.item_count(),
            line_count: cart.line_count(),
            total: cart.total,
            discount: Price::ZERO,
            payment_label: payment.map(PaymentMethod::label),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CartItem, CartItemId};

    #[test]
    fn test_summary_from_cart() {
        let cart = CartSnapshot {
            items: vec![
                CartItem {
                    id: CartItemId::new(1),
                    name: "Arroz de cuxá".to_string(),
                    image: "/img/cuxa.png".to_string(),
                    unit_price: Price::from_cents(3200),
                    quantity: 2,
                },
                CartItem {
                    id: CartItemId::new(2),
                    name: "Guaraná Jesus".to_string(),
                    image: "/img/jesus.png".to_string(),
                    unit_price: Price::from_cents(600),
                    quantity: 1,
                },
            ],
            total: Price::from_cents(7000),
        };

        let summary = OrderSummary::new(&cart, Some(PaymentMethod::Cash));
        assert_eq!(summary.item_count, 3);
        assert_eq!(summary.line_count, 2);
        assert_eq!(summary.lines[0].line_total, Price::from_cents(6400));
        assert_eq!(summary.total, Price::from_cents(7000));
        assert!(summary.discount.is_zero());
        assert_eq!(summary.payment_label, Some("Dinheiro"));
    }

    #[test]
    fn test_summary_without_payment() {
        let summary = OrderSummary::new(&CartSnapshot::default(), None);
        assert_eq!(summary.payment_label, None);
        assert!(summary.lines.is_empty());
    }
}
