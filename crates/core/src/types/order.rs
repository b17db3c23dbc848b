//! Client-side order record.
//!
//! An order is synthesized at checkout from the cart snapshot and the checkout
//! draft, then persisted as a single JSON document per browser. A new order
//! overwrites the previous one.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cart::{Cart, CartItem};
use super::checkout::{CheckoutDraft, CustomerInfo, PaymentSelection, ShippingAddress, ShippingMethod};
use super::id::OrderId;
use super::price::{CurrencyCode, Price};
use super::status::OrderStatus;

/// A synthesized order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub created_at: DateTime<Utc>,
    pub items: Vec<CartItem>,
    pub currency: CurrencyCode,
    pub subtotal: Price,
    pub shipping_fee: Price,
    pub total: Price,
    pub customer: CustomerInfo,
    pub shipping_address: ShippingAddress,
    pub shipping_method: ShippingMethod,
    pub payment: PaymentSelection,
    /// Status at `created_at`.
    pub status: OrderStatus,
    /// Set when the shopper starts the progress simulation.
    pub simulation_started_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Build an order from the cart and the checkout draft at time `at`.
    #[must_use]
    pub fn synthesize(cart: &Cart, draft: &CheckoutDraft, at: DateTime<Utc>) -> Self {
        let shipping_fee = draft.shipping_method.fee(cart.currency);
        Self {
            id: OrderId::from_timestamp(at),
            created_at: at,
            items: cart.lines.clone(),
            currency: cart.currency,
            subtotal: cart.subtotal(),
            shipping_fee,
            total: cart.total(shipping_fee),
            customer: draft.customer.clone(),
            shipping_address: draft.shipping_address.clone(),
            shipping_method: draft.shipping_method,
            payment: draft.payment.clone(),
            status: OrderStatus::Confirmed,
            simulation_started_at: None,
        }
    }

    /// Number of units ordered.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0, |total: u32, item| total.saturating_add(item.quantity))
    }

    /// Start the progress simulation. Restarting resets the clock.
    pub fn start_simulation(&mut self, at: DateTime<Utc>) {
        self.simulation_started_at = Some(at);
    }

    /// Whether the simulation is running and has not reached the end.
    #[must_use]
    pub fn is_simulating(&self, now: DateTime<Utc>, step: Duration) -> bool {
        self.simulation_started_at.is_some() && !self.status_at(now, step).is_final()
    }

    /// Displayed status at `now`, one step per `step` since the simulation started.
    #[must_use]
    pub fn status_at(&self, now: DateTime<Utc>, step: Duration) -> OrderStatus {
        let Some(started) = self.simulation_started_at else {
            return self.status;
        };
        let elapsed = (now - started).to_std().unwrap_or(Duration::ZERO);
        self.status.advanced_by(elapsed, step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::checkout::{CheckoutStep, PaymentMethod};
    use crate::types::id::{CartId, CartLineId, VariantId};
    use chrono::TimeZone;

    fn cart() -> Cart {
        Cart {
            id: CartId::new("cart-1"),
            lines: vec![CartItem {
                line_id: CartLineId::new("line-1"),
                variant_id: VariantId::new("variant-1"),
                product_handle: "classic-cola".to_string(),
                title: "Classic Cola".to_string(),
                variant_title: Some("12-pack".to_string()),
                quantity: 2,
                unit_price: Price::from_minor(2000, CurrencyCode::MYR),
                image: None,
            }],
            currency: CurrencyCode::MYR,
            checkout_url: None,
        }
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 4, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_synthesize_free_shipping_totals() {
        let draft = CheckoutDraft {
            step: CheckoutStep::Payment,
            ..CheckoutDraft::default()
        };
        let order = Order::synthesize(&cart(), &draft, at());

        assert_eq!(order.subtotal.display(), "RM 40.00");
        assert!(order.shipping_fee.is_zero());
        assert_eq!(order.total.display(), "RM 40.00");
        assert_eq!(order.item_count(), 2);
        assert_eq!(order.status, OrderStatus::Confirmed);
        assert_eq!(order.id, OrderId::from_timestamp(at()));
    }

    #[test]
    fn test_synthesize_express_shipping() {
        let mut draft = CheckoutDraft::default();
        draft.shipping_method = ShippingMethod::Express;
        draft.payment.method = PaymentMethod::Fpx;
        draft.payment.fpx_bank = Some("cimb".to_string());

        let order = Order::synthesize(&cart(), &draft, at());
        assert_eq!(order.total.display(), "RM 55.00");
        assert_eq!(order.payment.fpx_bank.as_deref(), Some("cimb"));
    }

    #[test]
    fn test_json_document_fields() {
        let order = Order::synthesize(&cart(), &CheckoutDraft::default(), at());
        let json = serde_json::to_value(&order).unwrap();

        for field in ["id", "items", "subtotal", "total", "customer", "payment", "created_at"] {
            assert!(json.get(field).is_some(), "missing field {field}");
        }
        let restored: Order = serde_json::from_value(json).unwrap();
        assert_eq!(restored, order);
    }

    #[test]
    fn test_status_simulation() {
        let step = Duration::from_secs(3);
        let mut order = Order::synthesize(&cart(), &CheckoutDraft::default(), at());

        let later = at() + chrono::Duration::seconds(30);
        assert_eq!(order.status_at(later, step), OrderStatus::Confirmed);
        assert!(!order.is_simulating(later, step));

        order.start_simulation(at());
        assert_eq!(
            order.status_at(at() + chrono::Duration::seconds(4), step),
            OrderStatus::Preparing
        );
        assert!(order.is_simulating(at() + chrono::Duration::seconds(4), step));
        assert_eq!(order.status_at(later, step), OrderStatus::Delivered);
        assert!(!order.is_simulating(later, step));
    }
}
