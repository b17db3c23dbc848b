//! Cart snapshot and the reducer that drives cart UI state.
//!
//! The commerce backend owns the authoritative cart. The storefront keeps a
//! snapshot of it plus two UI flags (drawer open, mutation in flight), and
//! moves between states only through [`CartState::apply`].

use serde::{Deserialize, Serialize};

use super::id::{CartId, CartLineId, VariantId};
use super::price::{CurrencyCode, Price};
use super::product::ProductImage;

/// One product-variant-quantity entry within a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub line_id: CartLineId,
    pub variant_id: VariantId,
    pub product_handle: String,
    pub title: String,
    /// `None` for products that only have the implicit default variant.
    pub variant_title: Option<String>,
    pub quantity: u32,
    pub unit_price: Price,
    pub image: Option<ProductImage>,
}

impl CartItem {
    /// Unit price multiplied by quantity.
    #[must_use]
    pub fn line_subtotal(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// A shopping cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub id: CartId,
    pub lines: Vec<CartItem>,
    pub currency: CurrencyCode,
    /// Hosted checkout URL (live backend only).
    pub checkout_url: Option<String>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new(id: CartId, currency: CurrencyCode) -> Self {
        Self {
            id,
            lines: Vec::new(),
            currency,
            checkout_url: None,
        }
    }

    /// Sum of `unit_price * quantity` across all lines.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.lines
            .iter()
            .fold(Price::zero(self.currency), |acc, line| {
                acc.plus(line.line_subtotal())
            })
    }

    /// Subtotal plus a shipping fee.
    #[must_use]
    pub fn total(&self, shipping_fee: Price) -> Price {
        self.subtotal().plus(shipping_fee)
    }

    /// Total number of units across all lines, saturating at `u32::MAX`.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.lines
            .iter()
            .fold(0, |total, line| total.saturating_add(line.quantity))
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Find the line holding a variant.
    #[must_use]
    pub fn line_for_variant(&self, variant_id: &VariantId) -> Option<&CartItem> {
        self.lines.iter().find(|line| &line.variant_id == variant_id)
    }
}

/// Cart UI state: the latest snapshot plus drawer and loading flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    pub cart: Option<Cart>,
    pub is_open: bool,
    pub is_loading: bool,
}

/// Transitions of the cart UI state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    /// A cart snapshot was read from the backend.
    Loaded(Cart),
    /// A mutating backend call started.
    MutationStarted,
    /// A mutating backend call returned the authoritative cart.
    MutationSucceeded(Cart),
    /// A mutating backend call failed; the snapshot is left as it was.
    MutationFailed,
    Open,
    Close,
    Toggle,
    /// The cart was discarded.
    Cleared,
}

impl CartState {
    /// Apply an action and return the next state.
    #[must_use]
    pub fn apply(self, action: CartAction) -> Self {
        match action {
            CartAction::Loaded(cart) => Self {
                cart: Some(cart),
                ..self
            },
            CartAction::MutationStarted => Self {
                is_loading: true,
                ..self
            },
            CartAction::MutationSucceeded(cart) => Self {
                cart: Some(cart),
                is_loading: false,
                ..self
            },
            CartAction::MutationFailed => Self {
                is_loading: false,
                ..self
            },
            CartAction::Open => Self {
                is_open: true,
                ..self
            },
            CartAction::Close => Self {
                is_open: false,
                ..self
            },
            CartAction::Toggle => Self {
                is_open: !self.is_open,
                ..self
            },
            CartAction::Cleared => Self {
                cart: None,
                ..self
            },
        }
    }

    /// Total quantity of the current snapshot (0 without a cart).
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.cart.as_ref().map_or(0, Cart::total_quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    fn item(n: u32, minor: i64, quantity: u32) -> CartItem {
        CartItem {
            line_id: CartLineId::new(format!("line-{n}")),
            variant_id: VariantId::new(format!("variant-{n}")),
            product_handle: format!("product-{n}"),
            title: format!("Product {n}"),
            variant_title: None,
            quantity,
            unit_price: Price::from_minor(minor, CurrencyCode::MYR),
            image: None,
        }
    }

    fn cart(lines: Vec<CartItem>) -> Cart {
        Cart {
            id: CartId::new("cart-1"),
            lines,
            currency: CurrencyCode::MYR,
            checkout_url: None,
        }
    }

    #[test]
    fn test_subtotal_single_line() {
        let cart = cart(vec![item(1, 2000, 2)]);
        assert_eq!(cart.subtotal().display(), "RM 40.00");
        assert_eq!(cart.total(Price::zero(CurrencyCode::MYR)).display(), "RM 40.00");
        assert_eq!(cart.total_quantity(), 2);
    }

    #[test]
    fn test_total_quantity_saturates() {
        let cart = cart(vec![item(1, 2000, u32::MAX), item(2, 500, 3)]);
        assert_eq!(cart.total_quantity(), u32::MAX);
    }

    #[test]
    fn test_empty_cart_totals() {
        let cart = cart(Vec::new());
        assert!(cart.is_empty());
        assert!(cart.subtotal().is_zero());
        assert_eq!(cart.total_quantity(), 0);
    }

    #[test]
    fn test_total_includes_shipping() {
        let cart = cart(vec![item(1, 1990, 1), item(2, 500, 3)]);
        let shipping = Price::from_minor(1500, CurrencyCode::MYR);
        assert_eq!(cart.subtotal().display(), "RM 34.90");
        assert_eq!(cart.total(shipping).display(), "RM 49.90");
    }

    #[test]
    fn test_reducer_mutation_lifecycle() {
        let state = CartState::default().apply(CartAction::MutationStarted);
        assert!(state.is_loading);

        let state = state.apply(CartAction::MutationSucceeded(cart(vec![item(1, 100, 1)])));
        assert!(!state.is_loading);
        assert_eq!(state.total_quantity(), 1);

        let state = state
            .apply(CartAction::MutationStarted)
            .apply(CartAction::MutationFailed);
        assert!(!state.is_loading);
        assert_eq!(state.total_quantity(), 1, "failure keeps the last snapshot");
    }

    #[test]
    fn test_reducer_drawer_independent_of_contents() {
        let state = CartState::default().apply(CartAction::Open);
        assert!(state.is_open);
        assert!(state.cart.is_none());

        let state = state
            .apply(CartAction::Loaded(cart(vec![item(1, 100, 1)])))
            .apply(CartAction::Toggle);
        assert!(!state.is_open);
        assert!(state.cart.is_some());

        let state = state.apply(CartAction::Toggle).apply(CartAction::Cleared);
        assert!(state.is_open);
        assert!(state.cart.is_none());
        assert!(!state.apply(CartAction::Close).is_open);
    }

    proptest! {
        #[test]
        fn prop_subtotal_is_sum_of_lines(
            lines in proptest::collection::vec((0i64..100_000, 1u32..50), 0..20)
        ) {
            let items: Vec<CartItem> = lines
                .iter()
                .enumerate()
                .map(|(i, &(minor, qty))| item(u32::try_from(i).unwrap(), minor, qty))
                .collect();
            let cart = cart(items);

            let expected: Decimal = lines
                .iter()
                .map(|&(minor, qty)| Decimal::new(minor, 2) * Decimal::from(qty))
                .sum();
            let expected_qty: u32 = lines.iter().map(|&(_, qty)| qty).sum();

            prop_assert_eq!(cart.subtotal().amount, expected);
            prop_assert_eq!(cart.total(Price::zero(CurrencyCode::MYR)).amount, expected);
            prop_assert_eq!(cart.total_quantity(), expected_qty);
        }
    }
}
