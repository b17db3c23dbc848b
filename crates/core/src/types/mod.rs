//! Core types for Sparkcola.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod checkout;
pub mod id;
pub mod locale;
pub mod order;
pub mod price;
pub mod product;
pub mod status;

pub use cart::{Cart, CartAction, CartItem, CartState};
pub use checkout::{
    CheckoutDraft, CheckoutStep, CustomerInfo, FPX_BANKS, PaymentMethod, PaymentSelection,
    ShippingAddress, ShippingMethod, card_last4, fpx_bank_name,
};
pub use id::*;
pub use locale::{Locale, UnknownLocale};
pub use order::Order;
pub use price::{CurrencyCode, Price, PriceError};
pub use product::{
    DEFAULT_VARIANT_TITLE, Product, ProductImage, ProductOption, ProductSort, ProductVariant,
    SelectedOption,
};
pub use status::OrderStatus;
