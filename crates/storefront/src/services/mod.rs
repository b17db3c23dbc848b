//! Business logic services for storefront.
//!
//! # Services
//!
//! - `cart` - Cart state container over the commerce backend
//! - `checkout` - Checkout draft and simulated order placement
//! - `orders` - The per-browser order record and status simulation

pub mod cart;
pub mod checkout;
pub mod orders;

pub use cart::{CartActivity, CartService};
pub use checkout::{CheckoutError, CheckoutService};
pub use orders::OrderStore;
