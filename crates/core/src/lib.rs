//! Sparkcola Core - Shared domain types.
//!
//! This crate provides the types used by the storefront and the CLI:
//! - `storefront` - Localized marketing site, cart and checkout
//! - `cli` - Command-line tools for migrations and catalog inspection
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients, no sessions. Cart totals, the cart reducer, checkout steps and
//! the order status progression all live here so they can be tested without
//! a running server.
//!
//! # Modules
//!
//! - [`types`] - IDs, prices, catalog, cart, checkout, orders and locales

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
