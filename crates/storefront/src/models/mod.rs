//! Storefront view models and session types.

pub mod cart;
pub mod page;
pub mod session;

pub use cart::{CartItemView, CartView};
pub use page::{LocaleLink, PageContext, localized_path};
pub use session::keys as session_keys;
