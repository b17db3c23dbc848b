//! Session-related types.
//!
//! The session is the browser's persisted storage: everything the storefront
//! remembers about a visitor lives under one of these keys.

/// Session keys for per-browser state.
pub mod keys {
    /// Key for storing the active cart ID.
    pub const CART_ID: &str = "cart_id";

    /// Key for the cart drawer open/closed flag.
    pub const CART_DRAWER_OPEN: &str = "cart_drawer_open";

    /// Key for the in-progress checkout draft.
    pub const CHECKOUT: &str = "checkout";

    /// Key for the most recently placed order.
    pub const LAST_ORDER: &str = "last_order";

    /// Key for the visitor's chosen locale.
    pub const LOCALE: &str = "locale";
}
