//! Cart state container.
//!
//! Wraps the commerce backend with the per-browser cart state: the active
//! cart id and drawer flag live in the session, the loading flag is tracked
//! in-process per session. Every mutation replaces the local snapshot with
//! the backend's authoritative cart. Failures are logged and swallowed: the
//! caller always gets a renderable `CartState`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use sparkcola_core::{Cart, CartAction, CartId, CartLineId, CartState, VariantId};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::add_breadcrumb;
use crate::models::session_keys;
use crate::shopify::{CartLineInput, CartLineUpdateInput, CommerceClient, ShopifyError};

// =============================================================================
// Loading flag
// =============================================================================

/// In-flight cart mutations per session.
#[derive(Debug, Clone, Default)]
pub struct CartActivity {
    in_flight: Arc<Mutex<HashMap<String, usize>>>,
}

impl CartActivity {
    /// Mark a mutation as started. The flag clears when the guard drops.
    #[must_use]
    pub fn begin(&self, key: Option<String>) -> ActivityGuard {
        if let Some(key) = &key {
            let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            *in_flight.entry(key.clone()).or_insert(0) += 1;
        }
        ActivityGuard {
            activity: self.clone(),
            key,
        }
    }

    /// Whether any mutation is in flight for the key.
    #[must_use]
    pub fn is_active(&self, key: Option<&str>) -> bool {
        key.is_some_and(|key| {
            self.in_flight
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get(key)
                .is_some_and(|count| *count > 0)
        })
    }

    fn finish(&self, key: &str) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(count) = in_flight.get_mut(key) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                in_flight.remove(key);
            }
        }
    }
}

/// Clears one in-flight mark on drop.
#[derive(Debug)]
pub struct ActivityGuard {
    activity: CartActivity,
    key: Option<String>,
}

impl Drop for ActivityGuard {
    fn drop(&mut self) {
        if let Some(key) = &self.key {
            self.activity.finish(key);
        }
    }
}

// =============================================================================
// CartService
// =============================================================================

/// Cart operations for one request's session.
pub struct CartService<'a> {
    commerce: &'a CommerceClient,
    activity: &'a CartActivity,
    session: &'a Session,
}

impl<'a> CartService<'a> {
    #[must_use]
    pub const fn new(
        commerce: &'a CommerceClient,
        activity: &'a CartActivity,
        session: &'a Session,
    ) -> Self {
        Self {
            commerce,
            activity,
            session,
        }
    }

    /// Current cart state: the backend snapshot plus drawer and loading flags.
    #[instrument(skip(self))]
    pub async fn state(&self) -> CartState {
        let mut state = CartState {
            cart: None,
            is_open: self.drawer_open().await,
            is_loading: self.activity.is_active(self.session_key().as_deref()),
        };

        if let Some(cart_id) = self.cart_id().await {
            match self.commerce.get_cart(&cart_id).await {
                Ok(cart) => state = state.apply(CartAction::Loaded(cart)),
                Err(ShopifyError::NotFound(_)) => {
                    tracing::info!(cart_id = %cart_id, "Cart no longer exists, forgetting it");
                    self.forget_cart_id().await;
                }
                Err(e) => tracing::warn!(cart_id = %cart_id, "Failed to fetch cart: {e}"),
            }
        }

        state
    }

    /// Add a variant. Creates the cart on first add and opens the drawer.
    #[instrument(skip(self))]
    pub async fn add_item(&self, variant_id: VariantId, quantity: u32) -> CartState {
        add_breadcrumb(
            "cart",
            "Add to cart",
            Some(&[("variant_id", variant_id.as_str())][..]),
        );
        let line = CartLineInput {
            merchandise_id: variant_id,
            quantity: quantity.max(1),
        };

        let outcome = {
            let _loading = self.activity.begin(self.tracked_key().await);
            match self.cart_id().await {
                Some(cart_id) => match self.commerce.add_lines(&cart_id, vec![line.clone()]).await {
                    // The remembered cart expired: start a fresh one
                    Err(ShopifyError::NotFound(_)) => {
                        self.forget_cart_id().await;
                        self.commerce.create_cart(vec![line]).await
                    }
                    other => other,
                },
                None => self.commerce.create_cart(vec![line]).await,
            }
        };

        let state = self.finish_mutation("add", outcome).await;
        self.set_drawer(true).await;
        state.apply(CartAction::Open)
    }

    /// Set a line's quantity. Zero removes the line.
    #[instrument(skip(self))]
    pub async fn update_item(&self, line_id: CartLineId, quantity: u32) -> CartState {
        let Some(cart_id) = self.cart_id().await else {
            return self.state().await;
        };

        let outcome = {
            let _loading = self.activity.begin(self.tracked_key().await);
            let update = CartLineUpdateInput {
                id: line_id,
                quantity,
            };
            self.commerce.update_lines(&cart_id, vec![update]).await
        };

        self.finish_mutation("update", outcome).await
    }

    /// Remove a line.
    #[instrument(skip(self))]
    pub async fn remove_item(&self, line_id: CartLineId) -> CartState {
        let Some(cart_id) = self.cart_id().await else {
            return self.state().await;
        };

        let outcome = {
            let _loading = self.activity.begin(self.tracked_key().await);
            self.commerce.remove_lines(&cart_id, vec![line_id]).await
        };

        self.finish_mutation("remove", outcome).await
    }

    /// Open the drawer.
    pub async fn open(&self) -> CartState {
        self.set_drawer(true).await;
        self.state().await
    }

    /// Close the drawer.
    pub async fn close(&self) -> CartState {
        self.set_drawer(false).await;
        self.state().await
    }

    /// Flip the drawer.
    pub async fn toggle(&self) -> CartState {
        let open = !self.drawer_open().await;
        self.set_drawer(open).await;
        self.state().await
    }

    /// Forget the cart. The drawer flag is left as it was.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> CartState {
        if let Some(cart_id) = self.cart_id().await {
            self.commerce.discard_cart(&cart_id).await;
            self.forget_cart_id().await;
        }

        CartState {
            cart: None,
            is_open: self.drawer_open().await,
            is_loading: false,
        }
        .apply(CartAction::Cleared)
    }

    /// Record a finished mutation and build the resulting state.
    async fn finish_mutation(
        &self,
        operation: &str,
        outcome: Result<Cart, ShopifyError>,
    ) -> CartState {
        let started = CartState {
            cart: None,
            is_open: self.drawer_open().await,
            is_loading: false,
        }
        .apply(CartAction::MutationStarted);

        match outcome {
            Ok(cart) => {
                if let Err(e) = self.session.insert(session_keys::CART_ID, &cart.id).await {
                    tracing::error!("Failed to save cart ID to session: {e}");
                }
                let state = started.apply(CartAction::MutationSucceeded(cart));
                CartState {
                    is_loading: self.activity.is_active(self.session_key().as_deref()),
                    ..state
                }
            }
            Err(e) => {
                tracing::error!(operation, "Cart mutation failed: {e}");
                let failed = started.apply(CartAction::MutationFailed);
                // Render the last known cart
                let current = self.state().await;
                CartState {
                    cart: current.cart,
                    ..failed
                }
            }
        }
    }

    // =========================================================================
    // Session Helpers
    // =========================================================================

    async fn cart_id(&self) -> Option<CartId> {
        self.session
            .get::<CartId>(session_keys::CART_ID)
            .await
            .ok()
            .flatten()
    }

    async fn forget_cart_id(&self) {
        if let Err(e) = self.session.remove::<CartId>(session_keys::CART_ID).await {
            tracing::error!("Failed to remove cart ID from session: {e}");
        }
    }

    async fn drawer_open(&self) -> bool {
        self.session
            .get::<bool>(session_keys::CART_DRAWER_OPEN)
            .await
            .ok()
            .flatten()
            .unwrap_or(false)
    }

    async fn set_drawer(&self, open: bool) {
        if let Err(e) = self.session.insert(session_keys::CART_DRAWER_OPEN, open).await {
            tracing::error!("Failed to save cart drawer state: {e}");
        }
    }

    fn session_key(&self) -> Option<String> {
        self.session.id().map(|id| id.to_string())
    }

    /// Session key for a mutation about to start. A new visitor's session has
    /// no id until it is first saved, so it is saved here.
    async fn tracked_key(&self) -> Option<String> {
        if self.session.id().is_none()
            && let Err(e) = self.session.save().await
        {
            tracing::warn!("Failed to save new session before cart mutation: {e}");
        }
        self.session_key()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;
    use crate::shopify::MockStorefront;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    fn classic() -> VariantId {
        VariantId::new("gid://sparkcola/ProductVariant/100")
    }

    #[test]
    fn test_activity_guard_clears_flag() {
        let activity = CartActivity::default();
        let first = activity.begin(Some("session-1".to_string()));
        let second = activity.begin(Some("session-1".to_string()));
        assert!(activity.is_active(Some("session-1")));
        assert!(!activity.is_active(Some("session-2")));

        drop(first);
        assert!(activity.is_active(Some("session-1")));
        drop(second);
        assert!(!activity.is_active(Some("session-1")));
    }

    #[test]
    fn test_activity_without_session_id_is_untracked() {
        let activity = CartActivity::default();
        let _guard = activity.begin(None);
        assert!(!activity.is_active(None));
    }

    #[tokio::test]
    async fn test_first_mutation_gets_a_session_key() {
        let commerce = CommerceClient::Mock(MockStorefront::new());
        let activity = CartActivity::default();
        let session = session();
        assert!(session.id().is_none());
        let cart = CartService::new(&commerce, &activity, &session);

        let key = cart.tracked_key().await;
        assert!(key.is_some());
        assert_eq!(key, session.id().map(|id| id.to_string()));

        let guard = activity.begin(key.clone());
        assert!(activity.is_active(key.as_deref()));
        drop(guard);
        assert!(!activity.is_active(key.as_deref()));
    }

    #[tokio::test]
    async fn test_add_creates_cart_and_opens_drawer() {
        let commerce = CommerceClient::Mock(MockStorefront::new());
        let activity = CartActivity::default();
        let session = session();
        let cart = CartService::new(&commerce, &activity, &session);

        let state = cart.add_item(classic(), 2).await;
        assert!(state.is_open);
        assert!(!state.is_loading);
        assert_eq!(state.total_quantity(), 2);
        assert_eq!(state.cart.unwrap().subtotal().display(), "RM 40.00");

        let state = cart.add_item(classic(), 1).await;
        let snapshot = state.cart.unwrap();
        assert_eq!(snapshot.lines.len(), 1);
        assert_eq!(snapshot.lines[0].quantity, 3);
    }

    #[tokio::test]
    async fn test_failed_mutation_keeps_last_cart() {
        let commerce = CommerceClient::Mock(MockStorefront::new());
        let activity = CartActivity::default();
        let session = session();
        let cart = CartService::new(&commerce, &activity, &session);

        cart.add_item(classic(), 1).await;
        let state = cart
            .update_item(CartLineId::new("gid://sparkcola/CartLine/unknown"), 4)
            .await;

        assert!(!state.is_loading);
        assert_eq!(state.total_quantity(), 1);
    }

    #[tokio::test]
    async fn test_update_remove_and_clear() {
        let commerce = CommerceClient::Mock(MockStorefront::new());
        let activity = CartActivity::default();
        let session = session();
        let cart = CartService::new(&commerce, &activity, &session);

        let state = cart.add_item(classic(), 1).await;
        let line_id = state.cart.unwrap().lines[0].line_id.clone();

        let state = cart.update_item(line_id.clone(), 5).await;
        assert_eq!(state.total_quantity(), 5);

        let state = cart.remove_item(line_id).await;
        assert_eq!(state.total_quantity(), 0);
        assert!(state.cart.is_some());

        let state = cart.clear().await;
        assert!(state.cart.is_none());
        assert!(cart.cart_id().await.is_none());
    }

    #[tokio::test]
    async fn test_drawer_toggles_independently() {
        let commerce = CommerceClient::Mock(MockStorefront::new());
        let activity = CartActivity::default();
        let session = session();
        let cart = CartService::new(&commerce, &activity, &session);

        assert!(!cart.state().await.is_open);
        assert!(cart.toggle().await.is_open);
        assert!(!cart.toggle().await.is_open);
        assert!(cart.open().await.is_open);
        assert!(!cart.close().await.is_open);
    }

    #[tokio::test]
    async fn test_unknown_cart_id_is_forgotten() {
        let commerce = CommerceClient::Mock(MockStorefront::new());
        let activity = CartActivity::default();
        let session = session();
        session
            .insert(session_keys::CART_ID, CartId::new("gid://sparkcola/Cart/expired"))
            .await
            .unwrap();

        let cart = CartService::new(&commerce, &activity, &session);
        let state = cart.state().await;
        assert!(state.cart.is_none());
        assert!(cart.cart_id().await.is_none());

        let state = cart.add_item(classic(), 1).await;
        assert_eq!(state.total_quantity(), 1);
    }
}
