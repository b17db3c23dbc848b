//! Simulated checkout.
//!
//! The draft collected across the three steps lives in the session. Placing
//! an order waits a fixed delay in place of a payment provider, snapshots the
//! cart into an [`Order`], stores it, then clears the cart and the draft.

use std::time::Duration;

use chrono::Utc;
use sparkcola_core::{CheckoutDraft, Order};
use thiserror::Error;
use tower_sessions::Session;
use tracing::instrument;

use crate::models::session_keys;

use super::cart::CartService;
use super::orders::OrderStore;

/// Reasons an order cannot be placed.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing to order.
    #[error("Cart is empty")]
    EmptyCart,

    /// FPX selected without a bank.
    #[error("Payment details are incomplete")]
    PaymentIncomplete,

    /// Session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

/// Checkout operations for one request's session.
pub struct CheckoutService<'a> {
    session: &'a Session,
    payment_delay: Duration,
}

impl<'a> CheckoutService<'a> {
    #[must_use]
    pub const fn new(session: &'a Session, payment_delay: Duration) -> Self {
        Self {
            session,
            payment_delay,
        }
    }

    /// The draft in progress, or a fresh one.
    pub async fn draft(&self) -> CheckoutDraft {
        self.session
            .get::<CheckoutDraft>(session_keys::CHECKOUT)
            .await
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    /// Persist the draft.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn save_draft(&self, draft: &CheckoutDraft) -> Result<(), CheckoutError> {
        self.session.insert(session_keys::CHECKOUT, draft).await?;
        Ok(())
    }

    /// Apply a change to the stored draft and persist it.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn update_draft(
        &self,
        change: impl FnOnce(&mut CheckoutDraft),
    ) -> Result<CheckoutDraft, CheckoutError> {
        let mut draft = self.draft().await;
        change(&mut draft);
        self.save_draft(&draft).await?;
        Ok(draft)
    }

    /// Place the order for the current cart.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` when there is nothing to order,
    /// `CheckoutError::PaymentIncomplete` when FPX is chosen without a bank,
    /// or a session error. The current step does not matter.
    #[instrument(skip(self, cart, draft), fields(step = draft.step.key()))]
    pub async fn place_order(
        &self,
        cart: &CartService<'_>,
        draft: CheckoutDraft,
    ) -> Result<Order, CheckoutError> {
        let snapshot = cart
            .state()
            .await
            .cart
            .filter(|c| !c.is_empty())
            .ok_or(CheckoutError::EmptyCart)?;

        if !draft.payment.is_complete() {
            return Err(CheckoutError::PaymentIncomplete);
        }

        // Stand-in for the payment provider round trip
        tokio::time::sleep(self.payment_delay).await;

        let order = Order::synthesize(&snapshot, &draft, Utc::now());
        OrderStore::new(self.session).save(&order).await?;

        cart.clear().await;
        self.session
            .remove::<CheckoutDraft>(session_keys::CHECKOUT)
            .await?;

        tracing::info!(
            order_id = %order.id,
            items = order.item_count(),
            total = %order.total,
            payment = order.payment.method.key(),
            "Order placed"
        );
        Ok(order)
    }
}
