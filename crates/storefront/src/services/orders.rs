//! Per-browser order record.
//!
//! Holds a single order under one session key. Placing a new order
//! overwrites the previous one; there is no order history.

use chrono::{DateTime, Utc};
use sparkcola_core::Order;
use tower_sessions::Session;
use tracing::instrument;

use crate::models::session_keys;

/// Read and write the stored order for one session.
pub struct OrderStore<'a> {
    session: &'a Session,
}

impl<'a> OrderStore<'a> {
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// The most recently placed order, if any.
    ///
    /// A record that no longer deserializes is treated as absent.
    pub async fn last_order(&self) -> Option<Order> {
        match self.session.get::<Order>(session_keys::LAST_ORDER).await {
            Ok(order) => order,
            Err(e) => {
                tracing::warn!("Stored order is unreadable: {e}");
                None
            }
        }
    }

    /// Store an order, replacing the previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn save(&self, order: &Order) -> Result<(), tower_sessions::session::Error> {
        self.session.insert(session_keys::LAST_ORDER, order).await
    }

    /// Start (or restart) the status simulation on the stored order.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    #[instrument(skip(self))]
    pub async fn start_simulation(
        &self,
        at: DateTime<Utc>,
    ) -> Result<Option<Order>, tower_sessions::session::Error> {
        let Some(mut order) = self.last_order().await else {
            return Ok(None);
        };

        order.start_simulation(at);
        self.save(&order).await?;
        tracing::info!(order_id = %order.id, "Started order status simulation");
        Ok(Some(order))
    }
}
