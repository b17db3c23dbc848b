//! JSON read surface for the cart and the stored order.

use axum::{Json, Router, extract::State, routing::get};
use sparkcola_core::{CartState, Order};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::AppError;
use crate::services::{CartService, OrderStore};
use crate::state::AppState;

/// Create the API routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(cart))
        .route("/order", get(order))
}

/// Current cart snapshot with the drawer and loading flags.
#[instrument(skip(state, session))]
pub async fn cart(State(state): State<AppState>, session: Session) -> Json<CartState> {
    Json(
        CartService::new(state.commerce(), state.cart_activity(), &session)
            .state()
            .await,
    )
}

/// The most recently placed order.
///
/// # Errors
///
/// Returns `AppError::NotFound` when no order has been placed.
#[instrument(skip(session))]
pub async fn order(session: Session) -> Result<Json<Order>, AppError> {
    OrderStore::new(&session)
        .last_order()
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("order".to_string()))
}
