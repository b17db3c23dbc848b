//! Cart mutation inputs shared by the live and mock backends.
//!
//! These carry domain ids and are converted to the raw GraphQL input shapes
//! only at the Storefront API boundary.

use sparkcola_core::{CartLineId, VariantId};

use super::storefront::queries;

/// Input for adding a line to a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineInput {
    /// Product variant to add.
    pub merchandise_id: VariantId,
    /// Quantity to add.
    pub quantity: u32,
}

/// Input for changing a cart line's quantity. Zero removes the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineUpdateInput {
    /// Cart line to update.
    pub id: CartLineId,
    /// New quantity.
    pub quantity: u32,
}

impl From<CartLineInput> for queries::CartLineInput {
    fn from(line: CartLineInput) -> Self {
        Self {
            merchandise_id: line.merchandise_id.into_inner(),
            quantity: i64::from(line.quantity),
        }
    }
}

impl From<CartLineUpdateInput> for queries::CartLineUpdateInput {
    fn from(line: CartLineUpdateInput) -> Self {
        Self {
            id: line.id.into_inner(),
            quantity: i64::from(line.quantity),
        }
    }
}
