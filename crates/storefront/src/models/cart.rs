//! Cart display data for templates.

use sparkcola_core::{CartItem, CartState, CurrencyCode, Price};

/// Cart item display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub line_id: String,
    pub handle: String,
    pub title: String,
    pub variant_title: Option<String>,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub image_url: Option<String>,
    pub image_alt: String,
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
    pub is_open: bool,
    pub is_loading: bool,
}

impl CartView {
    /// Create an empty, closed cart.
    #[must_use]
    pub fn empty() -> Self {
        Self::from(&CartState::default())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            line_id: item.line_id.to_string(),
            handle: item.product_handle.clone(),
            title: item.title.clone(),
            variant_title: item.variant_title.clone(),
            quantity: item.quantity,
            price: item.unit_price.display(),
            line_price: item.line_subtotal().display(),
            image_url: item.image.as_ref().map(|image| image.url.clone()),
            image_alt: item
                .image
                .as_ref()
                .map_or_else(|| item.title.clone(), |image| image.alt.clone()),
        }
    }
}

impl From<&CartState> for CartView {
    fn from(state: &CartState) -> Self {
        let (items, subtotal) = state.cart.as_ref().map_or_else(
            || (Vec::new(), Price::zero(CurrencyCode::default())),
            |cart| {
                (
                    cart.lines.iter().map(CartItemView::from).collect(),
                    cart.subtotal(),
                )
            },
        );

        Self {
            items,
            subtotal: subtotal.display(),
            item_count: state.total_quantity(),
            is_open: state.is_open,
            is_loading: state.is_loading,
        }
    }
}
