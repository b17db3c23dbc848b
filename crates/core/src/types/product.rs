//! Catalog types.
//!
//! Products are read-only: fetched from the commerce API or the static mock
//! catalog and never mutated by the storefront.

use serde::{Deserialize, Serialize};

use super::id::{ProductId, VariantId};
use super::price::{CurrencyCode, Price};

/// Product or variant image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    /// Image URL (absolute CDN URL or `/static/...` path).
    pub url: String,
    /// Alt text for accessibility.
    pub alt: String,
}

/// Product option definition (e.g. "Pack size").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    pub name: String,
    pub values: Vec<String>,
}

/// Selected option on a variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    pub name: String,
    pub value: String,
}

/// A specific purchasable configuration of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariant {
    pub id: VariantId,
    pub title: String,
    pub price: Price,
    pub compare_at_price: Option<Price>,
    pub available_for_sale: bool,
    pub selected_options: Vec<SelectedOption>,
    pub image: Option<ProductImage>,
}

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    /// URL-safe slug.
    pub handle: String,
    pub title: String,
    pub description: String,
    /// Lowest variant price.
    pub price: Price,
    pub compare_at_price: Option<Price>,
    pub images: Vec<ProductImage>,
    pub options: Vec<ProductOption>,
    pub variants: Vec<ProductVariant>,
    pub available_for_sale: bool,
}

impl Product {
    /// Currency of the product's price.
    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.price.currency_code
    }

    /// First image, used on cards and as the detail page hero.
    #[must_use]
    pub fn featured_image(&self) -> Option<&ProductImage> {
        self.images.first()
    }

    /// First variant that is available for sale, falling back to the first variant.
    #[must_use]
    pub fn default_variant(&self) -> Option<&ProductVariant> {
        self.variants
            .iter()
            .find(|v| v.available_for_sale)
            .or_else(|| self.variants.first())
    }

    /// Look up a variant by ID.
    #[must_use]
    pub fn variant(&self, id: &VariantId) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| &v.id == id)
    }

    /// Whether the compare-at price is above the selling price.
    #[must_use]
    pub fn is_on_sale(&self) -> bool {
        self.compare_at_price
            .is_some_and(|compare| compare.amount > self.price.amount)
    }

    /// Whether the product only has the single implicit "Default Title" variant.
    #[must_use]
    pub fn has_only_default_variant(&self) -> bool {
        self.variants.len() == 1
            && self
                .variants
                .first()
                .is_some_and(|v| v.title == DEFAULT_VARIANT_TITLE)
    }
}

/// Title Shopify gives the implicit variant of products without options.
pub const DEFAULT_VARIANT_TITLE: &str = "Default Title";

/// Sort order for catalog listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductSort {
    /// Catalog order as returned by the backend.
    #[default]
    Featured,
    PriceAsc,
    PriceDesc,
    Title,
}

impl ProductSort {
    /// All sort orders, in the order they are offered to shoppers.
    pub const ALL: [Self; 4] = [Self::Featured, Self::PriceAsc, Self::PriceDesc, Self::Title];

    /// Query-string value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::Title => "title",
        }
    }

    /// Parse a query-string value; unknown values fall back to `Featured`.
    #[must_use]
    pub fn from_query(value: Option<&str>) -> Self {
        Self::ALL
            .into_iter()
            .find(|s| Some(s.as_str()) == value)
            .unwrap_or_default()
    }

    /// Sort products in place. Sorting is stable.
    pub fn apply(self, products: &mut [Product]) {
        match self {
            Self::Featured => {}
            Self::PriceAsc => products.sort_by(|a, b| a.price.amount.cmp(&b.price.amount)),
            Self::PriceDesc => products.sort_by(|a, b| b.price.amount.cmp(&a.price.amount)),
            Self::Title => products.sort_by(|a, b| a.title.cmp(&b.title)),
        }
    }
}
