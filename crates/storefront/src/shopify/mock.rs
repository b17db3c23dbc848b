//! In-memory commerce backend used when Shopify is not configured.
//!
//! Serves a static Sparkcola catalog and keeps carts in a `moka` cache keyed
//! by cart id. Mutations follow Storefront API semantics closely enough for
//! the storefront to behave the same in both modes: adding a variant already
//! in the cart merges into its line, and a zero quantity removes a line.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sparkcola_core::{
    Cart, CartId, CartItem, CartLineId, CurrencyCode, DEFAULT_VARIANT_TITLE, Price, Product,
    ProductId, ProductImage, ProductOption, ProductVariant, SelectedOption, VariantId,
};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::ShopifyError;
use super::types::{CartLineInput, CartLineUpdateInput};

/// Mock carts are dropped after a week without use, like session cookies.
const CART_IDLE_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// A catalog entry: variant title, price in sen, optional compare-at price, availability.
type VariantSpec = (&'static str, i64, Option<i64>, bool);

/// Mocked Storefront API.
#[derive(Clone)]
pub struct MockStorefront {
    inner: Arc<MockStorefrontInner>,
}

struct MockStorefrontInner {
    products: Vec<Product>,
    carts: Cache<CartId, Cart>,
}

impl Default for MockStorefront {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStorefront {
    /// Create a mock backend serving the built-in catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::with_products(catalog())
    }

    /// Create a mock backend serving the given catalog.
    #[must_use]
    pub fn with_products(products: Vec<Product>) -> Self {
        let carts = Cache::builder()
            .max_capacity(10_000)
            .time_to_idle(CART_IDLE_TTL)
            .build();

        Self {
            inner: Arc::new(MockStorefrontInner { products, carts }),
        }
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// List the catalog.
    ///
    /// # Errors
    ///
    /// Never fails; the signature mirrors the live client.
    pub async fn get_products(&self) -> Result<Vec<Product>, ShopifyError> {
        Ok(self.inner.products.clone())
    }

    /// Get a product by its handle.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::NotFound` for unknown handles.
    pub async fn get_product_by_handle(&self, handle: &str) -> Result<Product, ShopifyError> {
        self.inner
            .products
            .iter()
            .find(|p| p.handle == handle)
            .cloned()
            .ok_or_else(|| ShopifyError::NotFound(format!("Product not found: {handle}")))
    }

    // =========================================================================
    // Cart Methods
    // =========================================================================

    /// Create a cart holding the given lines.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::UserError` if a line references unknown or
    /// sold-out merchandise.
    #[instrument(skip(self, lines))]
    pub async fn create_cart(&self, lines: Vec<CartLineInput>) -> Result<Cart, ShopifyError> {
        let id = CartId::new(format!("gid://sparkcola/Cart/{}", Uuid::new_v4()));
        let mut cart = Cart::new(id, CurrencyCode::default());
        self.apply_additions(&mut cart, lines)?;

        debug!(cart_id = %cart.id, "Created mock cart");
        self.inner.carts.insert(cart.id.clone(), cart.clone()).await;
        Ok(cart)
    }

    /// Get an existing cart.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::NotFound` if the cart does not exist.
    pub async fn get_cart(&self, cart_id: &CartId) -> Result<Cart, ShopifyError> {
        self.inner
            .carts
            .get(cart_id)
            .await
            .ok_or_else(|| ShopifyError::NotFound(format!("Cart not found: {cart_id}")))
    }

    /// Add lines to a cart, merging lines for variants already present.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::NotFound` for unknown carts and
    /// `ShopifyError::UserError` for invalid lines.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id))]
    pub async fn add_to_cart(
        &self,
        cart_id: &CartId,
        lines: Vec<CartLineInput>,
    ) -> Result<Cart, ShopifyError> {
        let mut cart = self.get_cart(cart_id).await?;
        self.apply_additions(&mut cart, lines)?;
        self.inner.carts.insert(cart.id.clone(), cart.clone()).await;
        Ok(cart)
    }

    /// Update line quantities. A zero quantity removes the line.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::NotFound` for unknown carts and
    /// `ShopifyError::UserError` for unknown lines.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id))]
    pub async fn update_cart(
        &self,
        cart_id: &CartId,
        lines: Vec<CartLineUpdateInput>,
    ) -> Result<Cart, ShopifyError> {
        let mut cart = self.get_cart(cart_id).await?;

        for update in lines {
            let index = line_index(&cart, &update.id)?;
            if update.quantity == 0 {
                cart.lines.remove(index);
            } else {
                cart.lines[index].quantity = update.quantity;
            }
        }

        self.inner.carts.insert(cart.id.clone(), cart.clone()).await;
        Ok(cart)
    }

    /// Remove lines from a cart.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::NotFound` for unknown carts and
    /// `ShopifyError::UserError` for unknown lines.
    #[instrument(skip(self, line_ids), fields(cart_id = %cart_id))]
    pub async fn remove_from_cart(
        &self,
        cart_id: &CartId,
        line_ids: Vec<CartLineId>,
    ) -> Result<Cart, ShopifyError> {
        let mut cart = self.get_cart(cart_id).await?;

        for line_id in &line_ids {
            let index = line_index(&cart, line_id)?;
            cart.lines.remove(index);
        }

        self.inner.carts.insert(cart.id.clone(), cart.clone()).await;
        Ok(cart)
    }

    /// Drop a cart.
    pub async fn delete_cart(&self, cart_id: &CartId) {
        self.inner.carts.invalidate(cart_id).await;
    }

    fn apply_additions(
        &self,
        cart: &mut Cart,
        lines: Vec<CartLineInput>,
    ) -> Result<(), ShopifyError> {
        for line in lines {
            if line.quantity == 0 {
                return Err(ShopifyError::UserError(
                    "quantity: must be greater than or equal to 1".to_string(),
                ));
            }

            if let Some(existing) = cart
                .lines
                .iter_mut()
                .find(|item| item.variant_id == line.merchandise_id)
            {
                existing.quantity = existing
                    .quantity
                    .checked_add(line.quantity)
                    .ok_or_else(|| {
                        ShopifyError::UserError(format!(
                            "quantity: {} cannot hold {} more units",
                            existing.title, line.quantity
                        ))
                    })?;
                continue;
            }

            let item = self.new_line(&line)?;
            cart.lines.push(item);
        }
        Ok(())
    }

    fn new_line(&self, line: &CartLineInput) -> Result<CartItem, ShopifyError> {
        let (product, variant) = self
            .inner
            .products
            .iter()
            .find_map(|p| p.variant(&line.merchandise_id).map(|v| (p, v)))
            .ok_or_else(|| {
                ShopifyError::UserError(format!(
                    "merchandiseId: The merchandise with id {} does not exist.",
                    line.merchandise_id
                ))
            })?;

        if !variant.available_for_sale {
            return Err(ShopifyError::UserError(format!(
                "{} is sold out",
                product.title
            )));
        }

        Ok(CartItem {
            line_id: CartLineId::new(format!("gid://sparkcola/CartLine/{}", Uuid::new_v4())),
            variant_id: variant.id.clone(),
            product_handle: product.handle.clone(),
            title: product.title.clone(),
            variant_title: (variant.title != DEFAULT_VARIANT_TITLE).then(|| variant.title.clone()),
            quantity: line.quantity,
            unit_price: variant.price,
            image: variant
                .image
                .clone()
                .or_else(|| product.featured_image().cloned()),
        })
    }
}

fn line_index(cart: &Cart, line_id: &CartLineId) -> Result<usize, ShopifyError> {
    cart.lines
        .iter()
        .position(|item| &item.line_id == line_id)
        .ok_or_else(|| {
            ShopifyError::UserError(format!("lines: The cart line with id {line_id} does not exist."))
        })
}

// =============================================================================
// Static Catalog
// =============================================================================

fn mock_product(
    number: u32,
    handle: &str,
    title: &str,
    description: &str,
    variants: &[VariantSpec],
) -> Product {
    let currency = CurrencyCode::default();
    let image = ProductImage {
        url: format!("/static/images/products/{handle}.svg"),
        alt: title.to_string(),
    };

    let variants: Vec<ProductVariant> = variants
        .iter()
        .enumerate()
        .map(|(index, &(variant_title, price, compare_at, available))| ProductVariant {
            id: VariantId::new(format!("gid://sparkcola/ProductVariant/{number}0{index}")),
            title: variant_title.to_string(),
            price: Price::from_minor(price, currency),
            compare_at_price: compare_at.map(|minor| Price::from_minor(minor, currency)),
            available_for_sale: available,
            selected_options: vec![SelectedOption {
                name: option_name(variant_title).to_string(),
                value: variant_title.to_string(),
            }],
            image: None,
        })
        .collect();

    let price = variants
        .iter()
        .map(|v| v.price)
        .min_by(|a, b| a.amount.cmp(&b.amount))
        .unwrap_or_else(|| Price::zero(currency));
    let compare_at_price = variants
        .iter()
        .filter_map(|v| v.compare_at_price)
        .max_by(|a, b| a.amount.cmp(&b.amount));

    Product {
        id: ProductId::new(format!("gid://sparkcola/Product/{number}")),
        handle: handle.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        price,
        compare_at_price,
        images: vec![image],
        options: vec![ProductOption {
            name: option_name(variants.first().map_or("", |v| v.title.as_str())).to_string(),
            values: variants.iter().map(|v| v.title.clone()).collect(),
        }],
        available_for_sale: variants.iter().any(|v| v.available_for_sale),
        variants,
    }
}

fn option_name(variant_title: &str) -> &'static str {
    if variant_title == DEFAULT_VARIANT_TITLE {
        "Title"
    } else {
        "Pack size"
    }
}

/// The built-in Sparkcola catalog, in featured order.
#[must_use]
pub fn catalog() -> Vec<Product> {
    vec![
        mock_product(
            1,
            "sparkcola-classic",
            "Sparkcola Classic",
            "The original Sparkcola. Bright caramel notes, a crisp bite and a clean finish.",
            &[
                ("6-pack", 2000, None, true),
                ("12-pack", 3800, None, true),
                ("24-pack", 7200, None, true),
            ],
        ),
        mock_product(
            2,
            "sparkcola-zero",
            "Sparkcola Zero",
            "All of the fizz with zero sugar. Sweetened with stevia.",
            &[("6-pack", 2000, None, true), ("12-pack", 3800, None, true)],
        ),
        mock_product(
            3,
            "sparkcola-cherry",
            "Sparkcola Cherry",
            "Classic Sparkcola with a ripe cherry twist.",
            &[("6-pack", 2200, Some(2500), true), ("12-pack", 4200, Some(4800), true)],
        ),
        mock_product(
            4,
            "sparkcola-vanilla",
            "Sparkcola Vanilla",
            "Smooth Madagascar vanilla over our signature cola.",
            &[("6-pack", 2200, None, true)],
        ),
        mock_product(
            5,
            "sparkcola-lime-limited",
            "Sparkcola Lime (Limited Edition)",
            "A zesty summer release. Back next year.",
            &[("6-pack", 2400, None, false)],
        ),
        mock_product(
            6,
            "sparkcola-glass-set",
            "Sparkcola Glass Set",
            "Four embossed contour glasses for the perfect pour.",
            &[(DEFAULT_VARIANT_TITLE, 4500, None, true)],
        ),
    ]
}
