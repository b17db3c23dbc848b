//! Shopify Storefront API client implementation.
//!
//! Uses `graphql_client` query bodies with `reqwest` 0.13 for HTTP.
//! Caches catalog reads using `moka` (5-minute TTL). Carts are never cached.

mod cache;
mod conversions;
pub mod queries;

use std::sync::Arc;
use std::time::Duration;

use graphql_client::{GraphQLQuery, Response};
use moka::future::Cache;
use secrecy::ExposeSecret;
use sparkcola_core::{Cart, CartId, CartLineId, Product};
use tracing::{debug, instrument};

use crate::config::ShopifyStorefrontConfig;
use crate::shopify::types::{CartLineInput, CartLineUpdateInput};
use crate::shopify::{GraphQLError, ShopifyError};

use cache::{CacheKey, CacheValue};
use conversions::{convert_cart, convert_product};
use queries::{
    AddToCart, CartMutationPayload, CreateCart, GetCart, GetProductByHandle, GetProducts,
    RemoveFromCart, UpdateCartLines, add_to_cart, create_cart, get_cart, get_product_by_handle,
    get_products, remove_from_cart, update_cart_lines,
};

/// Upper bound on catalog size fetched for the shop page.
const PRODUCT_PAGE_SIZE: i64 = 50;

/// Header carrying a private Storefront access token.
const PRIVATE_TOKEN_HEADER: &str = "Shopify-Storefront-Private-Token";

/// Seconds to wait before retrying, from `Retry-After` (default 1).
fn retry_after(headers: &reqwest::header::HeaderMap) -> u64 {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
        .unwrap_or(1)
}

/// First `max` characters of a response body, for logs.
fn snippet(body: &str, max: usize) -> String {
    body.chars().take(max).collect()
}

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the Shopify Storefront API.
///
/// Provides typed access to products and cart operations.
/// Products are cached for 5 minutes.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: String,
    cache: Cache<CacheKey, CacheValue>,
}

impl StorefrontClient {
    /// Create a new Storefront API client.
    #[must_use]
    pub fn new(config: &ShopifyStorefrontConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        let endpoint = format!(
            "https://{}/api/{}/graphql.json",
            config.store, config.api_version
        );

        Self {
            inner: Arc::new(StorefrontClientInner {
                client: reqwest::Client::new(),
                endpoint,
                access_token: config.storefront_private_token.expose_secret().to_string(),
                cache,
            }),
        }
    }

    /// Execute a GraphQL operation and return its `data`.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, ShopifyError> {
        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header(PRIVATE_TOKEN_HEADER, &self.inner.access_token)
            .json(&Q::build_query(variables))
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ShopifyError::RateLimited(retry_after(response.headers())));
        }

        let body = response.text().await?;
        if !status.is_success() {
            tracing::error!(%status, body = %snippet(&body, 500), "Storefront API request failed");
            return Err(ShopifyError::GraphQL(vec![GraphQLError::message(format!(
                "HTTP {status}: {}",
                snippet(&body, 200)
            ))]));
        }

        let response: Response<Q::ResponseData> = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, body = %snippet(&body, 500), "Unreadable Storefront API response");
            ShopifyError::Parse(e)
        })?;

        match (response.data, response.errors.unwrap_or_default()) {
            (_, errors) if !errors.is_empty() => {
                debug!(?errors, "Storefront API returned errors");
                Err(ShopifyError::GraphQL(
                    errors.into_iter().map(GraphQLError::from).collect(),
                ))
            }
            (Some(data), _) => Ok(data),
            (None, _) => Err(ShopifyError::GraphQL(vec![GraphQLError::message(
                "No data in response",
            )])),
        }
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// List the catalog in the store's best-selling order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_products(&self) -> Result<Vec<Product>, ShopifyError> {
        if let Some(CacheValue::Products(products)) =
            self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let data = self
            .execute::<GetProducts>(get_products::Variables {
                first: PRODUCT_PAGE_SIZE,
            })
            .await?;

        let products = data
            .products
            .edges
            .into_iter()
            .map(|e| convert_product(e.node))
            .collect::<Result<Vec<_>, _>>()?;

        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Get a product by its handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_product_by_handle(&self, handle: &str) -> Result<Product, ShopifyError> {
        let cache_key = CacheKey::Product(handle.to_string());

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let data = self
            .execute::<GetProductByHandle>(get_product_by_handle::Variables {
                handle: handle.to_string(),
            })
            .await?;

        let product_data = data
            .product
            .ok_or_else(|| ShopifyError::NotFound(format!("Product not found: {handle}")))?;

        let product = convert_product(product_data)?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    // =========================================================================
    // Cart Methods
    // =========================================================================

    /// Create a cart holding the given lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart creation fails or user errors are returned.
    #[instrument(skip(self, lines))]
    pub async fn create_cart(&self, lines: Vec<CartLineInput>) -> Result<Cart, ShopifyError> {
        let variables = create_cart::Variables {
            input: queries::CartInput {
                lines: lines.into_iter().map(Into::into).collect(),
            },
        };

        let data = self.execute::<CreateCart>(variables).await?;
        cart_from_payload(data.cart_create, "create cart")
    }

    /// Get an existing cart.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::NotFound` if the cart expired or never existed.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn get_cart(&self, cart_id: &CartId) -> Result<Cart, ShopifyError> {
        let variables = get_cart::Variables {
            cart_id: cart_id.to_string(),
        };

        let data = self.execute::<GetCart>(variables).await?;

        data.cart
            .map(convert_cart)
            .transpose()?
            .ok_or_else(|| ShopifyError::NotFound(format!("Cart not found: {cart_id}")))
    }

    /// Add lines to a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id))]
    pub async fn add_to_cart(
        &self,
        cart_id: &CartId,
        lines: Vec<CartLineInput>,
    ) -> Result<Cart, ShopifyError> {
        let variables = add_to_cart::Variables {
            cart_id: cart_id.to_string(),
            lines: lines.into_iter().map(Into::into).collect(),
        };

        let data = self.execute::<AddToCart>(variables).await?;
        cart_from_payload(data.cart_lines_add, "add to cart")
    }

    /// Update cart line quantities.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id))]
    pub async fn update_cart(
        &self,
        cart_id: &CartId,
        lines: Vec<CartLineUpdateInput>,
    ) -> Result<Cart, ShopifyError> {
        let variables = update_cart_lines::Variables {
            cart_id: cart_id.to_string(),
            lines: lines.into_iter().map(Into::into).collect(),
        };

        let data = self.execute::<UpdateCartLines>(variables).await?;
        cart_from_payload(data.cart_lines_update, "update cart")
    }

    /// Remove lines from a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, line_ids), fields(cart_id = %cart_id))]
    pub async fn remove_from_cart(
        &self,
        cart_id: &CartId,
        line_ids: Vec<CartLineId>,
    ) -> Result<Cart, ShopifyError> {
        let variables = remove_from_cart::Variables {
            cart_id: cart_id.to_string(),
            line_ids: line_ids.into_iter().map(CartLineId::into_inner).collect(),
        };

        let data = self.execute::<RemoveFromCart>(variables).await?;
        cart_from_payload(data.cart_lines_remove, "remove from cart")
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Invalidate all cached data.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

/// Unwrap a cart mutation payload, surfacing user errors.
fn cart_from_payload(
    payload: Option<CartMutationPayload>,
    action: &str,
) -> Result<Cart, ShopifyError> {
    if let Some(result) = payload {
        if !result.user_errors.is_empty() {
            return Err(ShopifyError::UserError(
                result
                    .user_errors
                    .into_iter()
                    .map(|e| match e.field {
                        Some(field) if !field.is_empty() => {
                            format!("{}: {}", field.join("."), e.message)
                        }
                        _ => e.message,
                    })
                    .collect::<Vec<_>>()
                    .join("; "),
            ));
        }

        if let Some(cart) = result.cart {
            return convert_cart(cart);
        }
    }

    Err(ShopifyError::GraphQL(vec![GraphQLError::message(format!(
        "Failed to {action}"
    ))]))
}
