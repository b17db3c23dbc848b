//! Commerce backend: the Shopify Storefront API or an in-memory mock.
//!
//! # Architecture
//!
//! - Raw GraphQL operations implement `graphql_client::GraphQLQuery`
//! - Shopify is source of truth for carts - NO local sync, direct API calls
//! - In-memory caching via `moka` for catalog reads (5 minute TTL)
//! - Without credentials, [`MockStorefront`] serves a static catalog and
//!   in-memory carts behind the same operations
//!
//! # Example
//!
//! ```rust,ignore
//! use sparkcola_storefront::shopify::{CartLineInput, CommerceClient};
//!
//! let client = CommerceClient::from_config(config.shopify.as_ref());
//!
//! let product = client.product_by_handle("sparkcola-classic").await?;
//! let cart = client.create_cart(vec![CartLineInput {
//!     merchandise_id: product.variants[0].id.clone(),
//!     quantity: 1,
//! }]).await?;
//! ```

pub mod mock;
mod storefront;
pub mod types;

pub use mock::MockStorefront;
pub use storefront::StorefrontClient;
pub use types::{CartLineInput, CartLineUpdateInput};

use sparkcola_core::{Cart, CartId, CartLineId, PriceError, Product};
use thiserror::Error;

use crate::config::ShopifyStorefrontConfig;

/// Errors that can occur when interacting with the commerce backend.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Response data could not be mapped to domain types.
    #[error("Invalid data: {0}")]
    InvalidData(#[from] PriceError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// User error from mutation (e.g., invalid input).
    #[error("User error: {0}")]
    UserError(String),
}

// =============================================================================
// CommerceClient
// =============================================================================

/// The commerce backend selected at startup.
#[derive(Clone)]
pub enum CommerceClient {
    /// Shopify Storefront API.
    Live(StorefrontClient),
    /// In-memory catalog and carts.
    Mock(MockStorefront),
}

impl CommerceClient {
    /// Live client when Shopify is configured, mock backend otherwise.
    #[must_use]
    pub fn from_config(config: Option<&ShopifyStorefrontConfig>) -> Self {
        config.map_or_else(
            || Self::Mock(MockStorefront::new()),
            |config| Self::Live(StorefrontClient::new(config)),
        )
    }

    /// Whether a real commerce backend is configured.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        matches!(self, Self::Live(_))
    }

    /// List the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    pub async fn list_products(&self) -> Result<Vec<Product>, ShopifyError> {
        match self {
            Self::Live(client) => client.get_products().await,
            Self::Mock(mock) => mock.get_products().await,
        }
    }

    /// Get a product by handle.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::NotFound` for unknown handles.
    pub async fn product_by_handle(&self, handle: &str) -> Result<Product, ShopifyError> {
        match self {
            Self::Live(client) => client.get_product_by_handle(handle).await,
            Self::Mock(mock) => mock.get_product_by_handle(handle).await,
        }
    }

    /// Create a cart holding the given lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the lines or the request fails.
    pub async fn create_cart(&self, lines: Vec<CartLineInput>) -> Result<Cart, ShopifyError> {
        match self {
            Self::Live(client) => client.create_cart(lines).await,
            Self::Mock(mock) => mock.create_cart(lines).await,
        }
    }

    /// Fetch a cart.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::NotFound` if the backend no longer knows the cart.
    pub async fn get_cart(&self, cart_id: &CartId) -> Result<Cart, ShopifyError> {
        match self {
            Self::Live(client) => client.get_cart(cart_id).await,
            Self::Mock(mock) => mock.get_cart(cart_id).await,
        }
    }

    /// Add lines to a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the lines or the request fails.
    pub async fn add_lines(
        &self,
        cart_id: &CartId,
        lines: Vec<CartLineInput>,
    ) -> Result<Cart, ShopifyError> {
        match self {
            Self::Live(client) => client.add_to_cart(cart_id, lines).await,
            Self::Mock(mock) => mock.add_to_cart(cart_id, lines).await,
        }
    }

    /// Change line quantities.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the update or the request fails.
    pub async fn update_lines(
        &self,
        cart_id: &CartId,
        lines: Vec<CartLineUpdateInput>,
    ) -> Result<Cart, ShopifyError> {
        match self {
            Self::Live(client) => client.update_cart(cart_id, lines).await,
            Self::Mock(mock) => mock.update_cart(cart_id, lines).await,
        }
    }

    /// Remove lines from a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the removal or the request fails.
    pub async fn remove_lines(
        &self,
        cart_id: &CartId,
        line_ids: Vec<CartLineId>,
    ) -> Result<Cart, ShopifyError> {
        match self {
            Self::Live(client) => client.remove_from_cart(cart_id, line_ids).await,
            Self::Mock(mock) => mock.remove_from_cart(cart_id, line_ids).await,
        }
    }

    /// Forget a cart. Shopify carts expire on their own.
    pub async fn discard_cart(&self, cart_id: &CartId) {
        if let Self::Mock(mock) = self {
            mock.delete_cart(cart_id).await;
        }
    }
}

/// A GraphQL error returned by the Shopify API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

impl GraphQLError {
    /// An error carrying only a message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: Vec::new(),
            path: Vec::new(),
        }
    }
}

impl From<graphql_client::Error> for GraphQLError {
    fn from(error: graphql_client::Error) -> Self {
        Self {
            message: error.message,
            locations: error
                .locations
                .unwrap_or_default()
                .into_iter()
                .map(|location| GraphQLErrorLocation {
                    line: i64::from(location.line),
                    column: i64::from(location.column),
                })
                .collect(),
            path: error
                .path
                .unwrap_or_default()
                .into_iter()
                .map(|fragment| match fragment {
                    graphql_client::PathFragment::Key(key) => serde_json::Value::String(key),
                    graphql_client::PathFragment::Index(index) => {
                        serde_json::Value::Number(index.into())
                    }
                })
                .collect(),
        }
    }
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let mut parts = Vec::new();

            // Include message if present
            if !e.message.is_empty() {
                parts.push(e.message.clone());
            }

            // Include path if present
            if !e.path.is_empty() {
                let path_str = e
                    .path
                    .iter()
                    .map(|p| match p {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(".");
                parts.push(format!("path: {path_str}"));
            }

            // Include location if present
            if !e.locations.is_empty() {
                let loc = &e.locations[0];
                parts.push(format!("at line {}:{}", loc.line, loc.column));
            }

            if parts.is_empty() {
                format!("[error {}]: (no details)", i + 1)
            } else {
                parts.join(" ")
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shopify_error_display() {
        let err = ShopifyError::NotFound("sparkcola-classic".to_string());
        assert_eq!(err.to_string(), "Not found: sparkcola-classic");
    }

    #[test]
    fn test_graphql_error_formatting() {
        let errors = vec![
            GraphQLError {
                message: "Field not found".to_string(),
                locations: vec![],
                path: vec![],
            },
            GraphQLError {
                message: "Invalid ID".to_string(),
                locations: vec![],
                path: vec![],
            },
        ];
        let err = ShopifyError::GraphQL(errors);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: Field not found; Invalid ID"
        );
    }

    #[test]
    fn test_graphql_error_empty_messages() {
        // Test with empty messages but with path info
        let errors = vec![GraphQLError {
            message: String::new(),
            locations: vec![GraphQLErrorLocation { line: 5, column: 10 }],
            path: vec![
                serde_json::Value::String("products".to_string()),
                serde_json::Value::Number(0.into()),
            ],
        }];
        let err = ShopifyError::GraphQL(errors);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: path: products.0 at line 5:10"
        );
    }

    #[test]
    fn test_graphql_error_no_details() {
        let errors = vec![GraphQLError {
            message: String::new(),
            locations: vec![],
            path: vec![],
        }];
        let err = ShopifyError::GraphQL(errors);
        assert_eq!(err.to_string(), "GraphQL errors: [error 1]: (no details)");
    }

    #[tokio::test]
    async fn test_commerce_client_without_config_is_mock() {
        let client = CommerceClient::from_config(None);
        assert!(!client.is_configured());
        let products = client.list_products().await.unwrap_or_default();
        assert!(!products.is_empty());
    }

    #[test]
    fn test_graphql_error_empty_vec() {
        let err = ShopifyError::GraphQL(vec![]);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: (no error details provided)"
        );
    }

    #[test]
    fn test_invalid_data_error() {
        let err = ShopifyError::from(PriceError::UnsupportedCurrency("JPY".to_string()));
        assert!(err.to_string().starts_with("Invalid data:"));
    }

    #[test]
    fn test_rate_limited_error() {
        let err = ShopifyError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }
}
