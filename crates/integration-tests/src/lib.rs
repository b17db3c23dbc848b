//! Integration tests for the Sparkcola storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p sparkcola-integration-tests
//! ```
//!
//! Each test spawns the full storefront router on an ephemeral port in mock
//! mode (no Shopify credentials, in-memory sessions) and drives it over HTTP
//! with a cookie-keeping client, one visitor per [`TestContext`].
//!
//! # Test Categories
//!
//! - `storefront_pages` - Locale routing, catalog and content pages
//! - `cart_checkout` - Cart drawer, checkout steps and order readback
//! - `contact` - Contact form validation and rate limiting

use std::path::PathBuf;
use std::time::Duration;

use reqwest::{Client, redirect::Policy};
use sparkcola_storefront::app;
use sparkcola_storefront::config::{CheckoutConfig, StorefrontConfig};
use sparkcola_storefront::state::AppState;
use tokio::net::TcpListener;
use tower_sessions::MemoryStore;

/// Header HTMX sends with every request it issues.
pub const HX_REQUEST: &str = "hx-request";

/// A running storefront plus a client acting as one visitor.
pub struct TestContext {
    /// Cookie-keeping client that does not follow redirects.
    pub client: Client,
    pub base_url: String,
}

impl TestContext {
    /// Spawn a storefront with zero payment delay.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    pub async fn spawn() -> Self {
        Self::spawn_with(test_config()).await
    }

    /// Spawn a storefront with the given configuration.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    pub async fn spawn_with(config: StorefrontConfig) -> Self {
        let state = AppState::new(config).expect("Failed to build app state");
        let router = app(state, MemoryStore::default());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Test server error");
        });

        let client = Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: format!("http://{addr}"),
        }
    }

    /// Absolute URL for a path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET a path and return the response.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// POST a form, optionally as an HTMX request.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)], htmx: bool) -> reqwest::Response {
        let mut request = self.client.post(self.url(path)).form(form);
        if htmx {
            request = request.header(HX_REQUEST, "true");
        }
        request.send().await.expect("POST request failed")
    }

    /// Fetch a JSON endpoint.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the body is not JSON.
    pub async fn json(&self, path: &str) -> serde_json::Value {
        self.get(path)
            .await
            .json()
            .await
            .expect("Response body is not JSON")
    }
}

/// Mock-mode configuration pointing at the storefront crate's assets.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    let storefront_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../storefront");
    StorefrontConfig {
        checkout: CheckoutConfig {
            payment_delay: Duration::ZERO,
            status_step: Duration::from_secs(1),
        },
        content_dir: storefront_dir.join("content"),
        static_dir: storefront_dir.join("static"),
        ..StorefrontConfig::default()
    }
}

/// Location header of a redirect response.
///
/// # Panics
///
/// Panics if the response has no valid `Location` header.
#[must_use]
pub fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .expect("Response has no Location header")
        .to_string()
}
