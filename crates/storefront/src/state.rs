//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::content::{ContentError, ContentStore};
use crate::i18n::{Catalogs, I18nError};
use crate::services::CartActivity;
use crate::shopify::CommerceClient;

/// Error building application state.
#[derive(Debug, thiserror::Error)]
pub enum AppStateError {
    #[error("content error: {0}")]
    Content(#[from] ContentError),
    #[error("translation catalog error: {0}")]
    I18n(#[from] I18nError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the commerce client and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    commerce: CommerceClient,
    catalogs: Catalogs,
    content: ContentStore,
    cart_activity: CartActivity,
}

impl AppState {
    /// Create a new application state, loading content from `config.content_dir`.
    ///
    /// The commerce client is live when Shopify credentials are configured
    /// and the in-memory mock otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if content or translation catalogs fail to load.
    pub fn new(config: StorefrontConfig) -> Result<Self, AppStateError> {
        let content = ContentStore::load(&config.content_dir)?;
        tracing::info!(pages = content.len(), "Content loaded");
        Self::with_content(config, content)
    }

    /// Create application state with pre-loaded content.
    ///
    /// # Errors
    ///
    /// Returns an error if the translation catalogs fail to parse.
    pub fn with_content(
        config: StorefrontConfig,
        content: ContentStore,
    ) -> Result<Self, AppStateError> {
        let commerce = CommerceClient::from_config(config.shopify.as_ref());
        if commerce.is_configured() {
            tracing::info!("Using Shopify Storefront API");
        } else {
            tracing::warn!("Shopify credentials not set, using mock commerce backend");
        }

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                commerce,
                catalogs: Catalogs::load()?,
                content,
                cart_activity: CartActivity::default(),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the commerce client (live or mock).
    #[must_use]
    pub fn commerce(&self) -> &CommerceClient {
        &self.inner.commerce
    }

    /// Get a reference to the UI string catalogs.
    #[must_use]
    pub fn catalogs(&self) -> &Catalogs {
        &self.inner.catalogs
    }

    /// Get a reference to the content store.
    #[must_use]
    pub fn content(&self) -> &ContentStore {
        &self.inner.content
    }

    /// Get a reference to the in-flight cart mutation tracker.
    #[must_use]
    pub fn cart_activity(&self) -> &CartActivity {
        &self.inner.cart_activity
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_uses_mock_backend() {
        let state =
            AppState::with_content(StorefrontConfig::default(), ContentStore::default()).unwrap();
        assert!(!state.commerce().is_configured());
        assert!(state.content().is_empty());
    }
}
