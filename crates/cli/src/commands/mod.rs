//! CLI subcommands.

pub mod migrate;
pub mod products;

use sparkcola_storefront::config::ConfigError;
use sparkcola_storefront::shopify::ShopifyError;

/// Errors returned by CLI commands.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("STOREFRONT_DATABASE_URL is not set")]
    MissingDatabaseUrl,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Catalog error: {0}")]
    Catalog(#[from] ShopifyError),
}
