//! Optional `PostgreSQL` backing for sessions.
//!
//! The storefront keeps no tables of its own: Shopify is the source of truth
//! for products and carts, and orders live in the visitor's session. The
//! database, when configured, only holds the tower-sessions table so carts
//! and orders survive restarts.
//!
//! # Migrations
//!
//! The session table is created by the sqlx store and run via:
//! ```bash
//! cargo run -p sparkcola-cli -- migrate
//! ```

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tower_sessions_sqlx_store::PostgresStore;

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Create the session store over an existing pool.
#[must_use]
pub fn session_store(pool: &PgPool) -> PostgresStore {
    PostgresStore::new(pool.clone())
}

/// Create the session table if it does not exist.
///
/// # Errors
///
/// Returns `sqlx::Error` if the migration fails.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::Error> {
    session_store(pool).migrate().await
}
