//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! sparkcola-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string for sessions
//!
//! The storefront owns no other tables, so this only creates the
//! tower-sessions table (idempotent).

use sparkcola_storefront::config::StorefrontConfig;
use sparkcola_storefront::db;

use super::CommandError;

/// Create the session table.
///
/// # Errors
///
/// Returns an error if the database URL is missing or the migration fails.
pub async fn sessions() -> Result<(), CommandError> {
    let config = StorefrontConfig::from_env()?;
    let database_url = config
        .database_url
        .as_ref()
        .ok_or(CommandError::MissingDatabaseUrl)?;

    tracing::info!("Connecting to storefront database...");
    let pool = db::create_pool(database_url).await?;

    tracing::info!("Creating session table...");
    db::migrate(&pool).await?;

    tracing::info!("Session migration complete");
    Ok(())
}
