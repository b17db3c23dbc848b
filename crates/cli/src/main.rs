//! Sparkcola CLI - Session migrations and catalog tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the session table (requires STOREFRONT_DATABASE_URL)
//! sparkcola-cli migrate
//!
//! # List the catalog the storefront would serve
//! sparkcola-cli products --sort price-asc
//! ```
//!
//! # Commands
//!
//! - `migrate` - Create the `PostgreSQL` session table
//! - `products` - Print the product catalog (Shopify or the built-in mock)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "sparkcola-cli")]
#[command(author, version, about = "Sparkcola storefront CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the session table in the storefront database
    Migrate,
    /// List the product catalog
    Products {
        /// Sort order (`featured`, `price-asc`, `price-desc`, `title`)
        #[arg(short, long, default_value = "featured")]
        sort: String,

        /// Only list products that can be bought
        #[arg(long)]
        available: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::sessions().await?,
        Commands::Products { sort, available } => {
            commands::products::list(&sort, available).await?;
        }
    }
    Ok(())
}
