//! Catalog listing command.
//!
//! Uses the same backend selection as the storefront: Shopify when
//! `SHOPIFY_STORE` and `SHOPIFY_STOREFRONT_PRIVATE_TOKEN` are set, the
//! built-in mock catalog otherwise.

use sparkcola_core::{Product, ProductSort};
use sparkcola_storefront::config::StorefrontConfig;
use sparkcola_storefront::shopify::CommerceClient;

use super::CommandError;

/// Print the catalog as a table.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the catalog cannot
/// be fetched.
pub async fn list(sort: &str, available_only: bool) -> Result<(), CommandError> {
    let config = StorefrontConfig::from_env()?;
    let client = CommerceClient::from_config(config.shopify.as_ref());
    tracing::info!(live = client.is_configured(), "Fetching catalog");

    let mut products = client.list_products().await?;
    ProductSort::from_query(Some(sort)).apply(&mut products);
    if available_only {
        products.retain(|p| p.available_for_sale);
    }

    #[allow(clippy::print_stdout)]
    {
        println!("{:<28} {:<36} {:>12} {:>9}", "HANDLE", "TITLE", "PRICE", "VARIANTS");
        for product in &products {
            println!("{}", row(product));
        }
        println!("{} products", products.len());
    }

    Ok(())
}

fn row(product: &Product) -> String {
    let status = if product.available_for_sale { "" } else { " (sold out)" };
    format!(
        "{:<28} {:<36} {:>12} {:>9}{status}",
        product.handle,
        product.title,
        product.price.display(),
        product.variants.len(),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sparkcola_storefront::shopify::mock;

    #[test]
    fn test_row_marks_sold_out_products() {
        let catalog = mock::catalog();
        let classic = catalog.iter().find(|p| p.handle == "sparkcola-classic").unwrap();
        let lime = catalog.iter().find(|p| p.handle == "sparkcola-lime-limited").unwrap();

        assert!(row(classic).contains("RM 20.00"));
        assert!(!row(classic).contains("sold out"));
        assert!(row(lime).ends_with("(sold out)"));
    }
}
