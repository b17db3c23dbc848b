//! Conversions from Storefront API response shapes to domain types.

use sparkcola_core::{
    Cart, CartId, CartItem, CartLineId, CurrencyCode, DEFAULT_VARIANT_TITLE, Price, Product,
    ProductId, ProductImage, ProductOption, ProductVariant, SelectedOption, VariantId,
};

use crate::shopify::ShopifyError;

use super::queries::{CartLineNode, CartNode, ImageNode, MoneyV2, ProductNode, VariantNode};

fn convert_money(money: &MoneyV2) -> Result<Price, ShopifyError> {
    let currency: CurrencyCode = money.currency_code.parse()?;
    Ok(Price::parse(&money.amount, currency)?)
}

/// Shopify reports a zero compare-at price when none is set.
fn convert_compare_at(money: Option<&MoneyV2>) -> Result<Option<Price>, ShopifyError> {
    let Some(money) = money else {
        return Ok(None);
    };
    let price = convert_money(money)?;
    Ok((!price.is_zero()).then_some(price))
}

fn convert_image(image: ImageNode, fallback_alt: &str) -> ProductImage {
    ProductImage {
        url: image.url,
        alt: image
            .alt_text
            .filter(|alt| !alt.is_empty())
            .unwrap_or_else(|| fallback_alt.to_string()),
    }
}

fn convert_variant(variant: VariantNode, product_title: &str) -> Result<ProductVariant, ShopifyError> {
    Ok(ProductVariant {
        id: VariantId::new(variant.id),
        price: convert_money(&variant.price)?,
        compare_at_price: convert_compare_at(variant.compare_at_price.as_ref())?,
        available_for_sale: variant.available_for_sale,
        selected_options: variant
            .selected_options
            .into_iter()
            .map(|o| SelectedOption {
                name: o.name,
                value: o.value,
            })
            .collect(),
        image: variant.image.map(|i| convert_image(i, product_title)),
        title: variant.title,
    })
}

/// Convert a product node.
///
/// # Errors
///
/// Returns `ShopifyError::InvalidData` for unsupported currencies or
/// malformed amounts.
pub fn convert_product(product: ProductNode) -> Result<Product, ShopifyError> {
    let title = product.title;
    let variants = product
        .variants
        .edges
        .into_iter()
        .map(|e| convert_variant(e.node, &title))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Product {
        id: ProductId::new(product.id),
        handle: product.handle,
        description: product.description,
        price: convert_money(&product.price_range.min_variant_price)?,
        compare_at_price: convert_compare_at(Some(
            &product.compare_at_price_range.max_variant_price,
        ))?,
        images: product
            .images
            .edges
            .into_iter()
            .map(|e| convert_image(e.node, &title))
            .collect(),
        options: product
            .options
            .into_iter()
            .map(|o| ProductOption {
                name: o.name,
                values: o.values,
            })
            .collect(),
        variants,
        available_for_sale: product.available_for_sale,
        title,
    })
}

fn convert_cart_line(line: CartLineNode) -> Result<CartItem, ShopifyError> {
    let merchandise = line.merchandise;
    let product = merchandise.product;
    let image = merchandise
        .image
        .or(product.featured_image)
        .map(|i| convert_image(i, &product.title));

    Ok(CartItem {
        line_id: CartLineId::new(line.id),
        variant_id: VariantId::new(merchandise.id),
        product_handle: product.handle,
        variant_title: (merchandise.title != DEFAULT_VARIANT_TITLE).then_some(merchandise.title),
        quantity: u32::try_from(line.quantity).unwrap_or(0),
        unit_price: convert_money(&merchandise.price)?,
        image,
        title: product.title,
    })
}

/// Convert a cart node. Cart totals are recomputed from the lines.
///
/// # Errors
///
/// Returns `ShopifyError::InvalidData` for unsupported currencies or
/// malformed amounts.
pub fn convert_cart(cart: CartNode) -> Result<Cart, ShopifyError> {
    let currency: CurrencyCode = cart.cost.subtotal_amount.currency_code.parse()?;
    let lines = cart
        .lines
        .edges
        .into_iter()
        .map(|e| convert_cart_line(e.node))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Cart {
        id: CartId::new(cart.id),
        lines,
        currency,
        checkout_url: cart.checkout_url,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product_json() -> serde_json::Value {
        serde_json::json!({
            "id": "gid://shopify/Product/1",
            "handle": "classic-cola",
            "title": "Classic Cola",
            "description": "The original.",
            "availableForSale": true,
            "images": { "edges": [{ "node": { "url": "https://cdn.shopify.com/classic.png", "altText": null } }] },
            "options": [{ "name": "Title", "values": ["Default Title"] }],
            "priceRange": { "minVariantPrice": { "amount": "20.0", "currencyCode": "MYR" } },
            "compareAtPriceRange": { "maxVariantPrice": { "amount": "0.0", "currencyCode": "MYR" } },
            "variants": { "edges": [{ "node": {
                "id": "gid://shopify/ProductVariant/1",
                "title": "Default Title",
                "availableForSale": true,
                "price": { "amount": "20.0", "currencyCode": "MYR" },
                "compareAtPrice": null,
                "selectedOptions": [{ "name": "Title", "value": "Default Title" }],
                "image": null
            } }] }
        })
    }

    #[test]
    fn test_convert_product() {
        let node: ProductNode = serde_json::from_value(product_json()).unwrap();
        let product = convert_product(node).unwrap();

        assert_eq!(product.handle, "classic-cola");
        assert_eq!(product.price.display(), "RM 20.00");
        assert_eq!(product.compare_at_price, None);
        assert_eq!(product.images[0].alt, "Classic Cola");
        assert!(product.has_only_default_variant());
    }

    #[test]
    fn test_convert_product_unsupported_currency() {
        let mut json = product_json();
        json["priceRange"]["minVariantPrice"]["currencyCode"] = "JPY".into();
        let node: ProductNode = serde_json::from_value(json).unwrap();
        assert!(matches!(
            convert_product(node),
            Err(ShopifyError::InvalidData(_))
        ));
    }

    #[test]
    fn test_convert_cart_drops_default_variant_title() {
        let node: CartNode = serde_json::from_value(serde_json::json!({
            "id": "gid://shopify/Cart/1",
            "checkoutUrl": null,
            "cost": { "subtotalAmount": { "amount": "40.0", "currencyCode": "MYR" } },
            "lines": { "edges": [{ "node": {
                "id": "gid://shopify/CartLine/1",
                "quantity": 2,
                "merchandise": {
                    "id": "gid://shopify/ProductVariant/1",
                    "title": "Default Title",
                    "price": { "amount": "20.0", "currencyCode": "MYR" },
                    "image": null,
                    "product": {
                        "handle": "classic-cola",
                        "title": "Classic Cola",
                        "featuredImage": { "url": "https://cdn.shopify.com/classic.png", "altText": "Can" }
                    }
                }
            } }] }
        }))
        .unwrap();

        let cart = convert_cart(node).unwrap();
        assert_eq!(cart.lines[0].variant_title, None);
        assert_eq!(cart.lines[0].image.as_ref().unwrap().alt, "Can");
        assert_eq!(cart.subtotal().display(), "RM 40.00");
    }
}
