//! Catalog route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use sparkcola_core::{Product, ProductSort, ProductVariant};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::AppError;
use crate::filters;
use crate::middleware::Lang;
use crate::models::PageContext;
use crate::shopify::ShopifyError;
use crate::state::AppState;

use super::{not_found, page_context};

/// Product display data for templates.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub handle: String,
    pub title: String,
    pub description: String,
    pub price: String,
    pub compare_at_price: Option<String>,
    pub image_url: Option<String>,
    pub image_alt: String,
    pub available: bool,
    pub on_sale: bool,
    pub variants: Vec<VariantView>,
    /// The product has a single untitled variant; no picker is shown.
    pub single_variant: bool,
    /// Variant preselected in the add-to-cart form.
    pub default_variant_id: Option<String>,
}

/// Variant display data for templates.
#[derive(Debug, Clone)]
pub struct VariantView {
    pub id: String,
    pub title: String,
    pub price: String,
    pub compare_at_price: Option<String>,
    pub available: bool,
}

impl From<&ProductVariant> for VariantView {
    fn from(variant: &ProductVariant) -> Self {
        Self {
            id: variant.id.to_string(),
            title: variant.title.clone(),
            price: variant.price.display(),
            compare_at_price: variant.compare_at_price.as_ref().map(|p| p.display()),
            available: variant.available_for_sale,
        }
    }
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        let image = product.featured_image();
        Self {
            handle: product.handle.clone(),
            title: product.title.clone(),
            description: product.description.clone(),
            price: product.price.display(),
            compare_at_price: product.compare_at_price.as_ref().map(|p| p.display()),
            image_url: image.map(|i| i.url.clone()),
            image_alt: image.map_or_else(|| product.title.clone(), |i| i.alt.clone()),
            available: product.available_for_sale,
            on_sale: product.is_on_sale(),
            variants: product.variants.iter().map(VariantView::from).collect(),
            single_variant: product.has_only_default_variant(),
            default_variant_id: product.default_variant().map(|v| v.id.to_string()),
        }
    }
}

/// Sort option for the listing's select control.
#[derive(Debug, Clone)]
pub struct SortOption {
    pub value: &'static str,
    pub label_key: String,
    pub selected: bool,
}

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ShopQuery {
    pub sort: Option<String>,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "shop/index.html")]
pub struct ShopIndexTemplate {
    pub page: PageContext,
    pub products: Vec<ProductView>,
    pub sort_options: Vec<SortOption>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "shop/show.html")]
pub struct ProductShowTemplate {
    pub page: PageContext,
    pub product: ProductView,
    pub related_products: Vec<ProductView>,
}

/// Number of related products shown under a product.
const RELATED_PRODUCTS: usize = 3;

/// Display product listing page.
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    Lang(locale): Lang,
    session: Session,
    Query(query): Query<ShopQuery>,
) -> Result<ShopIndexTemplate, AppError> {
    let sort = ProductSort::from_query(query.sort.as_deref());
    let mut products = state.commerce().list_products().await?;
    sort.apply(&mut products);

    let sort_options = ProductSort::ALL
        .into_iter()
        .map(|option| SortOption {
            value: option.as_str(),
            label_key: format!("shop.sort.{}", option.as_str()),
            selected: option == sort,
        })
        .collect();

    Ok(ShopIndexTemplate {
        page: page_context(&state, &session, locale, "/shop").await,
        products: products.iter().map(ProductView::from).collect(),
        sort_options,
    })
}

/// Display product detail page.
///
/// Unknown handles render the localized not-found page.
///
/// # Errors
///
/// Returns an error if the commerce backend fails.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    Lang(locale): Lang,
    session: Session,
    Path((_, handle)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let page = page_context(&state, &session, locale, &format!("/shop/{handle}")).await;

    let product = match state.commerce().product_by_handle(&handle).await {
        Ok(product) => product,
        Err(ShopifyError::NotFound(_)) => {
            tracing::info!(handle = %handle, "Unknown product");
            return Ok(not_found(page));
        }
        Err(e) => return Err(e.into()),
    };

    let related_products = state
        .commerce()
        .list_products()
        .await
        .map_or_else(
            |e| {
                tracing::warn!("Failed to fetch related products: {e}");
                Vec::new()
            },
            |products| {
                products
                    .iter()
                    .filter(|p| p.handle != product.handle && p.available_for_sale)
                    .take(RELATED_PRODUCTS)
                    .map(ProductView::from)
                    .collect()
            },
        );

    Ok(ProductShowTemplate {
        page,
        product: ProductView::from(&product),
        related_products,
    }
    .into_response())
}
