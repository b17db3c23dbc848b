//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Every mutation answers with the re-rendered drawer and a `cart-updated`
//! trigger so the header badge refreshes. Without HTMX the visitor is sent
//! back to the page they came from, where the drawer renders open.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::{HeaderMap, header::REFERER},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use sparkcola_core::{CartLineId, CartState, Locale, VariantId};
use tower_sessions::Session;
use tracing::instrument;

use crate::middleware::Lang;
use crate::models::{CartView, PageContext, localized_path};
use crate::services::CartService;
use crate::state::AppState;

use super::is_htmx;

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub variant_id: String,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub line_id: String,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub line_id: String,
}

/// Cart drawer fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_drawer.html")]
pub struct CartDrawerTemplate {
    pub page: PageContext,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

fn drawer_template(state: &AppState, locale: Locale, cart: &CartState) -> CartDrawerTemplate {
    CartDrawerTemplate {
        page: PageContext::new(
            locale,
            state.catalogs().translations(locale),
            "/",
            CartView::from(cart),
            !state.commerce().is_configured(),
        ),
    }
}

/// Respond to a cart mutation.
fn mutation_response(
    state: &AppState,
    locale: Locale,
    headers: &HeaderMap,
    cart: &CartState,
) -> Response {
    if !is_htmx(headers) {
        return Redirect::to(&return_path(headers, locale)).into_response();
    }

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        drawer_template(state, locale, cart),
    )
        .into_response()
}

/// Same-site page to return to after a plain form post.
fn return_path(headers: &HeaderMap, locale: Locale) -> String {
    let prefix = localized_path(locale, "/");
    headers
        .get(REFERER)
        .and_then(|value| value.to_str().ok())
        .and_then(|referer| url::Url::parse(referer).ok())
        .map(|url| url.path().to_string())
        .filter(|path| path.starts_with(&prefix))
        .unwrap_or_else(|| localized_path(locale, "/shop"))
}

/// Render the drawer.
#[instrument(skip(state, session))]
pub async fn drawer(
    State(state): State<AppState>,
    Lang(locale): Lang,
    session: Session,
) -> CartDrawerTemplate {
    let cart = CartService::new(state.commerce(), state.cart_activity(), &session)
        .state()
        .await;
    drawer_template(&state, locale, &cart)
}

/// Add item to cart.
///
/// Creates a new cart if one doesn't exist, or adds to the existing cart,
/// then opens the drawer.
#[instrument(skip(state, session, headers))]
pub async fn add(
    State(state): State<AppState>,
    Lang(locale): Lang,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let cart = CartService::new(state.commerce(), state.cart_activity(), &session)
        .add_item(VariantId::new(form.variant_id), form.quantity.unwrap_or(1))
        .await;
    mutation_response(&state, locale, &headers, &cart)
}

/// Update cart item quantity. Zero removes the line.
#[instrument(skip(state, session, headers))]
pub async fn update(
    State(state): State<AppState>,
    Lang(locale): Lang,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<UpdateCartForm>,
) -> Response {
    let cart = CartService::new(state.commerce(), state.cart_activity(), &session)
        .update_item(CartLineId::new(form.line_id), form.quantity)
        .await;
    mutation_response(&state, locale, &headers, &cart)
}

/// Remove item from cart.
#[instrument(skip(state, session, headers))]
pub async fn remove(
    State(state): State<AppState>,
    Lang(locale): Lang,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    let cart = CartService::new(state.commerce(), state.cart_activity(), &session)
        .remove_item(CartLineId::new(form.line_id))
        .await;
    mutation_response(&state, locale, &headers, &cart)
}

/// Open the drawer.
#[instrument(skip(state, session, headers))]
pub async fn open(
    State(state): State<AppState>,
    Lang(locale): Lang,
    session: Session,
    headers: HeaderMap,
) -> Response {
    let cart = CartService::new(state.commerce(), state.cart_activity(), &session)
        .open()
        .await;
    mutation_response(&state, locale, &headers, &cart)
}

/// Close the drawer.
#[instrument(skip(state, session, headers))]
pub async fn close(
    State(state): State<AppState>,
    Lang(locale): Lang,
    session: Session,
    headers: HeaderMap,
) -> Response {
    let cart = CartService::new(state.commerce(), state.cart_activity(), &session)
        .close()
        .await;
    mutation_response(&state, locale, &headers, &cart)
}

/// Toggle the drawer.
#[instrument(skip(state, session, headers))]
pub async fn toggle(
    State(state): State<AppState>,
    Lang(locale): Lang,
    session: Session,
    headers: HeaderMap,
) -> Response {
    let cart = CartService::new(state.commerce(), state.cart_activity(), &session)
        .toggle()
        .await;
    mutation_response(&state, locale, &headers, &cart)
}

/// Get cart count badge (HTMX).
#[instrument(skip(state, session))]
pub async fn count(
    State(state): State<AppState>,
    Lang(_locale): Lang,
    session: Session,
) -> CartCountTemplate {
    let count = CartService::new(state.commerce(), state.cart_activity(), &session)
        .state()
        .await
        .total_quantity();
    CartCountTemplate { count }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_return_path_accepts_same_locale_pages_only() {
        let mut headers = HeaderMap::new();
        assert_eq!(return_path(&headers, Locale::Ms), "/ms/shop");

        headers.insert(
            REFERER,
            HeaderValue::from_static("https://sparkcola.my/ms/shop/sparkcola-zero"),
        );
        assert_eq!(return_path(&headers, Locale::Ms), "/ms/shop/sparkcola-zero");
        assert_eq!(return_path(&headers, Locale::Zh), "/zh/shop");

        headers.insert(REFERER, HeaderValue::from_static("not a url"));
        assert_eq!(return_path(&headers, Locale::En), "/en/shop");
    }
}
