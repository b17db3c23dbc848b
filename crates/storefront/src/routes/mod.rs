//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (commerce backend)
//! GET  /api/cart                        - Cart state snapshot (JSON)
//! GET  /api/order                       - Stored order (JSON, 404 if none)
//!
//! # Pages (every path below is prefixed by /{locale}: en, ms, zh)
//! GET  /                                - Home page
//! GET  /shop?sort=                      - Product listing
//! GET  /shop/{handle}                   - Product detail
//! GET  /about, /programs, /join-us      - Markdown content pages
//! GET  /contact                         - Contact form
//! POST /contact                         - Contact submission (rate limited)
//!
//! # Cart (HTMX fragments)
//! GET  /cart/drawer                     - Drawer fragment
//! POST /cart/add                        - Add variant (opens the drawer)
//! POST /cart/update                     - Update line quantity (0 removes)
//! POST /cart/remove                     - Remove line
//! POST /cart/open, /cart/close, /cart/toggle - Drawer state
//! GET  /cart/count                      - Cart count badge
//!
//! # Checkout
//! GET  /checkout                        - Current step
//! POST /checkout/information            - Save customer details, step forward
//! POST /checkout/shipping               - Save shipping method, step forward
//! POST /checkout/back                   - Step back
//! POST /checkout/payment                - Payment method fragment (HTMX)
//! POST /checkout/place                  - Place the simulated order
//!
//! # Orders
//! GET  /order-confirmation              - Last placed order
//! GET  /order-status                    - Status timeline
//! POST /order-status/simulate           - Start the status simulation
//! GET  /order-status/timeline           - Timeline fragment (polled by HTMX)
//! ```
//!
//! Unprefixed page paths are redirected by the locale middleware.

pub mod api;
pub mod cart;
pub mod checkout;
pub mod contact;
pub mod health;
pub mod home;
pub mod orders;
pub mod pages;
pub mod shop;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use sparkcola_core::Locale;
use tower_sessions::Session;

use crate::filters;
use crate::middleware::contact_rate_limiter;
use crate::models::{CartView, PageContext, session_keys};
use crate::services::CartService;
use crate::state::AppState;

/// Create the cart fragment routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/drawer", get(cart::drawer))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/open", post(cart::open))
        .route("/close", post(cart::close))
        .route("/toggle", post(cart::toggle))
        .route("/count", get(cart::count))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show))
        .route("/information", post(checkout::information))
        .route("/shipping", post(checkout::shipping))
        .route("/back", post(checkout::back))
        .route("/payment", post(checkout::payment))
        .route("/place", post(checkout::place))
}

/// Create the order readback routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/order-confirmation", get(orders::confirmation))
        .route("/order-status", get(orders::status))
        .route("/order-status/simulate", post(orders::simulate))
        .route("/order-status/timeline", get(orders::timeline_fragment))
}

/// Create the routes served under a locale prefix.
pub fn localized_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/shop", get(shop::index))
        .route("/shop/{handle}", get(shop::show))
        .merge(pages::router())
        .route(
            "/contact",
            get(contact::show).merge(post(contact::submit).layer(contact_rate_limiter())),
        )
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
        .merge(order_routes())
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api", api::routes())
        .nest("/{locale}", localized_routes())
        .fallback(fallback)
}

// =============================================================================
// Shared page helpers
// =============================================================================

/// Build the layout context for a full page: UI strings, cart drawer state
/// and language switcher links.
pub async fn page_context(
    state: &AppState,
    session: &Session,
    locale: Locale,
    path: &str,
) -> PageContext {
    let cart = CartService::new(state.commerce(), state.cart_activity(), session)
        .state()
        .await;
    PageContext::new(
        locale,
        state.catalogs().translations(locale),
        path,
        CartView::from(&cart),
        !state.commerce().is_configured(),
    )
}

/// Whether the request was issued by HTMX.
pub fn is_htmx(headers: &HeaderMap) -> bool {
    headers.contains_key("hx-request")
}

/// Not-found page template.
#[derive(Template, WebTemplate)]
#[template(path = "errors/not_found.html")]
pub struct NotFoundTemplate {
    pub page: PageContext,
}

/// Render the localized not-found page.
pub fn not_found(page: PageContext) -> Response {
    (StatusCode::NOT_FOUND, NotFoundTemplate { page }).into_response()
}

/// Render the not-found page without touching the session.
pub fn not_found_page(state: &AppState, locale: Locale) -> Response {
    not_found(PageContext::new(
        locale,
        state.catalogs().translations(locale),
        "/",
        CartView::empty(),
        !state.commerce().is_configured(),
    ))
}

/// Fallback for unmatched paths. Uses the path prefix or the remembered
/// locale for the page language.
async fn fallback(State(state): State<AppState>, session: Session, uri: Uri) -> Response {
    tracing::debug!(path = %uri.path(), "No route matched");

    let prefix = uri
        .path()
        .trim_start_matches('/')
        .split('/')
        .next()
        .and_then(|segment| segment.parse::<Locale>().ok());
    let locale = match prefix {
        Some(locale) => locale,
        None => session
            .get::<Locale>(session_keys::LOCALE)
            .await
            .ok()
            .flatten()
            .unwrap_or_default(),
    };

    not_found(page_context(&state, &session, locale, "/").await)
}
