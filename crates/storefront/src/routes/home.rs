//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::middleware::Lang;
use crate::models::PageContext;
use crate::state::AppState;

use super::page_context;
use super::shop::ProductView;

// =============================================================================
// Static sections
// =============================================================================

/// A highlighted brand promise on the home page.
#[derive(Clone)]
pub struct Highlight {
    pub icon: &'static str,
    pub title_key: &'static str,
    pub body_key: &'static str,
}

/// Brand promises shown under the hero. Copy lives in the locale catalogs.
const HIGHLIGHTS: [Highlight; 3] = [
    Highlight {
        icon: "🫧",
        title_key: "home.highlight.fizz.title",
        body_key: "home.highlight.fizz.body",
    },
    Highlight {
        icon: "🌿",
        title_key: "home.highlight.local.title",
        body_key: "home.highlight.local.body",
    },
    Highlight {
        icon: "♻️",
        title_key: "home.highlight.recycle.title",
        body_key: "home.highlight.recycle.body",
    },
];

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub page: PageContext,
    /// Products for the featured grid.
    pub featured_products: Vec<ProductView>,
    pub highlights: Vec<Highlight>,
}

/// Number of products in the featured grid.
const FEATURED_PRODUCTS: usize = 4;

/// Display the home page.
#[instrument(skip(state, session))]
pub async fn home(
    State(state): State<AppState>,
    Lang(locale): Lang,
    session: Session,
) -> HomeTemplate {
    let featured_products = state.commerce().list_products().await.map_or_else(
        |e| {
            tracing::error!("Failed to fetch featured products: {e}");
            Vec::new()
        },
        |products| {
            products
                .iter()
                .filter(|p| p.available_for_sale)
                .take(FEATURED_PRODUCTS)
                .map(ProductView::from)
                .collect()
        },
    );

    HomeTemplate {
        page: page_context(&state, &session, locale, "/").await,
        featured_products,
        highlights: HIGHLIGHTS.to_vec(),
    }
}
