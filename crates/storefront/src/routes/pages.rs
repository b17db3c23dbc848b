//! Static content page route handlers.
//!
//! Serves the markdown-based about, programs and join-us pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::NaiveDate;
use sparkcola_core::Locale;
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::middleware::Lang;
use crate::models::PageContext;
use crate::state::AppState;

use super::{not_found, page_context};

/// Content page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/content.html")]
pub struct ContentPageTemplate {
    pub page: PageContext,
    pub title: String,
    pub description: String,
    pub updated_at: Option<NaiveDate>,
    pub content_html: String,
}

/// Serve a content page by slug, or the not-found page.
async fn serve_content_page(
    state: &AppState,
    session: &Session,
    locale: Locale,
    slug: &str,
) -> Response {
    let page = page_context(state, session, locale, &format!("/{slug}")).await;

    let Some(content) = state.content().get_page(locale, slug) else {
        tracing::warn!(slug, locale = %locale, "Content page missing");
        return not_found(page);
    };

    ContentPageTemplate {
        page,
        title: content.meta.title.clone(),
        description: content.meta.description.clone().unwrap_or_default(),
        updated_at: content.meta.updated_at,
        content_html: content.content_html.clone(),
    }
    .into_response()
}

/// Display the About page.
#[instrument(skip(state, session))]
pub async fn about(
    State(state): State<AppState>,
    Lang(locale): Lang,
    session: Session,
) -> Response {
    serve_content_page(&state, &session, locale, "about").await
}

/// Display the Programs page.
#[instrument(skip(state, session))]
pub async fn programs(
    State(state): State<AppState>,
    Lang(locale): Lang,
    session: Session,
) -> Response {
    serve_content_page(&state, &session, locale, "programs").await
}

/// Display the Join Us page.
#[instrument(skip(state, session))]
pub async fn join_us(
    State(state): State<AppState>,
    Lang(locale): Lang,
    session: Session,
) -> Response {
    serve_content_page(&state, &session, locale, "join-us").await
}

/// Create the pages routes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/about", get(about))
        .route("/programs", get(programs))
        .route("/join-us", get(join_us))
}
