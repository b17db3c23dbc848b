//! Locale prefix handling.
//!
//! Every page lives under `/{locale}/...`. Requests for a page without the
//! prefix are redirected to the visitor's locale: the one remembered in the
//! session, else the best `Accept-Language` match, else English. Requests
//! that do carry a valid prefix update the remembered locale.

use axum::{
    extract::{FromRequestParts, RawPathParams, Request},
    http::{HeaderMap, header::ACCEPT_LANGUAGE, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use sparkcola_core::Locale;
use tower_sessions::Session;

use crate::models::session_keys;
use crate::state::AppState;

/// First path segments that name a localized page.
pub const LOCALIZED_ROOTS: [&str; 10] = [
    "",
    "shop",
    "about",
    "contact",
    "programs",
    "join-us",
    "checkout",
    "order-confirmation",
    "order-status",
    "cart",
];

/// Redirect unprefixed page paths and remember explicit locale choices.
pub async fn locale_middleware(session: Session, request: Request, next: Next) -> Response {
    let path = request.uri().path();
    let first_segment = path.trim_start_matches('/').split('/').next().unwrap_or("");

    if let Ok(locale) = first_segment.parse::<Locale>() {
        remember_locale(&session, locale).await;
        return next.run(request).await;
    }

    if !LOCALIZED_ROOTS.contains(&first_segment) {
        return next.run(request).await;
    }

    let locale = detect_locale(&session, request.headers()).await;
    let suffix = if path == "/" { "" } else { path };
    let target = request.uri().query().map_or_else(
        || format!("/{}{suffix}", locale.code()),
        |query| format!("/{}{suffix}?{query}", locale.code()),
    );

    tracing::debug!(from = %path, to = %target, "Redirecting to localized path");
    Redirect::temporary(&target).into_response()
}

/// Session locale, then `Accept-Language`, then the default.
async fn detect_locale(session: &Session, headers: &HeaderMap) -> Locale {
    if let Ok(Some(locale)) = session.get::<Locale>(session_keys::LOCALE).await {
        return locale;
    }

    headers
        .get(ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .and_then(Locale::negotiate)
        .unwrap_or_default()
}

async fn remember_locale(session: &Session, locale: Locale) {
    let current = session.get::<Locale>(session_keys::LOCALE).await.ok().flatten();
    if current == Some(locale) {
        return;
    }
    if let Err(e) = session.insert(session_keys::LOCALE, locale).await {
        tracing::warn!("Failed to remember locale: {e}");
    }
}

/// Extractor for the `{locale}` path prefix.
///
/// Unsupported codes (e.g. `/fr/shop`) are rejected with the not-found page.
#[derive(Debug, Clone, Copy)]
pub struct Lang(pub Locale);

impl FromRequestParts<AppState> for Lang {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let params = RawPathParams::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        params
            .iter()
            .find(|(name, _)| *name == "locale")
            .and_then(|(_, value)| value.parse::<Locale>().ok())
            .map(Self)
            .ok_or_else(|| crate::routes::not_found_page(state, Locale::default()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::http::HeaderValue;
    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_detect_prefers_session_locale() {
        let session = session();
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("zh-CN,zh;q=0.9"));

        assert_eq!(detect_locale(&session, &headers).await, Locale::Zh);

        remember_locale(&session, Locale::Ms).await;
        assert_eq!(detect_locale(&session, &headers).await, Locale::Ms);
    }

    #[tokio::test]
    async fn test_detect_defaults_to_english() {
        let mut headers = HeaderMap::new();
        assert_eq!(detect_locale(&session(), &headers).await, Locale::En);

        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("fr-FR,de;q=0.5"));
        assert_eq!(detect_locale(&session(), &headers).await, Locale::En);
    }

    #[test]
    fn test_localized_roots_are_not_locales() {
        for root in LOCALIZED_ROOTS {
            assert!(root.parse::<Locale>().is_err(), "{root} shadows a locale");
        }
    }
}
