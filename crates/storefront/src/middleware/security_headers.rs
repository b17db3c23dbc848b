//! Security headers applied to every storefront response.
//!
//! The page shell pulls htmx from unpkg and product images from the Shopify
//! CDN; everything else is same-origin.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue, header},
    middleware::Next,
    response::Response,
};

/// Content Security Policy directives, joined with `; ` at first use.
const CSP_DIRECTIVES: &[&str] = &[
    "default-src 'none'",
    "script-src 'self' https://unpkg.com",
    "style-src 'self'",
    "img-src 'self' https://cdn.shopify.com",
    "font-src 'self'",
    "connect-src 'self'",
    "form-action 'self'",
    "base-uri 'self'",
    "frame-ancestors 'none'",
    "object-src 'none'",
    "upgrade-insecure-requests",
];

/// Browser features the storefront never uses.
const DENIED_FEATURES: &[&str] = &[
    "camera",
    "geolocation",
    "microphone",
    "payment",
    "usb",
    "interest-cohort",
    "browsing-topics",
];

/// Fixed headers: `(name, value)`.
const STATIC_HEADERS: &[(&str, &str)] = &[
    ("x-frame-options", "DENY"),
    ("x-content-type-options", "nosniff"),
    // Cart form posts redirect back to the referring page
    ("referrer-policy", "same-origin"),
    // Cart and order pages are per-session
    ("cache-control", "no-store, max-age=0"),
    ("x-dns-prefetch-control", "off"),
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-resource-policy", "same-origin"),
    // Shopify CDN images and the htmx bundle do not send CORP headers
    ("cross-origin-embedder-policy", "credentialless"),
];

fn content_security_policy() -> HeaderValue {
    static VALUE: std::sync::LazyLock<HeaderValue> = std::sync::LazyLock::new(|| {
        HeaderValue::from_str(&CSP_DIRECTIVES.join("; "))
            .unwrap_or_else(|_| HeaderValue::from_static("default-src 'self'"))
    });
    VALUE.clone()
}

fn permissions_policy() -> HeaderValue {
    static VALUE: std::sync::LazyLock<HeaderValue> = std::sync::LazyLock::new(|| {
        let policy = DENIED_FEATURES
            .iter()
            .map(|feature| format!("{feature}=()"))
            .collect::<Vec<_>>()
            .join(", ");
        HeaderValue::from_str(&policy).unwrap_or_else(|_| HeaderValue::from_static(""))
    });
    VALUE.clone()
}

/// Add security headers to all responses.
///
/// Handlers that set one of these headers themselves are overridden.
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    for &(name, value) in STATIC_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    headers.insert(header::CONTENT_SECURITY_POLICY, content_security_policy());
    headers.insert(
        HeaderName::from_static("permissions-policy"),
        permissions_policy(),
    );

    response
}
