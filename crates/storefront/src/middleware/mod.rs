//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (CSP, frame, referrer, permissions policy)
//! 5. Session layer (tower-sessions, `PostgreSQL` or memory store)
//! 6. Locale (redirect unprefixed paths, remember the chosen locale)
//!
//! Rate limiting (governor) is applied per route.

pub mod locale;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use locale::{Lang, locale_middleware};
pub use rate_limit::contact_rate_limiter;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
