//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Returns the timeline icon for an order status key.
///
/// Usage in templates: `{{ step.key|status_icon }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn status_icon(key: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(icon_for(&key.to_string()))
}

fn icon_for(key: &str) -> &'static str {
    match key {
        "confirmed" => "🧾",
        "preparing" => "🥤",
        "shipped" => "📦",
        "out_for_delivery" => "🚚",
        "delivered" => "🏠",
        _ => "•",
    }
}

/// Returns the content hash for main.css.
///
/// The hash is computed at build time from the CSS file content.
///
/// Usage in templates: `{{ ""|css_hash }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn css_hash(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(env!("CSS_HASH"))
}

#[cfg(test)]
mod tests {
    use sparkcola_core::OrderStatus;

    use super::*;

    #[test]
    fn test_every_status_has_an_icon() {
        for status in OrderStatus::SEQUENCE {
            assert_ne!(icon_for(status.key()), "•", "{status:?}");
        }
        assert_eq!(icon_for("lost"), "•");
    }
}
