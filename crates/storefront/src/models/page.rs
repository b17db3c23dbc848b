//! Per-page context shared by every full-page template.

use sparkcola_core::Locale;

use crate::i18n::Translations;

use super::cart::CartView;

/// A link to the current page in another locale.
#[derive(Debug, Clone)]
pub struct LocaleLink {
    pub code: &'static str,
    pub name: &'static str,
    pub href: String,
    pub active: bool,
}

/// Layout data: locale, UI strings, cart drawer and language switcher.
#[derive(Debug, Clone)]
pub struct PageContext {
    pub locale: Locale,
    pub t: Translations,
    /// Current path without the locale prefix (e.g. `/shop`).
    pub path: String,
    pub cart: CartView,
    pub locales: Vec<LocaleLink>,
    /// Whether the storefront is running against the mock backend.
    pub mock_mode: bool,
}

impl PageContext {
    #[must_use]
    pub fn new(
        locale: Locale,
        t: Translations,
        path: impl Into<String>,
        cart: CartView,
        mock_mode: bool,
    ) -> Self {
        let path = path.into();
        let locales = Locale::ALL
            .into_iter()
            .map(|other| LocaleLink {
                code: other.code(),
                name: other.native_name(),
                href: localized_path(other, &path),
                active: other == locale,
            })
            .collect();

        Self {
            locale,
            t,
            path,
            cart,
            locales,
            mock_mode,
        }
    }

    /// Language tag for the `lang` attribute.
    #[must_use]
    pub const fn lang(&self) -> &'static str {
        self.locale.code()
    }

    /// Prefix a path with the page locale.
    #[must_use]
    pub fn href(&self, path: &str) -> String {
        localized_path(self.locale, path)
    }
}

/// Prefix a path with a locale (`/shop` → `/ms/shop`, `/` → `/ms`).
#[must_use]
pub fn localized_path(locale: Locale, path: &str) -> String {
    if path.is_empty() || path == "/" {
        format!("/{}", locale.code())
    } else {
        format!("/{}{path}", locale.code())
    }
}
