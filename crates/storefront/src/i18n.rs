//! UI string catalogs.
//!
//! One flat JSON object per locale (`locales/<code>.json`) is embedded in the
//! binary. Lookups fall back to English, then to the key itself, so a missing
//! translation never breaks a page.

use std::collections::HashMap;
use std::sync::Arc;

use sparkcola_core::Locale;
use thiserror::Error;

type Catalog = HashMap<String, String>;

/// Catalog loading errors.
#[derive(Debug, Error)]
pub enum I18nError {
    #[error("Invalid {locale} catalog: {source}")]
    Parse {
        locale: Locale,
        #[source]
        source: serde_json::Error,
    },
}

/// All embedded catalogs.
#[derive(Debug, Clone)]
pub struct Catalogs {
    catalogs: Arc<HashMap<Locale, Arc<Catalog>>>,
}

const fn embedded(locale: Locale) -> &'static str {
    match locale {
        Locale::En => include_str!("../locales/en.json"),
        Locale::Ms => include_str!("../locales/ms.json"),
        Locale::Zh => include_str!("../locales/zh.json"),
    }
}

impl Catalogs {
    /// Parse the embedded catalogs.
    ///
    /// # Errors
    ///
    /// Returns `I18nError::Parse` if a catalog is not a flat JSON object of strings.
    pub fn load() -> Result<Self, I18nError> {
        let mut catalogs = HashMap::new();
        for locale in Locale::ALL {
            let catalog: Catalog = serde_json::from_str(embedded(locale))
                .map_err(|source| I18nError::Parse { locale, source })?;
            catalogs.insert(locale, Arc::new(catalog));
        }
        Ok(Self {
            catalogs: Arc::new(catalogs),
        })
    }

    /// Translations for one locale.
    #[must_use]
    pub fn translations(&self, locale: Locale) -> Translations {
        Translations {
            locale,
            primary: self.catalog(locale),
            fallback: self.catalog(Locale::En),
        }
    }

    fn catalog(&self, locale: Locale) -> Arc<Catalog> {
        self.catalogs.get(&locale).cloned().unwrap_or_default()
    }
}

/// String lookup for a single locale.
#[derive(Debug, Clone)]
pub struct Translations {
    locale: Locale,
    primary: Arc<Catalog>,
    fallback: Arc<Catalog>,
}

impl Translations {
    #[must_use]
    pub const fn locale(&self) -> Locale {
        self.locale
    }

    /// Look up a UI string.
    #[must_use]
    pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
        self.primary
            .get(key)
            .or_else(|| self.fallback.get(key))
            .map_or(key, String::as_str)
    }

    /// Look up a UI string and substitute `{name}` placeholders.
    #[must_use]
    pub fn format(&self, key: &str, args: &[(&str, &str)]) -> String {
        args.iter()
            .fold(self.get(key).to_string(), |text, (name, value)| {
                text.replace(&format!("{{{name}}}"), value)
            })
    }
}
