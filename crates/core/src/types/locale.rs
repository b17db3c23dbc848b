//! Supported site locales and `Accept-Language` negotiation.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A site locale. Every localized route is prefixed by its code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ms,
    Zh,
}

/// Unknown locale code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported locale: {0}")]
pub struct UnknownLocale(pub String);

impl Locale {
    pub const ALL: [Self; 3] = [Self::En, Self::Ms, Self::Zh];

    /// Path prefix / language tag.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ms => "ms",
            Self::Zh => "zh",
        }
    }

    /// Name of the language in itself, for the language switcher.
    #[must_use]
    pub const fn native_name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Ms => "Bahasa Melayu",
            Self::Zh => "中文",
        }
    }

    /// Pick the best supported locale from an `Accept-Language` header value.
    ///
    /// Entries are ranked by their `q` weight (default 1.0); ties keep header
    /// order. Only the primary subtag is matched (`ms-MY` → `ms`).
    #[must_use]
    pub fn negotiate(accept_language: &str) -> Option<Self> {
        let mut candidates: Vec<(f32, usize, Self)> = accept_language
            .split(',')
            .enumerate()
            .filter_map(|(index, entry)| {
                let mut parts = entry.trim().split(';');
                let tag = parts.next()?.trim();
                let primary = tag.split('-').next()?.to_ascii_lowercase();
                let locale = primary.parse::<Self>().ok()?;
                let quality = parts
                    .find_map(|p| p.trim().strip_prefix("q="))
                    .and_then(|q| q.trim().parse::<f32>().ok())
                    .unwrap_or(1.0);
                (quality > 0.0).then_some((quality, index, locale))
            })
            .collect();

        candidates.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
        candidates.first().map(|(_, _, locale)| *locale)
    }
}

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|l| l.code() == s)
            .ok_or_else(|| UnknownLocale(s.to_string()))
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("ms".parse::<Locale>().unwrap(), Locale::Ms);
        assert!("fr".parse::<Locale>().is_err());
        assert!("EN".parse::<Locale>().is_err());
    }

    #[test]
    fn test_negotiate_prefers_weight() {
        assert_eq!(
            Locale::negotiate("en;q=0.5, ms-MY;q=0.9, zh;q=0.1"),
            Some(Locale::Ms)
        );
    }

    #[test]
    fn test_negotiate_header_order_breaks_ties() {
        assert_eq!(Locale::negotiate("zh-CN, en"), Some(Locale::Zh));
    }

    #[test]
    fn test_negotiate_skips_unsupported_and_zero_weight() {
        assert_eq!(Locale::negotiate("fr-FR, de;q=0.8, en;q=0.2"), Some(Locale::En));
        assert_eq!(Locale::negotiate("ms;q=0, fr"), None);
        assert_eq!(Locale::negotiate(""), None);
    }
}
