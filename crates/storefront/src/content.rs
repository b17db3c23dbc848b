//! Content management for markdown-based pages.
//!
//! This module loads markdown files from the content directory at startup,
//! parses frontmatter metadata, and renders markdown to HTML. Each locale has
//! its own directory:
//!
//! ```text
//! content/
//!   en/about.md
//!   ms/about.md
//!   zh/about.md
//! ```
//!
//! A page missing in a locale falls back to its English version.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use comrak::{Options, markdown_to_html};
use gray_matter::{Matter, ParsedEntity, engine::YAML};
use serde::Deserialize;
use sparkcola_core::Locale;

/// Metadata for content pages (about, programs, join-us).
#[derive(Debug, Clone, Deserialize)]
pub struct PageMeta {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub updated_at: Option<NaiveDate>,
}

/// A rendered page with metadata and HTML content
#[derive(Debug, Clone)]
pub struct Page {
    pub slug: String,
    pub locale: Locale,
    pub meta: PageMeta,
    pub content_html: String,
}

/// Content store that holds all loaded content in memory
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    pages: Arc<HashMap<(Locale, String), Page>>,
}

impl ContentStore {
    /// Load all content from the filesystem.
    ///
    /// Locale directories that do not exist are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing locale directory cannot be read.
    pub fn load(content_dir: &Path) -> Result<Self, ContentError> {
        let mut pages = HashMap::new();

        for locale in Locale::ALL {
            for page in Self::load_pages(&content_dir.join(locale.code()), locale)? {
                pages.insert((locale, page.slug.clone()), page);
            }
        }

        Ok(Self {
            pages: Arc::new(pages),
        })
    }

    /// Load all pages from one locale directory
    fn load_pages(dir: &Path, locale: Locale) -> Result<Vec<Page>, ContentError> {
        let mut pages = Vec::new();

        if !dir.exists() {
            tracing::warn!("Content directory does not exist: {:?}", dir);
            return Ok(pages);
        }

        let entries = std::fs::read_dir(dir).map_err(|e| ContentError::Io(e.to_string()))?;

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "md") {
                match Self::load_page(&path, locale) {
                    Ok(page) => {
                        tracing::info!(locale = %locale, "Loaded page: {}", page.slug);
                        pages.push(page);
                    }
                    Err(e) => {
                        tracing::error!("Failed to load page {:?}: {}", path, e);
                    }
                }
            }
        }

        Ok(pages)
    }

    /// Load a single page from a markdown file
    fn load_page(path: &Path, locale: Locale) -> Result<Page, ContentError> {
        let content = std::fs::read_to_string(path).map_err(|e| ContentError::Io(e.to_string()))?;

        let slug = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ContentError::Parse("Invalid filename".to_string()))?
            .to_string();

        let (meta, content_html) = parse_page(&content)?;

        Ok(Page {
            slug,
            locale,
            meta,
            content_html,
        })
    }

    /// Get a page by slug, falling back to English.
    #[must_use]
    pub fn get_page(&self, locale: Locale, slug: &str) -> Option<&Page> {
        self.pages
            .get(&(locale, slug.to_string()))
            .or_else(|| self.pages.get(&(Locale::En, slug.to_string())))
    }

    /// Number of loaded pages across all locales.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether no pages were loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Split frontmatter from a markdown document and render the body.
fn parse_page(content: &str) -> Result<(PageMeta, String), ContentError> {
    let matter = Matter::<YAML>::new();
    let parsed: ParsedEntity<PageMeta> = matter
        .parse(content)
        .map_err(|e| ContentError::Parse(format!("Failed to parse frontmatter: {e}")))?;
    let meta = parsed
        .data
        .ok_or_else(|| ContentError::Parse("Missing frontmatter".to_string()))?;

    Ok((meta, render_markdown(&parsed.content)))
}

/// Render markdown to HTML with GitHub Flavored Markdown support.
fn render_markdown(content: &str) -> String {
    let mut options = Options::default();

    // Enable GFM extensions
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.header_ids = Some(String::new());

    // Render options
    options.render.r#unsafe = true; // Allow raw HTML in markdown

    markdown_to_html(content, &options)
}

/// Content loading errors
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page() {
        let (meta, html) = parse_page(
            "---\ntitle: About Sparkcola\ndescription: Our story\n---\n\n# Hello\n\nFizz **daily**.\n",
        )
        .unwrap();

        assert_eq!(meta.title, "About Sparkcola");
        assert_eq!(meta.description.as_deref(), Some("Our story"));
        assert!(html.contains("<strong>daily</strong>"));
        assert!(html.contains("<h1"));
    }

    #[test]
    fn test_parse_page_missing_frontmatter() {
        assert!(matches!(
            parse_page("# No metadata"),
            Err(ContentError::Parse(_))
        ));
    }

    #[test]
    fn test_load_falls_back_to_english() {
        let dir = std::env::temp_dir().join(format!("sparkcola-content-{}", std::process::id()));
        std::fs::create_dir_all(dir.join("en")).unwrap();
        std::fs::create_dir_all(dir.join("ms")).unwrap();
        std::fs::write(dir.join("en/about.md"), "---\ntitle: About\n---\nHello").unwrap();
        std::fs::write(dir.join("ms/about.md"), "---\ntitle: Tentang\n---\nHai").unwrap();
        std::fs::write(dir.join("en/programs.md"), "---\ntitle: Programs\n---\nList").unwrap();

        let store = ContentStore::load(&dir).unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.get_page(Locale::Ms, "about").unwrap().meta.title, "Tentang");
        assert_eq!(
            store.get_page(Locale::Ms, "programs").unwrap().meta.title,
            "Programs"
        );
        assert_eq!(store.get_page(Locale::Zh, "about").unwrap().locale, Locale::En);
        assert!(store.get_page(Locale::En, "missing").is_none());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
