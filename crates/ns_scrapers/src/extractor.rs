//! Turns one HTML page into article candidates.
//!
//! A page is a list of repeated story containers. Each container yields a
//! headline, a summary and a link; containers missing any of the three are
//! skipped.

use ns_core::{ArticleCandidate, Error, Result};
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

pub const DEFAULT_ORIGIN: &str = "https://www.nytimes.com";
pub const DEFAULT_CONTAINER: &str = ".assetWrapper";
pub const DEFAULT_HEADING: &str = "h2";
pub const DEFAULT_LINK: &str = "a";
pub const DEFAULT_SUMMARY: &str = "p";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Prefixed onto relative links
    pub origin: String,
    pub container: String,
    pub heading: String,
    pub link: String,
    pub summary: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            container: DEFAULT_CONTAINER.to_string(),
            heading: DEFAULT_HEADING.to_string(),
            link: DEFAULT_LINK.to_string(),
            summary: DEFAULT_SUMMARY.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Extractor {
    origin: String,
    container: Selector,
    heading: Selector,
    link: Selector,
    summary: Selector,
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| Error::Parse(format!("Invalid selector {:?}: {}", selector, e)))
}

impl Extractor {
    pub fn new(config: &ExtractorConfig) -> Result<Self> {
        Ok(Self {
            origin: config.origin.trim_end_matches('/').to_string(),
            container: parse_selector(&config.container)?,
            heading: parse_selector(&config.heading)?,
            link: parse_selector(&config.link)?,
            summary: parse_selector(&config.summary)?,
        })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Extract every valid candidate, in document order.
    pub fn extract(&self, html: &str) -> Result<Vec<ArticleCandidate>> {
        if html.trim().is_empty() {
            info!(count = 0, "Document is empty");
            return Ok(Vec::new());
        }
        let document = Html::parse_document(html);

        let mut candidates = Vec::new();
        for (index, container) in document.select(&self.container).enumerate() {
            let candidate = self.extract_container(container);
            if candidate.is_valid() {
                debug!(index, headline = %candidate.headline, url = %candidate.url, "Extracted candidate");
                candidates.push(candidate);
            } else {
                debug!(index, "Skipping incomplete container");
            }
        }

        info!(count = candidates.len(), "Extracted articles");
        Ok(candidates)
    }

    fn extract_container(&self, container: ElementRef<'_>) -> ArticleCandidate {
        let headline = normalize_whitespace(&collect_text(container, &self.heading));
        let summary = normalize_whitespace(&collect_text(container, &self.summary));
        let url = container
            .select(&self.link)
            .next()
            .and_then(|link| link.value().attr("href"))
            .map(|href| absolute_url(&self.origin, href))
            .unwrap_or_default();

        ArticleCandidate {
            headline,
            summary,
            url,
        }
    }
}

/// Text of every element under `root` matching `selector`, concatenated.
fn collect_text(root: ElementRef<'_>, selector: &Selector) -> String {
    root.select(selector)
        .flat_map(|el| el.text())
        .collect::<String>()
}

/// Collapse every run of whitespace into a single space and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolve `href` against `origin`.
///
/// Relative links are appended to the origin with exactly one `/` between
/// them. Links that are already absolute are returned unchanged, and
/// protocol-relative links take the origin's scheme. A blank href yields an
/// empty string.
pub fn absolute_url(origin: &str, href: &str) -> String {
    let href = href.trim();
    if href.is_empty() {
        return String::new();
    }
    if let Some(rest) = href.strip_prefix("//") {
        let scheme = Url::parse(origin)
            .map(|o| o.scheme().to_string())
            .unwrap_or_else(|_| "https".to_string());
        return format!("{}://{}", scheme, rest);
    }
    if Url::parse(href).is_ok() {
        return href.to_string();
    }
    let origin = origin.trim_end_matches('/');
    if href.starts_with(&['/', '?', '#'][..]) {
        format!("{}{}", origin, href)
    } else {
        format!("{}/{}", origin, href)
    }
}
