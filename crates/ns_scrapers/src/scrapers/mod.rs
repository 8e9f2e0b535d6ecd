use async_trait::async_trait;
use ns_core::{ArticleCandidate, Result};

pub mod site;

pub use site::{SiteScraper, SourceConfig};

use crate::extractor::Extractor;

#[async_trait]
pub trait Scraper: Send + Sync {
    /// Returns the name of the news source
    fn source(&self) -> &str;

    /// The page the candidates are extracted from
    fn page_url(&self) -> &str;

    fn extractor(&self) -> &Extractor;

    /// Downloads the raw markup of the page
    async fn fetch_page(&self) -> Result<String>;

    /// Fetches the page and extracts its candidates
    async fn scrape(&self) -> Result<Vec<ArticleCandidate>> {
        let html = self.fetch_page().await?;
        self.extractor().extract(&html)
    }
}
