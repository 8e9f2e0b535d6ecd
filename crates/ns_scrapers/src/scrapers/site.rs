use async_trait::async_trait;
use ns_core::{Error, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, instrument};

use crate::extractor::{Extractor, ExtractorConfig};
use crate::scrapers::Scraper;

pub const DEFAULT_SOURCE_NAME: &str = "The New York Times";
pub const DEFAULT_PAGE_URL: &str = "https://www.nytimes.com/";
const USER_AGENT: &str = concat!("news_scrape/", env!("CARGO_PKG_VERSION"));

/// Where to fetch a page and how to read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    pub page_url: String,
    pub extractor: ExtractorConfig,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_SOURCE_NAME.to_string(),
            page_url: DEFAULT_PAGE_URL.to_string(),
            extractor: ExtractorConfig::default(),
        }
    }
}

/// Scrapes a single page over HTTP.
#[derive(Debug, Clone)]
pub struct SiteScraper {
    config: SourceConfig,
    extractor: Extractor,
    client: Client,
}

impl SiteScraper {
    pub fn new(config: SourceConfig) -> Result<Self> {
        let extractor = Extractor::new(&config.extractor)?;
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            config,
            extractor,
            client,
        })
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }
}

#[async_trait]
impl Scraper for SiteScraper {
    fn source(&self) -> &str {
        &self.config.name
    }

    fn page_url(&self) -> &str {
        &self.config.page_url
    }

    fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    #[instrument(level = "info", skip(self), fields(url = %self.config.page_url))]
    async fn fetch_page(&self) -> Result<String> {
        let response = self.client.get(&self.config.page_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Scraping(format!(
                "{} responded with {}",
                self.config.page_url, status
            )));
        }
        let html = response.text().await?;
        info!(bytes = html.len(), "Fetched page");
        Ok(html)
    }
}
