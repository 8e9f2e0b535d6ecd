use futures::future::join_all;
use ns_core::{Article, ArticleCandidate, ArticleStorage, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::scrapers::Scraper;

/// A candidate that could not be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistFailure {
    pub url: String,
    pub error: String,
}

/// Outcome of one scrape: everything extracted, and what happened to each candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeReport {
    pub source: String,
    pub extracted: Vec<ArticleCandidate>,
    pub saved: Vec<Article>,
    pub failed: Vec<PersistFailure>,
}

pub struct ScraperManager {
    storage: Arc<dyn ArticleStorage>,
    scraper: Arc<dyn Scraper>,
}

impl ScraperManager {
    pub fn new(storage: Arc<dyn ArticleStorage>, scraper: Arc<dyn Scraper>) -> Self {
        Self { storage, scraper }
    }

    pub fn scraper(&self) -> &dyn Scraper {
        self.scraper.as_ref()
    }

    /// Fetch, extract and store.
    ///
    /// Fetch and extraction failures abort the scrape. Storage failures are
    /// collected per candidate; every write has finished when this returns.
    #[instrument(level = "info", skip(self), fields(source = %self.scraper.source()))]
    pub async fn scrape(&self) -> Result<ScrapeReport> {
        let extracted = self.scraper.scrape().await?;
        let (saved, failed) = self.persist(&extracted).await;

        info!(
            extracted = extracted.len(),
            saved = saved.len(),
            failed = failed.len(),
            "Scrape finished"
        );

        Ok(ScrapeReport {
            source: self.scraper.source().to_string(),
            extracted,
            saved,
            failed,
        })
    }

    /// Store every candidate concurrently and wait for all of them.
    pub async fn persist(&self, candidates: &[ArticleCandidate]) -> (Vec<Article>, Vec<PersistFailure>) {
        let writes = candidates.iter().map(|candidate| {
            let storage = self.storage.clone();
            async move { (candidate, storage.create_article(candidate).await) }
        });

        let mut saved = Vec::new();
        let mut failed = Vec::new();
        for (candidate, result) in join_all(writes).await {
            match result {
                Ok(article) => {
                    info!(id = %article.id, headline = %article.headline, "Stored article");
                    saved.push(article);
                }
                Err(e) => {
                    error!(url = %candidate.url, error = %e, "Failed to store article");
                    failed.push(PersistFailure {
                        url: candidate.url.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }
        (saved, failed)
    }

    /// Extract from a local file without storing anything.
    pub async fn extract_file(&self, path: &Path) -> Result<Vec<ArticleCandidate>> {
        let html = tokio::fs::read_to_string(path).await?;
        self.scraper.extractor().extract(&html)
    }
}
