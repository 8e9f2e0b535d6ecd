use ns_core::ArticleStorage;
use ns_scrapers::ScraperManager;
use std::sync::Arc;

pub struct AppState {
    pub storage: Arc<dyn ArticleStorage>,
    pub scrapers: ScraperManager,
}

impl AppState {
    pub fn new(storage: Arc<dyn ArticleStorage>, scrapers: ScraperManager) -> Self {
        Self { storage, scrapers }
    }
}
