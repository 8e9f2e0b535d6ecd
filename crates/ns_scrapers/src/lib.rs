pub mod cli;
pub mod extractor;
pub mod logging;
pub mod manager;
pub mod scrapers;

pub use cli::{handle_command, ScraperArgs, ScraperCommands};
pub use extractor::{absolute_url, normalize_whitespace, Extractor, ExtractorConfig};
pub use manager::{PersistFailure, ScrapeReport, ScraperManager};
pub use scrapers::{Scraper, SiteScraper, SourceConfig};

pub mod prelude {
    pub use super::scrapers::Scraper;
    pub use ns_core::{Article, ArticleCandidate, Error, Result};
}
