use clap::{Args, Subcommand};
use ns_core::Result;
use std::path::PathBuf;

use crate::manager::ScraperManager;

#[derive(Args, Debug, Clone)]
pub struct ScraperArgs {
    #[command(subcommand)]
    pub command: ScraperCommands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ScraperCommands {
    /// Fetch the configured page and store every article found
    Run,
    /// Extract articles from a saved HTML file without storing them
    Extract {
        /// Path to the HTML file
        file: PathBuf,
    },
    /// Show the configured source
    List,
}

pub async fn handle_command(args: ScraperArgs, manager: &ScraperManager) -> Result<()> {
    match args.command {
        ScraperCommands::Run => {
            let report = manager.scrape().await?;
            println!(
                "Found {} articles on {}",
                report.extracted.len(),
                report.source
            );
            for article in &report.saved {
                println!("🆕 {} - {}", article.headline, article.url);
            }
            for failure in &report.failed {
                eprintln!("⚠️ {} - {}", failure.url, failure.error);
            }
        }
        ScraperCommands::Extract { file } => {
            let candidates = manager.extract_file(&file).await?;
            println!("Found {} articles in {}", candidates.len(), file.display());
            for candidate in candidates {
                println!("- {} - {}", candidate.headline, candidate.url);
                println!("  {}", candidate.summary);
            }
        }
        ScraperCommands::List => {
            let scraper = manager.scraper();
            println!("Available scrapers:");
            println!("  {} ({})", scraper.source(), scraper.page_url());
        }
    }
    Ok(())
}
