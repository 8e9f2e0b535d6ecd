use anyhow::Context;
use clap::Parser;
use ns_core::ArticleStorage;
use ns_scrapers::extractor::{DEFAULT_CONTAINER, DEFAULT_ORIGIN};
use ns_scrapers::logging::init_logging;
use ns_scrapers::scrapers::site::DEFAULT_PAGE_URL;
use ns_scrapers::{handle_command, ExtractorConfig, ScraperArgs, ScraperManager, SiteScraper, SourceConfig};
use ns_web::{create_app, AppState};
use std::sync::Arc;
use tracing::info;

const DEFAULT_DATABASE_URL: &str = "sqlite://news_scrape.db";

#[derive(Parser, Debug)]
#[command(author, version, about = "Scrape news headlines and serve them over HTTP", long_about = None)]
pub struct Cli {
    /// Storage connection string (`sqlite://<path>`, `sqlite::memory:` or `memory://`)
    #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL, global = true)]
    database_url: String,
    #[arg(long, env = "HOST", default_value = "0.0.0.0", global = true)]
    host: String,
    #[arg(long, env = "PORT", default_value_t = 3000, global = true)]
    port: u16,
    /// Page to scrape
    #[arg(long, env = "SCRAPE_PAGE_URL", default_value = DEFAULT_PAGE_URL, global = true)]
    page_url: String,
    /// Prefixed onto relative article links
    #[arg(long, env = "SCRAPE_ORIGIN", default_value = DEFAULT_ORIGIN, global = true)]
    origin: String,
    /// Selector of the element wrapping each story
    #[arg(long, env = "SCRAPE_CONTAINER", default_value = DEFAULT_CONTAINER, global = true)]
    container_selector: String,
    /// Filter used when RUST_LOG is unset
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server (default)
    Serve,
    /// Scrape from the command line
    Scrape(ScraperArgs),
}

impl Cli {
    fn source_config(&self) -> SourceConfig {
        let defaults = SourceConfig::default();
        SourceConfig {
            page_url: self.page_url.clone(),
            extractor: ExtractorConfig {
                origin: self.origin.clone(),
                container: self.container_selector.clone(),
                ..defaults.extractor
            },
            ..defaults
        }
    }
}

async fn serve(cli: &Cli, state: AppState) -> anyhow::Result<()> {
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind((cli.host.as_str(), cli.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", cli.host, cli.port))?;
    info!("🌐 Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    info!("💾 Opening storage...");
    let storage: Arc<dyn ArticleStorage> = ns_storage::create_storage(&cli.database_url)
        .await
        .with_context(|| format!("Failed to open storage at {}", cli.database_url))?;

    let scraper = SiteScraper::new(cli.source_config()).context("Invalid scraper configuration")?;
    info!("🦗 Scraper ready for {}", scraper.config().page_url);
    let manager = ScraperManager::new(storage.clone(), Arc::new(scraper));

    let result = match cli.command {
        Some(Commands::Scrape(ref args)) => handle_command(args.clone(), &manager)
            .await
            .map_err(anyhow::Error::from),
        Some(Commands::Serve) | None => serve(&cli, AppState::new(storage.clone(), manager)).await,
    };

    storage.close().await.context("Failed to close storage")?;
    result
}
