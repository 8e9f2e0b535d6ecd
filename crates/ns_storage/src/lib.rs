use async_trait::async_trait;
use ns_core::{ArticleStorage, Error, Result};
use std::sync::Arc;
use tracing::info;

pub mod backends;

pub use backends::*;

#[async_trait]
pub trait StorageBackend: ArticleStorage + Sized {
    /// Open the backend described by a connection string.
    async fn connect(url: &str) -> Result<Self>;
}

/// Pick a backend from the scheme of `url` and connect to it.
///
/// `memory://` keeps everything in process; `sqlite://<path>` and
/// `sqlite::memory:` go through SQLite when the `sqlite` feature is on.
pub async fn create_storage(url: &str) -> Result<Arc<dyn ArticleStorage>> {
    if url == "memory" || url.starts_with("memory://") {
        info!(backend = "memory", "Opening storage");
        return Ok(Arc::new(InMemoryStorage::connect(url).await?));
    }

    if url.starts_with("sqlite:") {
        #[cfg(feature = "sqlite")]
        {
            info!(backend = "sqlite", %url, "Opening storage");
            return Ok(Arc::new(SQLiteStorage::connect(url).await?));
        }
        #[cfg(not(feature = "sqlite"))]
        {
            return Err(Error::Storage(
                "SQLite support was not compiled in (enable the `sqlite` feature)".to_string(),
            ));
        }
    }

    Err(Error::Storage(format!("Unsupported storage url: {}", url)))
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_storage, StorageBackend};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_memory_storage() {
        let storage = create_storage("memory://").await.unwrap();
        assert!(storage.list_articles().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_scheme() {
        let result = create_storage("mongodb://localhost/newsScrape").await;
        assert!(matches!(result, Err(Error::Storage(_))));
    }
}
