use async_trait::async_trait;
use ns_core::{
    Article, ArticleCandidate, ArticleDetail, ArticleId, ArticleStorage, Error, Note, NoteId,
    NoteInput, Result,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::StorageBackend;

#[derive(Default)]
pub struct MemoryStore {
    articles: Vec<Article>,
    notes: HashMap<NoteId, Note>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_article(&mut self, candidate: &ArticleCandidate) -> Article {
        let article = Article::from_candidate(candidate);
        self.articles.push(article.clone());
        article
    }

    pub fn list_articles(&self) -> Vec<Article> {
        self.articles.clone()
    }

    pub fn list_favorites(&self) -> Vec<Article> {
        self.articles.iter().filter(|a| a.favorite).cloned().collect()
    }

    pub fn get_article(&self, id: ArticleId) -> Result<ArticleDetail> {
        let article = self
            .articles
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("article {}", id)))?;
        let note = article.note.and_then(|note_id| self.notes.get(&note_id).cloned());
        Ok(ArticleDetail::new(article, note))
    }

    pub fn create_note(&mut self, input: &NoteInput) -> Note {
        let note = Note {
            id: NoteId::new(),
            title: input.title.clone(),
            body: input.body.clone(),
        };
        self.notes.insert(note.id, note.clone());
        note
    }

    pub fn attach_note(&mut self, article_id: ArticleId, note_id: NoteId) -> Option<Article> {
        let article = self.articles.iter_mut().find(|a| a.id == article_id)?;
        article.note = Some(note_id);
        Some(article.clone())
    }

    pub fn set_favorite(&mut self, id: ArticleId, favorite: bool) -> Result<Article> {
        let article = self
            .articles
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| Error::NotFound(format!("article {}", id)))?;
        article.favorite = favorite;
        Ok(article.clone())
    }
}

/// Process-local storage. Contents are lost when the process exits.
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    store: Arc<RwLock<MemoryStore>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageBackend for InMemoryStorage {
    async fn connect(_url: &str) -> Result<Self> {
        Ok(Self::new())
    }
}

#[async_trait]
impl ArticleStorage for InMemoryStorage {
    async fn create_article(&self, candidate: &ArticleCandidate) -> Result<Article> {
        let mut store = self.store.write().await;
        let article = store.create_article(candidate);
        debug!(id = %article.id, url = %article.url, "Stored article in memory");
        Ok(article)
    }

    async fn list_articles(&self) -> Result<Vec<Article>> {
        Ok(self.store.read().await.list_articles())
    }

    async fn list_favorites(&self) -> Result<Vec<Article>> {
        Ok(self.store.read().await.list_favorites())
    }

    async fn get_article(&self, id: ArticleId) -> Result<ArticleDetail> {
        self.store.read().await.get_article(id)
    }

    async fn create_note(&self, input: &NoteInput) -> Result<Note> {
        Ok(self.store.write().await.create_note(input))
    }

    async fn attach_note(&self, article_id: ArticleId, note_id: NoteId) -> Result<Option<Article>> {
        Ok(self.store.write().await.attach_note(article_id, note_id))
    }

    async fn set_favorite(&self, id: ArticleId, favorite: bool) -> Result<Article> {
        self.store.write().await.set_favorite(id, favorite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(url: &str) -> ArticleCandidate {
        ArticleCandidate {
            headline: "Test Article".to_string(),
            summary: "This is a test article about politics.".to_string(),
            url: url.to_string(),
        }
    }

    #[tokio::test]
    async fn test_memory_storage() {
        let storage = InMemoryStorage::new();
        let article = storage.create_article(&candidate("http://test.com/a")).await.unwrap();
        assert!(!article.favorite);

        let articles = storage.list_articles().await.unwrap();
        assert_eq!(articles, vec![article]);
    }

    #[tokio::test]
    async fn test_same_url_stored_twice() {
        let storage = InMemoryStorage::new();
        let first = storage.create_article(&candidate("http://test.com/a")).await.unwrap();
        let second = storage.create_article(&candidate("http://test.com/a")).await.unwrap();
        assert_ne!(first.id, second.id);

        let articles = storage.list_articles().await.unwrap();
        assert_eq!(articles.len(), 2);
        assert!(articles.iter().all(|a| a.url == "http://test.com/a"));
    }

    #[tokio::test]
    async fn test_favorites() {
        let storage = InMemoryStorage::new();
        let a = storage.create_article(&candidate("http://test.com/a")).await.unwrap();
        let b = storage.create_article(&candidate("http://test.com/b")).await.unwrap();

        let updated = storage.set_favorite(a.id, true).await.unwrap();
        assert!(updated.favorite);
        let favorites = storage.list_favorites().await.unwrap();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].id, a.id);
        assert!(favorites.iter().all(|f| f.id != b.id));

        storage.set_favorite(a.id, false).await.unwrap();
        assert!(storage.list_favorites().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_set_favorite_unknown_id() {
        let storage = InMemoryStorage::new();
        let result = storage.set_favorite(ArticleId::new(), true).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_attach_note() {
        let storage = InMemoryStorage::new();
        let article = storage.create_article(&candidate("http://test.com/a")).await.unwrap();
        let note = storage
            .create_note(&NoteInput {
                title: "Worth reading".to_string(),
                body: "Follow up tomorrow".to_string(),
            })
            .await
            .unwrap();

        let updated = storage.attach_note(article.id, note.id).await.unwrap().unwrap();
        assert_eq!(updated.note, Some(note.id));

        let detail = storage.get_article(article.id).await.unwrap();
        assert_eq!(detail.note, Some(note));
    }

    #[tokio::test]
    async fn test_attach_note_unknown_article() {
        let storage = InMemoryStorage::new();
        let note = storage.create_note(&NoteInput::default()).await.unwrap();
        let result = storage.attach_note(ArticleId::new(), note.id).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_get_unknown_article() {
        let storage = InMemoryStorage::new();
        let result = storage.get_article(ArticleId::new()).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }
}
