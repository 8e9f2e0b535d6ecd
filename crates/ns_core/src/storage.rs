use async_trait::async_trait;

use crate::types::{Article, ArticleCandidate, ArticleDetail, ArticleId, Note, NoteId, NoteInput};
use crate::Result;

#[async_trait]
pub trait ArticleStorage: Send + Sync {
    /// Store a candidate as a new article
    async fn create_article(&self, candidate: &ArticleCandidate) -> Result<Article>;

    /// All stored articles, in insertion order
    async fn list_articles(&self) -> Result<Vec<Article>>;

    /// Articles flagged as favorite
    async fn list_favorites(&self) -> Result<Vec<Article>>;

    /// One article with its note resolved. Fails with `Error::NotFound` for an unknown id.
    async fn get_article(&self, id: ArticleId) -> Result<ArticleDetail>;

    async fn create_note(&self, input: &NoteInput) -> Result<Note>;

    /// Link a note to an article. Returns `None` when the article does not exist.
    async fn attach_note(&self, article_id: ArticleId, note_id: NoteId) -> Result<Option<Article>>;

    /// Fails with `Error::NotFound` for an unknown id.
    async fn set_favorite(&self, id: ArticleId, favorite: bool) -> Result<Article>;

    /// Release backend resources
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
