use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ns_core::{
    Article, ArticleCandidate, ArticleDetail, ArticleId, ArticleStorage, Error, Note, NoteId,
    NoteInput, Result,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

use crate::StorageBackend;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS notes (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        body TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        id TEXT PRIMARY KEY,
        headline TEXT NOT NULL,
        summary TEXT NOT NULL,
        url TEXT NOT NULL,
        favorite INTEGER NOT NULL DEFAULT 0,
        note_id TEXT REFERENCES notes(id),
        scraped_at TEXT NOT NULL
    )
    "#,
];

const ARTICLE_COLUMNS: &str = "id, headline, summary, url, favorite, note_id, scraped_at";

pub struct SQLiteStorage {
    pool: SqlitePool,
}

#[async_trait]
impl StorageBackend for SQLiteStorage {
    async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| Error::Storage(format!("Invalid SQLite url {}: {}", url, e)))?
            .create_if_missing(true);
        let pool_options = if url.contains(":memory:") {
            // The database lives only as long as its connection.
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        Self::with_options(options, pool_options).await
    }
}

impl SQLiteStorage {
    pub async fn new_with_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);
        Self::with_options(options, SqlitePoolOptions::new().max_connections(5)).await
    }

    async fn with_options(
        options: SqliteConnectOptions,
        pool_options: SqlitePoolOptions,
    ) -> Result<Self> {
        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| Error::Storage(format!("Failed to connect to database: {}", e)))?;

        for (i, statement) in SCHEMA.iter().enumerate() {
            sqlx::query(statement)
                .execute(&pool)
                .await
                .map_err(|e| Error::Storage(format!("Failed to create table {}: {}", i, e)))?;
        }

        info!("SQLite storage ready");
        Ok(Self { pool })
    }

    async fn fetch_article(&self, id: ArticleId) -> Result<Option<Article>> {
        let row = sqlx::query(&format!("SELECT {} FROM articles WHERE id = ?", ARTICLE_COLUMNS))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error("Failed to fetch article"))?;
        row.as_ref().map(article_from_row).transpose()
    }

    async fn fetch_note(&self, id: NoteId) -> Result<Option<Note>> {
        let row = sqlx::query("SELECT id, title, body FROM notes WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error("Failed to fetch note"))?;

        row.map(|row| -> Result<Note> {
            Ok(Note {
                id: row.get::<String, _>("id").parse()?,
                title: row.get("title"),
                body: row.get("body"),
            })
        })
        .transpose()
    }

    async fn fetch_articles(&self, favorites_only: bool) -> Result<Vec<Article>> {
        let sql = if favorites_only {
            format!(
                "SELECT {} FROM articles WHERE favorite = 1 ORDER BY rowid",
                ARTICLE_COLUMNS
            )
        } else {
            format!("SELECT {} FROM articles ORDER BY rowid", ARTICLE_COLUMNS)
        };
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error("Failed to list articles"))?;
        rows.iter().map(article_from_row).collect()
    }
}

fn storage_error(context: &'static str) -> impl Fn(sqlx::Error) -> Error {
    move |e| Error::Storage(format!("{}: {}", context, e))
}

fn article_from_row(row: &SqliteRow) -> Result<Article> {
    let note = row
        .get::<Option<String>, _>("note_id")
        .map(|id| id.parse::<NoteId>())
        .transpose()?;
    let scraped_at = DateTime::parse_from_rfc3339(&row.get::<String, _>("scraped_at"))
        .map_err(|e| Error::Storage(format!("Failed to parse date: {}", e)))?
        .with_timezone(&Utc);

    Ok(Article {
        id: row.get::<String, _>("id").parse()?,
        headline: row.get("headline"),
        summary: row.get("summary"),
        url: row.get("url"),
        favorite: row.get("favorite"),
        note,
        scraped_at,
    })
}

#[async_trait]
impl ArticleStorage for SQLiteStorage {
    async fn create_article(&self, candidate: &ArticleCandidate) -> Result<Article> {
        let article = Article::from_candidate(candidate);

        sqlx::query(
            r#"
            INSERT INTO articles (id, headline, summary, url, favorite, note_id, scraped_at)
            VALUES (?, ?, ?, ?, ?, NULL, ?)
            "#,
        )
        .bind(article.id.to_string())
        .bind(&article.headline)
        .bind(&article.summary)
        .bind(&article.url)
        .bind(article.favorite)
        .bind(article.scraped_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(storage_error("Failed to store article"))?;

        debug!(id = %article.id, url = %article.url, "Stored article");
        Ok(article)
    }

    async fn list_articles(&self) -> Result<Vec<Article>> {
        self.fetch_articles(false).await
    }

    async fn list_favorites(&self) -> Result<Vec<Article>> {
        self.fetch_articles(true).await
    }

    async fn get_article(&self, id: ArticleId) -> Result<ArticleDetail> {
        let article = self
            .fetch_article(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("article {}", id)))?;
        let note = match article.note {
            Some(note_id) => self.fetch_note(note_id).await?,
            None => None,
        };
        Ok(ArticleDetail::new(article, note))
    }

    async fn create_note(&self, input: &NoteInput) -> Result<Note> {
        let note = Note {
            id: NoteId::new(),
            title: input.title.clone(),
            body: input.body.clone(),
        };

        sqlx::query("INSERT INTO notes (id, title, body) VALUES (?, ?, ?)")
            .bind(note.id.to_string())
            .bind(&note.title)
            .bind(&note.body)
            .execute(&self.pool)
            .await
            .map_err(storage_error("Failed to store note"))?;

        Ok(note)
    }

    async fn attach_note(&self, article_id: ArticleId, note_id: NoteId) -> Result<Option<Article>> {
        let result = sqlx::query("UPDATE articles SET note_id = ? WHERE id = ?")
            .bind(note_id.to_string())
            .bind(article_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(storage_error("Failed to attach note"))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.fetch_article(article_id).await
    }

    async fn set_favorite(&self, id: ArticleId, favorite: bool) -> Result<Article> {
        let result = sqlx::query("UPDATE articles SET favorite = ? WHERE id = ?")
            .bind(favorite)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(storage_error("Failed to update article"))?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("article {}", id)));
        }
        self.fetch_article(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("article {}", id)))
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        info!("SQLite storage closed");
        Ok(())
    }
}
