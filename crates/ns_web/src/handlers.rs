use axum::{
    async_trait,
    extract::{FromRequest, Path, Request, State},
    http::header::CONTENT_TYPE,
    response::{Html, IntoResponse},
    Form, Json,
};
use ns_core::{Article, ArticleDetail, ArticleId, NoteInput};
use ns_scrapers::ScrapeReport;
use serde::{de::DeserializeOwned, Deserialize};
use std::sync::Arc;
use tracing::info;

use crate::error::ApiError;
use crate::AppState;

const LANDING_PAGE: &str = r#"<!DOCTYPE html>
<html>
  <head><meta charset="utf-8"><title>News Scrape</title></head>
  <body>
    <h1>News Scrape</h1>
    <ul>
      <li><a href="/scrape">Scrape new articles</a></li>
      <li><a href="/articles">All articles</a></li>
      <li><a href="/favorites">Favorites</a></li>
    </ul>
  </body>
</html>
"#;

/// Body accepted either as JSON or as an urlencoded form.
pub struct JsonOrForm<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            Ok(Self(value))
        } else {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            Ok(Self(value))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FavoriteUpdate {
    pub favorite: bool,
}

pub async fn index() -> impl IntoResponse {
    Html(LANDING_PAGE)
}

pub async fn scrape(State(state): State<Arc<AppState>>) -> Result<Json<ScrapeReport>, ApiError> {
    let report = state.scrapers.scrape().await?;
    Ok(Json(report))
}

pub async fn list_articles(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Article>>, ApiError> {
    Ok(Json(state.storage.list_articles().await?))
}

pub async fn list_favorites(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Article>>, ApiError> {
    Ok(Json(state.storage.list_favorites().await?))
}

pub async fn get_article(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ArticleDetail>, ApiError> {
    let id: ArticleId = id.parse()?;
    Ok(Json(state.storage.get_article(id).await?))
}

/// Creates a note and links it to the article. Responds with `null` when the
/// article does not exist.
pub async fn annotate_article(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonOrForm(input): JsonOrForm<NoteInput>,
) -> Result<Json<Option<Article>>, ApiError> {
    let id: ArticleId = id.parse()?;
    let note = state.storage.create_note(&input).await?;
    let article = state.storage.attach_note(id, note.id).await?;
    info!(article = %id, note = %note.id, attached = article.is_some(), "Saved note");
    Ok(Json(article))
}

pub async fn update_favorite(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonOrForm(update): JsonOrForm<FavoriteUpdate>,
) -> Result<Json<Article>, ApiError> {
    let id: ArticleId = id.parse()?;
    let article = state.storage.set_favorite(id, update.favorite).await?;
    Ok(Json(article))
}
