use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/", get(handlers::index))
        .route("/scrape", get(handlers::scrape))
        .route("/articles", get(handlers::list_articles))
        .route("/favorites", get(handlers::list_favorites))
        .route(
            "/articles/:id",
            get(handlers::get_article)
                .post(handlers::annotate_article)
                .put(handlers::update_favorite),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

pub mod prelude {
    pub use crate::{create_app, ApiError, AppState};
    pub use ns_core::{Article, Error, Result};
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use axum::response::Response;
    use ns_core::{ArticleCandidate, ArticleStorage};
    use ns_scrapers::{Extractor, ExtractorConfig, Scraper, ScraperManager};
    use ns_storage::InMemoryStorage;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const PAGE: &str = r#"<html><body>
        <div class="assetWrapper"><a href="/a.html"><h2>Story A</h2></a><p>About A</p></div>
        <div class="assetWrapper"><a href="/b.html"><h2>Story B</h2></a><p>About B</p></div>
    </body></html>"#;

    struct FixedPage {
        extractor: Extractor,
    }

    #[async_trait]
    impl Scraper for FixedPage {
        fn source(&self) -> &str {
            "fixed"
        }

        fn page_url(&self) -> &str {
            "https://www.nytimes.com/"
        }

        fn extractor(&self) -> &Extractor {
            &self.extractor
        }

        async fn fetch_page(&self) -> ns_core::Result<String> {
            Ok(PAGE.to_string())
        }
    }

    fn app() -> (Router, Arc<InMemoryStorage>) {
        let storage = Arc::new(InMemoryStorage::new());
        let scraper = FixedPage {
            extractor: Extractor::new(&ExtractorConfig::default()).unwrap(),
        };
        let manager = ScraperManager::new(storage.clone(), Arc::new(scraper));
        (create_app(AppState::new(storage.clone(), manager)), storage)
    }

    async fn send(app: &Router, request: Request<Body>) -> Response {
        app.clone().oneshot(request).await.unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn seed(storage: &InMemoryStorage) -> String {
        let article = storage
            .create_article(&ArticleCandidate {
                headline: "Seeded".to_string(),
                summary: "Seeded summary".to_string(),
                url: "https://www.nytimes.com/seeded.html".to_string(),
            })
            .await
            .unwrap();
        article.id.to_string()
    }

    #[tokio::test]
    async fn test_index() {
        let (app, _) = app();
        let response = send(&app, get("/")).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_scrape_then_list() {
        let (app, _) = app();
        let response = send(&app, get("/scrape")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let report = body_json(response).await;
        assert_eq!(report["extracted"].as_array().unwrap().len(), 2);
        assert_eq!(report["saved"].as_array().unwrap().len(), 2);
        assert_eq!(report["extracted"][0]["url"], "https://www.nytimes.com/a.html");

        let articles = body_json(send(&app, get("/articles")).await).await;
        assert_eq!(articles.as_array().unwrap().len(), 2);
        assert_eq!(articles[1]["headline"], "Story B");
    }

    #[tokio::test]
    async fn test_get_unknown_article() {
        let (app, _) = app();
        let uri = format!("/articles/{}", ns_core::ArticleId::new());
        let response = send(&app, get(&uri)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "not_found");
    }

    #[tokio::test]
    async fn test_malformed_id() {
        let (app, _) = app();
        let response = send(&app, get("/articles/not-a-uuid")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_favorite_flow() {
        let (app, storage) = app();
        let id = seed(&storage).await;
        let uri = format!("/articles/{}", id);

        let response = send(&app, json_request(Method::PUT, &uri, json!({ "favorite": true }))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["favorite"], true);

        let favorites = body_json(send(&app, get("/favorites")).await).await;
        assert_eq!(favorites.as_array().unwrap().len(), 1);
        assert_eq!(favorites[0]["id"], id.as_str());

        let form = Request::builder()
            .method(Method::PUT)
            .uri(&uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("favorite=false"))
            .unwrap();
        assert_eq!(send(&app, form).await.status(), StatusCode::OK);

        let favorites = body_json(send(&app, get("/favorites")).await).await;
        assert!(favorites.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_favorite_unknown_article() {
        let (app, _) = app();
        let uri = format!("/articles/{}", ns_core::ArticleId::new());
        let response = send(&app, json_request(Method::PUT, &uri, json!({ "favorite": true }))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_annotate_article() {
        let (app, storage) = app();
        let id = seed(&storage).await;
        let uri = format!("/articles/{}", id);

        let note = json!({ "title": "Later", "body": "Read this tonight" });
        let response = send(&app, json_request(Method::POST, &uri, note)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let updated = body_json(response).await;
        assert!(updated["note"].is_string());

        let detail = body_json(send(&app, get(&uri)).await).await;
        assert_eq!(detail["note"]["title"], "Later");
        assert_eq!(detail["note"]["body"], "Read this tonight");
        assert_eq!(detail["note"]["id"], updated["note"]);
    }

    #[tokio::test]
    async fn test_annotate_unknown_article_returns_null() {
        let (app, _) = app();
        let uri = format!("/articles/{}", ns_core::ArticleId::new());
        let response = send(&app, json_request(Method::POST, &uri, json!({ "body": "x" }))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_json(response).await.is_null());
    }
}
