use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ns_core::Error;
use serde_json::json;
use tracing::error;

/// Error returned by handlers, rendered as `{"error": kind, "message": text}`.
#[derive(Debug)]
pub enum ApiError {
    Core(Error),
    BadRequest(String),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self::Core(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Core(err) => match err {
                Error::NotFound(_) => StatusCode::NOT_FOUND,
                Error::InvalidId(_) => StatusCode::BAD_REQUEST,
                Error::Parse(_) => StatusCode::UNPROCESSABLE_ENTITY,
                Error::Scraping(_) | Error::Http(_) => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Core(err) => err.kind(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::BadRequest(message) => message.clone(),
            ApiError::Core(err) => err.to_string(),
        };
        if status.is_server_error() {
            error!(%status, %message, "Request failed");
        }
        let body = json!({ "error": self.kind(), "message": message });
        (status, Json(body)).into_response()
    }
}
