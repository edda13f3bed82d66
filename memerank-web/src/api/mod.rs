//! HTTP handlers for memerank-web

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use memerank_common::Error;
use serde_json::json;
use tracing::error;

pub mod health;
pub mod pages;
pub mod rating;

pub use health::health_routes;
pub use pages::{finish, home, rating_page, reset, results, start_rating};
pub use rating::{next_meme, prev_meme, submit_rating};

/// Error wrapper mapping domain errors onto HTTP responses
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::InvalidRating(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Request failed: {}", self.0);
        }

        let body = Json(json!({
            "error": self.0.to_string(),
        }));

        (status, body).into_response()
    }
}
