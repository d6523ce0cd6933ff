//! API error responses.
//!
//! # Design Decisions
//! - Errors render as JSON `{ error, message, redirect? }`
//! - A missing country is a navigation signal, not a server fault:
//!   404 with the path of the not-found view

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Where clients should navigate when a country does not exist.
pub const NOT_FOUND_PATH: &str = "/not-found";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Country '{0}' not found")]
    CountryNotFound(String),

    #[error("{0}")]
    BadRequest(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect: Option<&'static str>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::CountryNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match &self {
            ApiError::CountryNotFound(_) => ErrorBody {
                error: "not_found",
                message: self.to_string(),
                redirect: Some(NOT_FOUND_PATH),
            },
            ApiError::BadRequest(_) => ErrorBody {
                error: "bad_request",
                message: self.to_string(),
                redirect: None,
            },
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_not_found_body() {
        let response = ApiError::CountryNotFound("Atlantis".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"], "not_found");
        assert_eq!(json["redirect"], "/not-found");
        assert_eq!(json["message"], "Country 'Atlantis' not found");
    }

    #[tokio::test]
    async fn test_bad_request_has_no_redirect() {
        let response = ApiError::BadRequest("name is required".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(json.get("redirect").is_none());
    }
}
