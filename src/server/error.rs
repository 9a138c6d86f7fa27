use axum::{
    Json,
    extract::{multipart::MultipartError, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use reqwest::StatusCode;
use serde_json::json;
use tracing::error;

use crate::{client::groq_client_error::GroqClientError, ingest::error::IngestError};

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("Failed to read upload: {0}")]
    Multipart(#[from] MultipartError),

    #[error(transparent)]
    Upstream(#[from] GroqClientError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match self {
            ServerError::Ingest(e) => {
                let status = match e.is_client_error() {
                    true => StatusCode::BAD_REQUEST,
                    false => StatusCode::INTERNAL_SERVER_ERROR,
                };
                let details = match &e {
                    IngestError::TooShort { length, minimum } => {
                        Some(json!({ "length": length, "minimum": minimum }))
                    }
                    _ => None,
                };
                let mut body = json!({ "ok": false, "error": e.to_string(), "kind": e.kind() });
                if let Some(details) = details {
                    body["details"] = details;
                }

                (status, Json(body)).into_response()
            }
            ServerError::Multipart(e) => {
                let body = json!({
                    "ok": false,
                    "error": "Failed to read upload",
                    "kind": "validation_error",
                    "details": e.body_text(),
                });

                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            ServerError::MissingField(field) => {
                let body = json!({
                    "error": "Missing data",
                    "message": format!("Missing required field: {}", field),
                });

                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            ServerError::InvalidBody(e) => {
                let status = match e.status() {
                    StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
                    _ => StatusCode::BAD_REQUEST,
                };
                let body = json!({
                    "error": "Invalid request",
                    "message": e.body_text(),
                });

                (status, Json(body)).into_response()
            }
            ServerError::Upstream(e) => {
                error!("Upstream failure: {}", e);
                let body = json!({
                    "error": "Quiz generation failed",
                    "message": e.to_string(),
                    "kind": "upstream_error",
                    "retryable": true,
                });

                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
            ServerError::Internal(message) => {
                error!("Internal server error: {}", message);
                let body = json!({
                    "ok": false,
                    "error": "Internal server error",
                    "message": message,
                });

                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}
