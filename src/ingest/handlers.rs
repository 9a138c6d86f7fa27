use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    response::IntoResponse,
    routing::post,
};
use reqwest::StatusCode;
use tracing::{info, warn};

use crate::{
    ingest::{
        error::IngestError,
        models::{IngestSource, ParseResponse},
    },
    server::{app_state::AppState, error::ServerError},
};

// Room for multipart boundaries and headers on top of the file ceiling.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn ingest_routes(state: Arc<AppState>) -> Router {
    let body_limit = state.get_ingestor().max_file_bytes() as usize + MULTIPART_OVERHEAD;

    Router::new()
        .route("/api/parse", post(parse_document))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

async fn parse_document(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ServerError> {
    let source = read_source(&mut multipart).await?;
    let ingestor = state.get_ingestor().clone();

    let document = tokio::task::spawn_blocking(move || ingestor.ingest(source))
        .await
        .map_err(|e| ServerError::Internal(format!("Ingestion task failed: {}", e)))??;

    if let Some(warning) = &document.meta.warning {
        warn!("Document ingested with warning: {}", warning);
    }
    info!(
        "Document ingested: {} characters, {} words",
        document.meta.length, document.meta.word_count
    );

    Ok((StatusCode::OK, Json(ParseResponse::from(document))))
}

async fn read_source(multipart: &mut Multipart) -> Result<IngestSource, ServerError> {
    let mut pasted: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let bytes = field.bytes().await?;
                return Ok(IngestSource::Upload {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
            "text" => pasted = Some(field.text().await?),
            other => warn!("Ignoring unexpected multipart field: {}", other),
        }
    }

    pasted.map(IngestSource::Pasted).ok_or_else(|| {
        ServerError::Ingest(IngestError::Validation(
            "Request must contain a 'file' or 'text' field".into(),
        ))
    })
}
