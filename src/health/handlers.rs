use std::sync::Arc;

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use reqwest::StatusCode;
use tracing::{error, info};

use crate::{
    health::models::{ProviderCheck, StatusEnvelope},
    server::app_state::AppState,
};

pub fn health_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(status))
        .route("/api/test", get(provider_check))
        .with_state(state)
}

async fn status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let envelope = StatusEnvelope::ok(state.get_groq_client().provider());
    (StatusCode::OK, Json(envelope))
}

async fn provider_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.get_groq_client().ping(state.get_client()).await {
        Ok(reply) => {
            info!("Upstream provider is healthy");
            let check = ProviderCheck {
                success: true,
                response: Some(reply),
                error: None,
            };
            (StatusCode::OK, Json(check))
        }
        Err(e) => {
            error!("Failed upstream provider check: {}", e);
            let check = ProviderCheck {
                success: false,
                response: None,
                error: Some(e.to_string()),
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(check))
        }
    }
}
