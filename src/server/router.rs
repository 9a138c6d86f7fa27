use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware::from_fn,
};
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer};
use tracing::warn;

use crate::{
    config::config::CorsConfig, generation::handlers::generation_routes,
    health::handlers::health_routes, ingest::handlers::ingest_routes, mw::request_mw::request_mw,
    server::app_state::AppState,
};

pub fn app_router(state: Arc<AppState>, cors: &CorsConfig) -> Router {
    Router::new()
        .merge(health_routes(state.clone()))
        .merge(ingest_routes(state.clone()))
        .merge(generation_routes(state))
        .layer(from_fn(request_mw))
        .layer(cors_layer(cors))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
}

fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = cors
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Skipping invalid allowed origin {}: {}", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}
