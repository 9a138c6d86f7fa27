use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State, rejection::JsonRejection},
    response::IntoResponse,
    routing::post,
};
use reqwest::StatusCode;
use tracing::{debug, info};

use crate::{
    generation::models::{GenerateQuizRequest, GenerateQuizResponse},
    prompt::models::Settings,
    server::{app_state::AppState, error::ServerError},
};

pub fn generation_routes(state: Arc<AppState>) -> Router {
    let body_limit = state.get_max_json_bytes();

    Router::new()
        .route("/api/generate-quiz", post(generate_quiz))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

async fn generate_quiz(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateQuizRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServerError> {
    let Json(request) = payload?;
    let Some(prompt) = request.prompt.filter(|p| !p.trim().is_empty()) else {
        return Err(ServerError::MissingField("prompt"));
    };
    let Some(settings) = request.settings else {
        return Err(ServerError::MissingField("settings"));
    };

    match serde_json::from_value::<Settings>(settings) {
        Ok(settings) => info!(
            "Generating quiz: {} questions, difficulty {}",
            settings.num_questions, settings.difficulty
        ),
        Err(e) => {
            info!("Generating quiz");
            debug!("Settings passed through as sent: {}", e);
        }
    }

    let groq = state.get_groq_client();
    let text = groq
        .generate(state.get_client(), &prompt, groq.max_tokens())
        .await?;

    info!("Quiz generated ({} characters)", text.len());
    let response = GenerateQuizResponse::new(groq.provider(), groq.model(), text);

    Ok((StatusCode::OK, Json(response)))
}
