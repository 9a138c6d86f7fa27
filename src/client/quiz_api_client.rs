use std::time::Duration;

use reqwest::{
    Client, StatusCode,
    multipart::{Form, Part},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, error, info};

use crate::{
    generation::models::{GenerateQuizRequest, GenerateQuizResponse},
    health::models::StatusEnvelope,
    ingest::models::IngestedDocument,
    prompt::models::Settings,
};

pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(90);
pub const DEFAULT_STATUS_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_STATUS_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("The request timed out, please try again")]
    Timeout,

    #[error("Http request failed: {0}")]
    Http(reqwest::Error),

    #[error("Api error: {0} - {1}")]
    ApiError(StatusCode, String),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl From<reqwest::Error> for ApiClientError {
    fn from(e: reqwest::Error) -> Self {
        match e.is_timeout() {
            true => ApiClientError::Timeout,
            false => ApiClientError::Http(e),
        }
    }
}

impl ApiClientError {
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiClientError::Timeout | ApiClientError::Http(_) => true,
            ApiClientError::ApiError(status, _) => status.is_server_error(),
            ApiClientError::UnexpectedResponse(_) => false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendStatus {
    Checking,
    Online,
    Offline,
}

/// Typed client for the quiz backend, used by front ends driving a [`crate::quiz::runner::QuizRunner`].
#[derive(Debug, Clone)]
pub struct QuizApiClient {
    base_url: String,
    client: Client,
    generation_timeout: Duration,
    status_timeout: Duration,
}

impl QuizApiClient {
    pub fn new(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            base_url,
            client,
            generation_timeout: DEFAULT_GENERATION_TIMEOUT,
            status_timeout: DEFAULT_STATUS_TIMEOUT,
        }
    }

    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }

    pub fn with_status_timeout(mut self, timeout: Duration) -> Self {
        self.status_timeout = timeout;
        self
    }

    pub async fn status(&self) -> Result<StatusEnvelope, ApiClientError> {
        let response = self
            .client
            .get(format!("{}/", self.base_url))
            .timeout(self.status_timeout)
            .send()
            .await?;

        Self::read_json(response).await
    }

    pub async fn check_status(&self) -> BackendStatus {
        match self.status().await {
            Ok(_) => BackendStatus::Online,
            Err(e) => {
                debug!("Backend status check failed: {}", e);
                BackendStatus::Offline
            }
        }
    }

    /// Polls the backend on a fixed interval. Independent of any generation call.
    pub fn spawn_status_monitor(
        &self,
        period: Duration,
    ) -> (watch::Receiver<BackendStatus>, JoinHandle<()>) {
        let (tx, rx) = watch::channel(BackendStatus::Checking);
        let api = self.clone();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                let status = api.check_status().await;
                if tx.send(status).is_err() {
                    break;
                }
            }
        });

        (rx, handle)
    }

    pub async fn parse_text(&self, text: &str) -> Result<IngestedDocument, ApiClientError> {
        let form = Form::new().text("text", text.to_string());
        self.send_parse(form).await
    }

    pub async fn parse_file(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<IngestedDocument, ApiClientError> {
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part("file", part);
        self.send_parse(form).await
    }

    /// Returns the raw generated text; parsing it into a quiz is the caller's job.
    pub async fn generate_quiz(
        &self,
        prompt: &str,
        settings: &Settings,
    ) -> Result<String, ApiClientError> {
        let request = GenerateQuizRequest::new(prompt, settings);

        info!("QuizApiClient requesting generation");
        let response = self
            .client
            .post(format!("{}/api/generate-quiz", self.base_url))
            .timeout(self.generation_timeout)
            .json(&request)
            .send()
            .await?;

        let generated: GenerateQuizResponse = Self::read_json(response).await?;
        generated
            .first_text()
            .map(|text| text.to_string())
            .ok_or_else(|| ApiClientError::UnexpectedResponse("no generated content".into()))
    }

    async fn send_parse(&self, form: Form) -> Result<IngestedDocument, ApiClientError> {
        let response = self
            .client
            .post(format!("{}/api/parse", self.base_url))
            .multipart(form)
            .send()
            .await?;

        Self::read_json(response).await
    }

    async fn read_json<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
    ) -> Result<T, ApiClientError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = error_message(&body).unwrap_or(body);
            error!("QuizApiClient request failed: {} - {}", status, message);
            return Err(ApiClientError::ApiError(status, message));
        }

        serde_json::from_str(&body).map_err(|e| ApiClientError::UnexpectedResponse(e.to_string()))
    }
}

/// Picks the human readable message out of the backend's error envelopes.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(key).and_then(|v| v.as_str()).map(|s| s.to_string()))
}
