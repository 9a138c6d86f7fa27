use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::{client::groq_client_error::GroqClientError, config::config::GroqConfig};

const SYSTEM_PROMPT: &str =
    "You are an expert at writing bilingual educational quizzes. You only output valid JSON.";
const PING_PROMPT: &str = "Reply with just OK";
const PING_MAX_TOKENS: u32 = 10;
const TEMPERATURE: f32 = 0.7;
const GENERIC_UPSTREAM_ERROR: &str = "Upstream provider request failed";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    fn new(role: &str, content: &str) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorEnvelope {
    error: Option<ProviderError>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    message: Option<String>,
}

/// Stateless gateway to an OpenAI compatible chat completion endpoint.
#[derive(Debug, Clone)]
pub struct GroqClient {
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl GroqClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        max_tokens: u32,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            base_url,
            api_key: api_key.into(),
            model: model.into(),
            max_tokens,
        }
    }

    pub fn from_config(config: &GroqConfig) -> Self {
        Self::new(
            &config.base_url,
            &config.api_key,
            &config.model,
            config.max_tokens,
        )
    }

    pub fn provider(&self) -> &str {
        "groq"
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    /// Returns the first completion's text untouched, no JSON validation happens here.
    pub async fn generate(
        &self,
        client: &Client,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<String, GroqClientError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage::new("system", SYSTEM_PROMPT),
                ChatMessage::new("user", prompt),
            ],
            temperature: Some(TEMPERATURE),
            max_tokens,
        };

        self.send_completion(client, &request).await
    }

    pub async fn ping(&self, client: &Client) -> Result<String, GroqClientError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage::new("user", PING_PROMPT)],
            temperature: None,
            max_tokens: PING_MAX_TOKENS,
        };

        self.send_completion(client, &request).await
    }

    async fn send_completion(
        &self,
        client: &Client,
        request: &ChatCompletionRequest<'_>,
    ) -> Result<String, GroqClientError> {
        let url = format!("{}/chat/completions", self.base_url);
        info!("GroqClient sending completion request to: {}", url);

        let response = client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ProviderErrorEnvelope>(&body)
                .ok()
                .and_then(|envelope| envelope.error)
                .and_then(|error| error.message)
                .unwrap_or_else(|| GENERIC_UPSTREAM_ERROR.to_string());

            error!("GroqClient request failed: {} - {}", status, message);
            return Err(GroqClientError::Upstream(status, message));
        }

        let completion = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| GroqClientError::MalformedResponse(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| GroqClientError::MalformedResponse("response has no choices".into()))
    }
}
