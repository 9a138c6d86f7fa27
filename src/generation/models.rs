use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::prompt::models::Settings;

/// Settings only need to be present, the prompt already encodes them.
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateQuizRequest {
    pub prompt: Option<String>,
    pub settings: Option<Value>,
}

impl GenerateQuizRequest {
    pub fn new(prompt: &str, settings: &Settings) -> Self {
        Self {
            prompt: Some(prompt.to_string()),
            settings: serde_json::to_value(settings).ok(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ContentBlock {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct GeneratedContent {
    pub content: Vec<ContentBlock>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct GenerateQuizResponse {
    pub success: bool,
    pub provider: String,
    pub model: String,
    pub data: GeneratedContent,
}

impl GenerateQuizResponse {
    pub fn new(provider: &str, model: &str, text: String) -> Self {
        Self {
            success: true,
            provider: provider.into(),
            model: model.into(),
            data: GeneratedContent {
                content: vec![ContentBlock {
                    text,
                    kind: "text".into(),
                }],
            },
        }
    }

    pub fn first_text(&self) -> Option<&str> {
        self.data.content.first().map(|block| block.text.as_str())
    }
}
