use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub parse: String,
    pub generate: String,
    pub test: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct StatusEnvelope {
    pub status: String,
    pub message: String,
    pub version: String,
    pub provider: String,
    pub features: Vec<String>,
    pub endpoints: Endpoints,
}

impl StatusEnvelope {
    pub fn ok(provider: &str) -> Self {
        Self {
            status: "ok".into(),
            message: "Bilingual quiz generation API".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            provider: provider.into(),
            features: vec![
                "document-parsing".into(),
                "pdf".into(),
                "docx".into(),
                "quiz-generation".into(),
                "bilingual".into(),
            ],
            endpoints: Endpoints {
                parse: "POST /api/parse".into(),
                generate: "POST /api/generate-quiz".into(),
                test: "GET /api/test".into(),
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ProviderCheck {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
