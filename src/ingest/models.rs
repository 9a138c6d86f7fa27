use core::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ingest::error::IngestError;

pub const ACCEPTED_EXTENSIONS: [&str; 5] = ["txt", "md", "pdf", "docx", "json"];

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Text,
    Markdown,
    Pdf,
    Docx,
    Json,
}

impl DocumentKind {
    pub fn from_file_name(file_name: &str) -> Result<Self, IngestError> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "txt" => Ok(DocumentKind::Text),
            "md" => Ok(DocumentKind::Markdown),
            "pdf" => Ok(DocumentKind::Pdf),
            "docx" => Ok(DocumentKind::Docx),
            "json" => Ok(DocumentKind::Json),
            _ => Err(IngestError::Validation(format!(
                "Unsupported file type '{}', accepted: .{}",
                file_name,
                ACCEPTED_EXTENSIONS.join(", .")
            ))),
        }
    }

    pub fn extension(&self) -> &str {
        match self {
            DocumentKind::Text => "txt",
            DocumentKind::Markdown => "md",
            DocumentKind::Pdf => "pdf",
            DocumentKind::Docx => "docx",
            DocumentKind::Json => "json",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, ".{}", self.extension())
    }
}

#[derive(Debug, Clone)]
pub enum IngestSource {
    Pasted(String),
    Upload { file_name: String, bytes: Vec<u8> },
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Upload,
    Paste,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMeta {
    pub length: usize,
    pub word_count: usize,
    pub estimated_questions: usize,
    pub source: SourceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct IngestedDocument {
    pub text: String,
    pub meta: DocumentMeta,
}

#[derive(Debug, Serialize)]
pub struct ParseResponse {
    pub ok: bool,
    pub text: String,
    pub meta: DocumentMeta,
}

impl From<IngestedDocument> for ParseResponse {
    fn from(document: IngestedDocument) -> Self {
        Self {
            ok: true,
            text: document.text,
            meta: document.meta,
        }
    }
}
