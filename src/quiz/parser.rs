use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::quiz::models::Quiz;

// Greedy: first '{' up to the last '}' in the text.
static JSON_OBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("JSON object pattern is valid"));

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QuizFormatError {
    #[error("Invalid quiz format: {0}")]
    InvalidFormat(String),

    #[error("No questions were generated")]
    EmptyQuiz,
}

impl QuizFormatError {
    pub fn kind(&self) -> &'static str {
        match self {
            QuizFormatError::InvalidFormat(_) => "invalid_format_error",
            QuizFormatError::EmptyQuiz => "empty_quiz_error",
        }
    }
}

/// Pulls the quiz object out of free-form model output and validates every question.
/// A single malformed question rejects the whole quiz.
pub fn parse_quiz_text(raw: &str) -> Result<Quiz, QuizFormatError> {
    let Some(candidate) = JSON_OBJECT.find(raw) else {
        warn!("Generated text contains no JSON object");
        return Err(QuizFormatError::InvalidFormat(
            "no JSON object found in generated text".into(),
        ));
    };

    let value: Value = serde_json::from_str(candidate.as_str())
        .map_err(|e| QuizFormatError::InvalidFormat(e.to_string()))?;

    match value.get("questions") {
        None | Some(Value::Null) => return Err(QuizFormatError::EmptyQuiz),
        Some(Value::Array(questions)) if questions.is_empty() => {
            return Err(QuizFormatError::EmptyQuiz);
        }
        _ => {}
    }

    let quiz: Quiz = serde_json::from_value(value)
        .map_err(|e| QuizFormatError::InvalidFormat(e.to_string()))?;

    for (idx, question) in quiz.questions.iter().enumerate() {
        question.validate().map_err(|reason| {
            QuizFormatError::InvalidFormat(format!("question {}: {}", idx + 1, reason))
        })?;
    }

    debug!(
        "Parsed quiz '{}' with {} questions",
        quiz.title,
        quiz.questions.len()
    );

    Ok(quiz)
}
