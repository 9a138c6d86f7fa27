use core::fmt;

use serde::{Deserialize, Serialize};

pub const QCM_OPTION_COUNT: usize = 3;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Qcm,
    Vf,
    Open,
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuestionKind::Qcm => write!(f, "qcm"),
            QuestionKind::Vf => write!(f, "vf"),
            QuestionKind::Open => write!(f, "open"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum QuestionId {
    Number(u64),
    Text(String),
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum OptionLabel {
    A,
    B,
    C,
}

impl OptionLabel {
    pub const ALL: [OptionLabel; QCM_OPTION_COUNT] = [OptionLabel::A, OptionLabel::B, OptionLabel::C];

    pub fn as_str(&self) -> &'static str {
        match self {
            OptionLabel::A => "A",
            OptionLabel::B => "B",
            OptionLabel::C => "C",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum TruthValue {
    Verdadero,
    Falso,
}

impl TruthValue {
    pub fn as_str(&self) -> &'static str {
        match self {
            TruthValue::Verdadero => "Verdadero",
            TruthValue::Falso => "Falso",
        }
    }
}

/// Type specific part of a question, tagged by the `type` field.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AnswerKey {
    Qcm {
        options: Vec<String>,
        correct: OptionLabel,
    },
    Vf {
        correct: TruthValue,
    },
    Open,
}

impl AnswerKey {
    pub fn kind(&self) -> QuestionKind {
        match self {
            AnswerKey::Qcm { .. } => QuestionKind::Qcm,
            AnswerKey::Vf { .. } => QuestionKind::Vf,
            AnswerKey::Open => QuestionKind::Open,
        }
    }

    pub fn is_correct(&self, value: &str) -> bool {
        match self {
            AnswerKey::Qcm { correct, .. } => value == correct.as_str(),
            AnswerKey::Vf { correct } => value == correct.as_str(),
            AnswerKey::Open => true,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: QuestionId,
    pub question: String,
    pub explanation: String,
    #[serde(default)]
    pub hint: Option<String>,
    #[serde(flatten)]
    pub answer_key: AnswerKey,
}

impl Question {
    pub fn kind(&self) -> QuestionKind {
        self.answer_key.kind()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.question.trim().is_empty() {
            return Err("question text is empty".into());
        }

        if let AnswerKey::Qcm { options, .. } = &self.answer_key {
            if options.len() != QCM_OPTION_COUNT {
                return Err(format!(
                    "expected {} options, got {}",
                    QCM_OPTION_COUNT,
                    options.len()
                ));
            }

            for (option, label) in options.iter().zip(OptionLabel::ALL) {
                let prefix = format!("{}.", label.as_str());
                if !option.trim_start().starts_with(&prefix) {
                    return Err(format!("option '{}' is not labelled '{}'", option, prefix));
                }
            }
        }

        Ok(())
    }
}

fn default_title() -> String {
    "Quiz".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Quiz {
    #[serde(default = "default_title")]
    pub title: String,
    pub questions: Vec<Question>,
}

impl Quiz {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.questions.len().saturating_sub(1)
    }
}
