use core::fmt;

use serde::{Deserialize, Serialize};

use crate::quiz::models::QuestionKind;

pub const MIN_QUESTIONS: u8 = 5;
pub const MAX_QUESTIONS: u8 = 50;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Select at least one question type")]
    NoQuestionTypes,

    #[error("Question count must be between 5 and 50, got {0}")]
    QuestionCount(u8),
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    #[serde(rename = "ES")]
    Spanish,
    #[serde(rename = "FR")]
    French,
    #[serde(rename = "EN")]
    English,
}

impl Language {
    pub fn code(&self) -> &str {
        match self {
            Language::Spanish => "ES",
            Language::French => "FR",
            Language::English => "EN",
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Language::Spanish => "Spanish",
            Language::French => "French",
            Language::English => "English",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[serde(alias = "facile")]
    Easy,
    #[serde(alias = "moyen")]
    Medium,
    #[serde(alias = "avance")]
    Advanced,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Advanced => write!(f, "advanced"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct QuestionTypes {
    #[serde(default)]
    pub qcm: bool,
    #[serde(default)]
    pub vf: bool,
    #[serde(default)]
    pub open: bool,
}

impl QuestionTypes {
    pub fn enabled(&self) -> Vec<QuestionKind> {
        [
            (self.qcm, QuestionKind::Qcm),
            (self.vf, QuestionKind::Vf),
            (self.open, QuestionKind::Open),
        ]
        .into_iter()
        .filter_map(|(on, kind)| on.then_some(kind))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        !(self.qcm || self.vf || self.open)
    }
}

impl Default for QuestionTypes {
    fn default() -> Self {
        Self {
            qcm: true,
            vf: true,
            open: false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub num_questions: u8,
    pub source_lang: Language,
    pub target_lang: Language,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub monolingue: bool,
    #[serde(default)]
    pub timer: u32,
    #[serde(default)]
    pub types: QuestionTypes,
}

impl Settings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.types.is_empty() {
            return Err(SettingsError::NoQuestionTypes);
        }

        if !(MIN_QUESTIONS..=MAX_QUESTIONS).contains(&self.num_questions) {
            return Err(SettingsError::QuestionCount(self.num_questions));
        }

        Ok(())
    }

    pub fn timer_enabled(&self) -> bool {
        self.timer > 0
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            num_questions: 10,
            source_lang: Language::Spanish,
            target_lang: Language::French,
            difficulty: Difficulty::Medium,
            monolingue: false,
            timer: 0,
            types: QuestionTypes::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_payload_deserializes() {
        let payload = r#"{
            "numQuestions": 10,
            "sourceLang": "ES",
            "targetLang": "FR",
            "difficulty": "moyen",
            "monolingue": false,
            "timer": 30,
            "types": { "qcm": true, "vf": true, "open": false }
        }"#;

        let settings: Settings = serde_json::from_str(payload).unwrap();

        assert_eq!(settings.difficulty, Difficulty::Medium);
        assert_eq!(settings.source_lang, Language::Spanish);
        assert_eq!(settings.timer, 30);
        assert_eq!(
            settings.types.enabled(),
            vec![QuestionKind::Qcm, QuestionKind::Vf]
        );
    }

    #[test]
    fn no_enabled_types_is_invalid() {
        let settings = Settings {
            types: QuestionTypes {
                qcm: false,
                vf: false,
                open: false,
            },
            ..Settings::default()
        };

        assert_eq!(settings.validate(), Err(SettingsError::NoQuestionTypes));
    }

    #[test]
    fn question_count_bounds() {
        let mut settings = Settings::default();

        settings.num_questions = 4;
        assert_eq!(settings.validate(), Err(SettingsError::QuestionCount(4)));

        settings.num_questions = 5;
        assert!(settings.validate().is_ok());

        settings.num_questions = 50;
        assert!(settings.validate().is_ok());

        settings.num_questions = 51;
        assert!(settings.validate().is_err());
    }
}
