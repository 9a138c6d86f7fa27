use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    prompt::models::Settings,
    quiz::{
        parser::parse_quiz_text,
        results::QuizResults,
        session::{AdvanceOutcome, Answer, Session},
    },
};

#[derive(Debug, Clone)]
pub enum QuizState {
    Upload { error: Option<String> },
    Generating { settings: Settings },
    Quiz(Session),
    Results(Session),
}

#[derive(Debug, Clone)]
pub enum QuizEvent {
    GenerationRequested(Settings),
    GenerationRejected(String),
    GenerationSucceeded(String),
    GenerationFailed(String),
    Submit(Answer),
    Tick { question: usize },
    RevealHint,
    Advance,
    Restart,
    Reset,
}

impl Default for QuizState {
    fn default() -> Self {
        QuizState::Upload { error: None }
    }
}

impl QuizState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            QuizState::Quiz(session) | QuizState::Results(session) => Some(session),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            QuizState::Upload { error } => error.as_deref(),
            _ => None,
        }
    }

    pub fn is_generating(&self) -> bool {
        matches!(self, QuizState::Generating { .. })
    }

    pub fn results(&self) -> Option<QuizResults> {
        match self {
            QuizState::Results(session) => Some(session.results()),
            _ => None,
        }
    }

    /// Question the countdown must run for. `None` means no countdown may be live.
    pub fn countdown_target(&self) -> Option<usize> {
        match self {
            QuizState::Quiz(session) => session.countdown_target(),
            _ => None,
        }
    }

    fn upload_error(message: impl Into<String>) -> Self {
        QuizState::Upload {
            error: Some(message.into()),
        }
    }
}

/// Applies one event. Events that are not valid for the current state leave it unchanged.
pub fn reduce(state: QuizState, event: QuizEvent) -> QuizState {
    match (state, event) {
        (QuizState::Upload { .. }, QuizEvent::GenerationRequested(settings)) => {
            match settings.validate() {
                Ok(()) => QuizState::Generating { settings },
                Err(e) => QuizState::upload_error(e.to_string()),
            }
        }

        (QuizState::Upload { .. }, QuizEvent::GenerationRejected(message)) => {
            QuizState::upload_error(message)
        }

        (QuizState::Generating { settings }, QuizEvent::GenerationSucceeded(raw)) => {
            match parse_quiz_text(&raw) {
                Ok(quiz) => {
                    info!("Starting quiz '{}' ({} questions)", quiz.title, quiz.len());
                    QuizState::Quiz(Session::new(Arc::new(quiz), settings.timer))
                }
                Err(e) => {
                    warn!("Generated quiz rejected: {}", e);
                    QuizState::upload_error(e.to_string())
                }
            }
        }

        (QuizState::Generating { .. }, QuizEvent::GenerationFailed(message)) => {
            warn!("Quiz generation failed: {}", message);
            QuizState::upload_error(message)
        }

        (QuizState::Quiz(mut session), QuizEvent::Submit(answer)) => {
            session.submit(answer);
            QuizState::Quiz(session)
        }

        (QuizState::Quiz(mut session), QuizEvent::Tick { question }) => {
            session.tick(question);
            QuizState::Quiz(session)
        }

        (QuizState::Quiz(mut session), QuizEvent::RevealHint) => {
            session.reveal_hint();
            QuizState::Quiz(session)
        }

        (QuizState::Quiz(mut session), QuizEvent::Advance) => match session.advance() {
            AdvanceOutcome::Finished => {
                info!("Quiz finished with score {}/{}", session.score(), session.quiz().len());
                QuizState::Results(session)
            }
            AdvanceOutcome::NextQuestion(_) | AdvanceOutcome::NotAnswered => {
                QuizState::Quiz(session)
            }
        },

        (QuizState::Results(session), QuizEvent::Restart) => QuizState::Quiz(session.restarted()),

        (QuizState::Results(_) | QuizState::Upload { .. }, QuizEvent::Reset) => QuizState::default(),

        (state, _) => state,
    }
}
