use core::fmt;
use std::{collections::BTreeMap, sync::Arc};

use serde::Serialize;
use tracing::debug;

use crate::quiz::{
    models::{Question, Quiz},
    results::QuizResults,
};

pub const TIME_EXPIRED_MARKER: &str = "Time expired";

/// A submitted answer. `TimeExpired` is the countdown sentinel and can never
/// collide with a value typed or clicked by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Answer {
    Given(String),
    TimeExpired,
}

impl Answer {
    pub fn given(value: impl Into<String>) -> Self {
        Answer::Given(value.into())
    }

    pub fn is_time_expired(&self) -> bool {
        matches!(self, Answer::TimeExpired)
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Answer::Given(value) => write!(f, "{}", value),
            Answer::TimeExpired => write!(f, "{}", TIME_EXPIRED_MARKER),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub answer: Answer,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionPhase {
    Unanswered,
    HintShown,
    Answered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    NextQuestion(usize),
    Finished,
    NotAnswered,
}

/// One attempt at a quiz.
#[derive(Debug, Clone)]
pub struct Session {
    quiz: Arc<Quiz>,
    timer: u32,
    current_index: usize,
    answers: BTreeMap<usize, AnswerRecord>,
    score: usize,
    time_left: u32,
    hint_revealed: bool,
}

impl Session {
    pub fn new(quiz: Arc<Quiz>, timer: u32) -> Self {
        Self {
            quiz,
            timer,
            current_index: 0,
            answers: BTreeMap::new(),
            score: 0,
            time_left: timer,
            hint_revealed: false,
        }
    }

    /// Fresh attempt over the same quiz object.
    pub fn restarted(&self) -> Self {
        Self::new(Arc::clone(&self.quiz), self.timer)
    }

    pub fn quiz(&self) -> &Arc<Quiz> {
        &self.quiz
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> &Question {
        &self.quiz.questions[self.current_index]
    }

    pub fn answers(&self) -> &BTreeMap<usize, AnswerRecord> {
        &self.answers
    }

    pub fn current_answer(&self) -> Option<&AnswerRecord> {
        self.answers.get(&self.current_index)
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn timer(&self) -> u32 {
        self.timer
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn hint_revealed(&self) -> bool {
        self.hint_revealed
    }

    pub fn is_answered(&self) -> bool {
        self.answers.contains_key(&self.current_index)
    }

    pub fn is_last_question(&self) -> bool {
        self.current_index == self.quiz.last_index()
    }

    pub fn phase(&self) -> QuestionPhase {
        match (self.is_answered(), self.hint_revealed) {
            (true, _) => QuestionPhase::Answered,
            (false, true) => QuestionPhase::HintShown,
            (false, false) => QuestionPhase::Unanswered,
        }
    }

    /// Question index the countdown should run for, if any.
    pub fn countdown_target(&self) -> Option<usize> {
        (self.timer > 0 && !self.is_answered()).then_some(self.current_index)
    }

    /// Records the answer for the current question. Returns false when the
    /// question was already answered, in which case nothing changes.
    pub fn submit(&mut self, answer: Answer) -> bool {
        if self.is_answered() {
            return false;
        }

        let is_correct = match &answer {
            Answer::TimeExpired => false,
            Answer::Given(value) => self.current_question().answer_key.is_correct(value),
        };

        debug!(
            "Question {} answered with '{}', correct: {}",
            self.current_index + 1,
            answer,
            is_correct
        );

        self.answers
            .insert(self.current_index, AnswerRecord { answer, is_correct });
        if is_correct {
            self.score += 1;
        }

        true
    }

    pub fn reveal_hint(&mut self) -> bool {
        if self.is_answered() {
            return false;
        }

        self.hint_revealed = true;
        true
    }

    /// One second of countdown for `question`. Ticks aimed at another question,
    /// or arriving after an answer, are stale and ignored.
    pub fn tick(&mut self, question: usize) -> bool {
        if question != self.current_index || self.countdown_target().is_none() {
            return false;
        }

        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            self.submit(Answer::TimeExpired);
        }

        true
    }

    pub fn advance(&mut self) -> AdvanceOutcome {
        if !self.is_answered() {
            return AdvanceOutcome::NotAnswered;
        }

        if self.is_last_question() {
            return AdvanceOutcome::Finished;
        }

        self.current_index += 1;
        self.time_left = self.timer;
        self.hint_revealed = false;

        AdvanceOutcome::NextQuestion(self.current_index)
    }

    pub fn results(&self) -> QuizResults {
        QuizResults::from_session(&self.quiz, &self.answers, self.score)
    }
}
