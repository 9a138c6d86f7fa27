use std::collections::BTreeMap;

use serde::Serialize;

use crate::quiz::{
    models::{QuestionKind, Quiz},
    session::AnswerRecord,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Excellent,
    GoodJob,
    KeepPracticing,
}

impl Verdict {
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            80.. => Verdict::Excellent,
            60..=79 => Verdict::GoodJob,
            _ => Verdict::KeepPracticing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSummary {
    pub index: usize,
    pub kind: QuestionKind,
    pub is_correct: bool,
    pub timed_out: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResults {
    pub title: String,
    pub score: usize,
    pub total: usize,
    pub percentage: u32,
    pub verdict: Verdict,
    pub summary: Vec<QuestionSummary>,
}

impl QuizResults {
    pub fn from_session(quiz: &Quiz, answers: &BTreeMap<usize, AnswerRecord>, score: usize) -> Self {
        let total = quiz.len();
        let percentage = match total {
            0 => 0,
            _ => ((score as f64 / total as f64) * 100.0).round() as u32,
        };

        let summary = quiz
            .questions
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let record = answers.get(&index);
                QuestionSummary {
                    index,
                    kind: question.kind(),
                    is_correct: record.is_some_and(|r| r.is_correct),
                    timed_out: record.is_some_and(|r| r.answer.is_time_expired()),
                }
            })
            .collect();

        Self {
            title: quiz.title.clone(),
            score,
            total,
            percentage,
            verdict: Verdict::from_percentage(percentage),
            summary,
        }
    }

    /// `score/total` as displayed on the results screen.
    pub fn fraction(&self) -> String {
        format!("{}/{}", self.score, self.total)
    }
}
