//! Quiz definitions as delivered by the question-set loader.
//!
//! These types are read-only for the duration of an attempt. The session
//! never edits a question; it only records which option was picked.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{AnswerId, QuestionId, QuizId};

/// One selectable option of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: AnswerId,
    pub text: String,
}

/// A single-select question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: QuestionId,
    pub text: String,
    #[serde(default)]
    pub points: u32,
    /// Display order; lower values come first.
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub options: Vec<AnswerOption>,
}

impl QuizQuestion {
    pub fn has_option(&self, answer_id: &AnswerId) -> bool {
        self.options.iter().any(|option| &option.id == answer_id)
    }

    pub fn option(&self, answer_id: &AnswerId) -> Option<&AnswerOption> {
        self.options.iter().find(|option| &option.id == answer_id)
    }
}

/// Quiz-level metadata that gates whether an attempt may start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizMetadata {
    pub id: QuizId,
    pub title: String,
    pub duration_minutes: u32,
    #[serde(default)]
    pub total_points: u32,
    #[serde(default = "default_published")]
    pub published: bool,
    #[serde(default)]
    pub available_from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub available_until: Option<DateTime<Utc>>,
}

fn default_published() -> bool {
    true
}

/// Result of checking a quiz against its availability window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Open,
    Unpublished,
    NotYetOpen { opens_at: DateTime<Utc> },
    Closed { closed_at: DateTime<Utc> },
}

impl Availability {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }
}

impl QuizMetadata {
    /// A published quiz with no availability window.
    pub fn new(id: QuizId, title: impl Into<String>, duration_minutes: u32) -> Self {
        Self {
            id,
            title: title.into(),
            duration_minutes,
            total_points: 0,
            published: true,
            available_from: None,
            available_until: None,
        }
    }

    /// Total time allotted for one attempt.
    pub fn duration_seconds(&self) -> u64 {
        u64::from(self.duration_minutes) * 60
    }

    /// Check publication status and the availability window at `now`.
    ///
    /// Both window bounds are inclusive.
    pub fn availability_at(&self, now: DateTime<Utc>) -> Availability {
        if !self.published {
            return Availability::Unpublished;
        }
        if let Some(opens_at) = self.available_from
            && now < opens_at
        {
            return Availability::NotYetOpen { opens_at };
        }
        if let Some(closed_at) = self.available_until
            && now > closed_at
        {
            return Availability::Closed { closed_at };
        }
        Availability::Open
    }
}

/// Everything the loader returns for one quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSet {
    pub quiz: QuizMetadata,
    pub questions: Vec<QuizQuestion>,
}

impl QuestionSet {
    /// Questions in ascending `order`, ties kept in supplied order.
    pub fn ordered_questions(&self) -> Vec<QuizQuestion> {
        let mut questions = self.questions.clone();
        questions.sort_by_key(|question| question.order);
        questions
    }

    pub fn points_available(&self) -> u32 {
        self.questions.iter().map(|question| question.points).sum()
    }
}
