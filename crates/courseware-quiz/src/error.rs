//! Quiz session error types.
//!
//! Every failure resolves the session to a defined phase. Load errors leave
//! the session in `Error`; submission errors return it to `Active` so the
//! learner can retry. Each error carries a message suitable for display.

use chrono::{DateTime, Utc};
use courseware_model::{AnswerId, QuestionId, QuizId};
use thiserror::Error;

use crate::session::SessionPhase;

/// Why a quiz could not be started.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("quiz {quiz_id} not found")]
    NotFound { quiz_id: QuizId },

    #[error("quiz is not published")]
    Unpublished,

    #[error("quiz opens at {opens_at}")]
    NotYetOpen { opens_at: DateTime<Utc> },

    #[error("quiz closed at {closed_at}")]
    Closed { closed_at: DateTime<Utc> },

    #[error("quiz has no questions")]
    EmptyQuestionSet,

    #[error("question set is malformed: {message}")]
    Malformed { message: String },

    #[error("question service unavailable: {message}")]
    Unavailable { message: String },
}

impl LoadError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { .. } => "This quiz could not be found.".to_string(),
            Self::Unpublished => "This quiz has not been published yet.".to_string(),
            Self::NotYetOpen { opens_at } => {
                format!("This quiz is not open yet. It opens at {}.", opens_at.format("%Y-%m-%d %H:%M UTC"))
            }
            Self::Closed { closed_at } => {
                format!("This quiz closed at {}.", closed_at.format("%Y-%m-%d %H:%M UTC"))
            }
            Self::EmptyQuestionSet => "This quiz does not contain any questions.".to_string(),
            Self::Malformed { .. } => "The quiz data could not be read.".to_string(),
            Self::Unavailable { .. } => {
                "The quiz could not be loaded. Check your connection.".to_string()
            }
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::NotYetOpen { .. } => Some("Come back once the quiz opens.".into()),
            Self::Unavailable { .. } => Some("Reload the quiz to try again.".into()),
            Self::Malformed { .. } => Some("Ask your instructor to check the quiz.".into()),
            _ => None,
        }
    }
}

/// Failure reported by the submission collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("network error: {message}")]
    Network { message: String },

    #[error("submission rejected: {message}")]
    Validation { message: String },

    #[error("not authorized: {message}")]
    Unauthorized { message: String },
}

impl SubmissionError {
    /// Get a user-friendly message for this error.
    ///
    /// The server's own message is shown for validation failures.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network { .. } => {
                "Your answers could not be sent. Check your connection and submit again."
                    .to_string()
            }
            Self::Validation { message } => message.clone(),
            Self::Unauthorized { .. } => {
                "Your session has expired. Sign in again, then submit.".to_string()
            }
        }
    }
}

/// Failure reported by the auto-save collaborator.
#[derive(Debug, Error)]
#[error("auto-save failed: {message}")]
pub struct AutoSaveError {
    pub message: String,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AutoSaveError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// A command the session refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("session is {phase}, not active")]
    NotActive { phase: SessionPhase },

    #[error("session has already been loaded (now {phase})")]
    AlreadyLoaded { phase: SessionPhase },

    #[error("a submission is already in flight")]
    SubmissionInFlight,

    #[error("quiz has already been submitted")]
    AlreadySubmitted,

    #[error("no submission is in flight")]
    NotSubmitting,

    #[error("unknown question: {0}")]
    UnknownQuestion(QuestionId),

    #[error("answer {answer} is not an option of question {question}")]
    UnknownAnswer {
        question: QuestionId,
        answer: AnswerId,
    },

    #[error("could not start quiz: {0}")]
    Load(#[from] LoadError),

    #[error("submission failed: {0}")]
    Submission(#[from] SubmissionError),
}

impl SessionError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Load(error) => error.user_message(),
            Self::Submission(error) => error.user_message(),
            Self::SubmissionInFlight => "Your answers are being submitted.".to_string(),
            Self::AlreadySubmitted | Self::NotActive { phase: SessionPhase::Submitted } => {
                "This attempt has already been submitted.".to_string()
            }
            other => other.to_string(),
        }
    }
}
