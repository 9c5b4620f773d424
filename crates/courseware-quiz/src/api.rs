//! Collaborators the session talks to, and the data it hands them.
//!
//! Implementations live with the host (HTTP client, file store, test
//! double). Each receives whatever connection context it needs when it is
//! constructed; the session never supplies credentials.

use courseware_model::{AnswerId, QuestionId, QuestionSet, QuizId};
use serde::{Deserialize, Serialize};

use crate::error::{AutoSaveError, LoadError, SubmissionError};

/// One recorded selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerEntry {
    pub question_id: QuestionId,
    pub answer_id: AnswerId,
}

/// What the submission API receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub quiz_id: QuizId,
    pub answers: Vec<AnswerEntry>,
    pub time_spent_seconds: u64,
}

/// Terminal status reported by the backend for an accepted submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptStatus {
    Submitted,
    Graded,
}

/// What the submission API returns on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub submission_id: String,
    pub status: ReceiptStatus,
}

/// Periodic copy of the learner's progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSnapshot {
    pub quiz_id: QuizId,
    pub answers: Vec<AnswerEntry>,
    pub flagged: Vec<QuestionId>,
    pub remaining_seconds: Option<u64>,
}

/// Fetches a quiz and its questions.
pub trait QuestionSetLoader {
    fn load(&self, quiz_id: &QuizId) -> Result<QuestionSet, LoadError>;
}

/// Sends a finished attempt to the backend.
pub trait SubmissionApi {
    fn submit(&self, payload: &SubmissionPayload) -> Result<SubmissionReceipt, SubmissionError>;
}

/// Receives auto-save snapshots. Best effort: failures are only logged.
pub trait AnswerSnapshotSink {
    fn save(&self, snapshot: &AnswerSnapshot) -> Result<(), AutoSaveError>;
}
