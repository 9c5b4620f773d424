//! Quiz attempt engine.
//!
//! A [`QuizSession`] loads a quiz, records one answer per question, keeps a
//! set of questions flagged for review, counts down the time limit and
//! submits the attempt exactly once. Collaborators (question loading,
//! submission, auto-save) are injected as trait objects from [`api`], and
//! time arrives through an owned [`TickSource`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use chrono::Utc;
//! use courseware_model::{AnswerId, AnswerOption, QuestionId, QuestionSet, QuizId, QuizMetadata, QuizQuestion};
//! use courseware_quiz::{
//!     ManualTicker, QuizSession, ReceiptStatus, SessionPhase, SubmissionApi, SubmissionError,
//!     SubmissionPayload, SubmissionReceipt,
//! };
//!
//! struct Accept;
//!
//! impl SubmissionApi for Accept {
//!     fn submit(&self, _: &SubmissionPayload) -> Result<SubmissionReceipt, SubmissionError> {
//!         Ok(SubmissionReceipt { submission_id: "s-1".into(), status: ReceiptStatus::Submitted })
//!     }
//! }
//!
//! let question = QuestionId::new("q1").unwrap();
//! let answer = AnswerId::new("a").unwrap();
//! let set = QuestionSet {
//!     quiz: QuizMetadata::new(QuizId::new("quiz").unwrap(), "Warm-up", 0),
//!     questions: vec![QuizQuestion {
//!         id: question.clone(),
//!         text: "2 + 2?".into(),
//!         points: 1,
//!         order: 1,
//!         options: vec![AnswerOption { id: answer.clone(), text: "4".into() }],
//!     }],
//! };
//!
//! let mut session = QuizSession::new(Arc::new(Accept), Box::new(ManualTicker::new()));
//! session.start(set, Utc::now()).unwrap();
//! session.select_answer(&question, &answer).unwrap();
//! session.submit().unwrap();
//! assert_eq!(session.phase(), SessionPhase::Submitted);
//! ```

#![deny(unsafe_code)]

pub mod api;
mod attempt;
pub mod autosave;
mod error;
mod session;
mod ticker;

pub use api::{
    AnswerEntry, AnswerSnapshot, AnswerSnapshotSink, QuestionSetLoader, ReceiptStatus,
    SubmissionApi, SubmissionPayload, SubmissionReceipt,
};
pub use attempt::{AttemptState, SubmissionStatus};
pub use autosave::{AnswerTracker, AutoSaveConfig};
pub use error::{AutoSaveError, LoadError, SessionError, SubmissionError};
pub use session::{QuizSession, SessionPhase, TickOutcome};
pub use ticker::{ManualTicker, TickSource, WallClockTicker};
