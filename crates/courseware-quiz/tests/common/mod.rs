//! Fixtures and collaborator doubles shared by the session tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use courseware_model::{
    AnswerId, AnswerOption, QuestionId, QuestionSet, QuizId, QuizMetadata, QuizQuestion,
};
use courseware_quiz::{
    AnswerSnapshot, AnswerSnapshotSink, AutoSaveConfig, AutoSaveError, LoadError, ManualTicker,
    QuestionSetLoader, QuizSession, ReceiptStatus, SubmissionApi, SubmissionError,
    SubmissionPayload, SubmissionReceipt,
};

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

pub fn qid(value: &str) -> QuestionId {
    QuestionId::new(value).unwrap()
}

pub fn aid(value: &str) -> AnswerId {
    AnswerId::new(value).unwrap()
}

fn question(id: &str, order: i32, options: &[&str]) -> QuizQuestion {
    QuizQuestion {
        id: qid(id),
        text: format!("Question {id}"),
        points: 1,
        order,
        options: options
            .iter()
            .map(|option| AnswerOption {
                id: aid(option),
                text: option.to_uppercase(),
            })
            .collect(),
    }
}

/// Three questions supplied out of order: q2, q1, q3 once sorted.
pub fn question_set(duration_minutes: u32) -> QuestionSet {
    QuestionSet {
        quiz: QuizMetadata::new(QuizId::new("quiz-1").unwrap(), "Unit 1 check", duration_minutes),
        questions: vec![
            question("q1", 2, &["a", "b"]),
            question("q2", 1, &["a", "c"]),
            question("q3", 3, &["x", "y"]),
        ],
    }
}

/// Submission API that records payloads and replays queued responses.
///
/// Accepts everything once the queue is empty.
#[derive(Default)]
pub struct RecordingSubmitter {
    pub payloads: Mutex<Vec<SubmissionPayload>>,
    responses: Mutex<VecDeque<Result<SubmissionReceipt, SubmissionError>>>,
}

impl RecordingSubmitter {
    pub fn failing_with(errors: Vec<SubmissionError>) -> Self {
        Self {
            payloads: Mutex::default(),
            responses: Mutex::new(errors.into_iter().map(Err).collect()),
        }
    }

    pub fn calls(&self) -> usize {
        self.payloads.lock().unwrap().len()
    }

    pub fn last_payload(&self) -> Option<SubmissionPayload> {
        self.payloads.lock().unwrap().last().cloned()
    }
}

impl SubmissionApi for RecordingSubmitter {
    fn submit(&self, payload: &SubmissionPayload) -> Result<SubmissionReceipt, SubmissionError> {
        let mut payloads = self.payloads.lock().unwrap();
        payloads.push(payload.clone());
        let call = payloads.len();
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(SubmissionReceipt {
                    submission_id: format!("sub-{call}"),
                    status: ReceiptStatus::Submitted,
                })
            })
    }
}

pub struct FixedLoader(pub Result<QuestionSet, LoadError>);

impl QuestionSetLoader for FixedLoader {
    fn load(&self, _quiz_id: &QuizId) -> Result<QuestionSet, LoadError> {
        self.0.clone()
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub snapshots: Mutex<Vec<AnswerSnapshot>>,
    pub fail: bool,
}

impl RecordingSink {
    pub fn failing() -> Self {
        Self {
            snapshots: Mutex::default(),
            fail: true,
        }
    }

    pub fn calls(&self) -> usize {
        self.snapshots.lock().unwrap().len()
    }
}

impl AnswerSnapshotSink for RecordingSink {
    fn save(&self, snapshot: &AnswerSnapshot) -> Result<(), AutoSaveError> {
        self.snapshots.lock().unwrap().push(snapshot.clone());
        if self.fail {
            Err(AutoSaveError::new("disk full"))
        } else {
            Ok(())
        }
    }
}

/// A started session plus handles to its ticker and submission API.
pub struct Harness {
    pub session: QuizSession,
    pub ticker: ManualTicker,
    pub submitter: Arc<RecordingSubmitter>,
}

pub fn started(duration_minutes: u32) -> Harness {
    started_with(duration_minutes, RecordingSubmitter::default())
}

pub fn started_with(duration_minutes: u32, submitter: RecordingSubmitter) -> Harness {
    let mut harness = unstarted(submitter);
    harness
        .session
        .start(question_set(duration_minutes), now())
        .unwrap();
    harness
}

pub fn unstarted(submitter: RecordingSubmitter) -> Harness {
    let ticker = ManualTicker::new();
    let submitter = Arc::new(submitter);
    let api: Arc<dyn SubmissionApi> = submitter.clone();
    let session = QuizSession::new(api, Box::new(ticker.clone()));
    Harness {
        session,
        ticker,
        submitter,
    }
}

/// An unstarted session that auto-saves into `sink`.
pub fn with_autosave(sink: Arc<RecordingSink>, config: AutoSaveConfig) -> Harness {
    let Harness {
        session,
        ticker,
        submitter,
    } = unstarted(RecordingSubmitter::default());
    Harness {
        session: session.with_autosave(sink, config),
        ticker,
        submitter,
    }
}
