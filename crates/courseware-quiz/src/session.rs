//! The quiz attempt state machine.
//!
//! ```text
//! Loading ──load ok──▶ Active ──submit──▶ Submitting ──ok──▶ Submitted
//!    │                   ▲                    │
//!    └──load error──▶ Error                   └──error──▶ Active (retry allowed)
//! ```
//!
//! `Active -> Submitting` is also taken automatically, exactly once, when
//! the countdown reaches zero.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use courseware_model::{
    AnswerId, Availability, QuestionId, QuestionSet, QuizId, QuizMetadata, QuizQuestion,
};

use crate::api::{
    AnswerEntry, AnswerSnapshot, AnswerSnapshotSink, QuestionSetLoader, SubmissionApi,
    SubmissionPayload, SubmissionReceipt,
};
use crate::attempt::{AttemptState, SubmissionStatus};
use crate::autosave::{AnswerTracker, AutoSaveConfig};
use crate::error::{LoadError, SessionError, SubmissionError};
use crate::ticker::TickSource;

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    Loading,
    Active,
    Submitting,
    Submitted,
    /// Terminal: the quiz could not be started.
    Error,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Loading => "loading",
            Self::Active => "active",
            Self::Submitting => "submitting",
            Self::Submitted => "submitted",
            Self::Error => "error",
        })
    }
}

/// What a single timer tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The session was not active; nothing changed.
    Ignored,
    /// One second was counted.
    Counted { remaining_seconds: Option<u64> },
    /// The countdown reached zero and submission was forced.
    Expired { submitted: bool },
}

struct AutoSave {
    sink: Arc<dyn AnswerSnapshotSink>,
    config: AutoSaveConfig,
    tracker: AnswerTracker,
}

/// One learner's run through a quiz.
///
/// Owned by a single host view. All commands are synchronous; the only
/// autonomous input is the owned [`TickSource`], polled via
/// [`QuizSession::pump_timer`].
pub struct QuizSession {
    phase: SessionPhase,
    quiz: Option<QuizMetadata>,
    questions: Vec<QuizQuestion>,
    attempt: AttemptState,
    time_limit: Option<u64>,
    ticker: Box<dyn TickSource>,
    submitter: Arc<dyn SubmissionApi>,
    autosave: Option<AutoSave>,
    auto_submitted: bool,
    last_error: Option<String>,
    receipt: Option<SubmissionReceipt>,
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("phase", &self.phase)
            .field("quiz", &self.quiz.as_ref().map(|quiz| &quiz.id))
            .field("questions", &self.questions.len())
            .field("attempt", &self.attempt)
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}

impl QuizSession {
    /// Create a session in `Loading`.
    pub fn new(submitter: Arc<dyn SubmissionApi>, ticker: Box<dyn TickSource>) -> Self {
        Self {
            phase: SessionPhase::Loading,
            quiz: None,
            questions: Vec::new(),
            attempt: AttemptState::default(),
            time_limit: None,
            ticker,
            submitter,
            autosave: None,
            auto_submitted: false,
            last_error: None,
            receipt: None,
        }
    }

    /// Periodically hand answer snapshots to `sink` while active.
    #[must_use]
    pub fn with_autosave(mut self, sink: Arc<dyn AnswerSnapshotSink>, config: AutoSaveConfig) -> Self {
        self.autosave = Some(AutoSave {
            sink,
            config,
            tracker: AnswerTracker::new(),
        });
        self
    }

    /// Fetch the question set and start the attempt.
    pub fn load(
        &mut self,
        loader: &dyn QuestionSetLoader,
        quiz_id: &QuizId,
        now: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        self.ensure_loading()?;
        match loader.load(quiz_id) {
            Ok(set) => self.start(set, now),
            Err(error) => Err(self.fail_load(error)),
        }
    }

    /// Start the attempt from an already fetched question set.
    ///
    /// Questions are ordered by their `order` field once, here.
    pub fn start(&mut self, set: QuestionSet, now: DateTime<Utc>) -> Result<(), SessionError> {
        self.ensure_loading()?;
        if let Err(error) = check_startable(&set, now) {
            return Err(self.fail_load(error));
        }

        let questions = set.ordered_questions();
        let time_limit = match set.quiz.duration_seconds() {
            0 => None,
            seconds => Some(seconds),
        };
        tracing::info!(
            quiz = %set.quiz.id,
            questions = questions.len(),
            time_limit_seconds = ?time_limit,
            "quiz attempt started"
        );

        self.attempt = AttemptState::new(time_limit);
        self.time_limit = time_limit;
        self.questions = questions;
        self.quiz = Some(set.quiz);
        self.phase = SessionPhase::Active;
        // Time spent loading does not count against the learner.
        self.ticker.poll();
        Ok(())
    }

    /// Record `answer_id` as the only answer to `question_id`.
    pub fn select_answer(
        &mut self,
        question_id: &QuestionId,
        answer_id: &AnswerId,
    ) -> Result<(), SessionError> {
        self.ensure_active()?;
        if !self.question(question_id)?.has_option(answer_id) {
            return Err(SessionError::UnknownAnswer {
                question: question_id.clone(),
                answer: answer_id.clone(),
            });
        }
        self.attempt
            .answers
            .insert(question_id.clone(), answer_id.clone());
        self.mark_dirty();
        tracing::debug!(question = %question_id, answer = %answer_id, "answer selected");
        Ok(())
    }

    /// Flag or unflag a question for review. Returns the new flag state.
    pub fn toggle_flag(&mut self, question_id: &QuestionId) -> Result<bool, SessionError> {
        self.ensure_active()?;
        self.question(question_id)?;
        let flagged = if self.attempt.flags.remove(question_id) {
            false
        } else {
            self.attempt.flags.insert(question_id.clone());
            true
        };
        self.mark_dirty();
        tracing::debug!(question = %question_id, flagged, "flag toggled");
        Ok(flagged)
    }

    /// Move to `index`, clamped into the question range.
    pub fn go_to(&mut self, index: usize) -> Result<usize, SessionError> {
        self.ensure_active()?;
        let last = self.questions.len().saturating_sub(1);
        self.attempt.current_index = index.min(last);
        Ok(self.attempt.current_index)
    }

    pub fn next(&mut self) -> Result<usize, SessionError> {
        let target = self.attempt.current_index.saturating_add(1);
        self.go_to(target)
    }

    pub fn previous(&mut self) -> Result<usize, SessionError> {
        let target = self.attempt.current_index.saturating_sub(1);
        self.go_to(target)
    }

    /// Apply one second of countdown.
    ///
    /// Reaching zero forces a submission, once, without confirmation.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != SessionPhase::Active {
            return TickOutcome::Ignored;
        }
        self.attempt.elapsed_seconds += 1;
        if let Some(remaining) = self.attempt.remaining_seconds.as_mut() {
            *remaining = remaining.saturating_sub(1);
        }
        self.run_autosave(1);

        if self.attempt.remaining_seconds == Some(0) && !self.auto_submitted {
            self.auto_submitted = true;
            tracing::info!(
                unanswered = self.unanswered_count(),
                "time is up, submitting automatically"
            );
            let submitted = self.submit().is_ok();
            return TickOutcome::Expired { submitted };
        }
        TickOutcome::Counted {
            remaining_seconds: self.attempt.remaining_seconds,
        }
    }

    /// Poll the owned tick source and apply every due second.
    ///
    /// Returns the outcome of the last applied tick, or `None` when no
    /// second was due. Ticks after an expiry are dropped.
    pub fn pump_timer(&mut self) -> Option<TickOutcome> {
        let due = self.ticker.poll();
        let mut outcome = None;
        for _ in 0..due {
            let tick = self.tick();
            outcome = Some(tick);
            if !matches!(tick, TickOutcome::Counted { .. }) {
                break;
            }
        }
        outcome
    }

    /// Submit the attempt through the session's submission API.
    ///
    /// Unanswered questions do not block submission; confirming with the
    /// learner is up to the host.
    pub fn submit(&mut self) -> Result<SubmissionReceipt, SessionError> {
        let payload = self.begin_submit()?;
        let result = self.submitter.submit(&payload);
        self.complete_submit(result)
    }

    /// Enter `Submitting` and build the payload.
    ///
    /// Rejected while another submission is in flight.
    pub fn begin_submit(&mut self) -> Result<SubmissionPayload, SessionError> {
        match self.phase {
            SessionPhase::Active => {}
            SessionPhase::Submitting => {
                tracing::warn!("submit ignored, a submission is already in flight");
                return Err(SessionError::SubmissionInFlight);
            }
            SessionPhase::Submitted => return Err(SessionError::AlreadySubmitted),
            phase => return Err(SessionError::NotActive { phase }),
        }
        let Some(quiz_id) = self.quiz.as_ref().map(|quiz| quiz.id.clone()) else {
            return Err(SessionError::NotActive { phase: self.phase });
        };
        let payload = SubmissionPayload {
            quiz_id,
            answers: self.answer_entries(),
            time_spent_seconds: self.time_spent_seconds(),
        };
        self.phase = SessionPhase::Submitting;
        tracing::info!(
            quiz = %payload.quiz_id,
            answered = payload.answers.len(),
            time_spent_seconds = payload.time_spent_seconds,
            "submitting attempt"
        );
        Ok(payload)
    }

    /// Resolve an in-flight submission.
    ///
    /// Success is terminal. Failure returns the session to `Active` with the
    /// error message attached; nothing is retried automatically.
    pub fn complete_submit(
        &mut self,
        result: Result<SubmissionReceipt, SubmissionError>,
    ) -> Result<SubmissionReceipt, SessionError> {
        if self.phase != SessionPhase::Submitting {
            return Err(SessionError::NotSubmitting);
        }
        match result {
            Ok(receipt) => {
                self.phase = SessionPhase::Submitted;
                self.ticker.cancel();
                self.last_error = None;
                self.receipt = Some(receipt.clone());
                tracing::info!(submission = %receipt.submission_id, "attempt submitted");
                Ok(receipt)
            }
            Err(error) => {
                self.phase = SessionPhase::Active;
                self.last_error = Some(error.user_message());
                tracing::warn!("submission failed: {error}");
                Err(error.into())
            }
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn submission_status(&self) -> SubmissionStatus {
        match self.phase {
            SessionPhase::Submitting => SubmissionStatus::Submitting,
            SessionPhase::Submitted => SubmissionStatus::Submitted,
            _ => SubmissionStatus::NotSubmitted,
        }
    }

    pub fn quiz(&self) -> Option<&QuizMetadata> {
        self.quiz.as_ref()
    }

    /// Questions in the fixed order chosen at load time.
    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn attempt(&self) -> &AttemptState {
        &self.attempt
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.attempt.current_index)
    }

    pub fn remaining_seconds(&self) -> Option<u64> {
        self.attempt.remaining_seconds
    }

    pub fn unanswered_count(&self) -> usize {
        self.questions.len() - self.attempt.answered_count()
    }

    /// Share of answered questions, rounded, for display only.
    pub fn progress_percent(&self) -> u8 {
        if self.questions.is_empty() {
            return 0;
        }
        let ratio = self.attempt.answered_count() as f64 / self.questions.len() as f64;
        (ratio * 100.0).round() as u8
    }

    /// Allotted time minus remaining time, or counted time when untimed.
    pub fn time_spent_seconds(&self) -> u64 {
        match (self.time_limit, self.attempt.remaining_seconds) {
            (Some(total), Some(remaining)) => total.saturating_sub(remaining),
            _ => self.attempt.elapsed_seconds,
        }
    }

    /// Message of the most recent load or submission failure.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn receipt(&self) -> Option<&SubmissionReceipt> {
        self.receipt.as_ref()
    }

    /// Current answers and flags, for auto-save or a host-side backup.
    pub fn snapshot(&self) -> Option<AnswerSnapshot> {
        let quiz = self.quiz.as_ref()?;
        Some(AnswerSnapshot {
            quiz_id: quiz.id.clone(),
            answers: self.answer_entries(),
            flagged: self.attempt.flags.iter().cloned().collect(),
            remaining_seconds: self.attempt.remaining_seconds,
        })
    }

    fn answer_entries(&self) -> Vec<AnswerEntry> {
        self.questions
            .iter()
            .filter_map(|question| {
                self.attempt
                    .answers
                    .get(&question.id)
                    .map(|answer_id| AnswerEntry {
                        question_id: question.id.clone(),
                        answer_id: answer_id.clone(),
                    })
            })
            .collect()
    }

    fn question(&self, question_id: &QuestionId) -> Result<&QuizQuestion, SessionError> {
        self.questions
            .iter()
            .find(|question| &question.id == question_id)
            .ok_or_else(|| SessionError::UnknownQuestion(question_id.clone()))
    }

    fn ensure_active(&self) -> Result<(), SessionError> {
        if self.phase == SessionPhase::Active {
            Ok(())
        } else {
            tracing::warn!(phase = %self.phase, "command rejected, session not active");
            Err(SessionError::NotActive { phase: self.phase })
        }
    }

    fn ensure_loading(&self) -> Result<(), SessionError> {
        if self.phase == SessionPhase::Loading {
            Ok(())
        } else {
            Err(SessionError::AlreadyLoaded { phase: self.phase })
        }
    }

    fn fail_load(&mut self, error: LoadError) -> SessionError {
        tracing::warn!("quiz could not be started: {error}");
        self.phase = SessionPhase::Error;
        self.last_error = Some(error.user_message());
        self.ticker.cancel();
        SessionError::Load(error)
    }

    fn mark_dirty(&mut self) {
        if let Some(autosave) = self.autosave.as_mut() {
            autosave.tracker.mark_dirty();
        }
    }

    fn run_autosave(&mut self, seconds: u64) {
        let due = match self.autosave.as_mut() {
            Some(autosave) => {
                autosave.tracker.advance(seconds);
                autosave.tracker.should_auto_save(&autosave.config)
            }
            None => false,
        };
        if !due {
            return;
        }
        let Some(snapshot) = self.snapshot() else {
            return;
        };
        let Some(autosave) = self.autosave.as_mut() else {
            return;
        };
        match autosave.sink.save(&snapshot) {
            Ok(()) => {
                autosave.tracker.save_complete();
                tracing::debug!(answers = snapshot.answers.len(), "answers auto-saved");
            }
            Err(error) => {
                autosave.tracker.save_failed();
                tracing::warn!("auto-save failed, continuing: {error}");
            }
        }
    }
}

impl Drop for QuizSession {
    fn drop(&mut self) {
        self.ticker.cancel();
    }
}

fn check_startable(set: &QuestionSet, now: DateTime<Utc>) -> Result<(), LoadError> {
    match set.quiz.availability_at(now) {
        Availability::Open => {}
        Availability::Unpublished => return Err(LoadError::Unpublished),
        Availability::NotYetOpen { opens_at } => return Err(LoadError::NotYetOpen { opens_at }),
        Availability::Closed { closed_at } => return Err(LoadError::Closed { closed_at }),
    }
    if set.questions.is_empty() {
        return Err(LoadError::EmptyQuestionSet);
    }
    let mut seen = std::collections::HashSet::new();
    for question in &set.questions {
        if !seen.insert(&question.id) {
            return Err(LoadError::Malformed {
                message: format!("duplicate question id {}", question.id),
            });
        }
    }
    Ok(())
}
