//! Learner-owned state of one attempt.

use std::collections::{BTreeMap, BTreeSet};

use courseware_model::{AnswerId, QuestionId};
use serde::{Deserialize, Serialize};

/// Where the attempt stands with respect to submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    NotSubmitted,
    Submitting,
    Submitted,
}

/// Answers, flags, cursor and clock of an attempt.
///
/// Mutated only through [`crate::QuizSession`], which validates ids and
/// phase before touching it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptState {
    pub(crate) answers: BTreeMap<QuestionId, AnswerId>,
    pub(crate) flags: BTreeSet<QuestionId>,
    pub(crate) current_index: usize,
    /// `None` for quizzes without a time limit.
    pub(crate) remaining_seconds: Option<u64>,
    /// Session seconds counted while active.
    pub(crate) elapsed_seconds: u64,
}

impl AttemptState {
    pub(crate) fn new(remaining_seconds: Option<u64>) -> Self {
        Self {
            remaining_seconds,
            ..Self::default()
        }
    }

    pub fn answers(&self) -> &BTreeMap<QuestionId, AnswerId> {
        &self.answers
    }

    pub fn answer_for(&self, question_id: &QuestionId) -> Option<&AnswerId> {
        self.answers.get(question_id)
    }

    pub fn flags(&self) -> &BTreeSet<QuestionId> {
        &self.flags
    }

    pub fn is_flagged(&self, question_id: &QuestionId) -> bool {
        self.flags.contains(question_id)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn remaining_seconds(&self) -> Option<u64> {
        self.remaining_seconds
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }
}
