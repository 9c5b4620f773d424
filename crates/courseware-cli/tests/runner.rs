//! Tests for the interactive quiz runner.

mod common;

use std::io::{self, Cursor};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use courseware_cli::runner::{LineReader, RunOutcome, run_quiz};
use courseware_cli::store::FileSubmissionStore;
use courseware_model::QuizId;
use courseware_quiz::{QuizSession, SessionPhase};

const FAST_POLL: Duration = Duration::from_millis(5);

fn run(session: &mut QuizSession, input: &str) -> (RunOutcome, String) {
    let reader = LineReader::spawn(Cursor::new(input.to_string())).with_poll_interval(FAST_POLL);
    let mut out = Vec::new();
    let outcome = run_quiz(session, &reader, &mut out).unwrap();
    (outcome, String::from_utf8(out).unwrap())
}

#[test]
fn answers_and_submits() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out");
    let (mut session, _ticker) = common::session(dir.path(), &output);

    let (outcome, text) = run(&mut session, "a 2\nn\na 2\ns\n");

    let RunOutcome::Submitted { receipt, automatic } = outcome else {
        panic!("expected a submission, got {outcome:?}");
    };
    assert!(!automatic);
    assert!(text.contains(&format!("Submitted. Confirmation: {}", receipt.submission_id)));
    assert!(!text.contains("unanswered"));

    let record = FileSubmissionStore::new(&output)
        .read(&QuizId::new("algebra-1").unwrap())
        .unwrap();
    assert_eq!(record.submission_id, receipt.submission_id);
    let answers: Vec<(&str, &str)> = record
        .payload
        .answers
        .iter()
        .map(|entry| (entry.question_id.as_str(), entry.answer_id.as_str()))
        .collect();
    assert_eq!(answers, [("q1", "b"), ("q2", "b")]);
}

#[test]
fn renders_question_with_selection() {
    let dir = tempfile::tempdir().unwrap();
    let (mut session, _ticker) = common::session(dir.path(), &dir.path().join("out"));

    let (outcome, text) = run(&mut session, "a 2\nf\nq\n");

    assert_eq!(outcome, RunOutcome::Quit);
    assert!(text.contains("Question 1/2  answered 0/2 (0%)  time left 05:00\nWhat is 2 + 2?\n  1) 3\n  2) 4\n"));
    assert!(text.contains("Question 1/2 [flagged]  answered 1/2 (50%)"));
    assert!(text.contains("* 2) 4\n"));
}

#[test]
fn unanswered_submit_asks_first() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out");
    let (mut session, _ticker) = common::session(dir.path(), &output);

    let (outcome, text) = run(&mut session, "a 1\ns\nn\nq\n");

    assert_eq!(outcome, RunOutcome::Quit);
    assert!(text.contains("1 of 2 questions are unanswered. Submit anyway? [y/N]"));
    assert_eq!(session.phase(), SessionPhase::Active);
    assert!(!output.join("submission-algebra-1.json").exists());
}

#[test]
fn confirmed_partial_submit() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out");
    let (mut session, _ticker) = common::session(dir.path(), &output);

    let (outcome, _) = run(&mut session, "s\ny\n");

    assert!(matches!(outcome, RunOutcome::Submitted { automatic: false, .. }));
    assert!(output.join("submission-algebra-1.json").exists());
}

#[test]
fn expired_timer_submits_before_next_command() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out");
    let (mut session, ticker) = common::session(dir.path(), &output);
    ticker.advance(301);

    let (outcome, text) = run(&mut session, "a 1\n");

    assert!(matches!(outcome, RunOutcome::Submitted { automatic: true, .. }));
    assert!(text.contains("Time is up. Your answers were submitted."));
    let record = FileSubmissionStore::new(&output)
        .read(&QuizId::new("algebra-1").unwrap())
        .unwrap();
    assert_eq!(record.payload.time_spent_seconds, 300);
    assert!(record.payload.answers.is_empty());
}

#[test]
fn refused_submission_keeps_the_attempt_open() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out");
    std::fs::create_dir_all(&output).unwrap();
    std::fs::write(output.join("submission-algebra-1.json"), "{}").unwrap();
    let (mut session, _ticker) = common::session(dir.path(), &output);

    let (outcome, text) = run(&mut session, "s\ny\nq\n");

    assert_eq!(outcome, RunOutcome::Quit);
    assert!(text.contains("An attempt for this quiz has already been submitted."));
    assert_eq!(session.phase(), SessionPhase::Active);
}

#[test]
fn bad_input_is_reported_and_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let (mut session, _ticker) = common::session(dir.path(), &dir.path().join("out"));

    let (outcome, text) = run(&mut session, "jump\na 7\ng 9\n");

    assert_eq!(outcome, RunOutcome::Quit);
    assert!(text.contains("unknown command, type h for help"));
    assert!(text.contains("this question has 2 options"));
    // g clamps to the last question
    assert!(text.contains("Question 2/2"));
    assert_eq!(session.attempt().answered_count(), 0);
}

#[test]
fn countdown_submits_while_no_input_arrives() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out");
    let (mut session, ticker) = common::session(dir.path(), &output);
    // Keep the sender alive so the runner waits instead of seeing end of input.
    let (_keyboard, receiver) = mpsc::channel::<io::Result<String>>();
    let reader = LineReader::new(receiver).with_poll_interval(FAST_POLL);

    let clock = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        ticker.advance(300);
    });
    let mut out = Vec::new();
    let outcome = run_quiz(&mut session, &reader, &mut out).unwrap();
    clock.join().unwrap();

    assert!(matches!(outcome, RunOutcome::Submitted { automatic: true, .. }));
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Time is up. Your answers were submitted."));
    let record = FileSubmissionStore::new(&output)
        .read(&QuizId::new("algebra-1").unwrap())
        .unwrap();
    assert_eq!(record.payload.time_spent_seconds, 300);
}

#[test]
fn countdown_expiring_during_confirmation_submits() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out");
    let (mut session, ticker) = common::session(dir.path(), &output);
    let (keyboard, receiver) = mpsc::channel::<io::Result<String>>();
    let reader = LineReader::new(receiver).with_poll_interval(FAST_POLL);
    keyboard.send(Ok("a 2".to_string())).unwrap();
    keyboard.send(Ok("s".to_string())).unwrap();

    let clock = thread::spawn(move || {
        thread::sleep(Duration::from_millis(100));
        ticker.advance(300);
        keyboard
    });
    let mut out = Vec::new();
    let outcome = run_quiz(&mut session, &reader, &mut out).unwrap();
    drop(clock.join().unwrap());

    assert!(matches!(outcome, RunOutcome::Submitted { automatic: true, .. }));
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Submit anyway? [y/N]"));
    let record = FileSubmissionStore::new(&output)
        .read(&QuizId::new("algebra-1").unwrap())
        .unwrap();
    assert_eq!(record.payload.answers.len(), 1);
}
