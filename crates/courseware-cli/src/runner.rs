//! Line-oriented quiz runner.
//!
//! Reads one command per line and redraws the current question after each.
//! Lines arrive through a [`LineReader`], so the countdown keeps running
//! while the learner is idle and an expired attempt submits without any
//! further input.

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use anyhow::Result;
use courseware_quiz::{QuizSession, SessionError, SessionPhase, SubmissionReceipt, TickOutcome};

/// How often the countdown is checked while waiting for input.
pub const POLL_INTERVAL: Duration = Duration::from_millis(200);

const HELP: &str = "\
commands:
  n        next question
  p        previous question
  g <N>    go to question N
  a <N>    choose option N
  f        flag or unflag for review
  s        submit
  q        quit without submitting
  h        this help";

/// How an interactive attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Submitted {
        receipt: SubmissionReceipt,
        /// Submitted by the countdown rather than by the learner.
        automatic: bool,
    },
    /// The learner quit or input ended before submitting.
    Quit,
}

/// Learner input forwarded from a background thread.
///
/// Reading a terminal blocks, so lines are read on their own thread and the
/// runner waits on the channel with a timeout.
#[derive(Debug)]
pub struct LineReader {
    receiver: Receiver<io::Result<String>>,
    poll_interval: Duration,
}

impl LineReader {
    pub fn new(receiver: Receiver<io::Result<String>>) -> Self {
        Self {
            receiver,
            poll_interval: POLL_INTERVAL,
        }
    }

    /// Forward the lines of `input` from a background thread.
    ///
    /// The thread stops at end of input, after a read error, or once the
    /// reader has been dropped.
    pub fn spawn<R: BufRead + Send + 'static>(input: R) -> Self {
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            for line in input.lines() {
                let failed = line.is_err();
                if sender.send(line).is_err() || failed {
                    break;
                }
            }
        });
        Self::new(receiver)
    }

    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Next,
    Previous,
    GoTo(usize),
    Answer(usize),
    Flag,
    Submit,
    Quit,
    Help,
}

enum Wait {
    Line(String),
    Finished(RunOutcome),
}

enum Confirm {
    Submit,
    Cancel,
    Finished(RunOutcome),
}

fn parse_input(line: &str) -> Option<Input> {
    let mut parts = line.split_whitespace();
    let command = parts.next()?;
    let number = match parts.next() {
        Some(value) => Some(value.parse::<usize>().ok()?),
        None => None,
    };
    if parts.next().is_some() {
        return None;
    }
    match (command, number) {
        ("n", None) => Some(Input::Next),
        ("p", None) => Some(Input::Previous),
        ("g", Some(n)) if n > 0 => Some(Input::GoTo(n - 1)),
        ("a", Some(n)) if n > 0 => Some(Input::Answer(n - 1)),
        ("f", None) => Some(Input::Flag),
        ("s", None) => Some(Input::Submit),
        ("q", None) => Some(Input::Quit),
        ("h" | "?", None) => Some(Input::Help),
        _ => None,
    }
}

/// Drive an active session from `input` until it is submitted or the
/// learner quits.
pub fn run_quiz<W: Write>(
    session: &mut QuizSession,
    input: &LineReader,
    out: &mut W,
) -> Result<RunOutcome> {
    writeln!(out, "{HELP}")?;
    loop {
        if let Some(outcome) = apply_timer(session, out)? {
            return Ok(outcome);
        }
        render(session, out)?;
        write!(out, "> ")?;
        out.flush()?;

        let line = match wait_for_line(session, input, out)? {
            Wait::Line(line) => line,
            Wait::Finished(outcome) => return Ok(outcome),
        };
        let Some(command) = parse_input(&line) else {
            writeln!(out, "unknown command, type h for help")?;
            continue;
        };
        let result = match command {
            Input::Next => session.next().map(drop),
            Input::Previous => session.previous().map(drop),
            Input::GoTo(index) => session.go_to(index).map(drop),
            Input::Answer(option) => answer_current(session, option, out)?,
            Input::Flag => flag_current(session),
            Input::Help => {
                writeln!(out, "{HELP}")?;
                Ok(())
            }
            Input::Quit => return Ok(RunOutcome::Quit),
            Input::Submit => {
                match confirm_submit(session, input, out)? {
                    Confirm::Submit => {}
                    Confirm::Cancel => continue,
                    Confirm::Finished(outcome) => return Ok(outcome),
                }
                match session.submit() {
                    Ok(receipt) => {
                        writeln!(out, "Submitted. Confirmation: {}", receipt.submission_id)?;
                        return Ok(RunOutcome::Submitted {
                            receipt,
                            automatic: false,
                        });
                    }
                    Err(error) => Err(error),
                }
            }
        };
        if let Err(error) = result {
            writeln!(out, "{}", error.user_message())?;
        }
    }
}

/// Wait for the next line, applying the countdown while nothing arrives.
fn wait_for_line<W: Write>(
    session: &mut QuizSession,
    input: &LineReader,
    out: &mut W,
) -> Result<Wait> {
    loop {
        match input.receiver.recv_timeout(input.poll_interval) {
            Ok(line) => {
                let line = line?;
                // Time spent typing counts before the command applies.
                if let Some(outcome) = apply_timer(session, out)? {
                    return Ok(Wait::Finished(outcome));
                }
                return Ok(Wait::Line(line.trim().to_string()));
            }
            Err(RecvTimeoutError::Timeout) => {
                if let Some(outcome) = apply_timer(session, out)? {
                    return Ok(Wait::Finished(outcome));
                }
            }
            Err(RecvTimeoutError::Disconnected) => {
                writeln!(out)?;
                return Ok(Wait::Finished(RunOutcome::Quit));
            }
        }
    }
}

fn apply_timer<W: Write>(session: &mut QuizSession, out: &mut W) -> Result<Option<RunOutcome>> {
    if let Some(TickOutcome::Expired { submitted }) = session.pump_timer() {
        if submitted && let Some(receipt) = session.receipt().cloned() {
            writeln!(
                out,
                "\nTime is up. Your answers were submitted. Confirmation: {}",
                receipt.submission_id
            )?;
            return Ok(Some(RunOutcome::Submitted {
                receipt,
                automatic: true,
            }));
        }
        writeln!(out, "\nTime is up, but submitting failed.")?;
        if let Some(message) = session.last_error() {
            writeln!(out, "{message}")?;
        }
        write!(out, "Type s to try again.\n> ")?;
        out.flush()?;
    }
    Ok(None)
}

fn answer_current<W: Write>(
    session: &mut QuizSession,
    option: usize,
    out: &mut W,
) -> Result<Result<(), SessionError>> {
    let Some(question) = session.current_question() else {
        return Ok(Ok(()));
    };
    let Some(answer) = question.options.get(option) else {
        writeln!(out, "this question has {} options", question.options.len())?;
        return Ok(Ok(()));
    };
    let (question_id, answer_id) = (question.id.clone(), answer.id.clone());
    Ok(session.select_answer(&question_id, &answer_id))
}

fn flag_current(session: &mut QuizSession) -> Result<(), SessionError> {
    match session.current_question().map(|question| question.id.clone()) {
        Some(question_id) => session.toggle_flag(&question_id).map(drop),
        None => Ok(()),
    }
}

fn confirm_submit<W: Write>(
    session: &mut QuizSession,
    input: &LineReader,
    out: &mut W,
) -> Result<Confirm> {
    let unanswered = session.unanswered_count();
    if unanswered == 0 || session.phase() != SessionPhase::Active {
        return Ok(Confirm::Submit);
    }
    write!(
        out,
        "{unanswered} of {} questions are unanswered. Submit anyway? [y/N] ",
        session.question_count()
    )?;
    out.flush()?;
    match wait_for_line(session, input, out)? {
        Wait::Line(answer) if matches!(answer.as_str(), "y" | "Y" | "yes") => Ok(Confirm::Submit),
        Wait::Line(_) | Wait::Finished(RunOutcome::Quit) => Ok(Confirm::Cancel),
        Wait::Finished(outcome) => Ok(Confirm::Finished(outcome)),
    }
}

fn render<W: Write>(session: &QuizSession, out: &mut W) -> Result<()> {
    let Some(question) = session.current_question() else {
        return Ok(());
    };
    let attempt = session.attempt();
    let index = attempt.current_index();

    write!(out, "\nQuestion {}/{}", index + 1, session.question_count())?;
    if attempt.is_flagged(&question.id) {
        write!(out, " [flagged]")?;
    }
    write!(
        out,
        "  answered {}/{} ({}%)",
        attempt.answered_count(),
        session.question_count(),
        session.progress_percent()
    )?;
    if let Some(remaining) = session.remaining_seconds() {
        write!(out, "  time left {}", format_clock(remaining))?;
    }
    writeln!(out, "\n{}", question.text)?;

    let selected = attempt.answer_for(&question.id);
    for (number, option) in question.options.iter().enumerate() {
        let marker = if selected == Some(&option.id) { '*' } else { ' ' };
        writeln!(out, "{marker} {}) {}", number + 1, option.text)?;
    }
    Ok(())
}

/// `mm:ss`, with minutes allowed past 59.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
