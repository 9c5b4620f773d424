//! Quiz fixtures written into temporary directories.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use courseware_cli::store::{FileSubmissionStore, JsonQuizLoader};
use courseware_quiz::{ManualTicker, QuizSession};

pub const QUIZ_JSON: &str = r#"{
  "quiz": { "id": "algebra-1", "title": "Algebra warm-up", "duration_minutes": 5 },
  "questions": [
    {
      "id": "q2",
      "text": "What is 3 * 3?",
      "order": 2,
      "options": [{ "id": "a", "text": "6" }, { "id": "b", "text": "9" }]
    },
    {
      "id": "q1",
      "text": "What is 2 + 2?",
      "order": 1,
      "options": [{ "id": "a", "text": "3" }, { "id": "b", "text": "4" }]
    }
  ]
}"#;

pub fn write_quiz(dir: &Path) -> PathBuf {
    let path = dir.join("algebra-1.json");
    fs::write(&path, QUIZ_JSON).unwrap();
    path
}

/// A loaded session that submits into `output`, driven by a manual ticker.
pub fn session(quiz_dir: &Path, output: &Path) -> (QuizSession, ManualTicker) {
    let (loader, quiz_id) = JsonQuizLoader::for_file(&write_quiz(quiz_dir)).unwrap();
    let ticker = ManualTicker::new();
    let mut session = QuizSession::new(
        Arc::new(FileSubmissionStore::new(output)),
        Box::new(ticker.clone()),
    );
    session.load(&loader, &quiz_id, Utc::now()).unwrap();
    (session, ticker)
}
