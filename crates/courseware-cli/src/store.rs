//! File-backed collaborators for the command-line host.
//!
//! The library crates only see the traits; these implementations keep
//! quizzes, submissions, snapshots and media in plain directories.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use courseware_document::{ImageFile, ImageUploader, UploadContext, UploadError};
use courseware_model::{QuestionSet, QuizId, ServiceContext};
use courseware_quiz::{
    AnswerSnapshot, AnswerSnapshotSink, AutoSaveError, LoadError, QuestionSetLoader,
    ReceiptStatus, SubmissionApi, SubmissionError, SubmissionPayload, SubmissionReceipt,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Write `bytes` to `path` through a temp file and a rename.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let mut file = File::create(&temp_path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    fs::rename(&temp_path, path)
}

/// SHA-256 of `bytes` as lowercase hex.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Loads `<dir>/<quiz-id>.json`.
#[derive(Debug, Clone)]
pub struct JsonQuizLoader {
    dir: PathBuf,
}

impl JsonQuizLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Loader and quiz id for a question set file named `<quiz-id>.json`.
    pub fn for_file(path: &Path) -> anyhow::Result<(Self, QuizId)> {
        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| anyhow::anyhow!("cannot derive a quiz id from {}", path.display()))?;
        let quiz_id = QuizId::new(stem)?;
        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok((Self::new(dir), quiz_id))
    }

    pub fn path_for(&self, quiz_id: &QuizId) -> PathBuf {
        self.dir.join(format!("{quiz_id}.json"))
    }
}

impl QuestionSetLoader for JsonQuizLoader {
    fn load(&self, quiz_id: &QuizId) -> Result<QuestionSet, LoadError> {
        let path = self.path_for(quiz_id);
        let content = fs::read_to_string(&path).map_err(|error| match error.kind() {
            io::ErrorKind::NotFound => LoadError::NotFound {
                quiz_id: quiz_id.clone(),
            },
            _ => LoadError::Unavailable {
                message: format!("{}: {error}", path.display()),
            },
        })?;
        let set: QuestionSet =
            serde_json::from_str(&content).map_err(|error| LoadError::Malformed {
                message: format!("{}: {error}", path.display()),
            })?;
        if &set.quiz.id != quiz_id {
            return Err(LoadError::Malformed {
                message: format!("{} holds quiz {}", path.display(), set.quiz.id),
            });
        }
        tracing::debug!(quiz = %quiz_id, questions = set.questions.len(), "question set loaded");
        Ok(set)
    }
}

/// What the submission store keeps on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub submission_id: String,
    pub submitted_at: DateTime<Utc>,
    pub payload: SubmissionPayload,
}

/// Accepts one submission per quiz into `<dir>/submission-<quiz-id>.json`.
///
/// A second submission for the same quiz is refused the way a grading
/// server would refuse it.
#[derive(Debug, Clone)]
pub struct FileSubmissionStore {
    dir: PathBuf,
}

impl FileSubmissionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, quiz_id: &QuizId) -> PathBuf {
        self.dir.join(format!("submission-{quiz_id}.json"))
    }

    pub fn read(&self, quiz_id: &QuizId) -> anyhow::Result<SubmissionRecord> {
        let path = self.path_for(quiz_id);
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl SubmissionApi for FileSubmissionStore {
    fn submit(&self, payload: &SubmissionPayload) -> Result<SubmissionReceipt, SubmissionError> {
        let path = self.path_for(&payload.quiz_id);
        if path.exists() {
            return Err(SubmissionError::Validation {
                message: "An attempt for this quiz has already been submitted.".to_string(),
            });
        }

        let body = serde_json::to_vec(payload).map_err(|error| SubmissionError::Validation {
            message: format!("The attempt could not be encoded: {error}"),
        })?;
        let mut submission_id = sha256_hex(&body);
        submission_id.truncate(16);

        let record = SubmissionRecord {
            submission_id: submission_id.clone(),
            submitted_at: Utc::now(),
            payload: payload.clone(),
        };
        let bytes = serde_json::to_vec_pretty(&record).map_err(|error| {
            SubmissionError::Validation {
                message: format!("The attempt could not be encoded: {error}"),
            }
        })?;
        write_atomic(&path, &bytes).map_err(|error| SubmissionError::Network {
            message: format!("{}: {error}", path.display()),
        })?;

        tracing::info!(path = %path.display(), "submission stored");
        Ok(SubmissionReceipt {
            submission_id,
            status: ReceiptStatus::Submitted,
        })
    }
}

/// Overwrites `<dir>/autosave-<quiz-id>.json` with each snapshot.
#[derive(Debug, Clone)]
pub struct FileSnapshotSink {
    dir: PathBuf,
}

impl FileSnapshotSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, quiz_id: &QuizId) -> PathBuf {
        self.dir.join(format!("autosave-{quiz_id}.json"))
    }
}

impl AnswerSnapshotSink for FileSnapshotSink {
    fn save(&self, snapshot: &AnswerSnapshot) -> Result<(), AutoSaveError> {
        let path = self.path_for(&snapshot.quiz_id);
        let bytes = serde_json::to_vec_pretty(snapshot)
            .map_err(|error| AutoSaveError::with_source("encode snapshot", error))?;
        write_atomic(&path, &bytes).map_err(|error| {
            AutoSaveError::with_source(format!("write {}", path.display()), error)
        })
    }
}

/// Stores images under their content hash in a media directory.
///
/// The returned URL is resolved against the service base URL, or is the
/// stored file path when no base URL is configured.
#[derive(Debug, Clone)]
pub struct MediaDirUploader {
    dir: PathBuf,
    service: ServiceContext,
}

impl MediaDirUploader {
    pub fn new(dir: impl Into<PathBuf>, service: ServiceContext) -> Self {
        Self {
            dir: dir.into(),
            service,
        }
    }

    fn stored_name(file: &ImageFile) -> String {
        let digest = sha256_hex(&file.bytes);
        match file.extension() {
            Some(extension) => format!("{digest}.{extension}"),
            None => digest,
        }
    }

    fn relative_path(name: &str, context: &UploadContext) -> PathBuf {
        [context.course_id.as_str(), context.lecture_id.as_str(), name]
            .into_iter()
            .filter(|segment| !segment.is_empty())
            .collect()
    }
}

impl ImageUploader for MediaDirUploader {
    fn upload(&self, file: &ImageFile, context: &UploadContext) -> Result<String, UploadError> {
        if file.bytes.is_empty() {
            return Err(UploadError::rejected(format!("{} is empty", file.file_name)));
        }

        let name = Self::stored_name(file);
        let relative = Self::relative_path(&name, context);
        let target = self.dir.join(&relative);
        if target.exists() {
            tracing::debug!(path = %target.display(), "image already stored");
        } else {
            write_atomic(&target, &file.bytes).map_err(|source| UploadError::Io {
                operation: "store",
                path: target.clone(),
                source,
            })?;
            tracing::info!(path = %target.display(), bytes = file.bytes.len(), "image stored");
        }

        if self.service.base_url.is_empty() {
            Ok(target.display().to_string())
        } else {
            let resource = relative
                .iter()
                .map(|segment| segment.to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            Ok(self.service.endpoint(&resource))
        }
    }
}
