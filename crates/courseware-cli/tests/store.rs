//! Tests for the file-backed collaborators.

mod common;

use std::fs;

use courseware_cli::store::{FileSnapshotSink, JsonQuizLoader, MediaDirUploader};
use courseware_document::{BlockKind, Document, ImageFile, ImageUploader, UploadContext, UploadError};
use courseware_model::{AnswerId, QuestionId, QuizId, ServiceContext};
use courseware_quiz::{AnswerEntry, AnswerSnapshot, AnswerSnapshotSink, LoadError, QuestionSetLoader};

const HELLO_SHA256: &str = "dffd6021bb2bd5b0af676290809ec3a53191dd81c7f70a4b28688a362182986f";

fn lecture() -> UploadContext {
    UploadContext {
        course_id: "c1".to_string(),
        lecture_id: "l1".to_string(),
    }
}

// ============================================================================
// JsonQuizLoader
// ============================================================================

#[test]
fn loads_quiz_by_file_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_quiz(dir.path());

    let (loader, quiz_id) = JsonQuizLoader::for_file(&path).unwrap();
    let set = loader.load(&quiz_id).unwrap();

    assert_eq!(quiz_id.as_str(), "algebra-1");
    assert!(set.quiz.published);
    assert_eq!(set.quiz.duration_seconds(), 300);
    assert_eq!(set.questions.len(), 2);
}

#[test]
fn missing_quiz_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let loader = JsonQuizLoader::new(dir.path());
    let quiz_id = QuizId::new("nope").unwrap();

    assert_eq!(loader.load(&quiz_id), Err(LoadError::NotFound { quiz_id }));
}

#[test]
fn malformed_or_mismatched_quiz_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
    fs::write(dir.path().join("other.json"), common::QUIZ_JSON).unwrap();
    let loader = JsonQuizLoader::new(dir.path());

    let broken = loader.load(&QuizId::new("broken").unwrap());
    assert!(matches!(broken, Err(LoadError::Malformed { .. })));

    let Err(LoadError::Malformed { message }) = loader.load(&QuizId::new("other").unwrap()) else {
        panic!("expected a mismatch error");
    };
    assert!(message.ends_with("holds quiz algebra-1"));
}

// ============================================================================
// FileSnapshotSink
// ============================================================================

#[test]
fn snapshot_file_contents() {
    let dir = tempfile::tempdir().unwrap();
    let sink = FileSnapshotSink::new(dir.path().join("out"));
    let quiz_id = QuizId::new("algebra-1").unwrap();
    let snapshot = AnswerSnapshot {
        quiz_id: quiz_id.clone(),
        answers: vec![AnswerEntry {
            question_id: QuestionId::new("q1").unwrap(),
            answer_id: AnswerId::new("b").unwrap(),
        }],
        flagged: vec![QuestionId::new("q2").unwrap()],
        remaining_seconds: Some(120),
    };

    sink.save(&snapshot).unwrap();

    let text = fs::read_to_string(sink.path_for(&quiz_id)).unwrap();
    insta::assert_snapshot!(text, @r#"
    {
      "quiz_id": "algebra-1",
      "answers": [
        {
          "question_id": "q1",
          "answer_id": "b"
        }
      ],
      "flagged": [
        "q2"
      ],
      "remaining_seconds": 120
    }
    "#);
}

#[test]
fn snapshot_write_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("out");
    fs::write(&blocker, "a file, not a directory").unwrap();
    let sink = FileSnapshotSink::new(&blocker);
    let snapshot = AnswerSnapshot {
        quiz_id: QuizId::new("algebra-1").unwrap(),
        answers: Vec::new(),
        flagged: Vec::new(),
        remaining_seconds: None,
    };

    let error = sink.save(&snapshot).unwrap_err();
    assert!(error.message.starts_with("write "));
    assert!(error.source.is_some());
}

// ============================================================================
// MediaDirUploader
// ============================================================================

#[test]
fn stores_image_under_content_hash() {
    let dir = tempfile::tempdir().unwrap();
    let uploader = MediaDirUploader::new(dir.path(), ServiceContext::default());
    let image = ImageFile::new("Diagram.PNG", b"Hello, World!".to_vec());

    let url = uploader.upload(&image, &lecture()).unwrap();

    let stored = dir.path().join("c1").join("l1").join(format!("{HELLO_SHA256}.png"));
    assert_eq!(url, stored.display().to_string());
    assert_eq!(fs::read(&stored).unwrap(), b"Hello, World!");

    // Same bytes, same name: stored once.
    let again = uploader
        .upload(&ImageFile::new("copy.png", b"Hello, World!".to_vec()), &lecture())
        .unwrap();
    assert_eq!(again, url);
}

#[test]
fn url_uses_service_base_url() {
    let dir = tempfile::tempdir().unwrap();
    let service = ServiceContext::new("https://cdn.example.org/media/");
    let uploader = MediaDirUploader::new(dir.path(), service);

    let url = uploader
        .upload(&ImageFile::new("pic.jpg", b"Hello, World!".to_vec()), &lecture())
        .unwrap();

    assert_eq!(url, format!("https://cdn.example.org/media/c1/l1/{HELLO_SHA256}.jpg"));
}

#[test]
fn empty_image_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let uploader = MediaDirUploader::new(dir.path(), ServiceContext::default());

    let error = uploader
        .upload(&ImageFile::new("blank.png", Vec::new()), &lecture())
        .unwrap_err();

    assert!(matches!(error, UploadError::Rejected { .. }));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn upload_sets_image_block() {
    let dir = tempfile::tempdir().unwrap();
    let uploader = MediaDirUploader::new(
        dir.path().join("media"),
        ServiceContext::new("https://cdn.example.org"),
    );
    let mut document = Document::from_text("# Cells\n\nplaceholder");
    let id = document.block_at(1).unwrap().id;
    document.change_kind(id, BlockKind::Image).unwrap();

    let url = document
        .upload_image_and_set_block(
            id,
            &ImageFile::new("cell.png", b"Hello, World!".to_vec()),
            &lecture(),
            &uploader,
        )
        .unwrap();

    assert_eq!(
        document.to_text(),
        format!("# Cells\n\n![image](https://cdn.example.org/c1/l1/{HELLO_SHA256}.png)")
    );
    assert_eq!(document.block(id).map(|block| block.text.as_str()), Some(url.as_str()));
}
