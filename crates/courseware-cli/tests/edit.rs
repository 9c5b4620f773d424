//! Tests for document edits saved to disk.

use std::fs;
use std::path::{Path, PathBuf};

use courseware_cli::edit::{EditOp, edit_file, read_document};
use courseware_cli::store::MediaDirUploader;
use courseware_document::{BlockKind, MoveDirection, UploadContext};
use courseware_model::ServiceContext;

const LECTURE: &str = "# Intro\n\nbody\n";

fn lecture_file(dir: &Path) -> PathBuf {
    let path = dir.join("lecture.md");
    fs::write(&path, LECTURE).unwrap();
    path
}

fn edit(path: &Path, media: &Path, op: &EditOp) -> anyhow::Result<courseware_cli::edit::EditOutcome> {
    let uploader = MediaDirUploader::new(media, ServiceContext::default());
    let context = UploadContext {
        course_id: "c1".to_string(),
        lecture_id: "l1".to_string(),
    };
    edit_file(path, op, &context, &uploader)
}

fn summary(path: &Path) -> Vec<(BlockKind, String)> {
    read_document(path)
        .unwrap()
        .blocks()
        .iter()
        .map(|block| (block.kind, block.text.clone()))
        .collect()
}

#[test]
fn added_block_reloads_with_kind_and_text() {
    for kind in BlockKind::ALL {
        let dir = tempfile::tempdir().unwrap();
        let path = lecture_file(dir.path());
        let op = EditOp::Add {
            kind,
            text: "https://cdn.example.org/a.png".to_string(),
        };

        edit(&path, &dir.path().join("media"), &op).unwrap();

        let blocks = summary(&path);
        assert_eq!(blocks.len(), 3, "kind {kind}");
        assert_eq!(blocks[2], (kind, "https://cdn.example.org/a.png".to_string()));
    }
}

#[test]
fn edit_that_would_lose_a_block_is_not_saved() {
    let dir = tempfile::tempdir().unwrap();
    let path = lecture_file(dir.path());
    let media = dir.path().join("media");

    let cases = [
        EditOp::Add {
            kind: BlockKind::Heading2,
            text: String::new(),
        },
        EditOp::Add {
            kind: BlockKind::Paragraph,
            text: "   ".to_string(),
        },
        EditOp::Set {
            position: 1,
            text: "- looks like a list".to_string(),
        },
        EditOp::Set {
            position: 0,
            text: "two\nlines".to_string(),
        },
    ];
    for op in &cases {
        let error = edit(&path, &media, op).unwrap_err();
        assert!(error.to_string().contains("would not read back"), "{op:?}: {error}");
        assert_eq!(fs::read_to_string(&path).unwrap(), LECTURE, "{op:?}");
    }
}

#[test]
fn set_kind_and_move_are_saved() {
    let dir = tempfile::tempdir().unwrap();
    let path = lecture_file(dir.path());
    let media = dir.path().join("media");

    edit(&path, &media, &EditOp::Set { position: 1, text: "first point".to_string() }).unwrap();
    edit(&path, &media, &EditOp::Kind { position: 1, kind: BlockKind::List }).unwrap();
    edit(
        &path,
        &media,
        &EditOp::Move {
            position: 1,
            direction: MoveDirection::Up,
        },
    )
    .unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "- first point\n\n# Intro\n");
}

#[test]
fn deleting_every_block_saves_an_empty_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = lecture_file(dir.path());
    let media = dir.path().join("media");

    edit(&path, &media, &EditOp::Delete { position: 0 }).unwrap();
    edit(&path, &media, &EditOp::Delete { position: 0 }).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "\n");
    assert_eq!(summary(&path), [(BlockKind::Paragraph, String::new())]);
}

#[test]
fn image_edit_stores_file_and_retypes_block() {
    let dir = tempfile::tempdir().unwrap();
    let path = lecture_file(dir.path());
    let media = dir.path().join("media");
    let image = dir.path().join("figure.PNG");
    fs::write(&image, b"Hello, World!").unwrap();

    let outcome = edit(&path, &media, &EditOp::Image { position: 1, path: image }).unwrap();

    let url = outcome.image_url.unwrap();
    assert!(url.ends_with("dffd6021bb2bd5b0af676290809ec3a53191dd81c7f70a4b28688a362182986f.png"));
    assert!(Path::new(&url).exists());
    assert_eq!(summary(&path)[1], (BlockKind::Image, url));
}

#[test]
fn unknown_position_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = lecture_file(dir.path());

    let error = edit(&path, &dir.path().join("media"), &EditOp::Delete { position: 5 }).unwrap_err();

    assert!(error.to_string().contains("no block at position 5"));
    assert_eq!(fs::read_to_string(&path).unwrap(), LECTURE);
}
