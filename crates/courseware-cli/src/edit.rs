//! Structural edits applied to document files.
//!
//! An edit is applied in memory and the file is only rewritten when every
//! block reads back unchanged, so a saved document never loses a block.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use courseware_document::{
    BlockKind, Document, ImageFile, ImageUploader, MoveDirection, UploadContext,
};
use tracing::{info, warn};

use crate::store::write_atomic;

/// Edits address blocks by position, starting at 0.
#[derive(Debug, Clone, Subcommand)]
pub enum EditOp {
    /// Append a block with its text.
    Add {
        kind: BlockKind,
        #[arg(value_name = "TEXT")]
        text: String,
    },

    /// Replace the text of a block.
    Set { position: usize, text: String },

    /// Change the kind of a block, keeping its text.
    Kind { position: usize, kind: BlockKind },

    /// Swap a block with its neighbour.
    Move {
        position: usize,
        direction: MoveDirection,
    },

    /// Remove a block.
    Delete { position: usize },

    /// Upload an image into the media directory and point the block at it.
    Image {
        position: usize,
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
}

/// The saved document and, for image edits, where the image went.
#[derive(Debug)]
pub struct EditOutcome {
    pub document: Document,
    pub image_url: Option<String>,
}

pub fn read_document(path: &Path) -> Result<Document> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    Ok(Document::from_text(&text))
}

pub fn write_document(path: &Path, document: &Document) -> Result<()> {
    if let Some(block) = document.first_unsaveable_block() {
        bail!(
            "block {} ({}) would not read back after saving; give it one line of text \
             that does not start with a block marker",
            block.position,
            block.kind
        );
    }
    let mut text = document.to_text();
    text.push('\n');
    write_atomic(path, text.as_bytes()).with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), blocks = document.len(), "document saved");
    Ok(())
}

/// Apply `op` to `document`, returning the image URL for image edits.
pub fn apply_edit(
    document: &mut Document,
    op: &EditOp,
    context: &UploadContext,
    uploader: &dyn ImageUploader,
) -> Result<Option<String>> {
    match op {
        EditOp::Add { kind, text } => {
            let id = document.add_block(*kind);
            document.update_text(id, text.as_str())?;
        }
        EditOp::Set { position, text } => {
            let id = document.block_at(*position)?.id;
            document.update_text(id, text.as_str())?;
        }
        EditOp::Kind { position, kind } => {
            let id = document.block_at(*position)?.id;
            document.change_kind(id, *kind)?;
        }
        EditOp::Move {
            position,
            direction,
        } => {
            let id = document.block_at(*position)?.id;
            if !document.move_block(id, *direction)? {
                warn!(position, "block is already at the edge, nothing moved");
            }
        }
        EditOp::Delete { position } => {
            let id = document.block_at(*position)?.id;
            document.delete_block(id)?;
        }
        EditOp::Image { position, path } => {
            let id = document.block_at(*position)?.id;
            let image = ImageFile::read(path)
                .with_context(|| format!("read image {}", path.display()))?;
            let url = document
                .upload_image_and_set_block(id, &image, context, uploader)
                .context("upload image")?;
            if document.block(id).is_some_and(|block| block.kind != BlockKind::Image) {
                document.change_kind(id, BlockKind::Image)?;
            }
            return Ok(Some(url));
        }
    }
    Ok(None)
}

/// Read `path`, apply `op` and save the result in place.
///
/// Nothing is written when the edit fails or would leave a block that
/// cannot be read back.
pub fn edit_file(
    path: &Path,
    op: &EditOp,
    context: &UploadContext,
    uploader: &dyn ImageUploader,
) -> Result<EditOutcome> {
    let mut document = read_document(path)?;
    let image_url = apply_edit(&mut document, op, context, uploader)?;
    write_document(path, &document)?;
    Ok(EditOutcome {
        document,
        image_url,
    })
}
