//! The editable block document.

use courseware_model::BlockId;

use crate::block::{BlockKind, ContentBlock, MoveDirection};
use crate::codec;
use crate::error::DocumentError;
use crate::upload::{ImageFile, ImageUploader, UploadContext};

/// An ordered, never-empty list of content blocks.
///
/// Blocks are stored in position order and `position` always equals the
/// block's index, so positions are unique and contiguous from zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    blocks: Vec<ContentBlock>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// A document holding one empty paragraph.
    pub fn new() -> Self {
        Self {
            blocks: vec![ContentBlock::empty_paragraph()],
        }
    }

    /// Build a document from blocks in any order.
    ///
    /// Blocks are ordered by their current position, then renumbered.
    pub fn from_blocks(mut blocks: Vec<ContentBlock>) -> Self {
        blocks.sort_by_key(|block| block.position);
        let mut document = Self { blocks };
        document.ensure_not_empty();
        document.renumber();
        document
    }

    pub fn from_text(text: &str) -> Self {
        Self::from_blocks(codec::parse(text))
    }

    pub fn to_text(&self) -> String {
        codec::serialize(&self.blocks)
    }

    /// Blocks in position order.
    pub fn blocks(&self) -> &[ContentBlock] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// First block that would not read back unchanged from `to_text`.
    ///
    /// A lone empty paragraph is the empty document and always saves.
    pub fn first_unsaveable_block(&self) -> Option<&ContentBlock> {
        if let [only] = self.blocks.as_slice()
            && only.kind == BlockKind::Paragraph
            && only.text.is_empty()
        {
            return None;
        }
        self.blocks
            .iter()
            .find(|block| !codec::survives_round_trip(block))
    }

    pub fn block(&self, id: BlockId) -> Option<&ContentBlock> {
        self.blocks.iter().find(|block| block.id == id)
    }

    pub fn block_at(&self, position: usize) -> Result<&ContentBlock, DocumentError> {
        self.blocks
            .get(position)
            .ok_or(DocumentError::PositionOutOfRange {
                position,
                len: self.blocks.len(),
            })
    }

    /// Append an empty block of `kind` and return its id.
    pub fn add_block(&mut self, kind: BlockKind) -> BlockId {
        let block = ContentBlock::new(kind, String::new(), self.blocks.len());
        let id = block.id;
        tracing::debug!(%id, %kind, position = block.position, "added block");
        self.blocks.push(block);
        id
    }

    /// Replace a block's text; kind and position are untouched.
    pub fn update_text(&mut self, id: BlockId, text: impl Into<String>) -> Result<(), DocumentError> {
        let block = self.block_mut(id)?;
        block.text = text.into();
        Ok(())
    }

    /// Replace a block's kind; its text is kept as-is.
    pub fn change_kind(&mut self, id: BlockId, kind: BlockKind) -> Result<(), DocumentError> {
        let block = self.block_mut(id)?;
        tracing::debug!(%id, from = %block.kind, to = %kind, "changed block kind");
        block.kind = kind;
        Ok(())
    }

    /// Swap a block with its neighbour. Moving past either end is a no-op.
    ///
    /// Returns whether the document changed.
    pub fn move_block(&mut self, id: BlockId, direction: MoveDirection) -> Result<bool, DocumentError> {
        let index = self.index_of(id)?;
        let target = match direction {
            MoveDirection::Up if index == 0 => return Ok(false),
            MoveDirection::Up => index - 1,
            MoveDirection::Down if index + 1 >= self.blocks.len() => return Ok(false),
            MoveDirection::Down => index + 1,
        };
        self.blocks.swap(index, target);
        self.renumber();
        tracing::debug!(%id, from = index, to = target, "moved block");
        Ok(true)
    }

    /// Remove a block. Removing the only block leaves one empty paragraph.
    pub fn delete_block(&mut self, id: BlockId) -> Result<ContentBlock, DocumentError> {
        let index = self.index_of(id)?;
        let removed = self.blocks.remove(index);
        self.ensure_not_empty();
        self.renumber();
        tracing::debug!(%id, remaining = self.blocks.len(), "deleted block");
        Ok(removed)
    }

    /// Upload an image and store the returned URL as the block's text.
    ///
    /// On failure the document is left unchanged.
    pub fn upload_image_and_set_block(
        &mut self,
        id: BlockId,
        file: &ImageFile,
        context: &UploadContext,
        uploader: &dyn ImageUploader,
    ) -> Result<String, DocumentError> {
        self.index_of(id)?;
        let url = uploader.upload(file, context).inspect_err(|error| {
            tracing::warn!(%id, file = %file.file_name, "image upload failed: {error}");
        })?;
        self.update_text(id, url.clone())?;
        tracing::info!(%id, %url, "image block updated");
        Ok(url)
    }

    fn index_of(&self, id: BlockId) -> Result<usize, DocumentError> {
        self.blocks
            .iter()
            .position(|block| block.id == id)
            .ok_or(DocumentError::BlockNotFound(id))
    }

    fn block_mut(&mut self, id: BlockId) -> Result<&mut ContentBlock, DocumentError> {
        self.blocks
            .iter_mut()
            .find(|block| block.id == id)
            .ok_or(DocumentError::BlockNotFound(id))
    }

    fn ensure_not_empty(&mut self) {
        if self.blocks.is_empty() {
            self.blocks.push(ContentBlock::empty_paragraph());
        }
    }

    fn renumber(&mut self) {
        for (position, block) in self.blocks.iter_mut().enumerate() {
            block.position = position;
        }
    }
}
