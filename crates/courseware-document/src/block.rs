//! Content block types.

use std::fmt;
use std::str::FromStr;

use courseware_model::BlockId;
use serde::{Deserialize, Serialize};

use crate::error::DocumentError;

/// The kind of a content block, which decides how it is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Heading1,
    Heading2,
    Heading3,
    Paragraph,
    List,
    /// Text holds the image URL.
    Image,
}

impl BlockKind {
    pub const ALL: [BlockKind; 6] = [
        BlockKind::Heading1,
        BlockKind::Heading2,
        BlockKind::Heading3,
        BlockKind::Paragraph,
        BlockKind::List,
        BlockKind::Image,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Heading1 => "heading1",
            Self::Heading2 => "heading2",
            Self::Heading3 => "heading3",
            Self::Paragraph => "paragraph",
            Self::List => "list",
            Self::Image => "image",
        }
    }

    pub fn is_heading(&self) -> bool {
        matches!(self, Self::Heading1 | Self::Heading2 | Self::Heading3)
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockKind {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DocumentError::UnknownKind(s.to_string()))
    }
}

/// Direction for [`crate::Document::move_block`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

impl FromStr for MoveDirection {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            _ => Err(DocumentError::UnknownDirection(s.to_string())),
        }
    }
}

/// One typed unit of document content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub id: BlockId,
    pub kind: BlockKind,
    pub text: String,
    pub position: usize,
}

impl ContentBlock {
    pub fn new(kind: BlockKind, text: impl Into<String>, position: usize) -> Self {
        Self {
            id: BlockId::generate(),
            kind,
            text: text.into(),
            position,
        }
    }

    pub fn empty_paragraph() -> Self {
        Self::new(BlockKind::Paragraph, String::new(), 0)
    }
}
