//! Document error types.

use std::path::PathBuf;

use courseware_model::BlockId;
use thiserror::Error;

/// Errors from structural document edits.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("block not found: {0}")]
    BlockNotFound(BlockId),

    #[error("no block at position {position} (document has {len} blocks)")]
    PositionOutOfRange { position: usize, len: usize },

    #[error("unknown block kind: {0:?}")]
    UnknownKind(String),

    #[error("unknown move direction: {0:?}")]
    UnknownDirection(String),

    #[error("image upload failed")]
    Upload(#[from] UploadError),
}

/// Failure reported by an image upload collaborator.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The file could not be read or stored locally.
    #[error("failed to {operation} {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The upload service refused the file.
    #[error("upload rejected: {message}")]
    Rejected { message: String },

    /// The upload service could not be reached.
    #[error("upload service unavailable: {message}")]
    Unavailable { message: String },
}

impl UploadError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io { path, .. } => format!("Could not read or store the image at {}", path.display()),
            Self::Rejected { message } => format!("The image was not accepted: {message}"),
            Self::Unavailable { .. } => {
                "The upload service could not be reached. Try again later.".to_string()
            }
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Io { operation, .. } if *operation == "read" => {
                Some("Check that the file exists and you have permission to read it.".into())
            }
            Self::Io { .. } => {
                Some("Check that you have permission to write to the media directory.".into())
            }
            Self::Rejected { .. } => None,
            Self::Unavailable { .. } => Some("The block keeps its previous content.".into()),
        }
    }
}
