//! Image upload collaborator seam.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::UploadError;

/// Raw image bytes plus the name they were picked under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Read an image from disk.
    pub fn read(path: &Path) -> Result<Self, UploadError> {
        let bytes = std::fs::read(path).map_err(|source| UploadError::Io {
            operation: "read",
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("image")
            .to_string();
        Ok(Self { file_name, bytes })
    }

    /// Lowercase file extension, if any.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
    }
}

/// Which lecture the image belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadContext {
    pub course_id: String,
    pub lecture_id: String,
}

/// Stores an image somewhere resolvable and returns its URL.
pub trait ImageUploader {
    fn upload(&self, file: &ImageFile, context: &UploadContext) -> Result<String, UploadError>;
}
