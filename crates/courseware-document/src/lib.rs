//! Lecture content as an ordered list of typed blocks.
//!
//! A [`Document`] is edited in place (add, retype, move, delete, attach an
//! uploaded image) and converted to and from the stored text format by the
//! [`codec`] module. A document is never empty: removing the last block
//! leaves a single empty paragraph behind.
//!
//! # Example
//!
//! ```
//! use courseware_document::{BlockKind, Document, MoveDirection};
//!
//! let mut doc = Document::from_text("# Intro\n\nWelcome to the course.");
//! let id = doc.add_block(BlockKind::List);
//! doc.update_text(id, "bring a notebook").unwrap();
//! doc.move_block(id, MoveDirection::Up).unwrap();
//!
//! assert_eq!(
//!     doc.to_text(),
//!     "# Intro\n\n- bring a notebook\n\nWelcome to the course."
//! );
//! ```

#![deny(unsafe_code)]

mod block;
pub mod codec;
mod document;
mod error;
mod upload;

pub use block::{BlockKind, ContentBlock, MoveDirection};
pub use codec::{parse, serialize};
pub use document::Document;
pub use error::{DocumentError, UploadError};
pub use upload::{ImageFile, ImageUploader, UploadContext};
