//! Library side of the `courseware` command-line host.
//!
//! File-backed collaborators, settings, logging setup and the interactive
//! quiz runner live here, along with document file edits, so they can be tested without the binary.

pub mod config;
pub mod edit;
pub mod logging;
pub mod runner;
pub mod store;
