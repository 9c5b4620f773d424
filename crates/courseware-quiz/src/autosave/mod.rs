//! Auto-save of in-progress answers.
//!
//! Provides:
//! - `AnswerTracker` - Tracks unsaved answer changes in session seconds
//! - `AutoSaveConfig` - Settings for the auto-save interval

mod config;
mod tracker;

pub use config::AutoSaveConfig;
pub use tracker::AnswerTracker;
