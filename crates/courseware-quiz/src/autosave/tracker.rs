//! Dirty state tracking for answer auto-save.

/// Tracks unsaved answer changes during an attempt.
///
/// Time is measured in session ticks rather than wall-clock time, so a
/// replayed or test-driven session saves at the same points every run.
#[derive(Debug, Clone, Default)]
pub struct AnswerTracker {
    /// Whether answers changed since the last snapshot.
    dirty: bool,

    /// Seconds since the last successful snapshot (or session start).
    since_last_save: u64,
}

impl AnswerTracker {
    /// Create a new tracker with no unsaved changes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if there are unsaved changes.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn seconds_since_last_save(&self) -> u64 {
        self.since_last_save
    }

    /// Record that answers or flags changed.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Advance session time.
    pub fn advance(&mut self, seconds: u64) {
        self.since_last_save = self.since_last_save.saturating_add(seconds);
    }

    /// Mark that a save has completed successfully.
    pub fn save_complete(&mut self) {
        self.dirty = false;
        self.since_last_save = 0;
    }

    /// Mark that a save has failed.
    ///
    /// The changes stay dirty and the interval restarts, so the next attempt
    /// happens one full interval later.
    pub fn save_failed(&mut self) {
        self.since_last_save = 0;
    }

    /// Check if auto-save should trigger based on the config.
    pub fn should_auto_save(&self, config: &super::AutoSaveConfig) -> bool {
        self.dirty && config.should_save(self.since_last_save)
    }
}
