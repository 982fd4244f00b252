//! Per-buffer tracker state

use crate::domain::buffer::{BufferContent, BufferData, BufferMode, MIME_TEXT};

use super::interval::CheckPolicy;
use super::timer::SingleShotTimer;

/// State of one monitored buffer.
///
/// Fetched content lands in the pending snapshot (`new_data`, `new_owner`);
/// only [`BufferTracker::commit`] copies it over the committed snapshot.
///
/// Transitions:
///   notification -> changed (optimistic, corrected by the next read)
///   fetch ok     -> retry = 0, pending updated
///   fetch failed -> retry + 1 (bounded)
///   commit       -> committed = pending, changed cleared
#[derive(Debug, Clone)]
pub struct BufferTracker {
    mode: BufferMode,
    enabled: bool,
    formats: Vec<String>,
    data: BufferData,
    owner: String,
    new_data: BufferData,
    new_owner: String,
    new_data_timestamp: Option<Vec<u8>>,
    retry: u32,
    changed: bool,
    emit_timer: SingleShotTimer,
}

impl BufferTracker {
    /// Create an enabled tracker with no formats and empty snapshots
    pub fn new(mode: BufferMode) -> Self {
        Self {
            mode,
            enabled: true,
            formats: Vec::new(),
            data: BufferData::new(),
            owner: String::new(),
            new_data: BufferData::new(),
            new_owner: String::new(),
            new_data_timestamp: None,
            retry: 0,
            changed: false,
            emit_timer: SingleShotTimer::new(0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Formats requested when reading this buffer
    pub fn formats(&self) -> &[String] {
        &self.formats
    }

    /// Set accepted formats.
    ///
    /// The selection only ever accepts plain text: asking an application
    /// for large data on every mouse selection change can stall it.
    pub fn set_formats(&mut self, formats: &[String]) {
        self.formats = match self.mode {
            BufferMode::Clipboard => formats.to_vec(),
            BufferMode::Selection => vec![MIME_TEXT.to_string()],
        };
    }

    /// Last committed content
    pub fn data(&self) -> &BufferData {
        &self.data
    }

    /// Owner window title of the committed content
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Most recently fetched, not yet committed content
    pub fn new_data(&self) -> &BufferData {
        &self.new_data
    }

    /// Owner window title recorded at the last notification
    pub fn new_owner(&self) -> &str {
        &self.new_owner
    }

    pub fn retry(&self) -> u32 {
        self.retry
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Check whether pending and committed content differ
    pub fn has_pending_difference(&self) -> bool {
        self.data != self.new_data
    }

    pub fn emit_timer(&self) -> &SingleShotTimer {
        &self.emit_timer
    }

    pub fn emit_timer_mut(&mut self) -> &mut SingleShotTimer {
        &mut self.emit_timer
    }

    /// Forget both owner titles
    pub fn clear_owners(&mut self) {
        self.owner.clear();
        self.new_owner.clear();
    }

    /// Flag a change optimistically; a fetch may later find identical content
    pub fn mark_changed(&mut self) {
        self.changed = true;
    }

    /// Record the owner title seen at a notification.
    ///
    /// Returns true if it differs from the previous pending owner.
    pub fn set_new_owner(&mut self, title: String) -> bool {
        if title == self.new_owner {
            return false;
        }
        self.new_owner = title;
        true
    }

    /// Count a failed read.
    ///
    /// Returns true if the counter was incremented, i.e. another attempt
    /// should be scheduled.
    pub fn record_failure(&mut self, policy: &CheckPolicy) -> bool {
        if policy.can_retry(self.retry) {
            self.retry += 1;
            true
        } else {
            false
        }
    }

    /// Store a successful read in the pending snapshot.
    ///
    /// Content is only cloned when the freshness token is missing or differs
    /// from the previous read.
    pub fn accept(&mut self, content: BufferContent) {
        self.retry = 0;

        let timestamp = content.timestamp.filter(|t| !t.is_empty());
        if timestamp.is_none() || self.new_data_timestamp != timestamp {
            self.new_data_timestamp = timestamp;
            self.new_data = content.data.clone_formats(&self.formats);
        }
    }

    /// Decide whether a commit should be scheduled.
    ///
    /// Called after a successful read, so the pending content is known: an
    /// optimistic flag set by a notification is dropped again when the
    /// content turned out identical to the committed snapshot.
    pub fn detect_change(&mut self) -> bool {
        self.changed = self.has_pending_difference();
        self.changed
    }

    /// Publish the pending snapshot
    pub fn commit(&mut self) {
        self.data = self.new_data.clone();
        self.owner = self.new_owner.clone();
        self.changed = false;
        self.emit_timer.stop();
    }
}
