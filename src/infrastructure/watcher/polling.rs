//! Polling ownership watcher

use std::thread;
use std::time::Duration;

use crate::application::ports::{NotificationSender, OwnershipWatcher, WatchError};
use crate::domain::buffer::BufferMode;
use crate::infrastructure::clipboard::ArboardBuffers;

/// Notifies when the text of a buffer changes between two polls.
///
/// Only a content hash is kept between polls. Misses changes that revert
/// within one interval and changes of non-text formats.
pub struct PollingWatcher {
    interval: Duration,
}

impl PollingWatcher {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

/// Hash of the current text, `None` for an empty buffer or a failed read
fn fingerprint(mode: BufferMode) -> Option<blake3::Hash> {
    match ArboardBuffers::read_text(mode) {
        Ok(text) => text.map(|t| blake3::hash(t.as_bytes())),
        Err(e) => {
            log::trace!("Poll of {} failed: {}", mode, e);
            None
        }
    }
}

fn run(interval: Duration, modes: Vec<BufferMode>, sender: NotificationSender) {
    let mut last: Vec<Option<blake3::Hash>> = modes.iter().map(|&m| fingerprint(m)).collect();

    loop {
        thread::sleep(interval);

        for (mode, previous) in modes.iter().zip(last.iter_mut()) {
            let current = fingerprint(*mode);
            if current == *previous {
                continue;
            }
            *previous = current;

            if sender.send(*mode).is_err() {
                // Monitor is gone
                return;
            }
        }
    }
}

impl OwnershipWatcher for PollingWatcher {
    fn watch(&self, modes: &[BufferMode], sender: NotificationSender) -> Result<(), WatchError> {
        let interval = self.interval;
        let modes = modes.to_vec();

        thread::Builder::new()
            .name("clipboard-poller".to_string())
            .spawn(move || run(interval, modes, sender))
            .map_err(|e| WatchError::SpawnFailed(e.to_string()))?;

        log::info!("Polling buffers every {}ms", interval.as_millis());
        Ok(())
    }
}
