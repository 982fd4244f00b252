//! Clipboard monitor use case
//!
//! Turns unreliable ownership-change notifications into debounced,
//! deduplicated [`BufferChanged`] events.
//!
//! Flow for one notification:
//!   on_ownership_changed -> check-again timer (0ms)
//!   check                -> update_buffer (clipboard, then selection)
//!   update_buffer        -> pending snapshot, emit timer (0ms) on change
//!   emit timer           -> commit -> BufferChanged
//!
//! Every timer is a deadline on the injected [`Clock`]; the caller drives the
//! monitor by calling [`ClipboardMonitor::process_due_timers`] whenever
//! [`ClipboardMonitor::next_deadline`] has passed.

use tokio::sync::mpsc;

use crate::domain::buffer::{BufferData, BufferMode, ALL_MODES, MIME_OWNER, MIME_WINDOW_TITLE};
use crate::domain::monitor::{BufferTracker, CheckAgain, CheckPolicy, SingleShotTimer};

use super::ports::{BufferAccess, BufferError, Clock, WindowSystem};

/// Event published when a buffer's committed snapshot changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferChanged {
    pub mode: BufferMode,
}

/// Timer that fired during [`ClipboardMonitor::process_due_timers`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DueTimer {
    CheckAgain,
    EmitChange(BufferMode),
}

/// Clipboard and primary selection monitor
pub struct ClipboardMonitor<B, W, C>
where
    B: BufferAccess,
    W: WindowSystem,
    C: Clock,
{
    buffers: B,
    window_system: W,
    clock: C,
    policy: CheckPolicy,
    clipboard: BufferTracker,
    selection: BufferTracker,
    check_again: SingleShotTimer,
    events: mpsc::UnboundedSender<BufferChanged>,
}

impl<B, W, C> ClipboardMonitor<B, W, C>
where
    B: BufferAccess,
    W: WindowSystem,
    C: Clock,
{
    /// Create a new monitor and the receiver for its change events
    pub fn new(
        buffers: B,
        window_system: W,
        clock: C,
        policy: CheckPolicy,
    ) -> (Self, mpsc::UnboundedReceiver<BufferChanged>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let monitor = Self {
            buffers,
            window_system,
            clock,
            policy,
            clipboard: BufferTracker::new(BufferMode::Clipboard),
            selection: BufferTracker::new(BufferMode::Selection),
            check_again: SingleShotTimer::new(0),
            events,
        };
        (monitor, receiver)
    }

    /// Tracker state for a buffer
    pub fn tracker(&self, mode: BufferMode) -> &BufferTracker {
        match mode {
            BufferMode::Clipboard => &self.clipboard,
            BufferMode::Selection => &self.selection,
        }
    }

    fn tracker_mut(&mut self, mode: BufferMode) -> &mut BufferTracker {
        match mode {
            BufferMode::Clipboard => &mut self.clipboard,
            BufferMode::Selection => &mut self.selection,
        }
    }

    /// Start monitoring with the given clipboard formats.
    ///
    /// Enables both buffers, reads them and commits what it finds, so the
    /// first event of each buffer reflects its real content. Buffers the
    /// platform cannot read stay disabled without a baseline event.
    pub async fn start_monitoring(&mut self, formats: &[String]) {
        for &mode in ALL_MODES {
            let tracker = self.tracker_mut(mode);
            tracker.set_enabled(true);
            tracker.set_formats(formats);
            tracker.clear_owners();
        }

        for &mode in ALL_MODES {
            self.update_buffer(mode).await;
            if self.tracker(mode).is_enabled() {
                self.commit(mode);
            }
        }

        log::info!(
            "Monitoring started (clipboard formats: {})",
            self.clipboard.formats().join(", ")
        );
    }

    /// Enable or disable reacting to a buffer.
    ///
    /// Takes effect at the next notification or check; work already
    /// scheduled for a disabled buffer becomes a no-op.
    pub fn set_monitoring_enabled(&mut self, mode: BufferMode, enabled: bool) {
        self.tracker_mut(mode).set_enabled(enabled);
    }

    /// Last committed data of a buffer.
    ///
    /// Unless the data was placed by this application, the owner window
    /// title is attached under [`MIME_WINDOW_TITLE`].
    pub fn data(&self, mode: BufferMode) -> BufferData {
        let tracker = self.tracker(mode);
        let mut data = tracker.data().clone();
        if !data.contains(MIME_OWNER) {
            data.insert(MIME_WINDOW_TITLE, tracker.owner().as_bytes().to_vec());
        }
        data
    }

    /// Owner window title of the last committed data
    pub fn owner(&self, mode: BufferMode) -> &str {
        self.tracker(mode).owner()
    }

    /// Write data to a buffer.
    ///
    /// Pending window system events are processed first; taking ownership
    /// while older selection requests are still queued makes the window
    /// system answer them with the new owner.
    pub async fn set_data(&mut self, mode: BufferMode, data: &BufferData) -> Result<(), BufferError> {
        self.window_system.process_events();
        self.buffers.write(mode, data).await
    }

    /// Handle an ownership-change notification
    pub fn on_ownership_changed(&mut self, mode: BufferMode) {
        if !self.tracker(mode).is_enabled() {
            return;
        }

        // Grab the title right away; later it may already point elsewhere.
        let title = self.window_system.owner_title(mode);
        let tracker = self.tracker_mut(mode);
        tracker.mark_changed();
        if tracker.set_new_owner(title) {
            log::debug!("New {} owner: \"{}\"", mode, tracker.new_owner());
        }

        if mode == BufferMode::Selection && self.check_again.is_active() {
            log::debug!("Postponing fast selection change");
            self.selection.emit_timer_mut().stop();
            return;
        }

        self.check_again_later(true, 0);
    }

    /// Earliest armed deadline across all timers
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers().filter_map(SingleShotTimer::deadline).min()
    }

    /// Milliseconds until the next deadline, if any timer is armed
    pub fn time_until_next(&self) -> Option<u64> {
        let now = self.clock.now_ms();
        self.timers().filter_map(|timer| timer.remaining(now)).min()
    }

    fn timers(&self) -> impl Iterator<Item = &SingleShotTimer> {
        [
            &self.check_again,
            self.clipboard.emit_timer(),
            self.selection.emit_timer(),
        ]
        .into_iter()
    }

    /// Fire every timer whose deadline has passed.
    ///
    /// Timers fire earliest first; on a tie the check-again timer goes
    /// before the emit timers, clipboard before selection.
    pub async fn process_due_timers(&mut self) {
        while let Some(timer) = self.take_due_timer() {
            match timer {
                DueTimer::CheckAgain => self.check().await,
                DueTimer::EmitChange(mode) => self.on_emit_timer(mode),
            }
        }
    }

    fn take_due_timer(&mut self) -> Option<DueTimer> {
        let now = self.clock.now_ms();
        let candidates = [
            (&self.check_again, DueTimer::CheckAgain),
            (
                self.clipboard.emit_timer(),
                DueTimer::EmitChange(BufferMode::Clipboard),
            ),
            (
                self.selection.emit_timer(),
                DueTimer::EmitChange(BufferMode::Selection),
            ),
        ];

        let (_, timer) = candidates
            .into_iter()
            .filter(|(timer, _)| timer.is_due(now))
            .filter_map(|(timer, due)| timer.deadline().map(|d| (d, due)))
            .min_by_key(|(deadline, _)| *deadline)?;

        match timer {
            DueTimer::CheckAgain => self.check_again.stop(),
            DueTimer::EmitChange(mode) => self.tracker_mut(mode).emit_timer_mut().stop(),
        }
        Some(timer)
    }

    /// Re-read both buffers and re-arm the check-again timer
    async fn check(&mut self) {
        self.clipboard.emit_timer_mut().stop();
        self.selection.emit_timer_mut().stop();
        self.check_again.stop();

        // Clipboard first; a clipboard change skips the selection this cycle.
        let changed = self.update_buffer(BufferMode::Clipboard).await
            || self.update_buffer(BufferMode::Selection).await;

        // A failed read already scheduled its own retry.
        if self.check_again.is_active() {
            return;
        }

        // Check again in case some notifications were not delivered or older
        // data arrived after newer data.
        let interval = self.policy.next_interval(self.check_again.interval());
        self.check_again_later(changed, interval);
    }

    /// Fetch a buffer into its pending snapshot.
    ///
    /// Returns true if a commit was scheduled.
    async fn update_buffer(&mut self, mode: BufferMode) -> bool {
        let tracker = self.tracker(mode);
        if !tracker.is_enabled() {
            return false;
        }

        let formats = tracker.formats().to_vec();
        let result = self.buffers.read(mode, &formats).await;
        let now = self.clock.now_ms();
        let policy = self.policy;

        match result {
            Err(BufferError::Unsupported(_)) => {
                log::info!("Not monitoring {}: unsupported on this platform", mode);
                self.tracker_mut(mode).set_enabled(false);
                false
            }
            Err(e) => {
                let tracker = self.tracker_mut(mode);
                let retry_scheduled = tracker.record_failure(&policy);
                let retry = tracker.retry();
                if retry_scheduled {
                    self.check_again.start_with(now, policy.retry_delay(retry));
                }

                log::warn!(
                    "Failed to retrieve {} data (try {}/{}): {}",
                    mode,
                    retry,
                    policy.max_retries,
                    e
                );
                false
            }
            Ok(content) => {
                let tracker = self.tracker_mut(mode);
                tracker.accept(content);
                if !tracker.detect_change() {
                    return false;
                }
                tracker.emit_timer_mut().start(now);
                true
            }
        }
    }

    fn on_emit_timer(&mut self, mode: BufferMode) {
        if mode == BufferMode::Selection && self.is_selection_incomplete() {
            log::debug!("Selection is incomplete");
            if !self.check_again.is_active() {
                let now = self.clock.now_ms();
                self.check_again.start_with(now, self.policy.min_interval_ms);
            }
            return;
        }

        self.commit(mode);
    }

    /// True only if a mouse button or Shift is held, i.e. the user is
    /// probably still selecting text.
    fn is_selection_incomplete(&self) -> bool {
        self.window_system
            .pointer_state()
            .map(|state| state.is_selecting())
            .unwrap_or(false)
    }

    /// Publish the pending snapshot of a buffer
    fn commit(&mut self, mode: BufferMode) {
        self.tracker_mut(mode).commit();
        log::debug!(
            "Committed {} ({} formats, {} bytes, owner \"{}\")",
            mode,
            self.tracker(mode).data().len(),
            self.tracker(mode).data().size(),
            self.tracker(mode).owner()
        );

        // Receiver gone means nobody listens anymore; keep tracking anyway.
        let _ = self.events.send(BufferChanged { mode });
    }

    fn check_again_later(&mut self, changed: bool, interval: u64) {
        let now = self.clock.now_ms();
        self.check_again.set_interval(interval);
        match self.policy.schedule(changed, interval) {
            CheckAgain::Start(ms) => self.check_again.start_with(now, ms),
            CheckAgain::Idle => self.check_again.set_interval(0),
        }

        log::debug!(
            "Clipboard {}, selection {}.{}",
            describe(&self.clipboard),
            describe(&self.selection),
            if self.check_again.is_active() {
                format!(" Test clipboard in {}ms.", self.check_again.interval())
            } else {
                String::new()
            }
        );
    }
}

fn describe(tracker: &BufferTracker) -> &'static str {
    if tracker.has_pending_difference() {
        "*CHANGED*"
    } else {
        "unchanged"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::PointerState;
    use crate::domain::buffer::{BufferContent, MIME_TEXT};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct MockBuffers {
        clipboard: Mutex<Option<BufferData>>,
        writes: Mutex<Vec<(BufferMode, BufferData)>>,
    }

    #[async_trait]
    impl BufferAccess for Arc<MockBuffers> {
        async fn read(&self, mode: BufferMode, _formats: &[String]) -> Result<BufferContent, BufferError> {
            match mode {
                BufferMode::Clipboard => self
                    .clipboard
                    .lock()
                    .unwrap()
                    .clone()
                    .map(BufferContent::new)
                    .ok_or(BufferError::ReadFailed {
                        mode,
                        message: "owner not responding".to_string(),
                    }),
                BufferMode::Selection => Ok(BufferContent::default()),
            }
        }

        async fn write(&self, mode: BufferMode, data: &BufferData) -> Result<(), BufferError> {
            self.writes.lock().unwrap().push((mode, data.clone()));
            Ok(())
        }
    }

    struct MockWindows;

    impl WindowSystem for MockWindows {
        fn owner_title(&self, _mode: BufferMode) -> String {
            "Terminal".to_string()
        }

        fn pointer_state(&self) -> Option<PointerState> {
            None
        }
    }

    #[derive(Default)]
    struct MockClock(AtomicU64);

    impl Clock for MockClock {
        fn now_ms(&self) -> u64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    fn monitor(
        buffers: &Arc<MockBuffers>,
    ) -> (
        ClipboardMonitor<Arc<MockBuffers>, MockWindows, Arc<MockClock>>,
        mpsc::UnboundedReceiver<BufferChanged>,
    ) {
        ClipboardMonitor::new(
            Arc::clone(buffers),
            MockWindows,
            Arc::new(MockClock::default()),
            CheckPolicy::default(),
        )
    }

    #[tokio::test]
    async fn baseline_commits_both_buffers() {
        let buffers = Arc::new(MockBuffers::default());
        *buffers.clipboard.lock().unwrap() = Some(BufferData::from_text("hi"));
        let (mut monitor, mut events) = monitor(&buffers);

        monitor.start_monitoring(&[MIME_TEXT.to_string()]).await;

        assert_eq!(events.try_recv().unwrap().mode, BufferMode::Clipboard);
        assert_eq!(events.try_recv().unwrap().mode, BufferMode::Selection);
        assert!(events.try_recv().is_err());
        assert_eq!(monitor.tracker(BufferMode::Clipboard).data().text(), Some("hi"));
    }

    #[tokio::test]
    async fn disabled_buffer_ignores_notifications() {
        let buffers = Arc::new(MockBuffers::default());
        *buffers.clipboard.lock().unwrap() = Some(BufferData::new());
        let (mut monitor, _events) = monitor(&buffers);
        monitor.start_monitoring(&[MIME_TEXT.to_string()]).await;

        monitor.set_monitoring_enabled(BufferMode::Clipboard, false);
        monitor.on_ownership_changed(BufferMode::Clipboard);

        assert!(!monitor.tracker(BufferMode::Clipboard).is_changed());
        assert!(monitor.next_deadline().is_none());
    }

    #[tokio::test]
    async fn notification_records_owner_and_schedules_check() {
        let buffers = Arc::new(MockBuffers::default());
        *buffers.clipboard.lock().unwrap() = Some(BufferData::new());
        let (mut monitor, _events) = monitor(&buffers);
        monitor.start_monitoring(&[MIME_TEXT.to_string()]).await;

        monitor.on_ownership_changed(BufferMode::Clipboard);

        let tracker = monitor.tracker(BufferMode::Clipboard);
        assert!(tracker.is_changed());
        assert_eq!(tracker.new_owner(), "Terminal");
        assert_eq!(monitor.next_deadline(), Some(0));
    }

    #[tokio::test]
    async fn data_attaches_owner_title() {
        let buffers = Arc::new(MockBuffers::default());
        *buffers.clipboard.lock().unwrap() = Some(BufferData::from_text("x"));
        let (mut monitor, _events) = monitor(&buffers);
        monitor.start_monitoring(&[MIME_TEXT.to_string()]).await;

        *buffers.clipboard.lock().unwrap() = Some(BufferData::from_text("y"));
        monitor.on_ownership_changed(BufferMode::Clipboard);
        monitor.process_due_timers().await;

        let data = monitor.data(BufferMode::Clipboard);
        assert_eq!(data.get(MIME_WINDOW_TITLE), Some("Terminal".as_bytes()));
        assert_eq!(monitor.owner(BufferMode::Clipboard), "Terminal");
    }

    #[tokio::test]
    async fn data_keeps_own_data_untitled() {
        let buffers = Arc::new(MockBuffers::default());
        *buffers.clipboard.lock().unwrap() =
            Some(BufferData::from_text("x").with(MIME_OWNER, "me"));
        let (mut monitor, _events) = monitor(&buffers);
        monitor
            .start_monitoring(&[MIME_TEXT.to_string(), MIME_OWNER.to_string()])
            .await;

        let data = monitor.data(BufferMode::Clipboard);
        assert!(!data.contains(MIME_WINDOW_TITLE));
    }

    #[tokio::test]
    async fn set_data_writes_through() {
        let buffers = Arc::new(MockBuffers::default());
        let (mut monitor, _events) = monitor(&buffers);

        monitor
            .set_data(BufferMode::Selection, &BufferData::from_text("paste me"))
            .await
            .unwrap();

        let writes = buffers.writes.lock().unwrap();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].0, BufferMode::Selection);
        assert_eq!(writes[0].1.text(), Some("paste me"));
    }
}
