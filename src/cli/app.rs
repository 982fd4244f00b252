//! App runners for the watch loop and the one-shot buffer commands

use std::env;
use std::future::Future;
use std::process::ExitCode;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::application::ports::{BufferAccess, Clock, ConfigStore, OwnershipWatcher, WindowSystem};
use crate::application::{BufferChanged, ClipboardMonitor};
use crate::domain::buffer::{BufferData, BufferMode, MIME_OWNER, MIME_TEXT};
use crate::domain::config::{AppConfig, Backend};
use crate::domain::monitor::CheckPolicy;
use crate::infrastructure::{create_adapters, Adapters, SystemClock, XdgConfigStore};

use super::presenter::Presenter;
use super::signals::ShutdownSignal;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Environment variable overriding the configured backend
pub const BACKEND_ENV: &str = "CLIPWATCH_BACKEND";

type Monitor = ClipboardMonitor<Box<dyn BufferAccess>, Box<dyn WindowSystem>, SystemClock>;

/// Parsed monitor options
#[derive(Debug, Clone)]
pub struct WatchOptions {
    pub formats: Vec<String>,
    pub clipboard: bool,
    pub selection: bool,
    pub backend: Backend,
    pub poll_interval: Duration,
    pub policy: CheckPolicy,
}

impl WatchOptions {
    /// Build options from a merged config.
    ///
    /// Fails with a message if the backend is not a known name.
    pub fn from_config(config: &AppConfig) -> Result<Self, String> {
        let backend = match config.backend.as_deref() {
            Some(name) => name.parse::<Backend>().map_err(|e| e.to_string())?,
            None => Backend::default(),
        };

        Ok(Self {
            formats: config.formats_or_default(),
            clipboard: config.clipboard_or_default(),
            selection: config.selection_or_default(),
            backend,
            poll_interval: Duration::from_millis(config.poll_interval_or_default()),
            policy: config.check_policy(),
        })
    }

    /// Buffers to watch
    pub fn modes(&self) -> Vec<BufferMode> {
        let mut modes = Vec::with_capacity(2);
        if self.clipboard {
            modes.push(BufferMode::Clipboard);
        }
        if self.selection {
            modes.push(BufferMode::Selection);
        }
        modes
    }
}

/// Monitor wired to a backend, plus the parts the monitor does not own
struct Session {
    backend: Backend,
    monitor: Monitor,
    events: mpsc::UnboundedReceiver<BufferChanged>,
    watcher: Box<dyn OwnershipWatcher>,
}

async fn open_session(options: &WatchOptions) -> Result<Session, String> {
    let Adapters {
        backend,
        buffers,
        window_system,
        watcher,
    } = create_adapters(options.backend, options.poll_interval)
        .await
        .map_err(|e| e.to_string())?;

    let (monitor, events) =
        ClipboardMonitor::new(buffers, window_system, SystemClock::new(), options.policy);

    Ok(Session {
        backend,
        monitor,
        events,
        watcher,
    })
}

/// Take the baseline of both buffers, then switch off the unwanted ones
async fn start_watching<B, W, C>(monitor: &mut ClipboardMonitor<B, W, C>, options: &WatchOptions)
where
    B: BufferAccess,
    W: WindowSystem,
    C: Clock,
{
    monitor.start_monitoring(&options.formats).await;
    monitor.set_monitoring_enabled(BufferMode::Clipboard, options.clipboard);
    monitor.set_monitoring_enabled(BufferMode::Selection, options.selection);
}

/// Fire due timers unless `stop` completes first.
///
/// Reads run inline and a stalled owner holds them until the read timeout.
/// Returns false if stopped.
async fn process_or_stop<B, W, C>(
    monitor: &mut ClipboardMonitor<B, W, C>,
    stop: impl Future<Output = ()>,
) -> bool
where
    B: BufferAccess,
    W: WindowSystem,
    C: Clock,
{
    tokio::select! {
        _ = monitor.process_due_timers() => true,
        _ = stop => false,
    }
}

async fn sleep_for(ms: Option<u64>) {
    match ms {
        Some(ms) => tokio::time::sleep(Duration::from_millis(ms)).await,
        None => std::future::pending().await,
    }
}

/// Run the monitor until SIGINT/SIGTERM, printing every change event
pub async fn run_watch(options: WatchOptions, presenter: Presenter) -> ExitCode {
    let modes = options.modes();
    if modes.is_empty() {
        presenter.error("Nothing to watch: both clipboard and selection are disabled");
        return ExitCode::from(EXIT_USAGE_ERROR);
    }

    let mut shutdown = match ShutdownSignal::listen() {
        Ok(shutdown) => shutdown,
        Err(e) => {
            presenter.error(&format!("Failed to setup signal handler: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let Session {
        backend,
        mut monitor,
        mut events,
        watcher,
    } = match open_session(&options).await {
        Ok(session) => session,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let (sender, mut notifications) = mpsc::unbounded_channel();
    if let Err(e) = watcher.watch(&modes, sender) {
        presenter.error(&e.to_string());
        return ExitCode::from(EXIT_ERROR);
    }

    start_watching(&mut monitor, &options).await;
    presenter.info(&format!(
        "Watching {} ({} backend). Press Ctrl+C to stop.",
        modes
            .iter()
            .map(BufferMode::as_str)
            .collect::<Vec<_>>()
            .join(" and "),
        backend
    ));

    loop {
        while let Ok(event) = events.try_recv() {
            presenter.event(event.mode, &monitor.data(event.mode));
        }

        let wait = monitor.time_until_next();
        tokio::select! {
            _ = shutdown.recv() => break,
            notification = notifications.recv() => match notification {
                Some(mode) => monitor.on_ownership_changed(mode),
                None => {
                    presenter.error("Ownership watcher stopped");
                    return ExitCode::from(EXIT_ERROR);
                }
            },
            _ = sleep_for(wait) => {
                let stop = async {
                    shutdown.recv().await;
                };
                if !process_or_stop(&mut monitor, stop).await {
                    break;
                }
            }
        }
    }

    ExitCode::from(EXIT_SUCCESS)
}

/// Put text into a buffer, marked as placed by this application
pub async fn run_copy(
    options: WatchOptions,
    mode: BufferMode,
    text: String,
    presenter: Presenter,
) -> ExitCode {
    let mut session = match open_session(&options).await {
        Ok(session) => session,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let data = BufferData::from_text(text).with(MIME_OWNER, Vec::new());
    match session.monitor.set_data(mode, &data).await {
        Ok(()) => {
            presenter.success(&format!("Copied to {}", mode));
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Print the current text of a buffer
pub async fn run_paste(options: WatchOptions, mode: BufferMode, presenter: Presenter) -> ExitCode {
    let mut session = match open_session(&options).await {
        Ok(session) => session,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    session.monitor.start_monitoring(&[MIME_TEXT.to_string()]).await;

    if !session.monitor.tracker(mode).is_enabled() {
        presenter.error(&format!("The {} buffer is not supported on this platform", mode));
        return ExitCode::from(EXIT_ERROR);
    }

    if session.monitor.tracker(mode).retry() > 0 {
        presenter.error(&format!("Failed to read {}", mode));
        return ExitCode::from(EXIT_ERROR);
    }

    match session.monitor.data(mode).text() {
        Some(text) => presenter.output(text),
        None => presenter.warn(&format!("{} holds no text", mode)),
    }
    ExitCode::from(EXIT_SUCCESS)
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load_or_empty().await;

    let env_config = AppConfig {
        backend: env::var(BACKEND_ENV).ok().filter(|s| !s.is_empty()),
        ..Default::default()
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::BufferError;
    use crate::domain::buffer::BufferContent;
    use crate::infrastructure::{ManualClock, NoWindowSystem};

    #[test]
    fn options_from_defaults() {
        let options = WatchOptions::from_config(&AppConfig::defaults()).unwrap();
        assert_eq!(options.backend, Backend::Auto);
        assert!(options.clipboard);
        assert_eq!(options.selection, cfg!(target_os = "linux"));
        assert_eq!(options.poll_interval, Duration::from_millis(250));
        assert_eq!(options.policy, CheckPolicy::default());
    }

    #[test]
    fn options_reject_unknown_backend() {
        let config = AppConfig {
            backend: Some("carrier-pigeon".to_string()),
            ..AppConfig::defaults()
        };
        let err = WatchOptions::from_config(&config).unwrap_err();
        assert!(err.contains("carrier-pigeon"));
    }

    #[derive(Default)]
    struct TextBuffers {
        stall: bool,
    }

    #[async_trait::async_trait]
    impl BufferAccess for TextBuffers {
        async fn read(&self, _mode: BufferMode, _formats: &[String]) -> Result<BufferContent, BufferError> {
            if self.stall {
                std::future::pending::<()>().await;
            }
            Ok(BufferContent::new(BufferData::from_text("x")))
        }

        async fn write(&self, _mode: BufferMode, _data: &BufferData) -> Result<(), BufferError> {
            Ok(())
        }
    }

    fn test_monitor(
        stall: bool,
    ) -> (
        ClipboardMonitor<TextBuffers, NoWindowSystem, ManualClock>,
        mpsc::UnboundedReceiver<BufferChanged>,
    ) {
        ClipboardMonitor::new(
            TextBuffers { stall },
            NoWindowSystem,
            ManualClock::new(),
            CheckPolicy::default(),
        )
    }

    #[tokio::test]
    async fn switches_apply_after_baseline() {
        let config = AppConfig {
            selection: Some(false),
            ..AppConfig::defaults()
        };
        let options = WatchOptions::from_config(&config).unwrap();
        let (mut monitor, mut events) = test_monitor(false);

        start_watching(&mut monitor, &options).await;

        assert_eq!(events.try_recv().unwrap().mode, BufferMode::Clipboard);
        assert_eq!(events.try_recv().unwrap().mode, BufferMode::Selection);
        assert_eq!(monitor.data(BufferMode::Selection).text(), Some("x"));
        assert!(monitor.tracker(BufferMode::Clipboard).is_enabled());
        assert!(!monitor.tracker(BufferMode::Selection).is_enabled());
    }

    #[tokio::test]
    async fn stop_interrupts_stalled_read() {
        let (mut monitor, _events) = test_monitor(true);
        monitor.on_ownership_changed(BufferMode::Clipboard);

        assert!(!process_or_stop(&mut monitor, async {}).await);
        assert!(monitor.next_deadline().is_none());
    }

    #[tokio::test]
    async fn idle_timers_finish_before_stop() {
        let (mut monitor, _events) = test_monitor(false);
        assert!(process_or_stop(&mut monitor, std::future::pending()).await);
    }

    #[test]
    fn disabled_buffers_are_not_watched() {
        let config = AppConfig {
            selection: Some(false),
            ..AppConfig::defaults()
        };
        let options = WatchOptions::from_config(&config).unwrap();
        assert_eq!(options.modes(), vec![BufferMode::Clipboard]);
    }
}
