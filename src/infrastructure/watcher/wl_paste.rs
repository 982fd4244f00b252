//! Wayland ownership watcher using `wl-paste --watch`

use std::io::ErrorKind;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};

use crate::application::ports::{NotificationSender, OwnershipWatcher, WatchError};
use crate::domain::buffer::BufferMode;

/// Runs one `wl-paste --watch echo` child per buffer.
///
/// `wl-paste` runs the command once per offer, so every output line is a
/// notification. The first line arrives right after start and is redundant.
///
/// Must be started from within a tokio runtime.
pub struct WlPasteWatcher;

impl WlPasteWatcher {
    pub fn new() -> Self {
        Self
    }

    fn spawn(mode: BufferMode) -> Result<Child, WatchError> {
        let mut command = Command::new("wl-paste");
        if mode == BufferMode::Selection {
            command.arg("--primary");
        }
        command
            .args(["--watch", "echo"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        command.spawn().map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                WatchError::ToolNotFound("wl-paste")
            } else {
                WatchError::SpawnFailed(e.to_string())
            }
        })
    }
}

impl Default for WlPasteWatcher {
    fn default() -> Self {
        Self::new()
    }
}

async fn forward(mode: BufferMode, mut child: Child, sender: NotificationSender) {
    let Some(stdout) = child.stdout.take() else {
        return;
    };
    let mut lines = BufReader::new(stdout).lines();

    loop {
        match lines.next_line().await {
            Ok(Some(_)) => {
                if sender.send(mode).is_err() {
                    // Monitor is gone; dropping the child kills it
                    return;
                }
            }
            Ok(None) => {
                log::warn!("wl-paste watcher for {} exited", mode);
                return;
            }
            Err(e) => {
                log::warn!("wl-paste watcher for {} failed: {}", mode, e);
                return;
            }
        }
    }
}

impl OwnershipWatcher for WlPasteWatcher {
    fn watch(&self, modes: &[BufferMode], sender: NotificationSender) -> Result<(), WatchError> {
        for &mode in modes {
            let child = Self::spawn(mode)?;
            tokio::spawn(forward(mode, child, sender.clone()));
        }

        log::info!("Watching Wayland buffer offers with wl-paste");
        Ok(())
    }
}
