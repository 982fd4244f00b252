//! Backend factory with automatic detection

use std::env;
use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;

use crate::application::ports::{BufferAccess, OwnershipWatcher, WindowSystem};
use crate::domain::config::Backend;

use super::clipboard::{ArboardBuffers, WlClipboardBuffers};
use super::watcher::{PollingWatcher, WlPasteWatcher};
use super::window::NoWindowSystem;
#[cfg(target_os = "linux")]
use super::x11::{X11Buffers, X11WindowSystem, XfixesWatcher};

/// Backend creation errors
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Backend '{0}' is not supported on this platform")]
    Unsupported(Backend),

    #[error("{0} not found. Please install wl-clipboard.")]
    ToolNotFound(&'static str),

    #[error("X11 backend unavailable: {0}")]
    X11(String),
}

/// Adapters making up one backend
pub struct Adapters {
    pub backend: Backend,
    pub buffers: Box<dyn BufferAccess>,
    pub window_system: Box<dyn WindowSystem>,
    pub watcher: Box<dyn OwnershipWatcher>,
}

/// Check if a tool binary is available using `which`
async fn is_tool_available(tool: &str) -> bool {
    Command::new("which")
        .arg(tool)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map(|s| s.success())
        .unwrap_or(false)
}

fn has_env(name: &str) -> bool {
    env::var_os(name).is_some_and(|value| !value.is_empty())
}

/// Pick a concrete backend from the session environment.
///
/// Priority: Wayland (with wl-paste installed) → X11 → polling
pub async fn detect_backend() -> Backend {
    if cfg!(target_os = "linux") {
        if has_env("WAYLAND_DISPLAY") && is_tool_available("wl-paste").await {
            return Backend::Wayland;
        }
        if has_env("DISPLAY") {
            return Backend::X11;
        }
    }
    Backend::Poll
}

/// Resolve `Auto` to a concrete backend; other preferences pass through
pub async fn resolve_backend(preference: Backend) -> Backend {
    match preference {
        Backend::Auto => detect_backend().await,
        other => other,
    }
}

/// Create only the buffer access adapter of a backend
pub async fn create_buffers(preference: Backend) -> Result<Box<dyn BufferAccess>, BackendError> {
    let backend = resolve_backend(preference).await;
    match backend {
        Backend::Wayland => {
            if !cfg!(target_os = "linux") {
                return Err(BackendError::Unsupported(backend));
            }
            if !is_tool_available("wl-copy").await {
                return Err(BackendError::ToolNotFound("wl-copy"));
            }
            Ok(Box::new(WlClipboardBuffers::new()))
        }
        Backend::X11 => create_x11_buffers(),
        Backend::Poll | Backend::Auto => Ok(Box::new(ArboardBuffers::new())),
    }
}

#[cfg(target_os = "linux")]
fn create_x11_buffers() -> Result<Box<dyn BufferAccess>, BackendError> {
    let buffers = X11Buffers::connect().map_err(|e| BackendError::X11(e.to_string()))?;
    Ok(Box::new(buffers))
}

#[cfg(not(target_os = "linux"))]
fn create_x11_buffers() -> Result<Box<dyn BufferAccess>, BackendError> {
    Err(BackendError::Unsupported(Backend::X11))
}

/// Create every adapter of a backend.
///
/// Returns the adapters and the concrete backend that was picked.
pub async fn create_adapters(
    preference: Backend,
    poll_interval: Duration,
) -> Result<Adapters, BackendError> {
    let backend = resolve_backend(preference).await;
    let buffers = create_buffers(backend).await?;
    log::debug!("Using {} backend", backend);

    match backend {
        Backend::Wayland => {
            if !is_tool_available("wl-paste").await {
                return Err(BackendError::ToolNotFound("wl-paste"));
            }
            Ok(Adapters {
                backend,
                buffers,
                window_system: Box::new(NoWindowSystem),
                watcher: Box::new(WlPasteWatcher::new()),
            })
        }
        Backend::X11 => create_x11(buffers),
        Backend::Poll | Backend::Auto => Ok(Adapters {
            backend: Backend::Poll,
            buffers,
            window_system: Box::new(NoWindowSystem),
            watcher: Box::new(PollingWatcher::new(poll_interval)),
        }),
    }
}

#[cfg(target_os = "linux")]
fn create_x11(buffers: Box<dyn BufferAccess>) -> Result<Adapters, BackendError> {
    let window_system =
        X11WindowSystem::connect().map_err(|e| BackendError::X11(e.to_string()))?;
    Ok(Adapters {
        backend: Backend::X11,
        buffers,
        window_system: Box::new(window_system),
        watcher: Box::new(XfixesWatcher::new()),
    })
}

#[cfg(not(target_os = "linux"))]
fn create_x11(_buffers: Box<dyn BufferAccess>) -> Result<Adapters, BackendError> {
    Err(BackendError::Unsupported(Backend::X11))
}
