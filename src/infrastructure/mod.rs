//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces, integrating
//! with arboard, wl-clipboard, X11 and the filesystem.

pub mod clipboard;
pub mod clock;
pub mod config;
pub mod factory;
pub mod watcher;
pub mod window;
#[cfg(target_os = "linux")]
pub mod x11;

// Re-export adapters
pub use clipboard::{ArboardBuffers, WlClipboardBuffers};
pub use clock::{ManualClock, SystemClock};
pub use config::XdgConfigStore;
pub use factory::{create_adapters, create_buffers, detect_backend, Adapters, BackendError};
pub use watcher::{PollingWatcher, WlPasteWatcher};
pub use window::NoWindowSystem;
