//! Ownership watcher infrastructure module
//!
//! Sources of ownership-change notifications: XFixes on X11, `wl-paste
//! --watch` on Wayland, and content polling everywhere else.

mod polling;
mod wl_paste;

pub use polling::PollingWatcher;
pub use wl_paste::WlPasteWatcher;

#[cfg(target_os = "linux")]
pub use super::x11::XfixesWatcher;
