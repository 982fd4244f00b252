//! Buffer access infrastructure module
//!
//! Provides clipboard/selection access using arboard (cross-platform)
//! or the wl-clipboard tools on Wayland.

mod arboard;
mod wayland;

pub use arboard::ArboardBuffers;
pub use wayland::WlClipboardBuffers;
