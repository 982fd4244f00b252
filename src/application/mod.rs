//! Application layer - Use cases and port interfaces
//!
//! Contains the clipboard monitor and the trait definitions
//! for external system interactions.

pub mod monitor;
pub mod ports;

// Re-export use cases
pub use monitor::{BufferChanged, ClipboardMonitor};
